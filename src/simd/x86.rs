//! AVX-512F step kernel for x86_64.
//!
//! One `__m512i` holds the whole 512-bit vector as 16 lanes of `u32`, so the
//! lane layout of [`BitVector`] maps onto the register unchanged and a
//! [`LaneMask`] is exactly a `__mmask16`. Only AVX-512F instructions are
//! used. A failed carry validation falls back to the portable recovery
//! path, after which commit and prediction are the portable ones too.

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::bits::{BitVector, LaneMask};
use crate::kernel::{self, CarryVector, Frame, MatchSignal, Step};
use crate::state::State;

// Ternary-logic immediates, operands (A, B, C):
// (A ^ B) | C
const XOR_OR: i32 = 0xBE;
// A | !(B | C)
const OR_NOR: i32 = 0xF1;

/// Load a vector into a register.
///
/// # Safety
///
/// - CPU must support AVX-512F (caller should check)
#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn load(v: &BitVector) -> __m512i {
    unsafe { _mm512_loadu_si512(v as *const BitVector as *const __m512i) }
}

/// Spill a register back into a vector.
///
/// # Safety
///
/// - CPU must support AVX-512F (caller should check)
#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn store(v: __m512i) -> BitVector {
    let mut out = BitVector::ZERO;
    unsafe { _mm512_storeu_si512(&mut out as *mut BitVector as *mut __m512i, v) };
    out
}

/// Whole-vector left shift by one bit. `boundary` carries the incoming bit
/// in the top bit of its last lane.
///
/// # Safety
///
/// - CPU must support AVX-512F (caller should check)
#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn shl1(x: __m512i, boundary: __m512i) -> __m512i {
    // Lane 0 <- boundary[15], lane i <- x[i - 1].
    let below = _mm512_alignr_epi32::<15>(x, boundary);
    _mm512_or_si512(_mm512_slli_epi32::<1>(x), _mm512_srli_epi32::<31>(below))
}

/// Generate and propagate lanes of `(eq & vp) + vp`, plus the carry-free sum.
///
/// # Safety
///
/// - CPU must support AVX-512F (caller should check)
#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn add_terms(eq: __m512i, vp: __m512i) -> (__m512i, __mmask16, __mmask16) {
    let sum = _mm512_add_epi32(_mm512_and_si512(eq, vp), vp);
    // Unsigned wraparound: the sum is below an addend exactly on overflow.
    let generate = _mm512_cmplt_epu32_mask(sum, vp);
    let propagate = _mm512_cmpeq_epi32_mask(sum, _mm512_set1_epi32(-1));
    (sum, generate, propagate)
}

/// One update step with the whole vector in a register.
///
/// # Safety
///
/// - CPU must support AVX-512F (caller should check)
#[target_feature(enable = "avx512f")]
unsafe fn step_avx512(
    frame: &Frame,
    eq_v: BitVector,
    next_eq_v: BitVector,
    state: &State,
    carry_in: CarryVector,
) -> Step {
    unsafe {
        let eq = load(&eq_v);
        let vp = load(&state.vp);
        let vn = load(&state.vn);
        let carry = carry_in.bits();

        let (sum, generate, propagate) = add_terms(eq, vp);
        let expected = (generate | (propagate & carry)) << 1;
        if (expected ^ carry) & frame.lanes.bits() != 0 {
            let h = kernel::recover(eq_v, state);
            return kernel::finish(frame, eq_v, next_eq_v, state, &h, true);
        }

        let active = load(&frame.active);
        let sum = _mm512_mask_add_epi32(sum, carry, sum, _mm512_set1_epi32(1));
        let d0 = _mm512_ternarylogic_epi32::<XOR_OR>(sum, vp, eq);
        let hp = _mm512_ternarylogic_epi32::<OR_NOR>(vn, vp, d0);
        let hn = _mm512_and_si512(vp, d0);

        let hp_boundary = _mm512_set1_epi32(if frame.hp_boundary { i32::MIN } else { 0 });
        let hp_shifted = shl1(hp, hp_boundary);
        let hn_shifted = shl1(hn, _mm512_setzero_si512());
        let xv = _mm512_or_si512(eq, vn);
        let vp_next = _mm512_and_si512(
            _mm512_ternarylogic_epi32::<OR_NOR>(hn_shifted, xv, hp_shifted),
            active,
        );
        let vn_next = _mm512_and_si512(_mm512_and_si512(hp_shifted, xv), active);

        let xv_r = _mm512_or_si512(
            _mm512_srli_epi32::<1>(xv),
            _mm512_set1_epi32(i32::MIN),
        );
        let vp_half = _mm512_and_si512(
            _mm512_ternarylogic_epi32::<OR_NOR>(hn, xv_r, hp),
            load(&frame.active_half),
        );
        let eq_half = _mm512_and_si512(_mm512_srli_epi32::<1>(load(&next_eq_v)), vp_half);
        let estimate = _mm512_add_epi32(eq_half, vp_half);
        let carry_out = _mm512_cmplt_epi32_mask(estimate, _mm512_setzero_si512());

        let next = State {
            vp: store(vp_next),
            vn: store(vn_next),
        };
        next.debug_check();
        Step {
            state: next,
            carry: LaneMask::from_bits(carry_out << 1) & frame.lanes,
            signal: MatchSignal {
                hp: store(_mm512_and_si512(hp, active)),
                hn: store(_mm512_and_si512(hn, active)),
            },
            recovered: false,
        }
    }
}

/// [`kernel::step`] on AVX-512F.
///
/// Callers check [`avx512_available`](super::avx512_available) first.
#[inline]
pub(crate) fn step(
    frame: &Frame,
    eq: BitVector,
    next_eq: BitVector,
    state: &State,
    carry_in: CarryVector,
) -> Step {
    debug_assert!(super::avx512_available());
    // SAFETY: Caller must ensure AVX-512F is available
    unsafe { step_avx512(frame, eq, next_eq, state, carry_in) }
}
