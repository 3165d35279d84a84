//! Consistency check of a carry vector against the add it feeds.
//!
//! With `g` the lanes whose `(EQ & VP) + VP` overflows on its own and `p`
//! the lanes whose sum is all ones, the true carry chain satisfies
//! `carry[i + 1] = g[i] | (p[i] & carry[i])` with `carry[0] = 0`. Checking
//! that equation for every lane at once needs no sequential pass. A vector
//! that satisfies it everywhere equals the true chain, by induction from
//! lane 0.

use crate::bits::{BitVector, LaneMask};

use super::{CarryVector, Frame};

/// Outcome of [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    mismatch: LaneMask,
}

impl Verdict {
    /// Whether the carry vector can be used as is.
    #[inline]
    pub fn passed(self) -> bool {
        self.mismatch.is_empty()
    }

    /// Pattern lanes whose carry disagrees with its neighbour below.
    #[inline]
    pub fn mismatch(self) -> LaneMask {
        self.mismatch
    }
}

/// Generate and propagate lanes of `(eq & vp) + vp`.
#[inline]
pub(crate) fn lookahead_terms(eq: BitVector, vp: BitVector) -> (LaneMask, LaneMask) {
    let a = eq & vp;
    let generate = a.overflow_lanes(vp);
    let propagate = a.add_lanes(vp, LaneMask::EMPTY).saturated_lanes();
    (generate, propagate)
}

/// Check `carry` against the add of `eq` and `vp`, on the pattern lanes of
/// `frame`.
#[inline]
pub fn validate(frame: &Frame, eq: BitVector, vp: BitVector, carry: CarryVector) -> Verdict {
    let (generate, propagate) = lookahead_terms(eq, vp);
    let expected = (generate | (propagate & carry)).shift_up(false);
    Verdict {
        mismatch: (expected ^ carry) & frame.lanes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::LANES;
    use crate::config::Mode;
    use crate::kernel::carry_chain;

    fn lanes(values: &[(usize, u32)]) -> BitVector {
        let mut out = [0u32; LANES];
        for &(lane, value) in values {
            out[lane] = value;
        }
        BitVector::from_lanes(out)
    }

    #[test]
    fn test_true_chain_passes() {
        let frame = Frame::from_len(512, Mode::Global);
        let vp = lanes(&[(0, 0xF000_0000), (1, u32::MAX), (2, u32::MAX), (5, 0x8000_0000)]);
        let eq = lanes(&[(0, 0x8000_0000), (5, 0x8000_0000)]);
        let chain = carry_chain(eq, vp);
        // Lane 0 generates, lanes 1 and 2 propagate, lane 5 generates.
        assert_eq!(chain.bits(), 0b100_1110);
        assert!(validate(&frame, eq, vp, chain).passed());
    }

    #[test]
    fn test_propagate_chain_mispredicted() {
        let frame = Frame::from_len(512, Mode::Global);
        let eq = lanes(&[(0, 1)]);
        let vp = BitVector::ONES;

        // Lane 0 generates and every lane above propagates.
        let chain = carry_chain(eq, vp);
        assert_eq!(chain, LaneMask::ALL & !LaneMask::low(1));

        // Only lane 1 is a direct carry; the rest arrive through the chain.
        let local = LaneMask::from_bits(0b10);
        let verdict = validate(&frame, eq, vp, local);
        assert!(!verdict.passed());
        assert_eq!(verdict.mismatch().bits(), 0b100);
        assert!(validate(&frame, eq, vp, chain).passed());
    }

    #[test]
    fn test_carry_into_lane_zero_rejected() {
        let frame = Frame::from_len(64, Mode::Global);
        let verdict = validate(&frame, BitVector::ZERO, BitVector::ZERO, LaneMask::from_bits(1));
        assert_eq!(verdict.mismatch().bits(), 1);
    }

    #[test]
    fn test_ignores_lanes_outside_pattern() {
        let frame = Frame::from_len(40, Mode::Global);
        let verdict = validate(
            &frame,
            BitVector::ZERO,
            BitVector::mask_upto(40),
            LaneMask::from_bits(0xFF00),
        );
        assert!(verdict.passed());
    }

    #[test]
    fn test_lookahead_terms() {
        let eq = lanes(&[(0, 0x8000_0000), (1, 0)]);
        let vp = lanes(&[(0, 0x8000_0000), (1, u32::MAX), (2, 0x7FFF_FFFF)]);
        let (g, p) = lookahead_terms(eq, vp);
        assert_eq!(g.bits(), 0b001);
        assert_eq!(p.bits(), 0b010);
    }
}
