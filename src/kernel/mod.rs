//! The lane-parallel Myers/Hyyrö update step.
//!
//! One step consumes the match vector of a text symbol and advances the
//! vertical delta state by one column. Inside a lane everything is plain
//! word arithmetic. The only cross-lane dependency is the carry of the
//! `(EQ & VP) + VP` add, which is predicted one iteration ahead
//! ([`predict`]), checked before use ([`validate`]) and recomputed
//! sequentially when the check fails ([`recover`]).
//!
//! ```text
//!   carry_in ──► validate ──pass──► horizontal ──┐
//!                   │                            ├──► commit ──► predict ──► carry_out
//!                   └──fail──► recover ──────────┘
//! ```

pub mod predict;
pub mod recover;
pub mod validate;

pub use predict::predict;
pub use recover::{carry_chain, recover};
pub use validate::{validate, Verdict};

use crate::bits::{BitVector, LaneMask, LANES, LANE_BITS};
use crate::config::{Backend, Mode};
use crate::state::State;
use crate::table::MatchTable;

/// Carries flowing between lanes of the `(EQ & VP) + VP` add.
///
/// Bit `i` is the carry into lane `i` out of lane `i - 1`; bit 0 is always
/// clear because the add has no carry-in of its own.
pub type CarryVector = LaneMask;

/// Per-pattern constants of the step.
///
/// The fields are derived from each other and only [`Frame::new`] and
/// [`Frame::from_len`] build them; the validator trusts `lanes` to cover
/// every active bit.
///
/// ```compile_fail
/// use myers_lanes::{Frame, Mode};
///
/// let mut frame = Frame::from_len(40, Mode::Global);
/// frame.lanes = myers_lanes::LaneMask::EMPTY;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Bits `[0, len)`.
    pub(crate) active: BitVector,
    /// `active` shifted right by one inside each lane.
    pub(crate) active_half: BitVector,
    /// Lanes holding at least one active bit.
    pub(crate) lanes: LaneMask,
    /// Bit shifted into the bottom of HP each step.
    pub(crate) hp_boundary: bool,
    pub(crate) len: usize,
}

impl Frame {
    pub fn new(table: &MatchTable, mode: Mode) -> Self {
        Self::from_len(table.len(), mode)
    }

    /// Frame for a pattern of `len` symbols. `len` saturates at the vector
    /// width.
    pub fn from_len(len: usize, mode: Mode) -> Self {
        let active = BitVector::mask_upto(len);
        Self {
            active,
            active_half: active.shr1_lanes(),
            lanes: active.nonzero_lanes(),
            hp_boundary: mode.hp_boundary(),
            len: len.min(crate::bits::WIDTH),
        }
    }

    /// Bits `[0, len)`.
    #[inline]
    pub fn active(&self) -> BitVector {
        self.active
    }

    /// `active` shifted right by one inside each lane.
    #[inline]
    pub fn active_half(&self) -> BitVector {
        self.active_half
    }

    /// Lanes holding at least one active bit.
    #[inline]
    pub fn lanes(&self) -> LaneMask {
        self.lanes
    }

    #[inline]
    pub fn hp_boundary(&self) -> bool {
        self.hp_boundary
    }

    /// Pattern length.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Unshifted horizontal deltas of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Horizontal {
    pub hp: BitVector,
    pub hn: BitVector,
}

/// Horizontal deltas of a step restricted to the pattern rows.
///
/// Bit `r` describes row `r + 1` of the DP matrix: `D[r+1][j] - D[r+1][j-1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchSignal {
    pub hp: BitVector,
    pub hn: BitVector,
}

impl MatchSignal {
    /// Horizontal delta at bit `bit`: +1, -1 or 0.
    #[inline]
    pub fn delta(&self, bit: usize) -> i32 {
        self.hp.bit(bit) as i32 - self.hn.bit(bit) as i32
    }

    /// Change of the bottom-row score for a pattern of `len` symbols.
    ///
    /// An empty pattern has no rows; its bottom row is the top boundary row.
    #[inline]
    pub fn score_delta(&self, len: usize, mode: Mode) -> i32 {
        match len {
            0 => mode.hp_boundary() as i32,
            _ => self.delta(len - 1),
        }
    }

    /// Delta at the top bit of every lane.
    pub fn lane_deltas(&self) -> [i8; LANES] {
        let mut out = [0i8; LANES];
        for (lane, delta) in out.iter_mut().enumerate() {
            *delta = self.delta(lane * LANE_BITS + LANE_BITS - 1) as i8;
        }
        out
    }
}

/// Output of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Vertical deltas after the step.
    pub state: State,
    /// Predicted carry for the next step.
    pub carry: CarryVector,
    pub signal: MatchSignal,
    /// Whether the incoming carry failed validation.
    pub recovered: bool,
}

/// `D0`, `HP` and `HN` for every lane, given the lane carries of the add.
#[inline]
pub fn horizontal(eq: BitVector, state: &State, carry: CarryVector) -> Horizontal {
    let State { vp, vn } = *state;
    let sum = (eq & vp).add_lanes(vp, carry);
    let d0 = (sum ^ vp) | eq;
    Horizontal {
        hp: vn | !(vp | d0),
        hn: vp & d0,
    }
}

/// Shift the horizontal deltas across the whole vector and derive the next
/// vertical deltas. Returns the new state and `XV = EQ | VN`.
#[inline]
pub(crate) fn commit(
    frame: &Frame,
    eq: BitVector,
    state: &State,
    h: &Horizontal,
) -> (State, BitVector) {
    let hp = h.hp.shl1(frame.hp_boundary);
    let hn = h.hn.shl1(false);
    let xv = eq | state.vn;
    let next = State {
        vp: (hn | !(xv | hp)) & frame.active,
        vn: (hp & xv) & frame.active,
    };
    next.debug_check();
    (next, xv)
}

/// Advance `state` by one text symbol with the portable lane loop.
///
/// `eq` is the match vector of the current symbol and `next_eq` that of the
/// following one, used only to predict the next carry. Pass
/// [`BitVector::ZERO`] when the next symbol is not known yet; the result is
/// the same, only the prediction is worse.
pub fn step(
    frame: &Frame,
    eq: BitVector,
    next_eq: BitVector,
    state: &State,
    carry_in: CarryVector,
) -> Step {
    let recovered = !validate(frame, eq, state.vp, carry_in).passed();
    let h = if recovered {
        recover(eq, state)
    } else {
        horizontal(eq, state, carry_in)
    };
    finish(frame, eq, next_eq, state, &h, recovered)
}

/// Commit and predict, shared by every kernel so that a recovered step is
/// bit-identical to a fast one.
#[inline]
pub(crate) fn finish(
    frame: &Frame,
    eq: BitVector,
    next_eq: BitVector,
    state: &State,
    h: &Horizontal,
    recovered: bool,
) -> Step {
    let (next, xv) = commit(frame, eq, state, h);
    Step {
        state: next,
        carry: predict(frame, h, xv, next_eq),
        signal: MatchSignal {
            hp: h.hp & frame.active,
            hn: h.hn & frame.active,
        },
        recovered,
    }
}

/// Like [`step`], running on `backend`.
///
/// `Avx512` and `Auto` use the AVX-512 kernel when the CPU supports it and
/// the portable loop otherwise.
#[inline]
pub fn step_with(
    backend: Backend,
    frame: &Frame,
    eq: BitVector,
    next_eq: BitVector,
    state: &State,
    carry_in: CarryVector,
) -> Step {
    match backend {
        Backend::Portable => step(frame, eq, next_eq, state, carry_in),
        Backend::Auto | Backend::Avx512 => {
            #[cfg(target_arch = "x86_64")]
            if crate::simd::avx512_available() {
                return crate::simd::x86::step(frame, eq, next_eq, state, carry_in);
            }
            step(frame, eq, next_eq, state, carry_in)
        }
    }
}
