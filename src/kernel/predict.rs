//! One-pass estimate of the next step's lane carries.
//!
//! The next add is `(EQ' & VP') + VP'`. Its carry out of a lane is decided
//! almost entirely by the lane's own bits, so instead of waiting for the
//! cross-lane shift we rebuild `VP' >> 1` from the unshifted deltas and add
//! the halves. Halving keeps the top bit free, so the estimated carry-out is
//! the sign bit of the half sum.
//!
//! What the estimate leaves out is the carry out of bit 0 and any carry
//! arriving from the lane below; a lane that is all propagate will be
//! mispredicted and caught by [`validate`](super::validate).

use crate::bits::BitVector;

use super::{CarryVector, Frame, Horizontal};

/// Predicted carry vector for the step that consumes `next_eq`.
///
/// `h` holds this step's unshifted deltas and `xv` its `EQ | VN`.
#[inline]
pub fn predict(frame: &Frame, h: &Horizontal, xv: BitVector, next_eq: BitVector) -> CarryVector {
    // Bit 31 of each lane stands in for the unknown bit of the lane above.
    let xv_r = xv.shr1_lanes() | BitVector::TOP;
    let vp_half = (h.hn | !(xv_r | h.hp)) & frame.active_half;
    let eq_half = next_eq.shr1_lanes() & vp_half;
    let estimate = eq_half.add_lanes(vp_half, CarryVector::EMPTY);
    estimate.sign_lanes().shift_up(false) & frame.lanes
}
