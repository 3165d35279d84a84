//! Exact sequential fallback for a mispredicted carry vector.

use crate::bits::{BitVector, LANES};
use crate::state::State;

use super::{CarryVector, Horizontal};

/// The true carry chain of `(eq & vp) + vp`, lane 0 upwards.
pub fn carry_chain(eq: BitVector, vp: BitVector) -> CarryVector {
    let a = eq & vp;
    let mut chain = CarryVector::EMPTY;
    let mut carry = false;
    for lane in 0..LANES {
        if carry {
            chain = chain.with(lane);
        }
        let (sum, c1) = a.lane(lane).overflowing_add(vp.lane(lane));
        let (_, c2) = sum.overflowing_add(carry as u32);
        carry = c1 | c2;
    }
    chain
}

/// Horizontal deltas of a step, computed one lane at a time in lane order
/// with the carry of each lane fed straight into the next.
pub fn recover(eq: BitVector, state: &State) -> Horizontal {
    let mut hp = [0u32; LANES];
    let mut hn = [0u32; LANES];
    let mut carry = 0u32;
    for lane in 0..LANES {
        let e = eq.lane(lane);
        let vp = state.vp.lane(lane);
        let vn = state.vn.lane(lane);

        let (sum, c1) = (e & vp).overflowing_add(vp);
        let (sum, c2) = sum.overflowing_add(carry);
        carry = (c1 | c2) as u32;

        let d0 = (sum ^ vp) | e;
        hp[lane] = vn | !(vp | d0);
        hn[lane] = vp & d0;
    }
    Horizontal {
        hp: BitVector::from_lanes(hp),
        hn: BitVector::from_lanes(hn),
    }
}
