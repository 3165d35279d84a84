//! Lane-split bit vectors.
//!
//! A [`BitVector`] is a 512-bit vector stored as 16 lanes of 32 bits, the
//! layout of one AVX-512 register viewed as `epi32` lanes. Bit `b` lives in
//! lane `b / 32` at offset `b % 32`; lane 0 holds the lowest bits.
//!
//! A [`LaneMask`] carries one bit per lane. It is used for inter-lane carries
//! and for per-lane validation verdicts.

mod lane_mask;
mod vector;

pub use lane_mask::LaneMask;
pub use vector::{BitVector, LANES, LANE_BITS, WIDTH};
