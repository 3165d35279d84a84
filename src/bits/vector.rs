//! 512-bit vectors split into 32-bit lanes.
//!
//! Bitwise operators work on the whole vector. Arithmetic is per lane with
//! twos-complement wraparound; the only way a bit crosses a lane boundary is
//! an explicit carry argument ([`BitVector::add_lanes`]) or the whole-vector
//! shift ([`BitVector::shl1`]).

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not};

use bytemuck::{Pod, Zeroable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::LaneMask;

/// Number of lanes in a [`BitVector`].
pub const LANES: usize = 16;

/// Bits per lane.
pub const LANE_BITS: usize = 32;

/// Total bits in a [`BitVector`].
pub const WIDTH: usize = LANES * LANE_BITS;

const TOP_BIT: u32 = 1 << (LANE_BITS - 1);

/// A `WIDTH`-bit vector stored as `LANES` lanes of `u32`.
///
/// 64-byte aligned so it loads straight into a `__m512i`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C, align(64))]
pub struct BitVector {
    lanes: [u32; LANES],
}

impl BitVector {
    /// All bits clear.
    pub const ZERO: Self = Self { lanes: [0; LANES] };

    /// All bits set.
    pub const ONES: Self = Self {
        lanes: [u32::MAX; LANES],
    };

    /// The top bit of every lane.
    pub const TOP: Self = Self {
        lanes: [TOP_BIT; LANES],
    };

    #[inline]
    pub const fn from_lanes(lanes: [u32; LANES]) -> Self {
        Self { lanes }
    }

    #[inline]
    pub const fn lanes(&self) -> &[u32; LANES] {
        &self.lanes
    }

    #[inline]
    pub fn lane(&self, lane: usize) -> u32 {
        self.lanes[lane]
    }

    /// Build from little-endian `u64` words: word `w` covers bits `64w..64w+64`.
    pub fn from_words(words: [u64; LANES / 2]) -> Self {
        let mut lanes = [0u32; LANES];
        for (i, &word) in words.iter().enumerate() {
            lanes[2 * i] = word as u32;
            lanes[2 * i + 1] = (word >> 32) as u32;
        }
        Self { lanes }
    }

    /// Inverse of [`BitVector::from_words`].
    pub fn to_words(&self) -> [u64; LANES / 2] {
        let mut words = [0u64; LANES / 2];
        for (i, word) in words.iter_mut().enumerate() {
            *word = self.lanes[2 * i] as u64 | (self.lanes[2 * i + 1] as u64) << 32;
        }
        words
    }

    /// Bits `[0, len)` set, the rest clear. `len` saturates at [`WIDTH`].
    pub fn mask_upto(len: usize) -> Self {
        let len = len.min(WIDTH);
        let mut lanes = [0u32; LANES];
        let full = len / LANE_BITS;
        for lane in lanes.iter_mut().take(full) {
            *lane = u32::MAX;
        }
        let rem = len % LANE_BITS;
        if rem != 0 {
            lanes[full] = (1u32 << rem) - 1;
        }
        Self { lanes }
    }

    /// Whether bit `i` is set. Bits at or above [`WIDTH`] read as clear.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        i < WIDTH && (self.lanes[i / LANE_BITS] >> (i % LANE_BITS)) & 1 == 1
    }

    /// Set bit `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= WIDTH`.
    #[inline]
    pub fn set_bit(&mut self, i: usize) {
        assert!(i < WIDTH, "bit index {} out of range for {} bits", i, WIDTH);
        self.lanes[i / LANE_BITS] |= 1 << (i % LANE_BITS);
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.lanes.iter().map(|lane| lane.count_ones()).sum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.lanes.iter().all(|&lane| lane == 0)
    }

    /// Raw lane bytes in memory order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Lanes that contain at least one set bit.
    #[inline]
    pub fn nonzero_lanes(&self) -> LaneMask {
        LaneMask::from_fn(|lane| self.lanes[lane] != 0)
    }

    /// Per-lane wrapping add, plus one in every lane named by `carry`.
    #[inline]
    pub fn add_lanes(self, rhs: Self, carry: LaneMask) -> Self {
        let mut lanes = [0u32; LANES];
        for (lane, out) in lanes.iter_mut().enumerate() {
            *out = self.lanes[lane]
                .wrapping_add(rhs.lanes[lane])
                .wrapping_add(carry.contains(lane) as u32);
        }
        Self { lanes }
    }

    /// Lanes where `self + rhs` (no carry-in) overflows the lane: the
    /// carry-lookahead "generate" term.
    #[inline]
    pub fn overflow_lanes(self, rhs: Self) -> LaneMask {
        LaneMask::from_fn(|lane| self.lanes[lane].overflowing_add(rhs.lanes[lane]).1)
    }

    /// Lanes where every bit is set: the "propagate" term of a lane sum.
    #[inline]
    pub fn saturated_lanes(self) -> LaneMask {
        LaneMask::from_fn(|lane| self.lanes[lane] == u32::MAX)
    }

    /// Lanes whose top bit is set.
    ///
    /// Equivalent to broadcasting the sign with an arithmetic shift by
    /// `LANE_BITS - 1` and testing the lane for non-zero.
    #[inline]
    pub fn sign_lanes(self) -> LaneMask {
        LaneMask::from_fn(|lane| ((self.lanes[lane] as i32) >> (LANE_BITS - 1)) != 0)
    }

    /// Logical right shift by one inside each lane; nothing crosses lanes.
    #[inline]
    pub fn shr1_lanes(self) -> Self {
        let mut lanes = self.lanes;
        for lane in lanes.iter_mut() {
            *lane >>= 1;
        }
        Self { lanes }
    }

    /// Left shift of the whole vector by one bit.
    ///
    /// Each lane's top bit becomes bit 0 of the next lane up; bit 0 of lane
    /// 0 is `boundary`, the top bit of the last lane is discarded.
    #[inline]
    pub fn shl1(self, boundary: bool) -> Self {
        let mut lanes = [0u32; LANES];
        let mut carry = boundary as u32;
        for (lane, out) in lanes.iter_mut().enumerate() {
            let x = self.lanes[lane];
            *out = (x << 1) | carry;
            carry = x >> (LANE_BITS - 1);
        }
        Self { lanes }
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Highest lane first, so the output reads like one wide integer.
        write!(f, "BitVector(")?;
        for (i, lane) in self.lanes.iter().rev().enumerate() {
            if i > 0 {
                write!(f, "_")?;
            }
            write!(f, "{:08x}", lane)?;
        }
        write!(f, ")")
    }
}

macro_rules! impl_bitwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for BitVector {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                let mut lanes = self.lanes;
                for (lane, &r) in lanes.iter_mut().zip(rhs.lanes.iter()) {
                    *lane = *lane $op r;
                }
                Self { lanes }
            }
        }
    };
}

impl_bitwise!(BitAnd, bitand, &);
impl_bitwise!(BitOr, bitor, |);
impl_bitwise!(BitXor, bitxor, ^);

impl Not for BitVector {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        let mut lanes = self.lanes;
        for lane in lanes.iter_mut() {
            *lane = !*lane;
        }
        Self { lanes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_upto() {
        assert_eq!(BitVector::mask_upto(0), BitVector::ZERO);
        assert_eq!(BitVector::mask_upto(WIDTH), BitVector::ONES);
        assert_eq!(BitVector::mask_upto(WIDTH + 7), BitVector::ONES);

        let m = BitVector::mask_upto(40);
        assert_eq!(m.lane(0), u32::MAX);
        assert_eq!(m.lane(1), 0xFF);
        assert_eq!(m.lane(2), 0);
        assert_eq!(m.count_ones(), 40);

        let m = BitVector::mask_upto(64);
        assert_eq!(m.lane(1), u32::MAX);
        assert_eq!(m.lane(2), 0);
    }

    #[test]
    fn test_bit_roundtrip_across_lanes() {
        let mut v = BitVector::ZERO;
        for i in [0, 31, 32, 63, 64, 300, 511] {
            v.set_bit(i);
        }
        for i in 0..WIDTH {
            let expected = matches!(i, 0 | 31 | 32 | 63 | 64 | 300 | 511);
            assert_eq!(v.bit(i), expected, "bit {}", i);
        }
        assert!(!v.bit(WIDTH));
        assert_eq!(v.count_ones(), 7);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_bit_out_of_range() {
        let mut v = BitVector::ZERO;
        v.set_bit(WIDTH);
    }

    #[test]
    fn test_words_layout() {
        let mut words = [0u64; LANES / 2];
        words[0] = 0x1111_2222_3333_4444;
        words[7] = 0x8000_0000_0000_0001;
        let v = BitVector::from_words(words);
        assert_eq!(v.lane(0), 0x3333_4444);
        assert_eq!(v.lane(1), 0x1111_2222);
        assert_eq!(v.lane(14), 0x0000_0001);
        assert_eq!(v.lane(15), 0x8000_0000);
        assert!(v.bit(511));
        assert_eq!(v.to_words(), words);
    }

    #[test]
    fn test_shl1_crosses_lanes() {
        let v = BitVector::from_lanes({
            let mut lanes = [0u32; LANES];
            lanes[0] = 0x8000_0001;
            lanes[15] = 0x8000_0000;
            lanes
        });

        let shifted = v.shl1(false);
        assert_eq!(shifted.lane(0), 0x0000_0002);
        assert_eq!(shifted.lane(1), 0x0000_0001);
        // Top bit of the last lane falls off the vector.
        assert_eq!(shifted.lane(15), 0);

        let shifted = v.shl1(true);
        assert_eq!(shifted.lane(0), 0x0000_0003);
    }

    #[test]
    fn test_shl1_matches_bit_shift() {
        let mut v = BitVector::ZERO;
        for i in (0..WIDTH).step_by(7) {
            v.set_bit(i);
        }
        let shifted = v.shl1(true);
        assert!(shifted.bit(0));
        for i in 1..WIDTH {
            assert_eq!(shifted.bit(i), v.bit(i - 1), "bit {}", i);
        }
    }

    #[test]
    fn test_add_lanes_wraps_and_takes_carry() {
        let a = BitVector::from_lanes([u32::MAX; LANES]);
        let b = BitVector::from_lanes([1; LANES]);
        assert_eq!(a.add_lanes(b, LaneMask::EMPTY), BitVector::ZERO);

        let sum = BitVector::ZERO.add_lanes(BitVector::ZERO, LaneMask::from_bits(0b101));
        assert_eq!(sum.lane(0), 1);
        assert_eq!(sum.lane(1), 0);
        assert_eq!(sum.lane(2), 1);
    }

    #[test]
    fn test_generate_and_propagate_lanes() {
        let mut lanes = [0u32; LANES];
        lanes[0] = 0x8000_0000;
        lanes[1] = 0x7FFF_FFFF;
        let a = BitVector::from_lanes(lanes);

        let mut lanes = [0u32; LANES];
        lanes[0] = 0x8000_0000;
        lanes[1] = 0x8000_0000;
        let b = BitVector::from_lanes(lanes);

        // Lane 0 overflows, lane 1 sums to all ones.
        assert_eq!(a.overflow_lanes(b).bits(), 0b01);
        assert_eq!((a | b).saturated_lanes().bits(), 0b10);
    }

    #[test]
    fn test_sign_lanes() {
        let mut lanes = [0x7FFF_FFFFu32; LANES];
        lanes[3] = 0x8000_0000;
        lanes[9] = u32::MAX;
        let v = BitVector::from_lanes(lanes);
        assert_eq!(v.sign_lanes().bits(), (1 << 3) | (1 << 9));
        assert_eq!(BitVector::TOP.sign_lanes(), LaneMask::ALL);
    }

    #[test]
    fn test_shr1_lanes_stays_in_lane() {
        let mut lanes = [0u32; LANES];
        lanes[1] = 0b11;
        let v = BitVector::from_lanes(lanes).shr1_lanes();
        assert_eq!(v.lane(0), 0);
        assert_eq!(v.lane(1), 0b1);
    }

    #[test]
    fn test_nonzero_lanes() {
        let v = BitVector::mask_upto(40);
        assert_eq!(v.nonzero_lanes().bits(), 0b11);
        assert!(BitVector::ZERO.nonzero_lanes().is_empty());
    }

    #[test]
    fn test_bytes_view() {
        let v = BitVector::mask_upto(8);
        let bytes = v.as_bytes();
        assert_eq!(bytes.len(), 64);
        assert_eq!(bytes[0], 0xFF);
        assert!(bytes[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_debug_highest_lane_first() {
        let s = format!("{:?}", BitVector::mask_upto(4));
        assert!(s.starts_with("BitVector(00000000_"));
        assert!(s.ends_with("_0000000f)"));
    }
}
