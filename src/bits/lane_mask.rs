//! One-bit-per-lane masks.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not};

use bytemuck::{Pod, Zeroable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::LANES;

const _: () = assert!(LANES <= u16::BITS as usize);

/// A set of lanes, bit `i` standing for lane `i`.
///
/// Shaped like an AVX-512 `__mmask16`, so the SIMD kernel converts to and
/// from it without any shuffling.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct LaneMask(u16);

impl LaneMask {
    /// No lanes.
    pub const EMPTY: Self = Self(0);

    /// Every lane.
    pub const ALL: Self = Self(u16::MAX);

    /// Build a mask from raw bits.
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits, lane 0 in bit 0.
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// The lowest `n` lanes. Saturates at [`LaneMask::ALL`].
    #[inline]
    pub const fn low(n: usize) -> Self {
        if n >= LANES {
            Self::ALL
        } else {
            Self((1u16 << n) - 1)
        }
    }

    /// Collect the lanes for which `f` returns true.
    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize) -> bool) -> Self {
        let mut bits = 0u16;
        for lane in 0..LANES {
            bits |= (f(lane) as u16) << lane;
        }
        Self(bits)
    }

    #[inline]
    pub const fn contains(self, lane: usize) -> bool {
        lane < LANES && (self.0 >> lane) & 1 == 1
    }

    /// This mask with `lane` added.
    #[inline]
    pub const fn with(self, lane: usize) -> Self {
        Self(self.0 | (1u16 << lane))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of lanes in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Move every lane bit to the next lane up.
    ///
    /// Lane `i` receives lane `i - 1`, lane 0 receives `boundary`, and the
    /// top lane's bit falls off. This is how a per-lane carry-out becomes
    /// the next lane's carry-in.
    #[inline]
    pub const fn shift_up(self, boundary: bool) -> Self {
        Self((self.0 << 1) | boundary as u16)
    }

    /// Iterate over the lanes in the set, lowest first.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        core::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let lane = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(lane)
        })
    }
}

impl fmt::Debug for LaneMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LaneMask({:#018b})", self.0)
    }
}

impl BitAnd for LaneMask {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for LaneMask {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for LaneMask {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for LaneMask {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}
