//! Vertical delta state carried from one text symbol to the next.

use bytemuck::{Pod, Zeroable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::kernel::Frame;

/// The running column of vertical deltas.
///
/// Bit `k` of `vp` set means `D[k+1][j] - D[k][j] = +1`, bit `k` of `vn` set
/// means it is `-1`, neither means 0. The two are never both set, and both
/// are clear outside the pattern's active bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct State {
    /// Vertical positive deltas.
    pub vp: BitVector,
    /// Vertical negative deltas.
    pub vn: BitVector,
}

impl State {
    /// Column 0 of the DP matrix: `D[k][0] = k`, every vertical delta +1.
    #[inline]
    pub fn seed(frame: &Frame) -> Self {
        Self {
            vp: frame.active,
            vn: BitVector::ZERO,
        }
    }

    /// Sum of the vertical deltas over the active rows: `D[m][j] - D[0][j]`.
    #[inline]
    pub fn column_sum(&self, frame: &Frame) -> isize {
        (self.vp & frame.active).count_ones() as isize
            - (self.vn & frame.active).count_ones() as isize
    }

    /// Raw bytes of both vectors, `vp` first.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    #[inline]
    pub(crate) fn debug_check(&self) {
        debug_assert!(
            (self.vp & self.vn).is_zero(),
            "vertical deltas both +1 and -1: {:?}",
            self.vp & self.vn
        );
    }
}
