//! Per-symbol match vectors for a pattern.
//!
//! For a pattern `p`, `table.lookup(c)` has bit `k` set exactly when
//! `p[k] == c`. This is the `Peq` table of the Myers algorithm.

use core::ops::Index;

use bytemuck::Zeroable;

use crate::bits::{BitVector, WIDTH};
use crate::error::PatternError;

/// Match vectors for all 256 byte values of one pattern.
///
/// Built once per pattern and read-only afterwards. Lookups are total over
/// `u8`, so the kernel never sees a malformed symbol.
#[derive(Clone)]
pub struct MatchTable {
    peq: [BitVector; 256],
    len: usize,
}

impl MatchTable {
    /// Longest pattern a table can hold.
    pub const MAX_LEN: usize = WIDTH;

    /// Build the table for `pattern`.
    ///
    /// # Examples
    ///
    /// ```
    /// use myers_lanes::MatchTable;
    ///
    /// let table = MatchTable::from_bytes(b"GATTACA").unwrap();
    /// assert_eq!(table.len(), 7);
    /// assert!(table.lookup(b'A').bit(1));
    /// assert!(table.lookup(b'A').bit(6));
    /// assert!(!table.lookup(b'C').is_zero());
    /// assert!(table.lookup(b'X').is_zero());
    /// ```
    pub fn from_bytes<B: AsRef<[u8]>>(pattern: B) -> Result<Self, PatternError> {
        let pattern = pattern.as_ref();
        if pattern.len() > Self::MAX_LEN {
            return Err(PatternError::TooLong {
                len: pattern.len(),
                max: Self::MAX_LEN,
            });
        }

        let mut peq: [BitVector; 256] = Zeroable::zeroed();
        for (i, &symbol) in pattern.iter().enumerate() {
            peq[symbol as usize].set_bit(i);
        }

        Ok(Self {
            peq,
            len: pattern.len(),
        })
    }

    /// Match vector for `symbol`.
    #[inline]
    pub fn lookup(&self, symbol: u8) -> BitVector {
        self.peq[symbol as usize]
    }

    /// Pattern length in symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bits `[0, len)`: the pattern positions.
    #[inline]
    pub fn active(&self) -> BitVector {
        BitVector::mask_upto(self.len)
    }
}

impl Index<u8> for MatchTable {
    type Output = BitVector;

    #[inline]
    fn index(&self, symbol: u8) -> &BitVector {
        &self.peq[symbol as usize]
    }
}

impl core::fmt::Debug for MatchTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let symbols = self.peq.iter().filter(|v| !v.is_zero()).count();
        f.debug_struct("MatchTable")
            .field("len", &self.len)
            .field("symbols", &symbols)
            .finish()
    }
}
