//! Error types.

use core::fmt;

/// Error building a [`MatchTable`](crate::MatchTable) from a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern has more symbols than the lane vector has bits.
    TooLong {
        /// Length of the rejected pattern.
        len: usize,
        /// Longest supported pattern.
        max: usize,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { len, max } => {
                write!(f, "pattern of {} symbols exceeds the {}-bit lane vector", len, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternError {}
