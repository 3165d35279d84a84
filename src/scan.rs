//! Driving the step kernel over text.
//!
//! A [`Scanner`] owns the running state of one pattern against one stream of
//! text. Within each chunk passed to [`Scanner::feed`] the match vector of
//! the next symbol is looked up one step ahead, so the carry for the next
//! step can be predicted before it is needed.

#[cfg(not(any(test, feature = "std")))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::config::{Backend, Config, Mode};
use crate::error::PatternError;
use crate::kernel::{self, CarryVector, Frame};
use crate::state::State;
use crate::table::MatchTable;

/// Counters kept by a [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanStats {
    /// Steps taken.
    pub iterations: u64,
    /// Steps whose predicted carry failed validation.
    pub mispredictions: u64,
}

impl ScanStats {
    /// Fraction of steps that went through the recovery path.
    pub fn misprediction_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.mispredictions as f64 / self.iterations as f64
        }
    }
}

/// An approximate occurrence of the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    /// Offset of the last text symbol of the occurrence.
    pub end: usize,
    /// Edit distance of the best occurrence ending at `end`.
    pub distance: usize,
}

/// Streaming scan of text against one pattern.
///
/// # Examples
///
/// ```
/// use myers_lanes::{Config, MatchTable, Scanner};
///
/// let table = MatchTable::from_bytes(b"kitten").unwrap();
/// let mut scanner = Scanner::new(&table, Config::global());
/// scanner.feed(b"sit");
/// scanner.feed(b"ting");
/// assert_eq!(scanner.score(), 3);
/// assert_eq!(scanner.position(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    table: &'a MatchTable,
    frame: Frame,
    mode: Mode,
    backend: Backend,
    state: State,
    carry: CarryVector,
    score: i64,
    position: usize,
    stats: ScanStats,
}

impl<'a> Scanner<'a> {
    pub fn new(table: &'a MatchTable, config: Config) -> Self {
        let frame = Frame::new(table, config.mode);
        Self {
            table,
            frame,
            mode: config.mode,
            backend: config.backend.resolve(),
            state: State::seed(&frame),
            carry: CarryVector::EMPTY,
            score: table.len() as i64,
            position: 0,
            stats: ScanStats::default(),
        }
    }

    /// Consume `text`, predicting each step's carry from the next symbol.
    pub fn feed(&mut self, text: &[u8]) {
        self.feed_until(text, |_| false);
    }

    /// Consume `text` without looking ahead. The resulting state and score
    /// are the same as with [`Scanner::feed`].
    pub fn feed_unpipelined(&mut self, text: &[u8]) {
        for &symbol in text {
            self.advance(self.table.lookup(symbol), BitVector::ZERO);
        }
    }

    /// Consume `text` until `stop` returns true after a step. Returns the
    /// number of symbols consumed.
    pub fn feed_until<F>(&mut self, text: &[u8], mut stop: F) -> usize
    where
        F: FnMut(&Self) -> bool,
    {
        let Some(&first) = text.first() else {
            return 0;
        };
        let mut eq = self.table.lookup(first);
        for (i, &next) in text.iter().enumerate().skip(1) {
            let next_eq = self.table.lookup(next);
            self.advance(eq, next_eq);
            if stop(self) {
                return i;
            }
            eq = next_eq;
        }
        self.advance(eq, BitVector::ZERO);
        stop(self);
        text.len()
    }

    fn advance(&mut self, eq: BitVector, next_eq: BitVector) {
        let out = kernel::step_with(self.backend, &self.frame, eq, next_eq, &self.state, self.carry);
        if out.recovered {
            self.stats.mispredictions += 1;
            log::trace!(
                "carry misprediction at column {}: predicted {:?}",
                self.position,
                self.carry
            );
        }
        self.score += out.signal.score_delta(self.frame.len, self.mode) as i64;
        self.state = out.state;
        self.carry = out.carry;
        self.position += 1;
        self.stats.iterations += 1;
    }

    /// Vertical deltas of the current column.
    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Bottom-row value of the DP matrix at the current column: the edit
    /// distance so far in global mode, the best occurrence ending here in
    /// search mode.
    #[inline]
    pub fn score(&self) -> usize {
        self.score as usize
    }

    /// Number of symbols consumed since creation or the last reset.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The concrete kernel in use.
    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Return to column 0, keeping the pattern and configuration.
    pub fn reset(&mut self) {
        self.state = State::seed(&self.frame);
        self.carry = CarryVector::EMPTY;
        self.score = self.table.len() as i64;
        self.position = 0;
        self.stats = ScanStats::default();
    }
}

/// Edit distance between `pattern` and `text`.
///
/// ```
/// assert_eq!(myers_lanes::distance(b"flaw", b"lawn"), Ok(2));
/// ```
pub fn distance(pattern: &[u8], text: &[u8]) -> Result<usize, PatternError> {
    let table = MatchTable::from_bytes(pattern)?;
    let mut scanner = Scanner::new(&table, Config::global());
    scanner.feed(text);
    Ok(scanner.score())
}

/// Edit distance between the table's pattern and `text` if it is at most `k`.
///
/// Stops as soon as the bottom row exceeds `k` by more than the symbols left
/// to read, since each symbol lowers it by at most one.
pub fn bounded_distance(table: &MatchTable, text: &[u8], k: usize) -> Option<usize> {
    let mut scanner = Scanner::new(table, Config::global());
    if scanner.score().saturating_sub(text.len()) > k {
        return None;
    }
    scanner.feed_until(text, |s| s.score().saturating_sub(text.len() - s.position()) > k);
    let score = scanner.score();
    (scanner.position() == text.len() && score <= k).then_some(score)
}

/// First occurrence of the pattern in `text` with at most `k` edits.
pub fn find(table: &MatchTable, text: &[u8], k: usize) -> Option<Match> {
    let mut scanner = Scanner::new(table, Config::search());
    scanner.feed_until(text, |s| s.score() <= k);
    (scanner.position() > 0 && scanner.score() <= k).then(|| Match {
        end: scanner.position() - 1,
        distance: scanner.score(),
    })
}

/// Every end offset in `text` where the pattern occurs with at most `k` edits.
pub fn find_all(table: &MatchTable, text: &[u8], k: usize) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut scanner = Scanner::new(table, Config::search());
    scanner.feed_until(text, |s| {
        if s.score() <= k {
            matches.push(Match {
                end: s.position() - 1,
                distance: s.score(),
            });
        }
        false
    });
    matches
}
