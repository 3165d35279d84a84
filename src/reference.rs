//! Sequential multiword Myers over `u64` words.
//!
//! No prediction and no lanes: the add carry and the shifted-out HP/HN bits
//! ride from one word into the next in a plain loop. Slow, but simple enough
//! to trust, and the lane kernels must agree with it bit for bit.

use crate::bits::{BitVector, LANES};
use crate::config::Mode;
use crate::state::State;
use crate::table::MatchTable;

const WORDS: usize = LANES / 2;

/// Sequential scanner with the same state layout as the lane kernels.
#[derive(Debug, Clone)]
pub struct Reference<'a> {
    table: &'a MatchTable,
    mode: Mode,
    active: [u64; WORDS],
    vp: [u64; WORDS],
    vn: [u64; WORDS],
    score: i64,
}

impl<'a> Reference<'a> {
    pub fn new(table: &'a MatchTable, mode: Mode) -> Self {
        let active = table.active().to_words();
        Self {
            table,
            mode,
            active,
            vp: active,
            vn: [0; WORDS],
            score: table.len() as i64,
        }
    }

    /// Advance by one text symbol.
    pub fn push(&mut self, symbol: u8) {
        let eq = self.table.lookup(symbol).to_words();
        let len = self.table.len();

        let mut add_carry = false;
        let mut hp_carry = self.mode.hp_boundary() as u64;
        let mut hn_carry = 0u64;

        if len == 0 {
            self.score += self.mode.hp_boundary() as i64;
        }

        for w in 0..WORDS {
            let pv = self.vp[w];
            let nv = self.vn[w];
            let pm = eq[w];

            let (t, c1) = (pm & pv).overflowing_add(pv);
            let (sum, c2) = t.overflowing_add(add_carry as u64);
            add_carry = c1 | c2;

            let d0 = (sum ^ pv) | pm;
            let hp = nv | !(pv | d0);
            let hn = pv & d0;

            if len > 0 && (len - 1) / 64 == w {
                let bit = 1u64 << ((len - 1) % 64);
                self.score += (hp & bit != 0) as i64 - (hn & bit != 0) as i64;
            }

            let hp_shifted = (hp << 1) | hp_carry;
            let hn_shifted = (hn << 1) | hn_carry;
            hp_carry = hp >> 63;
            hn_carry = hn >> 63;

            let xv = pm | nv;
            self.vp[w] = (hn_shifted | !(xv | hp_shifted)) & self.active[w];
            self.vn[w] = (hp_shifted & xv) & self.active[w];
        }
    }

    /// Advance by every symbol of `text`.
    pub fn feed(&mut self, text: &[u8]) {
        for &symbol in text {
            self.push(symbol);
        }
    }

    pub fn state(&self) -> State {
        State {
            vp: BitVector::from_words(self.vp),
            vn: BitVector::from_words(self.vn),
        }
    }

    /// Bottom-row value of the DP matrix at the current column.
    pub fn score(&self) -> i64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(pattern: &[u8], text: &[u8], mode: Mode) -> usize {
        let mut prev: Vec<usize> = (0..=pattern.len()).collect();
        for &t in text {
            let top = match mode {
                Mode::Global => prev[0] + 1,
                Mode::Search => 0,
            };
            let mut cur = vec![top];
            for (k, &p) in pattern.iter().enumerate() {
                let sub = prev[k] + (p != t) as usize;
                cur.push(sub.min(prev[k + 1] + 1).min(cur[k] + 1));
            }
            prev = cur;
        }
        prev[pattern.len()]
    }

    #[test]
    fn test_reference_matches_naive() {
        let pattern: Vec<u8> = b"ACGTTGCA".iter().cycle().take(150).copied().collect();
        let mut text = pattern.clone();
        text.splice(60..64, b"TTTTTTT".iter().copied());
        text.truncate(140);
        for mode in [Mode::Global, Mode::Search] {
            let table = MatchTable::from_bytes(&pattern).unwrap();
            let mut reference = Reference::new(&table, mode);
            reference.feed(&text);
            assert_eq!(
                reference.score() as usize,
                naive(&pattern, &text, mode),
                "mode {:?}",
                mode
            );
        }
    }

    #[test]
    fn test_reference_identity_state() {
        let pattern: Vec<u8> = (0..64u8).collect();
        let table = MatchTable::from_bytes(&pattern).unwrap();
        let mut reference = Reference::new(&table, Mode::Global);
        reference.feed(&pattern);
        assert_eq!(reference.score(), 0);
        assert_eq!(reference.state().vp, BitVector::ZERO);
        assert_eq!(reference.state().vn, BitVector::mask_upto(64));
    }

    #[test]
    fn test_reference_empty_text_is_seed() {
        let table = MatchTable::from_bytes(b"abc").unwrap();
        let reference = Reference::new(&table, Mode::Search);
        assert_eq!(reference.state().vp, BitVector::mask_upto(3));
        assert_eq!(reference.score(), 3);
    }
}
