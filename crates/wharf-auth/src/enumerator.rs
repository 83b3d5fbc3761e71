// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! # Candidate Enumeration
//!
//! Authentication strings use two alphabets: the first and last position draw
//! from the five symbols `56789`, every interior position from the six symbols
//! `56789.`. For a length `L` the candidate space therefore holds
//! `5 · 6^(L-2) · 5` strings (`5` when `L = 1`).
//!
//! `CandidateSpace::candidate` maps an index in `[0, total)` to a unique
//! string by mixed-radix decomposition with position 0 as the least
//! significant digit: the digit of position `p` is taken modulo that
//! position's radix and selects the symbol at that offset. Indices wrap
//! around modulo `total`, so any `u64` re-derives a valid candidate.
//!
//! ```rust
//! use wharf_auth::enumerator::CandidateSpace;
//!
//! let space = CandidateSpace::new(2).unwrap();
//! assert_eq!(space.total(), 25);
//! assert_eq!(space.candidate(0), "55");
//! assert_eq!(space.candidate(1), "65");
//! assert_eq!(space.candidate(5), "56");
//! assert_eq!(space.candidate(25), "55");
//! ```

use crate::error::SpaceError;

/// Symbols allowed at the first and last position.
pub const EDGE_SYMBOLS: &[u8; 5] = b"56789";

/// Symbols allowed at interior positions.
pub const INTERIOR_SYMBOLS: &[u8; 6] = b"56789.";

#[inline(always)]
fn symbols(length: usize, position: usize) -> &'static [u8] {
    if position == 0 || position + 1 == length {
        EDGE_SYMBOLS
    } else {
        INTERIOR_SYMBOLS
    }
}

/// The set of candidate strings of one length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpace {
    length: usize,
    total: u64,
}

impl CandidateSpace {
    /// Describes the candidate space for strings of `length` symbols.
    ///
    /// Fails for `length == 0` and for lengths whose candidate count does
    /// not fit a `u64`.
    pub fn new(length: usize) -> Result<Self, SpaceError> {
        if length == 0 {
            return Err(SpaceError::EmptyLength);
        }
        let mut total: u64 = 1;
        for position in 0..length {
            total = total
                .checked_mul(symbols(length, position).len() as u64)
                .ok_or(SpaceError::TooLarge { length })?;
        }
        Ok(Self { length, total })
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct candidates.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Writes the candidate at `index` into `buf`, replacing its contents.
    pub fn write_candidate(&self, index: u64, buf: &mut String) {
        buf.clear();
        let mut rest = index % self.total;
        for position in 0..self.length {
            let alphabet = symbols(self.length, position);
            let radix = alphabet.len() as u64;
            buf.push(alphabet[(rest % radix) as usize] as char);
            rest /= radix;
        }
    }

    /// Returns the candidate at `index`.
    #[inline]
    pub fn candidate(&self, index: u64) -> String {
        let mut buf = String::with_capacity(self.length);
        self.write_candidate(index, &mut buf);
        buf
    }

    /// Returns the index of `candidate`, or `None` if it is not a member of
    /// this space.
    pub fn index_of(&self, candidate: &str) -> Option<u64> {
        let bytes = candidate.as_bytes();
        if bytes.len() != self.length {
            return None;
        }
        let mut index: u64 = 0;
        for position in (0..self.length).rev() {
            let alphabet = symbols(self.length, position);
            let digit = alphabet.iter().position(|&s| s == bytes[position])?;
            index = index * alphabet.len() as u64 + digit as u64;
        }
        Some(index)
    }

    /// Iterates all candidates in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.total).map(move |index| self.candidate(index))
    }
}

/// Returns the candidate of `length` symbols at `index` (taken modulo the
/// size of the space).
#[inline]
pub fn generate(length: usize, index: u64) -> Result<String, SpaceError> {
    Ok(CandidateSpace::new(length)?.candidate(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_totals_follow_alphabet_rule() {
        assert_eq!(CandidateSpace::new(1).unwrap().total(), 5);
        assert_eq!(CandidateSpace::new(2).unwrap().total(), 25);
        assert_eq!(CandidateSpace::new(3).unwrap().total(), 150);
        assert_eq!(CandidateSpace::new(5).unwrap().total(), 25 * 216);
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert_eq!(CandidateSpace::new(0), Err(SpaceError::EmptyLength));
    }

    #[test]
    fn test_overflowing_length_is_rejected() {
        // 25 * 6^22 still fits a u64, 25 * 6^23 does not.
        assert!(CandidateSpace::new(24).is_ok());
        assert_eq!(
            CandidateSpace::new(25),
            Err(SpaceError::TooLarge { length: 25 })
        );
    }

    #[test]
    fn test_length_one_uses_edge_alphabet() {
        let space = CandidateSpace::new(1).unwrap();
        let all: Vec<String> = space.iter().collect();
        assert_eq!(all, vec!["5", "6", "7", "8", "9"]);
    }

    #[test]
    fn test_enumeration_is_a_bijection() {
        for length in 1..=4 {
            let space = CandidateSpace::new(length).unwrap();
            let seen: HashSet<String> = space.iter().collect();
            assert_eq!(seen.len() as u64, space.total(), "length {}", length);

            for candidate in &seen {
                let bytes = candidate.as_bytes();
                assert_eq!(bytes.len(), length);
                assert!(EDGE_SYMBOLS.contains(&bytes[0]));
                assert!(EDGE_SYMBOLS.contains(&bytes[length - 1]));
                if length > 2 {
                    for b in &bytes[1..length - 1] {
                        assert!(INTERIOR_SYMBOLS.contains(b));
                    }
                }
            }
        }
    }

    #[test]
    fn test_edges_never_contain_dot() {
        let space = CandidateSpace::new(3).unwrap();
        assert!(space.iter().all(|c| !c.starts_with('.') && !c.ends_with('.')));
        assert!(space.iter().any(|c| c.contains('.')));
    }

    #[test]
    fn test_position_zero_is_least_significant() {
        let space = CandidateSpace::new(3).unwrap();
        assert_eq!(space.candidate(0), "555");
        assert_eq!(space.candidate(4), "955");
        assert_eq!(space.candidate(5), "565");
        assert_eq!(space.candidate(5 * 5), "5.5");
        assert_eq!(space.candidate(5 * 6), "556");
        assert_eq!(space.candidate(149), "9.9");
    }

    #[test]
    fn test_index_wraps_modulo_total() {
        let space = CandidateSpace::new(3).unwrap();
        assert_eq!(space.candidate(7), space.candidate(7 + space.total()));
        assert_eq!(generate(3, 157).unwrap(), space.candidate(7));
    }

    #[test]
    fn test_index_of_inverts_candidate() {
        let space = CandidateSpace::new(4).unwrap();
        for index in [0, 1, 17, 333, space.total() - 1] {
            assert_eq!(space.index_of(&space.candidate(index)), Some(index));
        }
        assert_eq!(space.index_of(".555"), None);
        assert_eq!(space.index_of("555"), None);
    }
}
