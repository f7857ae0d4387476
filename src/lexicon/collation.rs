//! Royal Institute collation
//!
//! Words are compared character by character on a three-tier key:
//!
//! | Tier | Characters | Value |
//! |------|------------|-------|
//! | 0 | alphabet symbols | alphabet rank |
//! | 1 | other Thai script (vowels, tone marks, ...) | code point |
//! | 2 | everything else (spaces, hyphens, foreign text) | code point |
//!
//! Key sequences compare lexicographically, so a word sorts before every word it is a
//! strict prefix of.

use crate::lexicon::alphabet::{is_script_char, Alphabet};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Default number of memoized keys before the memo is flushed
pub const DEFAULT_MEMO_CAPACITY: usize = 100_000;

/// Sort key of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharKey {
    pub tier: u8,
    pub value: u32,
}

/// Sort key of a whole word
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollationKey(Vec<CharKey>);

impl CollationKey {
    pub fn chars(&self) -> &[CharKey] {
        &self.0
    }
}

/// Builds collation keys for one alphabet and memoizes them per batch
///
/// The memo is owned by the collator and capped at `memo_capacity` entries; it is
/// cleared whenever it fills up and at the end of every [`Collator::sort`].
#[derive(Debug)]
pub struct Collator {
    ranks: HashMap<char, u32>,
    memo: HashMap<String, CollationKey>,
    memo_capacity: usize,
}

impl Collator {
    pub fn new(alphabet: &Alphabet) -> Self {
        Self::with_memo_capacity(alphabet, DEFAULT_MEMO_CAPACITY)
    }

    pub fn with_memo_capacity(alphabet: &Alphabet, memo_capacity: usize) -> Self {
        let ranks = alphabet
            .symbols()
            .iter()
            .filter_map(|symbol| alphabet.rank(*symbol).map(|rank| (*symbol, rank)))
            .collect();

        Self {
            ranks,
            memo: HashMap::new(),
            memo_capacity,
        }
    }

    /// Key of a single character
    pub fn char_key(&self, c: char) -> CharKey {
        if let Some(rank) = self.ranks.get(&c) {
            CharKey {
                tier: 0,
                value: *rank,
            }
        } else if is_script_char(c) {
            CharKey {
                tier: 1,
                value: c as u32,
            }
        } else {
            CharKey {
                tier: 2,
                value: c as u32,
            }
        }
    }

    /// Builds the key of a word without touching the memo
    pub fn build_key(&self, word: &str) -> CollationKey {
        CollationKey(word.chars().map(|c| self.char_key(c)).collect())
    }

    /// Returns the memoized key of a word, computing it on first use
    pub fn key(&mut self, word: &str) -> CollationKey {
        if let Some(key) = self.memo.get(word) {
            return key.clone();
        }

        let key = self.build_key(word);
        if self.memo.len() >= self.memo_capacity {
            tracing::trace!("Collation memo reached {} entries, flushing", self.memo.len());
            self.memo.clear();
        }
        if self.memo_capacity > 0 {
            self.memo.insert(word.to_string(), key.clone());
        }
        key
    }

    /// Compares two words in dictionary order
    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        let key_a = self.key(a);
        let key_b = self.key(b);
        key_a.cmp(&key_b)
    }

    /// Sorts a batch of words and releases the memo afterwards
    ///
    /// Words with identical keys keep their relative order.
    pub fn sort(&mut self, words: Vec<String>) -> Vec<String> {
        let mut keyed: Vec<(CollationKey, String)> = words
            .into_iter()
            .map(|word| (self.key(&word), word))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        self.clear_memo();

        keyed.into_iter().map(|(_, word)| word).collect()
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn clear_memo(&mut self) {
        self.memo.clear();
    }
}
