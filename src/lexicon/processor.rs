//! Word set processing: normalize, filter, deduplicate, sort
//!
//! Each stage is a pure function over a word list; [`WordSetProcessor`] chains them and
//! produces the final [`WordCollection`].

use crate::config::WordsConfig;
use crate::lexicon::alphabet::{is_compound_separator, is_compound_word, is_script_char};
use crate::lexicon::collation::Collator;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// A deduplicated word list in collation order
///
/// Only the processor builds one, so every collection is sorted and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordCollection(Vec<String>);

impl WordCollection {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl AsRef<[String]> for WordCollection {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a WordCollection {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Applies Unicode canonical composition (NFC) to every word
pub fn normalize(words: Vec<String>) -> Vec<String> {
    words.into_iter().map(|word| word.nfc().collect()).collect()
}

/// Returns true if the word passes the configured filters
pub fn is_acceptable(word: &str, options: &WordsConfig) -> bool {
    if word.trim().is_empty() {
        return false;
    }

    if !options.allow_compounds && is_compound_word(word) {
        return false;
    }

    if options.strict_script_only {
        return word
            .chars()
            .all(|c| is_script_char(c) || (options.allow_compounds && is_compound_separator(c)));
    }

    true
}

/// Drops empty, compound (if disallowed) and foreign-script (if strict) words
pub fn filter(words: Vec<String>, options: &WordsConfig) -> Vec<String> {
    words
        .into_iter()
        .filter(|word| is_acceptable(word, options))
        .collect()
}

/// Removes duplicates, keeping the first occurrence of each word
pub fn dedupe(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(words.len());
    words
        .into_iter()
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Counts observed while processing one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub raw: usize,
    pub filtered_out: usize,
    pub duplicates_removed: usize,
    pub output: usize,
}

/// Turns raw harvested words into a [`WordCollection`]
#[derive(Debug)]
pub struct WordSetProcessor {
    options: WordsConfig,
    collator: Collator,
    last_stats: ProcessingStats,
}

impl WordSetProcessor {
    pub fn new(options: WordsConfig, collator: Collator) -> Self {
        Self {
            options,
            collator,
            last_stats: ProcessingStats::default(),
        }
    }

    /// Runs normalize -> filter -> dedupe -> sort over one batch
    pub fn process(&mut self, raw: Vec<String>) -> WordCollection {
        let raw_len = raw.len();
        tracing::info!("Processing {} words...", raw_len);

        let words = if self.options.apply_normalization {
            normalize(raw)
        } else {
            raw
        };

        let valid = filter(words, &self.options);
        let valid_len = valid.len();
        tracing::info!(
            "After filtering: {} valid words ({} dropped)",
            valid_len,
            raw_len - valid_len
        );

        let unique = dedupe(valid);
        tracing::info!(
            "After deduplication: {} unique words ({} duplicates removed)",
            unique.len(),
            valid_len - unique.len()
        );

        let sorted = self.collator.sort(unique);
        tracing::debug!("Words sorted in Royal Institute order");

        self.last_stats = ProcessingStats {
            raw: raw_len,
            filtered_out: raw_len - valid_len,
            duplicates_removed: valid_len - sorted.len(),
            output: sorted.len(),
        };

        WordCollection(sorted)
    }

    /// Counts from the most recent [`WordSetProcessor::process`] call
    pub fn last_stats(&self) -> ProcessingStats {
        self.last_stats
    }

    pub fn collator_mut(&mut self) -> &mut Collator {
        &mut self.collator
    }
}
