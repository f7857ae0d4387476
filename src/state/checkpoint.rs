//! Resumable harvest progress
//!
//! A [`Checkpoint`] records which domains are fully crawled and the words each one
//! produced. It is only ever advanced after a whole domain succeeds, so whatever is
//! persisted always describes a prefix of completed work.

use crate::lexicon::Alphabet;
use crate::storage::CheckpointError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Schema version written into every checkpoint
pub const CHECKPOINT_VERSION: u32 = 1;

/// Persisted harvest progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Schema version, see [`CHECKPOINT_VERSION`]
    pub version: u32,

    /// Index of the next domain the orchestrator will look at
    pub current_domain_index: usize,

    /// Domains whose every page has been fetched
    pub completed_domains: BTreeSet<String>,

    /// Sum of word counts over completed domains
    pub total_words_scraped: u64,

    /// When the checkpoint last advanced
    pub last_update_time: Option<DateTime<Utc>>,

    /// Raw words per completed domain
    pub partial_results: BTreeMap<String, Vec<String>>,
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkpoint {
    /// An empty checkpoint at the start of the alphabet
    pub fn new() -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            current_domain_index: 0,
            completed_domains: BTreeSet::new(),
            total_words_scraped: 0,
            last_update_time: None,
            partial_results: BTreeMap::new(),
        }
    }

    pub fn is_completed(&self, domain: char) -> bool {
        self.completed_domains.contains(domain.encode_utf8(&mut [0; 4]))
    }

    /// Words stored for a completed domain
    pub fn words_for(&self, domain: char) -> Option<&[String]> {
        self.partial_results
            .get(domain.encode_utf8(&mut [0; 4]) as &str)
            .map(Vec::as_slice)
    }

    /// Records a fully crawled domain and moves past it
    pub fn mark_completed(&mut self, domain: char, index: usize, words: Vec<String>) {
        let key = domain.to_string();
        if let Some(previous) = self.partial_results.get(&key) {
            self.total_words_scraped = self
                .total_words_scraped
                .saturating_sub(previous.len() as u64);
        }

        self.total_words_scraped += words.len() as u64;
        self.completed_domains.insert(key.clone());
        self.partial_results.insert(key, words);
        self.current_domain_index = self.current_domain_index.max(index + 1);
        self.last_update_time = Some(Utc::now());
    }

    /// All stored words, concatenated in alphabet order
    pub fn all_words(&self, alphabet: &Alphabet) -> Vec<String> {
        alphabet
            .symbols()
            .iter()
            .filter_map(|symbol| self.words_for(*symbol))
            .flat_map(|words| words.iter().cloned())
            .collect()
    }

    /// Checks the schema version and the structural invariants against an alphabet
    pub fn verify(&self, alphabet: &Alphabet) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                found: self.version,
                expected: CHECKPOINT_VERSION,
            });
        }

        let stored: BTreeSet<&String> = self.partial_results.keys().collect();
        let completed: BTreeSet<&String> = self.completed_domains.iter().collect();
        if stored != completed {
            return Err(CheckpointError::Inconsistent(
                "completed domains do not match stored results".to_string(),
            ));
        }

        for domain in &self.completed_domains {
            let mut chars = domain.chars();
            let known = match (chars.next(), chars.next()) {
                (Some(symbol), None) => alphabet.contains(symbol),
                _ => false,
            };
            if !known {
                return Err(CheckpointError::Inconsistent(format!(
                    "unknown domain '{}'",
                    domain
                )));
            }
        }

        if self.current_domain_index > alphabet.len() {
            return Err(CheckpointError::Inconsistent(format!(
                "domain index {} is past the end of a {}-symbol alphabet",
                self.current_domain_index,
                alphabet.len()
            )));
        }

        Ok(())
    }

    /// Lowers `current_domain_index` to the first domain that is not completed
    ///
    /// Returns true if the index was changed.
    pub fn rewind_to_first_incomplete(&mut self, alphabet: &Alphabet) -> bool {
        let first_incomplete = alphabet
            .symbols()
            .iter()
            .position(|symbol| !self.is_completed(*symbol))
            .unwrap_or(alphabet.len());

        if self.current_domain_index > first_incomplete {
            self.current_domain_index = first_incomplete;
            true
        } else {
            false
        }
    }
}
