//! Output module for dictionary files and sync reports
//!
//! This module handles:
//! - Reading and writing Hunspell `.dic` word lists
//! - Generating the markdown audit report of a snapshot diff
//! - Writing plain added/ghost word lists for review

mod dic;
mod markdown;

pub use dic::{
    backup_dictionary, load_snapshot, read_dictionary, validate_dictionary, write_dictionary,
};
pub use markdown::{format_audit_report, generate_audit_report};

use crate::lexicon::{sorted, Collator};
use crate::storage::write_atomic;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Refusing to write an empty dictionary")]
    EmptyDictionary,

    #[error("Invalid word {0:?}: a dictionary entry must be a single line")]
    InvalidWord(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a set of words to a text file, one per line, in collation order
///
/// Nothing is written for an empty set. Returns true if the file was written.
pub fn save_word_list(
    words: &HashSet<String>,
    collator: &mut Collator,
    output_path: &Path,
    description: &str,
) -> OutputResult<bool> {
    if words.is_empty() {
        tracing::info!("No {} to save", description);
        return Ok(false);
    }

    let mut contents = String::new();
    for word in sorted(words, collator) {
        contents.push_str(&word);
        contents.push('\n');
    }

    write_atomic(output_path, contents.as_bytes())?;
    tracing::info!(
        "Saved {} {} to {}",
        words.len(),
        description,
        output_path.display()
    );
    Ok(true)
}
