//! Hunspell `.dic` word lists
//!
//! Layout:
//!
//! ```text
//! # 3
//! # Thai Royal Institute Dictionary
//! ก
//! กา
//! ข
//! ```
//!
//! The first line is the entry count, either bare or behind `# `. Comment lines start
//! with `#`. An entry may carry affix flags after a `/`, which the reader drops.

use crate::output::{OutputError, OutputResult};
use crate::storage::write_atomic;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the words of a dictionary file in file order
pub fn read_dictionary(path: &Path) -> OutputResult<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let mut words = Vec::new();

    for (line_num, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line_num == 0 && (line.starts_with('#') || line.chars().all(|c| c.is_ascii_digit())) {
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let word = line.split('/').next().unwrap_or(line).trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }

    tracing::info!("Read {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Reads the previous snapshot, treating a missing file as an empty one
pub fn load_snapshot(path: &Path) -> OutputResult<Vec<String>> {
    if !path.exists() {
        tracing::warn!(
            "Dictionary {} not found, comparing against an empty snapshot",
            path.display()
        );
        return Ok(Vec::new());
    }
    read_dictionary(path)
}

/// Writes a dictionary file, replacing any existing one atomically
///
/// Each line of `header_comment` becomes a `# ` comment after the count line.
pub fn write_dictionary<S: AsRef<str>>(
    words: &[S],
    path: &Path,
    header_comment: Option<&str>,
) -> OutputResult<()> {
    if words.is_empty() {
        return Err(OutputError::EmptyDictionary);
    }
    if let Some(bad) = words
        .iter()
        .map(AsRef::as_ref)
        .find(|w| w.contains('\n') || w.contains('\r'))
    {
        return Err(OutputError::InvalidWord(bad.to_string()));
    }

    let mut contents = format!("# {}\n", words.len());
    if let Some(comment) = header_comment {
        for line in comment.lines() {
            contents.push_str("# ");
            contents.push_str(line.trim());
            contents.push('\n');
        }
    }
    for word in words {
        contents.push_str(word.as_ref());
        contents.push('\n');
    }

    write_atomic(path, contents.as_bytes())?;
    tracing::info!(
        "Wrote {} words to {} ({:.1} KB)",
        words.len(),
        path.display(),
        contents.len() as f64 / 1024.0
    );
    Ok(())
}

/// Checks a written dictionary file and returns the problems found
///
/// An empty list means the file is well formed: a count header that matches the number
/// of entries, and at least one entry.
pub fn validate_dictionary(path: &Path) -> OutputResult<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let mut problems = Vec::new();

    let mut lines = contents.lines();
    let header = lines.next().unwrap_or("").trim();
    let declared = header.trim_start_matches('#').trim().parse::<usize>();

    let entries = lines
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count();

    match declared {
        Err(_) => problems.push(format!("first line is not a word count: {:?}", header)),
        Ok(count) if count != entries => problems.push(format!(
            "header declares {} words but the file has {}",
            count, entries
        )),
        Ok(_) => {}
    }

    if entries == 0 {
        problems.push("dictionary has no entries".to_string());
    }

    Ok(problems)
}

/// Copies an existing dictionary next to itself with a timestamp in the name
///
/// `th_TH-royin.dic` becomes `th_TH-royin.20240131_120000.backup.dic`. Returns None
/// when there is nothing to back up.
pub fn backup_dictionary(path: &Path, now: DateTime<Local>) -> OutputResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dictionary".to_string());
    let backup_name = format!("{}.{}.backup.dic", stem, now.format("%Y%m%d_%H%M%S"));
    let backup_path = path.with_file_name(backup_name);

    fs::copy(path, &backup_path)?;
    tracing::info!("Backup created: {}", backup_path.display());
    Ok(Some(backup_path))
}
