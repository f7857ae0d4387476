//! Snapshot comparison
//!
//! Both inputs are treated as sets; the result is the same for the same inputs no
//! matter how they are ordered.

use crate::lexicon::collation::Collator;
use std::collections::HashSet;

/// Result of comparing an old word snapshot against a new one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Words in new but not in old
    pub added: HashSet<String>,

    /// Words in old but not in new (ghost words)
    pub removed: HashSet<String>,

    /// Words in both snapshots
    pub unchanged: HashSet<String>,

    /// Number of entries in the old input
    pub old_count: usize,

    /// Number of entries in the new input
    pub new_count: usize,
}

impl DiffResult {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn unchanged_count(&self) -> usize {
        self.unchanged.len()
    }

    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// `new_count - old_count`
    pub fn net_change(&self) -> i64 {
        self.new_count as i64 - self.old_count as i64
    }

    /// Size change relative to the old snapshot, in percent
    ///
    /// Returns None when the old snapshot was empty.
    pub fn change_rate(&self) -> Option<f64> {
        if self.old_count == 0 {
            return None;
        }
        Some(self.net_change() as f64 / self.old_count as f64 * 100.0)
    }
}

/// Compares two word lists
///
/// # Example
///
/// ```
/// use royin_harvest::lexicon::compare;
///
/// let old = vec!["a".to_string(), "b".to_string()];
/// let new = vec!["b".to_string(), "c".to_string()];
/// let diff = compare(&old, &new);
///
/// assert!(diff.added.contains("c"));
/// assert!(diff.removed.contains("a"));
/// assert!(diff.unchanged.contains("b"));
/// ```
pub fn compare<S: AsRef<str>>(old: &[S], new: &[S]) -> DiffResult {
    let old_set: HashSet<&str> = old.iter().map(AsRef::as_ref).collect();
    let new_set: HashSet<&str> = new.iter().map(AsRef::as_ref).collect();

    let added: HashSet<String> = new_set.difference(&old_set).map(|w| w.to_string()).collect();
    let removed: HashSet<String> = old_set.difference(&new_set).map(|w| w.to_string()).collect();
    let unchanged: HashSet<String> = old_set
        .intersection(&new_set)
        .map(|w| w.to_string())
        .collect();

    tracing::info!(
        "Diff analysis: +{} -{} ={}",
        added.len(),
        removed.len(),
        unchanged.len()
    );

    DiffResult {
        added,
        removed,
        unchanged,
        old_count: old.len(),
        new_count: new.len(),
    }
}

/// Returns a set's members in collation order, for presentation
pub fn sorted(words: &HashSet<String>, collator: &mut Collator) -> Vec<String> {
    collator.sort(words.iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Alphabet;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_compare_with_both_changes() {
        let diff = compare(&strings(&["a", "b"]), &strings(&["b", "c"]));

        assert_eq!(diff.added, set(&["c"]));
        assert_eq!(diff.removed, set(&["a"]));
        assert_eq!(diff.unchanged, set(&["b"]));
        assert_eq!(diff.old_count, 2);
        assert_eq!(diff.new_count, 2);
        assert!(diff.has_changes());
    }

    #[test]
    fn test_compare_identical() {
        let words = strings(&["ก", "ข", "ค"]);
        let diff = compare(&words, &words);

        assert!(!diff.has_changes());
        assert_eq!(diff.unchanged_count(), 3);
        assert_eq!(diff.net_change(), 0);
    }

    #[test]
    fn test_compare_collapses_duplicates() {
        let diff = compare(&strings(&["a", "a", "b"]), &strings(&["b", "b"]));

        assert_eq!(diff.removed, set(&["a"]));
        assert_eq!(diff.unchanged, set(&["b"]));
        assert_eq!(diff.old_count, 3);
        assert_eq!(diff.new_count, 2);
    }

    #[test]
    fn test_compare_is_order_independent() {
        let first = compare(&strings(&["x", "y", "z"]), &strings(&["w", "x"]));
        let second = compare(&strings(&["z", "y", "x"]), &strings(&["x", "w"]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_compare_empty_lists() {
        let empty: Vec<String> = Vec::new();
        let diff = compare(&empty, &empty);

        assert!(!diff.has_changes());
        assert_eq!(diff.change_rate(), None);
    }

    #[test]
    fn test_change_rate() {
        let diff = compare(&strings(&["a", "b", "c", "d"]), &strings(&["a", "b", "c", "d", "e"]));
        assert_eq!(diff.net_change(), 1);
        assert_eq!(diff.change_rate(), Some(25.0));
    }

    #[test]
    fn test_sorted_uses_collation() {
        let mut collator = Collator::new(&Alphabet::thai());
        let words = set(&["ค", "ก", "ข"]);
        assert_eq!(sorted(&words, &mut collator), strings(&["ก", "ข", "ค"]));
    }
}
