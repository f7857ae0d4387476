//! Markdown audit report generation
//!
//! This module generates the human-readable report of a dictionary sync: summary
//! counts, the added words, the ghost words that need review, and a checklist.

use crate::lexicon::{sorted, Collator, DiffResult};
use crate::output::OutputResult;
use crate::storage::write_atomic;
use chrono::{DateTime, Local};
use std::path::Path;

/// Added words listed before the rest is folded into a `<details>` block
const ADDED_DISPLAY_LIMIT: usize = 50;

/// Ghost words listed before the rest is folded into a `<details>` block
const GHOST_DISPLAY_LIMIT: usize = 100;

/// Writes the audit report for a diff
pub fn generate_audit_report(
    diff: &DiffResult,
    collator: &mut Collator,
    generated_at: DateTime<Local>,
    output_path: &Path,
) -> OutputResult<()> {
    tracing::info!("Generating audit report: {}", output_path.display());
    let markdown = format_audit_report(diff, collator, generated_at);
    write_atomic(output_path, markdown.as_bytes())?;
    Ok(())
}

/// Formats the audit report for a diff as markdown
pub fn format_audit_report(
    diff: &DiffResult,
    collator: &mut Collator,
    generated_at: DateTime<Local>,
) -> String {
    let mut md = String::new();

    // Title
    md.push_str("# Royal Institute Dictionary Sync Audit Report\n\n");
    md.push_str(&format!(
        "**Generated:** {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str("---\n\n");

    // Summary
    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| **Old Dictionary** | {} words |\n", diff.old_count));
    md.push_str(&format!("| **New Dictionary** | {} words |\n", diff.new_count));
    md.push_str(&format!("| **Added Words** | {} |\n", diff.added_count()));
    md.push_str(&format!(
        "| **Removed Words (Ghosts)** | {} |\n",
        diff.removed_count()
    ));
    md.push_str(&format!(
        "| **Unchanged Words** | {} |\n",
        diff.unchanged_count()
    ));
    md.push_str(&format!("| **Net Change** | {:+} |\n\n", diff.net_change()));

    if let Some(rate) = diff.change_rate() {
        md.push_str(&format!("**Change Rate:** {:+.1}%\n\n", rate));
    }
    md.push_str("---\n\n");

    // Added words
    md.push_str("## Added Words\n\n");
    if diff.added.is_empty() {
        md.push_str("*No words were added.*\n");
    } else {
        md.push_str(&format!(
            "The following **{} words** are in the new harvest but were not in the old dictionary.\n\n",
            diff.added_count()
        ));
        push_word_list(
            &mut md,
            &sorted(&diff.added, collator),
            ADDED_DISPLAY_LIMIT,
            "added words",
        );
    }
    md.push_str("\n---\n\n");

    // Ghost words
    md.push_str("## Ghost Words (Removed)\n\n");
    if diff.removed.is_empty() {
        md.push_str("*No ghost words found. Every old word is still in the dictionary.*\n");
    } else {
        md.push_str("> [!WARNING]\n");
        md.push_str(&format!(
            "> The following **{} words** are in the old dictionary but not in the new harvest.\n",
            diff.removed_count()
        ));
        md.push_str("> They are flagged as ghost words and need manual review.\n\n");
        md.push_str("**Action Required:** decide for each word whether to:\n");
        md.push_str("- Remove it (if it was added by mistake)\n");
        md.push_str("- Keep it in a separate supplementary dictionary\n");
        md.push_str("- Report it upstream if it belongs in the official dictionary\n\n");
        push_word_list(
            &mut md,
            &sorted(&diff.removed, collator),
            GHOST_DISPLAY_LIMIT,
            "ghost words",
        );
    }
    md.push_str("\n---\n\n");

    // Checklist
    md.push_str("## Manual Review Checklist\n\n");
    md.push_str("- [ ] Review a sample of added words\n");
    md.push_str("- [ ] Review every ghost word\n");
    md.push_str("- [ ] Check that the total word count is reasonable\n");
    md.push_str("- [ ] Test the dictionary with Hunspell\n");
    md.push_str("- [ ] Spot-check Thai alphabet ordering\n\n");

    md.push_str("---\n\n");
    md.push_str("*Generated by royin-harvest.*\n");

    md
}

fn push_word_list(md: &mut String, words: &[String], limit: usize, label: &str) {
    for word in words.iter().take(limit) {
        md.push_str(&format!("- {}\n", word));
    }

    if words.len() > limit {
        let rest = &words[limit..];
        md.push_str(&format!("\n*... and {} more {}.*\n", rest.len(), label));
        md.push_str(&format!(
            "\n<details>\n<summary>Show all {} {}</summary>\n\n",
            words.len(),
            label
        ));
        for word in rest {
            md.push_str(&format!("- {}\n", word));
        }
        md.push_str("\n</details>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{compare, Alphabet};
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|w| w.to_string()).collect()
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_report_summary() {
        let diff = compare(&words(&["ก", "ข", "ค", "ง"]), &words(&["ข", "ค", "ง", "จ", "ฉ"]));
        let mut collator = Collator::new(&Alphabet::thai());

        let md = format_audit_report(&diff, &mut collator, generated_at());

        assert!(md.contains("**Generated:** 2024-01-31 12:00:00"));
        assert!(md.contains("| **Old Dictionary** | 4 words |"));
        assert!(md.contains("| **New Dictionary** | 5 words |"));
        assert!(md.contains("| **Added Words** | 2 |"));
        assert!(md.contains("| **Removed Words (Ghosts)** | 1 |"));
        assert!(md.contains("| **Net Change** | +1 |"));
        assert!(md.contains("**Change Rate:** +25.0%"));
        assert!(md.contains("- จ\n- ฉ\n"));
        assert!(md.contains("> [!WARNING]"));
    }

    #[test]
    fn test_report_without_changes() {
        let list = words(&["ก", "ข"]);
        let diff = compare(&list, &list);
        let mut collator = Collator::new(&Alphabet::thai());

        let md = format_audit_report(&diff, &mut collator, generated_at());

        assert!(md.contains("*No words were added.*"));
        assert!(md.contains("*No ghost words found."));
        assert!(!md.contains("[!WARNING]"));
    }

    #[test]
    fn test_report_from_empty_snapshot_has_no_change_rate() {
        let diff = compare(&Vec::<String>::new(), &words(&["ก"]));
        let mut collator = Collator::new(&Alphabet::thai());

        let md = format_audit_report(&diff, &mut collator, generated_at());
        assert!(!md.contains("Change Rate"));
    }

    #[test]
    fn test_long_lists_are_folded() {
        let new: Vec<String> = (0..60).map(|n| format!("ก{:02}", n)).collect();
        let diff = compare(&Vec::<String>::new(), &new);
        let mut collator = Collator::new(&Alphabet::thai());

        let md = format_audit_report(&diff, &mut collator, generated_at());

        assert!(md.contains("*... and 10 more added words.*"));
        assert!(md.contains("<summary>Show all 60 added words</summary>"));
    }

    #[test]
    fn test_generate_audit_report_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("audit_report.md");
        let diff = compare(&words(&["ก"]), &words(&["ข"]));
        let mut collator = Collator::new(&Alphabet::thai());

        generate_audit_report(&diff, &mut collator, generated_at(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Royal Institute Dictionary Sync Audit Report"));
    }
}
