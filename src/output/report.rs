//! Markdown rendering of a [`ChangeReport`].

use crate::tracker::ChangeReport;

/// File name of the change report.
pub const CHANGES_FILE: &str = "repindex_changes.md";

/// Text written when a changed file has no line diff to show.
pub const NO_DIFF_PLACEHOLDER: &str = "_No diff available (new file)_";

/// Render `report`. Callers only write it when the report is non-empty.
pub fn render_change_report(report: &ChangeReport) -> String {
    let mut out = format!("# Changes since last run ({})\n\n", report.timestamp);

    if !report.changed.is_empty() {
        out.push_str("## Changed or New Files:\n\n");
        for change in &report.changed {
            out.push_str(&format!("### {}\n\n", change.path));
            if change.diff.trim().is_empty() {
                out.push_str(NO_DIFF_PLACEHOLDER);
                out.push_str("\n\n");
            } else {
                out.push_str("```diff\n");
                out.push_str(&change.diff);
                out.push_str("\n```\n\n");
            }
        }
    }

    if !report.removed.is_empty() {
        out.push_str("## Removed Files:\n\n");
        for path in &report.removed {
            out.push_str(&format!("- {}\n", path));
        }
    }

    out
}
