//! Context document for a set of target files.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

use super::to_json_pretty;
use crate::graph::FactTable;
use crate::ingest::code_fence_language;
use crate::validation::slash_basename;

/// File name for a context document created at `timestamp`
/// (`YYYYMMDD_HHMMSS`).
pub fn context_file_name(timestamp: &str) -> String {
    format!("context_{}.md", timestamp)
}

/// Render the context document.
///
/// Lists every involved path (targets marked), then the content and
/// structure of each target in the order given, then every other involved
/// file in sorted order. Targets that do not exist on disk are left out of
/// the contents section.
pub fn render_context(
    root: &Path,
    targets: &[String],
    involved: &BTreeSet<String>,
    facts: &FactTable,
) -> String {
    let mut out = format!("# Context for Files: {}\n\n", targets.join(", "));

    out.push_str("## Involved Files\n\n");
    for path in involved {
        if targets.contains(path) {
            out.push_str(&format!("- {} (TARGET)\n", path));
        } else {
            out.push_str(&format!("- {}\n", path));
        }
    }

    out.push_str("\n## File Contents\n\n");
    for target in targets {
        push_file(&mut out, root, target, " (Main)", facts);
    }
    for path in involved.iter().filter(|p| !targets.contains(*p)) {
        push_file(&mut out, root, path, "", facts);
    }

    out
}

fn push_file(out: &mut String, root: &Path, rel_path: &str, suffix: &str, facts: &FactTable) {
    let full_path = root.join(rel_path);
    if !full_path.is_file() {
        return;
    }

    let content = match std::fs::read_to_string(&full_path) {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %rel_path, error = %err, "cannot read context file");
            out.push_str(&format!("### {}{}\n\nError reading file.\n\n", rel_path, suffix));
            return;
        }
    };

    let language = code_fence_language(slash_basename(rel_path));
    out.push_str(&format!(
        "### {}{}\n\n```{}\n{}\n```\n\n",
        rel_path, suffix, language, content
    ));

    if let Some(file_facts) = facts.get(rel_path) {
        match to_json_pretty(&file_facts.structure) {
            Ok(json) => out.push_str(&format!("#### Structure\n\n```json\n{}\n```\n\n", json)),
            Err(err) => warn!(path = %rel_path, error = %err, "cannot render structure"),
        }
    }
}
