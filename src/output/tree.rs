//! Directory tree pretty-printer.

use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

use crate::graph::IgnorePolicy;
use crate::validation::relative_slash_path;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// One visible entry in walk (pre-)order.
struct TreeEntry {
    depth: usize,
    name: String,
}

/// Render the tree below `root`, one line per entry, without the root line.
///
/// Entries are sorted by name within each directory. Excluded entries are
/// omitted and excluded directories are not descended into.
pub fn render_tree(root: &Path, policy: &IgnorePolicy) -> String {
    let entries = visible_entries(root, policy);
    let last = last_sibling_flags(&entries);

    let mut out = String::new();
    // Last-sibling flag of every ancestor of the current entry
    let mut ancestors: Vec<bool> = Vec::new();
    for (entry, &is_last) in entries.iter().zip(&last) {
        ancestors.truncate(entry.depth - 1);
        for &ancestor_last in &ancestors {
            out.push_str(if ancestor_last { SPACE } else { PIPE });
        }
        out.push_str(if is_last { LAST_BRANCH } else { BRANCH });
        out.push_str(&entry.name);
        out.push('\n');
        ancestors.push(is_last);
    }
    out
}

fn visible_entries(root: &Path, policy: &IgnorePolicy) -> Vec<TreeEntry> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|entry| {
            let rel_path = relative_slash_path(root, entry.path());
            !policy.should_ignore(&rel_path, entry.file_type().is_dir())
        });

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => entries.push(TreeEntry {
                depth: entry.depth(),
                name: entry.file_name().to_string_lossy().into_owned(),
            }),
            Err(err) => {
                warn!(path = ?err.path(), error = %err, "cannot list directory entry");
            }
        }
    }
    entries
}

/// For each entry, whether no later sibling follows it in its directory.
///
/// Scans backwards: a sibling seen at the same depth before any shallower
/// entry belongs to the same parent.
fn last_sibling_flags(entries: &[TreeEntry]) -> Vec<bool> {
    let mut flags = vec![false; entries.len()];
    let mut sibling_after: Vec<bool> = Vec::new();
    for (idx, entry) in entries.iter().enumerate().rev() {
        if sibling_after.len() <= entry.depth {
            sibling_after.resize(entry.depth + 1, false);
        }
        flags[idx] = !sibling_after[entry.depth];
        sibling_after[entry.depth] = true;
        sibling_after.truncate(entry.depth + 1);
    }
    flags
}
