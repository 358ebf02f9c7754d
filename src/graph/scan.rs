//! Pruned, sorted tree walk shared by every consumer of the repository tree.
//!
//! Within each directory, files come before subdirectories and both are
//! sorted by name, so results are identical across platforms. Excluded
//! directories are pruned before descent; nothing beneath them is visited.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::filter::IgnorePolicy;
use crate::diagnostics::{DiagnosticStage, ScanDiagnostic};
use crate::validation::relative_slash_path;

/// A regular file that survived the ignore policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Repository-relative slash path
    pub rel_path: String,
    /// Path usable for reading (root joined with the relative path)
    pub path: PathBuf,
}

/// Result of one walk.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Files in walk order
    pub files: Vec<ScannedFile>,
    /// Pruned paths and walk errors, sorted
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Order entries within one directory: files first, then by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> std::cmp::Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Walk `root`, applying `policy` to every entry below it.
///
/// # Guarantees
/// - The root itself is never subject to the policy
/// - Symlinks are not followed into directories
/// - Unreadable directory entries are reported, never fatal
pub fn scan_tree(root: &Path, policy: &IgnorePolicy) -> ScanResult {
    let mut pruned = Vec::new();
    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(files_first)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let rel_path = relative_slash_path(root, entry.path());
            match policy.should_skip(&rel_path, entry.file_type().is_dir()) {
                Some(reason) => {
                    debug!(path = %rel_path, %reason, "pruned");
                    pruned.push(ScanDiagnostic::skipped(rel_path, reason));
                    false
                }
                None => true,
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let rel_path = err
                    .path()
                    .map(|p| relative_slash_path(root, p))
                    .unwrap_or_default();
                warn!(path = %rel_path, error = %err, "failed to read directory entry");
                result.diagnostics.push(ScanDiagnostic::error(
                    rel_path,
                    DiagnosticStage::Read,
                    err.to_string(),
                ));
                continue;
            }
        };

        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }

        result.files.push(ScannedFile {
            rel_path: relative_slash_path(root, entry.path()),
            path: entry.path().to_path_buf(),
        });
    }

    result.diagnostics.extend(pruned);
    result.diagnostics.sort();
    result
}
