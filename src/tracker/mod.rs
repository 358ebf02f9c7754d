//! Incremental change tracking between runs.
//!
//! Each reconciling run hashes every file that survives the ignore policy,
//! compares the hashes with the previous snapshot and produces a
//! [`ChangeReport`]. The snapshot is rewritten on every run.
pub mod diff;
pub mod snapshot;

pub use diff::unified_diff;
pub use snapshot::{FileEntry, Snapshot, SnapshotStore};

use anyhow::Result;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{IgnoreConfig, LanguageHint};
use crate::diagnostics::{DiagnosticStage, ScanDiagnostic};
use crate::graph::{scan_tree, IgnorePolicy};

/// Lowercase hex SHA-256 of `content`.
pub fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Current local time in the snapshot timestamp format.
pub fn timestamp_now() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// A file that is new or whose hash changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    /// Unified diff against the previous content; empty when unavailable
    pub diff: String,
}

/// Differences between the previous snapshot and the current tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub timestamp: String,
    /// Changed or new files, in walk order
    pub changed: Vec<FileChange>,
    /// Files in the previous snapshot that are gone, sorted
    pub removed: Vec<String>,
    /// Files that could not be hashed or stored, sorted
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Compare the current tree with the stored snapshot and persist a new one.
///
/// Unreadable files are skipped and recorded as [`DiagnosticStage::Hash`]
/// diagnostics, as are files whose content cannot be stored. Non-UTF-8
/// content is hashed and diffed after lossy decoding.
///
/// # Side effects
/// - Rewrites the snapshot file
/// - Stores the content of every current file in the blob store and prunes
///   blobs no longer referenced
pub fn reconcile(
    root: &Path,
    hints: &[LanguageHint],
    ignore: &IgnoreConfig,
    store: &SnapshotStore,
) -> Result<ChangeReport> {
    let policy = IgnorePolicy::new(hints, ignore)?;
    let previous = store.load()?;
    let scan = scan_tree(root, &policy);

    let mut current = Snapshot::default();
    let mut report = ChangeReport {
        timestamp: timestamp_now(),
        ..ChangeReport::default()
    };

    for file in &scan.files {
        let bytes = match std::fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %file.rel_path, error = %err, "skipping unreadable file");
                report.diagnostics.push(ScanDiagnostic::error(
                    file.rel_path.clone(),
                    DiagnosticStage::Hash,
                    err.to_string(),
                ));
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);
        let hash = hash_content(&content);

        let old_hash = previous.hash_of(&file.rel_path);
        if old_hash != Some(hash.as_str()) {
            let old_content = old_hash
                .and_then(|h| store.read_blob(h))
                .unwrap_or_default();
            report.changed.push(FileChange {
                path: file.rel_path.clone(),
                diff: unified_diff(&old_content, &content),
            });
        }

        if let Err(err) = store.write_blob(&hash, &content) {
            warn!(path = %file.rel_path, error = %err, "failed to store file content");
            report.diagnostics.push(ScanDiagnostic::error(
                file.rel_path.clone(),
                DiagnosticStage::Hash,
                format!("{:#}", err),
            ));
        }
        current
            .files
            .insert(file.rel_path.clone(), FileEntry { hash });
    }

    report.removed = previous
        .files
        .keys()
        .filter(|path| !current.files.contains_key(*path))
        .cloned()
        .collect();

    report.diagnostics.sort();

    let keep: HashSet<&str> = current.files.values().map(|e| e.hash.as_str()).collect();
    store.prune_blobs(&keep)?;

    current.timestamp = Some(report.timestamp.clone());
    store.save(&current)?;

    info!(
        changed = report.changed.len(),
        removed = report.removed.len(),
        tracked = current.files.len(),
        "reconciled snapshot"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TempDir) {
        (TempDir::new().unwrap(), TempDir::new().unwrap())
    }

    #[test]
    fn test_hash_content() {
        assert_eq!(
            hash_content(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_first_run_reports_all_files_as_new() {
        let (repo, out) = setup();
        fs::write(repo.path().join("a.ts"), "export const a = 1;\n").unwrap();
        let store = SnapshotStore::new(out.path());

        let report = reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();
        assert_eq!(report.changed.len(), 1);
        assert_eq!(report.changed[0].path, "a.ts");
        assert!(report.changed[0].diff.contains("+export const a = 1;"));
        assert!(report.removed.is_empty());
        assert!(store.cache_file().exists());
    }

    #[test]
    fn test_unchanged_second_run_is_empty() {
        let (repo, out) = setup();
        fs::write(repo.path().join("a.py"), "x = 1\n").unwrap();
        let store = SnapshotStore::new(out.path());

        reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();
        let report = reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_modification_diffs_against_previous_content() {
        let (repo, out) = setup();
        let path = repo.path().join("a.py");
        fs::write(&path, "x = 1\ny = 2\n").unwrap();
        let store = SnapshotStore::new(out.path());
        reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();

        fs::write(&path, "x = 1\ny = 3\n").unwrap();
        let report = reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();
        assert_eq!(report.changed.len(), 1);
        let diff = &report.changed[0].diff;
        assert!(diff.contains("-y = 2"));
        assert!(diff.contains("+y = 3"));
        assert!(diff.contains(" x = 1"));
    }

    #[test]
    fn test_removed_files() {
        let (repo, out) = setup();
        fs::write(repo.path().join("keep.ts"), "").unwrap();
        fs::write(repo.path().join("gone.ts"), "").unwrap();
        let store = SnapshotStore::new(out.path());
        reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();

        fs::remove_file(repo.path().join("gone.ts")).unwrap();
        let report = reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();
        assert!(report.changed.is_empty());
        assert_eq!(report.removed, vec!["gone.ts"]);
    }

    #[test]
    fn test_tracks_all_files_not_only_supported() {
        let (repo, out) = setup();
        fs::write(repo.path().join("notes.txt"), "hello\n").unwrap();
        let store = SnapshotStore::new(out.path());
        let report = reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();
        assert_eq!(report.changed[0].path, "notes.txt");
    }

    #[test]
    fn test_unstorable_content_is_hash_diagnostic() {
        let (repo, out) = setup();
        fs::write(repo.path().join("a.ts"), "export const a = 1;\n").unwrap();
        fs::write(repo.path().join("b.py"), "x = 1\n").unwrap();
        let store = SnapshotStore::new(out.path());
        // A regular file where the blob directory belongs
        fs::write(out.path().join(snapshot::OBJECTS_DIR), "").unwrap();

        let report = reconcile(repo.path(), &[], &IgnoreConfig::default(), &store).unwrap();

        assert_eq!(report.changed.len(), 2);
        let paths: Vec<_> = report.diagnostics.iter().map(|d| d.path()).collect();
        assert_eq!(paths, vec!["a.ts", "b.py"]);
        assert!(report.diagnostics.iter().all(|d| matches!(
            d,
            ScanDiagnostic::Error { stage: DiagnosticStage::Hash, .. }
        )));
        assert!(store.load().unwrap().hash_of("a.ts").is_some());
    }
}
