//! On-disk snapshot of file hashes plus a content-addressed blob store.
//!
//! Layout under the output directory:
//! - `repindex_cache.json`: `{"files": {path: {"hash": h}}, "timestamp": t}`
//! - `repindex_objects/<sha256>`: file content as of the last run
//!
//! The snapshot itself never holds content; blobs exist only so the next run
//! can diff against what was there before.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::output::{remove_if_exists, write_atomic, write_json};

pub const CACHE_FILE: &str = "repindex_cache.json";
pub const OBJECTS_DIR: &str = "repindex_objects";

/// Hash record for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub hash: String,
}

/// Persisted state of the previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub files: BTreeMap<String, FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Snapshot {
    pub fn hash_of(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|entry| entry.hash.as_str())
    }
}

/// Snapshot file and blob directory of one output directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    cache_file: PathBuf,
    objects_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(output_path: &Path) -> Self {
        Self {
            cache_file: output_path.join(CACHE_FILE),
            objects_dir: output_path.join(OBJECTS_DIR),
        }
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Load the previous snapshot.
    ///
    /// A missing file is an empty snapshot. An unparsable one is logged and
    /// treated as empty, so every file is reported as new.
    pub fn load(&self) -> Result<Snapshot> {
        let json = match std::fs::read_to_string(&self.cache_file) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Snapshot::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.cache_file.display()));
            }
        };

        match serde_json::from_str(&json) {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                warn!(
                    path = %self.cache_file.display(),
                    error = %err,
                    "ignoring unreadable snapshot"
                );
                Ok(Snapshot::default())
            }
        }
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        write_json(&self.cache_file, snapshot)
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        self.objects_dir.join(hash)
    }

    /// Content stored under `hash`, if any.
    pub fn read_blob(&self, hash: &str) -> Option<String> {
        std::fs::read_to_string(self.blob_path(hash)).ok()
    }

    /// Store `content` under `hash` unless it is already present.
    pub fn write_blob(&self, hash: &str, content: &str) -> Result<()> {
        let path = self.blob_path(hash);
        if path.exists() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.objects_dir)
            .with_context(|| format!("Failed to create {}", self.objects_dir.display()))?;
        write_atomic(&path, content)
    }

    /// Delete every blob whose hash is not in `keep`.
    ///
    /// A missing blob directory (or something else in its place) holds no
    /// blobs.
    pub fn prune_blobs(&self, keep: &HashSet<&str>) -> Result<usize> {
        if !self.objects_dir.is_dir() {
            return Ok(0);
        }
        let entries = match std::fs::read_dir(&self.objects_dir) {
            Ok(entries) => entries,
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to list {}", self.objects_dir.display()));
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !keep.contains(name.as_str()) {
                remove_if_exists(&entry.path())?;
                removed += 1;
            }
        }
        debug!(removed, "pruned content store");
        Ok(removed)
    }

    /// Remove the snapshot and every stored blob.
    pub fn clear(&self) -> Result<()> {
        remove_if_exists(&self.cache_file)?;
        match std::fs::remove_dir_all(&self.objects_dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove {}", self.objects_dir.display())),
        }
    }
}
