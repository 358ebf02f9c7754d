//! Import specifier resolution to repository-relative paths.
//!
//! Resolution probes for existence through a [`FileProbe`]; the disk
//! implementation is used for real runs and tests can supply an in-memory
//! tree. Nothing here fails: a specifier that resolves to no file comes back
//! as a candidate path (or unchanged) and the graph builder simply finds no
//! matching node for it.

use std::path::PathBuf;

use crate::ingest::detect::{has_supported_extension, INDEX_FILES, SUPPORTED_EXTENSIONS};
use crate::validation::{normalize_slash_path, slash_join, slash_parent};

/// Existence checks on repository-relative slash paths.
pub trait FileProbe {
    /// Whether anything exists at `rel_path`
    fn exists(&self, rel_path: &str) -> bool;
    /// Whether `rel_path` is a directory
    fn is_dir(&self, rel_path: &str) -> bool;
}

/// Probe backed by the real filesystem under a repository root.
#[derive(Debug, Clone)]
pub struct DiskProbe {
    root: PathBuf,
}

impl DiskProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileProbe for DiskProbe {
    fn exists(&self, rel_path: &str) -> bool {
        self.root.join(rel_path).exists()
    }

    fn is_dir(&self, rel_path: &str) -> bool {
        self.root.join(rel_path).is_dir()
    }
}

/// Maps `(declaring file, specifier)` to a candidate path.
///
/// Handles:
/// - Relative specifiers (`./x`, `../x`): joined against the declaring
///   file's directory, then directory index files or extensions are probed
/// - Dotted module specifiers (`pkg.mod`): dots become `/`, extensions are
///   probed from the root
pub struct ImportResolver<P: FileProbe> {
    probe: P,
}

impl ImportResolver<DiskProbe> {
    /// Resolver probing the filesystem under `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self::new(DiskProbe::new(root))
    }
}

impl<P: FileProbe> ImportResolver<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Resolve `specifier` as written in `declaring_file`.
    ///
    /// # Returns
    /// - First existing probe match, relative to the root
    /// - For relative specifiers with no match: the normalized candidate
    /// - For module specifiers with no match: the specifier unchanged
    ///
    /// # Examples
    /// - `("file1.ts", "./file2")` -> `"file2.ts"` when `file2.ts` exists
    /// - `("src/a.ts", "../lib")` -> `"lib/index.ts"` when `lib/` holds it
    /// - `("main.py", "pkg.util")` -> `"pkg/util.py"` when it exists
    /// - `("a.ts", "react")` -> `"react"`
    pub fn resolve(&self, declaring_file: &str, specifier: &str) -> String {
        if specifier.starts_with('.') {
            self.resolve_relative(declaring_file, specifier)
        } else {
            self.resolve_module(specifier)
        }
    }

    fn resolve_relative(&self, declaring_file: &str, specifier: &str) -> String {
        let candidate =
            normalize_slash_path(&slash_join(slash_parent(declaring_file), specifier));

        if self.probe.is_dir(&candidate) {
            return INDEX_FILES
                .iter()
                .map(|index| normalize_slash_path(&slash_join(&candidate, index)))
                .find(|path| self.probe.exists(path))
                .unwrap_or(candidate);
        }

        if has_supported_extension(&candidate) {
            return candidate;
        }

        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| format!("{}{}", candidate, ext))
            .find(|path| self.probe.exists(path))
            .unwrap_or(candidate)
    }

    fn resolve_module(&self, specifier: &str) -> String {
        let base = specifier.replace('.', "/");
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| format!("{}{}", base, ext))
            .find(|path| self.probe.exists(path))
            .unwrap_or_else(|| specifier.to_string())
    }
}
