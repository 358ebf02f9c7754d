//! Run configuration and language hint detection.
//!
//! A run is fully described by an [`IndexConfig`]; the binary builds one from
//! its arguments and the library never reads arguments or environment itself.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the directory created under the output directory.
pub const OUTPUT_DIR_NAME: &str = "repindex";

/// Project-level language hint.
///
/// Hints only influence which dependency directories are pruned; fact
/// extraction is always dispatched on file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageHint {
    /// Node / React style project (package.json present)
    React,
    /// Python project (pyproject.toml, requirements.txt or setup.py present)
    Python,
}

impl LanguageHint {
    /// Parse a user-supplied `--lang` value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "react" | "node" | "typescript" | "ts" | "javascript" | "js" => {
                Some(LanguageHint::React)
            }
            "python" | "py" => Some(LanguageHint::Python),
            _ => None,
        }
    }

    /// Directory basenames pruned while this hint is active.
    pub fn dependency_dirs(&self) -> &'static [&'static str] {
        match self {
            LanguageHint::React => &["node_modules"],
            LanguageHint::Python => &["__pycache__", "env", "venv"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageHint::React => "react",
            LanguageHint::Python => "python",
        }
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect language hints from project marker files in `root`.
///
/// When `forced` is given it replaces detection entirely; an unrecognised
/// name yields no hints.
pub fn detect_language_hints(root: &Path, forced: Option<&str>) -> Vec<LanguageHint> {
    if let Some(name) = forced {
        return match LanguageHint::from_name(name) {
            Some(hint) => vec![hint],
            None => {
                warn!(language = name, "unknown --lang value, no language hints active");
                Vec::new()
            }
        };
    }

    let mut hints = Vec::new();
    if root.join("package.json").exists() {
        hints.push(LanguageHint::React);
    }
    if ["pyproject.toml", "requirements.txt", "setup.py"]
        .iter()
        .any(|marker| root.join(marker).exists())
    {
        hints.push(LanguageHint::Python);
    }

    debug!(?hints, root = %root.display(), "detected language hints");
    hints
}

/// Inputs to the ignore policy that come from the user rather than the project.
#[derive(Debug, Clone, Default)]
pub struct IgnoreConfig {
    /// Disable every ignore rule
    pub no_ignore: bool,
    /// Extra glob patterns (`--skip`)
    pub skip_patterns: Vec<String>,
    /// Repository-relative paths excluded verbatim (e.g. the output directory)
    pub excluded_paths: Vec<String>,
}

/// Full description of one repindex run.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Repository root to index
    pub root: PathBuf,
    /// Directory under which `repindex/` is created
    pub output_dir: PathBuf,
    /// Active language hints
    pub hints: Vec<LanguageHint>,
    /// Ignore policy inputs
    pub ignore: IgnoreConfig,
    /// Disable the snapshot cache (and delete any existing one)
    pub no_cache: bool,
    /// Skip documentation artifacts
    pub minimal: bool,
    /// Write a single combined document instead of separate artifacts
    pub single_file: bool,
    /// Copy the produced document to the clipboard
    pub copy_to_clipboard: bool,
    /// Verbose logging
    pub debug: bool,
    /// Target files for context mode (empty = indexing mode)
    pub context_targets: Vec<String>,
}

impl IndexConfig {
    /// Create a config for `root` with defaults for everything else.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: PathBuf::from("."),
            hints: Vec::new(),
            ignore: IgnoreConfig::default(),
            no_cache: false,
            minimal: false,
            single_file: false,
            copy_to_clipboard: false,
            debug: false,
            context_targets: Vec::new(),
        }
    }

    /// Directory all artifacts are written to.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_DIR_NAME)
    }

    /// Whether this run produces a context document instead of an index.
    pub fn is_context_mode(&self) -> bool {
        !self.context_targets.is_empty()
    }
}
