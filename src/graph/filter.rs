//! Ignore policy for every tree walk.
//!
//! Rules are evaluated in this order and the first match wins:
//! 1. The run's own output directory (always, even with `--no-ignore`)
//! 2. `--no-ignore` disables everything below
//! 3. Default exclusions: any path segment equal to a fixed name
//! 4. Hidden entries: any path segment starting with `.`
//! 5. Dependency directories of active language hints (basename match)
//! 6. User skip globs
//!
//! The policy is a pure function of the repository-relative path; it never
//! touches the filesystem. The caller passes `is_dir` because `<dir>/*`
//! patterns behave differently for directories.

use crate::config::{IgnoreConfig, LanguageHint};
use crate::diagnostics::SkipReason;
use crate::validation::{slash_basename, slash_parent};

/// Path segments that are always excluded.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    ".next",
    "dist",
    "build",
    "target",
    "coverage",
    ".DS_Store",
];

/// Invalid user-supplied skip pattern.
#[derive(Debug, thiserror::Error)]
#[error("invalid skip pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: globset::Error,
}

/// One compiled user skip pattern.
#[derive(Debug, Clone)]
struct SkipPattern {
    matcher: globset::GlobMatcher,
    /// `Some(dir)` when the pattern has the form `<dir>/*`
    dir_prefix: Option<String>,
}

impl SkipPattern {
    fn compile(pattern: &str) -> Result<Self, PatternError> {
        let glob = globset::Glob::new(pattern).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;

        let dir_prefix = pattern
            .strip_suffix("/*")
            .filter(|dir| !dir.is_empty())
            .map(str::to_string);

        Ok(Self {
            matcher: glob.compile_matcher(),
            dir_prefix,
        })
    }

    fn matches(&self, rel_path: &str, is_dir: bool) -> bool {
        let basename = slash_basename(rel_path);

        if self.matcher.is_match(basename) || self.matcher.is_match(rel_path) {
            return true;
        }
        if rel_path.split('/').any(|segment| self.matcher.is_match(segment)) {
            return true;
        }

        if let Some(dir) = &self.dir_prefix {
            if is_dir && basename == dir {
                return true;
            }
            if slash_basename(slash_parent(rel_path)) == dir {
                return true;
            }
        }

        false
    }
}

/// Decides whether a path participates in a scan.
#[derive(Debug, Clone)]
pub struct IgnorePolicy {
    no_ignore: bool,
    hints: Vec<LanguageHint>,
    skip_patterns: Vec<SkipPattern>,
    excluded_paths: Vec<String>,
}

impl IgnorePolicy {
    /// Build a policy from the active language hints and user settings.
    ///
    /// # Errors
    /// Returns [`PatternError`] for the first skip pattern that is not a
    /// valid glob.
    pub fn new(hints: &[LanguageHint], config: &IgnoreConfig) -> Result<Self, PatternError> {
        let skip_patterns = config
            .skip_patterns
            .iter()
            .map(|p| SkipPattern::compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        let excluded_paths = config
            .excluded_paths
            .iter()
            .map(|p| p.trim_end_matches('/').to_string())
            .filter(|p| !p.is_empty() && p != ".")
            .collect();

        Ok(Self {
            no_ignore: config.no_ignore,
            hints: hints.to_vec(),
            skip_patterns,
            excluded_paths,
        })
    }

    /// A policy that excludes nothing.
    pub fn permissive() -> Self {
        Self {
            no_ignore: true,
            hints: Vec::new(),
            skip_patterns: Vec::new(),
            excluded_paths: Vec::new(),
        }
    }

    /// Check a repository-relative slash path, returning the reason it is
    /// excluded.
    ///
    /// The empty path (the root itself) is never excluded.
    pub fn should_skip(&self, rel_path: &str, is_dir: bool) -> Option<SkipReason> {
        if rel_path.is_empty() || rel_path == "." {
            return None;
        }

        if self
            .excluded_paths
            .iter()
            .any(|excluded| is_same_or_under(rel_path, excluded))
        {
            return Some(SkipReason::ExcludedOutput);
        }

        if self.no_ignore {
            return None;
        }

        let segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();

        if segments
            .iter()
            .any(|segment| DEFAULT_EXCLUSIONS.contains(segment))
        {
            return Some(SkipReason::IgnoredDefault);
        }

        if segments.iter().any(|segment| segment.starts_with('.')) {
            return Some(SkipReason::IgnoredHidden);
        }

        let basename = slash_basename(rel_path);
        if self
            .hints
            .iter()
            .any(|hint| hint.dependency_dirs().contains(&basename))
        {
            return Some(SkipReason::IgnoredLanguageHint);
        }

        if self
            .skip_patterns
            .iter()
            .any(|pattern| pattern.matches(rel_path, is_dir))
        {
            return Some(SkipReason::ExcludedByPattern);
        }

        None
    }

    /// Boolean form of [`should_skip`](Self::should_skip).
    pub fn should_ignore(&self, rel_path: &str, is_dir: bool) -> bool {
        self.should_skip(rel_path, is_dir).is_some()
    }
}

fn is_same_or_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
