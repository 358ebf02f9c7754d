//! Scan diagnostics for structured skip reasons and per-file errors.
//!
//! Every decision the walk makes about a path (pruned, excluded, unreadable,
//! unparsable) is recorded as a [`ScanDiagnostic`] so callers can report it
//! without the walk itself printing anything.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Reason why a path was left out of a scan.
///
/// The order of variants matches the order in which the ignore policy
/// evaluates its rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A path segment is one of the fixed default exclusions (.git, dist, ...)
    IgnoredDefault,
    /// Hidden entry (leading `.`)
    IgnoredHidden,
    /// Dependency or virtual-env directory for an active language hint
    IgnoredLanguageHint,
    /// Matched a user-supplied skip pattern
    ExcludedByPattern,
    /// The output directory of this run
    ExcludedOutput,
    /// File extension has no fact extractor
    UnsupportedLanguage,
}

impl SkipReason {
    /// Stable sort key for deterministic ordering.
    pub fn sort_key(&self) -> u8 {
        match self {
            SkipReason::IgnoredDefault => 0,
            SkipReason::IgnoredHidden => 1,
            SkipReason::IgnoredLanguageHint => 2,
            SkipReason::ExcludedByPattern => 3,
            SkipReason::ExcludedOutput => 4,
            SkipReason::UnsupportedLanguage => 5,
        }
    }

    /// Human-readable description for log output.
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::IgnoredDefault => "default ignore rule",
            SkipReason::IgnoredHidden => "hidden entry",
            SkipReason::IgnoredLanguageHint => "language dependency directory",
            SkipReason::ExcludedByPattern => "excluded by pattern",
            SkipReason::ExcludedOutput => "output directory",
            SkipReason::UnsupportedLanguage => "language not supported",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for SkipReason {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SkipReason {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Stage of the pipeline where a per-file error occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DiagnosticStage {
    /// Failed to read file from filesystem
    Read,
    /// Failed to parse source code
    Parse,
    /// Failed to hash or store file content
    Hash,
}

impl DiagnosticStage {
    /// Stable sort key for deterministic ordering.
    pub fn sort_key(&self) -> u8 {
        match self {
            DiagnosticStage::Read => 0,
            DiagnosticStage::Parse => 1,
            DiagnosticStage::Hash => 2,
        }
    }

    /// Human-readable description for log output.
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticStage::Read => "reading file",
            DiagnosticStage::Parse => "parsing source",
            DiagnosticStage::Hash => "hashing content",
        }
    }
}

impl fmt::Display for DiagnosticStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl PartialOrd for DiagnosticStage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DiagnosticStage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// A diagnostic event from a scan.
///
/// Represents either a skipped path or a recoverable per-file error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanDiagnostic {
    /// Path was left out of the scan
    Skipped {
        /// Path relative to root
        path: String,
        /// Why the path was skipped
        reason: SkipReason,
    },
    /// Error occurred while processing a file
    Error {
        /// Path relative to root
        path: String,
        /// Pipeline stage where the error occurred
        stage: DiagnosticStage,
        /// Error message
        message: String,
    },
}

impl ScanDiagnostic {
    /// Get the file path for this diagnostic.
    pub fn path(&self) -> &str {
        match self {
            ScanDiagnostic::Skipped { path, .. } => path,
            ScanDiagnostic::Error { path, .. } => path,
        }
    }

    /// Stable sort key: path, then errors before skips, then stage/reason.
    pub fn sort_key(&self) -> (&str, u8, u8) {
        match self {
            ScanDiagnostic::Error { path, stage, .. } => (path, 0, stage.sort_key()),
            ScanDiagnostic::Skipped { path, reason } => (path, 1, reason.sort_key()),
        }
    }

    /// Create a Skipped diagnostic.
    pub fn skipped(path: String, reason: SkipReason) -> Self {
        ScanDiagnostic::Skipped { path, reason }
    }

    /// Create an Error diagnostic.
    pub fn error(path: String, stage: DiagnosticStage, message: String) -> Self {
        ScanDiagnostic::Error {
            path,
            stage,
            message,
        }
    }

    /// Whether this diagnostic is an error rather than a skip.
    pub fn is_error(&self) -> bool {
        matches!(self, ScanDiagnostic::Error { .. })
    }

    /// Format as a single log line.
    ///
    /// Examples:
    /// - "SKIP node_modules: language dependency directory"
    /// - "ERROR src/bad.py: parsing source: syntax error at line 5"
    pub fn format_line(&self) -> String {
        match self {
            ScanDiagnostic::Skipped { path, reason } => {
                format!("SKIP {}: {}", path, reason)
            }
            ScanDiagnostic::Error {
                path,
                stage,
                message,
            } => {
                format!("ERROR {}: {}: {}", path, stage, message)
            }
        }
    }
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_line())
    }
}

impl PartialOrd for ScanDiagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScanDiagnostic {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_ord() {
        assert!(SkipReason::IgnoredDefault < SkipReason::IgnoredHidden);
        assert!(SkipReason::IgnoredLanguageHint < SkipReason::ExcludedByPattern);
        assert!(SkipReason::ExcludedByPattern < SkipReason::UnsupportedLanguage);
    }

    #[test]
    fn test_diagnostic_stage_ord() {
        assert!(DiagnosticStage::Read < DiagnosticStage::Parse);
        assert!(DiagnosticStage::Parse < DiagnosticStage::Hash);
    }

    #[test]
    fn test_scan_diagnostic_sort_key() {
        let error = ScanDiagnostic::error(
            "src/a.py".to_string(),
            DiagnosticStage::Parse,
            "error".to_string(),
        );
        let skipped =
            ScanDiagnostic::skipped("src/a.py".to_string(), SkipReason::UnsupportedLanguage);

        let error_key = error.sort_key();
        let skipped_key = skipped.sort_key();
        assert_eq!(error_key.0, skipped_key.0);
        assert!(error_key.1 < skipped_key.1);
        assert!(error.is_error());
        assert!(!skipped.is_error());
    }

    #[test]
    fn test_format_line() {
        let diag = ScanDiagnostic::skipped("dist".to_string(), SkipReason::IgnoredDefault);
        assert_eq!(diag.format_line(), "SKIP dist: default ignore rule");

        let diag = ScanDiagnostic::error(
            "src/bad.py".to_string(),
            DiagnosticStage::Parse,
            "syntax error at line 3".to_string(),
        );
        assert_eq!(
            diag.to_string(),
            "ERROR src/bad.py: parsing source: syntax error at line 3"
        );
    }

    #[test]
    fn test_sorting_vec() {
        let mut diagnostics = vec![
            ScanDiagnostic::skipped("src/c.ts".to_string(), SkipReason::ExcludedByPattern),
            ScanDiagnostic::error(
                "src/a.py".to_string(),
                DiagnosticStage::Read,
                "denied".to_string(),
            ),
            ScanDiagnostic::skipped("src/b".to_string(), SkipReason::IgnoredHidden),
        ];

        diagnostics.sort();

        assert_eq!(diagnostics[0].path(), "src/a.py");
        assert_eq!(diagnostics[1].path(), "src/b");
        assert_eq!(diagnostics[2].path(), "src/c.ts");
    }
}
