//! Language detection by file extension.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Languages with a fact extractor.
///
/// Adding a language means adding a variant here and an extractor in
/// [`crate::ingest`]; nothing else dispatches on extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// `.py`, parsed structurally with tree-sitter
    Python,
    /// `.ts` / `.tsx`, matched with regular expressions
    TypeScript,
}

/// Extensions probed by the import resolver, in probe order.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".py"];

/// Directory index files probed by the import resolver, in probe order.
pub const INDEX_FILES: &[&str] = &["index.ts", "index.tsx", "__init__.py"];

impl Language {
    /// Map a bare extension (without dot) to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Language::Python),
            "ts" | "tsx" => Some(Language::TypeScript),
            _ => None,
        }
    }

    /// Language tag used in structure documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the language of `path` from its extension.
///
/// Returns `None` for unsupported files; that is not an error.
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    Language::from_extension(ext)
}

/// Whether a slash path ends in one of [`SUPPORTED_EXTENSIONS`].
pub fn has_supported_extension(path: &str) -> bool {
    SUPPORTED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Code-fence tag for a file name in Markdown output.
///
/// Covers more than the extractable languages: shell and CSS files are
/// also rendered in the documentation dumps.
pub fn code_fence_language(file_name: &str) -> &'static str {
    if file_name.ends_with(".ts") || file_name.ends_with(".tsx") {
        "typescript"
    } else if file_name.ends_with(".py") {
        "python"
    } else if file_name.ends_with(".sh") {
        "bash"
    } else if file_name.ends_with(".css") {
        "css"
    } else {
        ""
    }
}
