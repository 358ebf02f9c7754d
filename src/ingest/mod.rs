//! Per-file fact extraction.
//!
//! Every supported file yields one [`DependencyFacts`] record: the raw import
//! specifiers, the exported symbol names, and a small structural summary.
//! Dispatch is purely by extension; each [`Language`] owns one extractor
//! implementing [`FactExtractor`].

pub mod detect;
pub mod python;
pub mod typescript;

pub use detect::{code_fence_language, detect_language, Language};
pub use python::PythonExtractor;
pub use typescript::TypeScriptExtractor;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A class defined at module level together with its direct methods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassSummary {
    /// Class name
    pub name: String,
    /// Function-valued members defined directly in the class body, in order
    pub methods: Vec<String>,
}

/// Language-specific structural summary of one file.
///
/// Serialized as the per-file entry of the detailed structure document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructureSummary {
    /// Language tag (absent for unsupported files)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    /// Module-level function names, in declaration order
    #[serde(default)]
    pub functions: Vec<String>,
    /// Module-level classes, in declaration order
    #[serde(default)]
    pub classes: Vec<ClassSummary>,
    /// Set when the file could not be parsed; all lists are then empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

/// Import/export facts for one file.
///
/// Pure data. Created once per run and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyFacts {
    /// Import specifiers as written, in order of occurrence (duplicates kept)
    pub imports: Vec<String>,
    /// Exported symbol names, in order of occurrence (duplicates kept)
    pub exports: Vec<String>,
    /// Structural summary
    pub structure: StructureSummary,
}

impl DependencyFacts {
    /// Facts for an unsupported file: everything empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Facts for a file whose parse failed.
    pub fn parse_failed(language: Language, message: impl Into<String>) -> Self {
        Self {
            imports: Vec::new(),
            exports: Vec::new(),
            structure: StructureSummary {
                language: Some(language),
                parse_error: Some(message.into()),
                ..StructureSummary::default()
            },
        }
    }

    /// Parse error recorded for this file, if any.
    pub fn parse_error(&self) -> Option<&str> {
        self.structure.parse_error.as_deref()
    }

    /// True when no imports, exports or structure were found.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.exports.is_empty()
            && self.structure.functions.is_empty()
            && self.structure.classes.is_empty()
    }
}

/// Errors raised while extracting facts from a single file.
///
/// None of these abort a run: the graph builder records them as diagnostics
/// and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// File could not be read (missing, permissions, invalid UTF-8)
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Structural parse found a syntax error
    #[error("syntax error at line {line}")]
    Parse { path: String, line: usize },

    /// Grammar could not be loaded into the parser
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// Extraction pattern failed to compile
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One extraction strategy.
///
/// Implementations are pure over `(path, source)`: no filesystem access, no
/// global state. `path` is only used for error messages.
pub trait FactExtractor {
    /// Language this extractor handles.
    fn language(&self) -> Language;

    /// Extract facts from already-read source text.
    fn extract(&mut self, path: &str, source: &str) -> Result<DependencyFacts, ExtractError>;
}

/// The set of extractors for every supported language.
///
/// Built once per graph build so parsers and compiled patterns are reused
/// across files.
pub struct Extractors {
    python: PythonExtractor,
    typescript: TypeScriptExtractor,
}

impl Extractors {
    /// Create all extractors.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            python: PythonExtractor::new()?,
            typescript: TypeScriptExtractor::new()?,
        })
    }

    /// Extractor responsible for `language`.
    pub fn for_language(&mut self, language: Language) -> &mut dyn FactExtractor {
        match language {
            Language::Python => &mut self.python,
            Language::TypeScript => &mut self.typescript,
        }
    }

    /// Read `file_path` and extract its facts.
    ///
    /// Unsupported extensions yield empty facts without touching the disk.
    ///
    /// # Arguments
    /// * `file_path` - Path used to read the file
    /// * `rel_path` - Repository-relative path used in error messages
    pub fn extract_path(
        &mut self,
        file_path: &Path,
        rel_path: &str,
    ) -> Result<DependencyFacts, ExtractError> {
        let Some(language) = detect_language(file_path) else {
            return Ok(DependencyFacts::empty());
        };

        let source = std::fs::read_to_string(file_path).map_err(|source| ExtractError::Read {
            path: rel_path.to_string(),
            source,
        })?;

        self.for_language(language).extract(rel_path, &source)
    }
}
