//! TypeScript fact extraction using regular expressions over raw text.
//!
//! This is a heuristic, not a parser:
//! - the import pattern is lazy across newlines, so an `import` without a
//!   terminating `from "...";` is swallowed into the next statement that has one
//! - comments, strings and template literals containing `import`/`export`
//!   produce false positives
//! - `export { a, b }` lists and re-exports are not recognised
//!
//! Structure summaries list the exported names as functions and no classes.

use crate::ingest::{DependencyFacts, ExtractError, FactExtractor, Language, StructureSummary};
use regex::Regex;

const IMPORT_PATTERN: &str = r#"import\s+(?:[\s\S]*?)from\s+['"](.+?)['"];"#;
const EXPORT_PATTERN: &str =
    r"export\s+(?:default\s+)?(?:class|function|const|let|var|interface|type|enum)?\s*([\w]+)";

/// Extractor for `.ts` and `.tsx` files.
pub struct TypeScriptExtractor {
    import_re: Regex,
    export_re: Regex,
}

impl TypeScriptExtractor {
    /// Compile both extraction patterns.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            import_re: Regex::new(IMPORT_PATTERN)?,
            export_re: Regex::new(EXPORT_PATTERN)?,
        })
    }

    /// Import specifiers in order of occurrence.
    pub fn imports(&self, source: &str) -> Vec<String> {
        self.import_re
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Exported identifiers in order of occurrence.
    pub fn exports(&self, source: &str) -> Vec<String> {
        self.export_re
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl FactExtractor for TypeScriptExtractor {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn extract(&mut self, _path: &str, source: &str) -> Result<DependencyFacts, ExtractError> {
        let imports = self.imports(source);
        let exports = self.exports(source);

        Ok(DependencyFacts {
            imports,
            structure: StructureSummary {
                language: Some(Language::TypeScript),
                functions: exports.clone(),
                classes: Vec::new(),
                parse_error: None,
            },
            exports,
        })
    }
}
