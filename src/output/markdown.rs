//! Markdown dumps of file contents.

use tracing::warn;

use crate::graph::ScannedFile;
use crate::ingest::code_fence_language;
use crate::validation::slash_basename;

/// Extensions included in the light documentation.
pub const LIGHT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".css", ".py", ".sh"];

/// Which files a dump covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownScope {
    /// Every scanned file
    Full,
    /// Source files only (see [`LIGHT_EXTENSIONS`])
    Light,
}

impl MarkdownScope {
    fn includes(&self, rel_path: &str) -> bool {
        match self {
            MarkdownScope::Full => true,
            MarkdownScope::Light => LIGHT_EXTENSIONS.iter().any(|ext| rel_path.ends_with(ext)),
        }
    }
}

/// One `### path` section with a fenced code block.
pub fn file_section(rel_path: &str, content: &str) -> String {
    let language = code_fence_language(slash_basename(rel_path));
    format!("### {}\n\n```{}\n{}\n```\n\n", rel_path, language, content)
}

/// Render `files` in walk order.
///
/// Files that cannot be read as UTF-8 get an error line instead of content.
pub fn render_markdown(files: &[ScannedFile], scope: MarkdownScope) -> String {
    let mut out = String::new();
    for file in files.iter().filter(|f| scope.includes(&f.rel_path)) {
        match std::fs::read_to_string(&file.path) {
            Ok(content) => out.push_str(&file_section(&file.rel_path, &content)),
            Err(err) => {
                warn!(path = %file.rel_path, error = %err, "cannot read file for documentation");
                out.push_str(&format!("### {}\n\nError reading file.\n\n", file.rel_path));
            }
        }
    }
    out
}
