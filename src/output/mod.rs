//! Rendering and writing of every generated artifact.
//!
//! Renderers return strings; only [`write_atomic`] touches the output
//! directory, so a crash never leaves a half-written artifact behind.

pub mod context;
pub mod document;
pub mod markdown;
pub mod report;
pub mod tree;

pub use context::render_context;
pub use document::render_single_document;
pub use markdown::{render_markdown, MarkdownScope};
pub use report::render_change_report;
pub use tree::render_tree;

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Artifact file names under the output directory.
pub const TREE_FILE: &str = "tree_structure.txt";
pub const DETAILED_STRUCTURE_FILE: &str = "detailed_structure.json";
pub const TOP_LEVEL_STRUCTURE_FILE: &str = "top_level_structure.json";
pub const DOCUMENTATION_FILE: &str = "documentation.md";
pub const DOCUMENTATION_LIGHT_FILE: &str = "documentation_light.md";
pub const SINGLE_DOCUMENT_FILE: &str = "repindex.md";

/// Serialize `value` as pretty JSON with four-space indentation.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `contents` to `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Write `value` as four-space pretty JSON.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let json = to_json_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    write_atomic(path, &json)
}

/// Remove `path` if it exists.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
