//! Single combined document (`--single-file`).

/// Inputs of the combined document, already rendered.
pub struct SingleDocument<'a> {
    /// Repository basename shown as the tree root
    pub repo_name: &'a str,
    /// Tree lines without the root line
    pub tree: &'a str,
    /// Full dependency graph as pretty JSON
    pub graph_json: &'a str,
    /// Top-level structure as pretty JSON
    pub structure_json: &'a str,
    /// Light Markdown documentation
    pub documentation: &'a str,
}

/// Render the combined document.
pub fn render_single_document(doc: &SingleDocument<'_>) -> String {
    let mut out = format!("# Repository Index: {}\n\n", doc.repo_name);

    out.push_str("## Directory Tree\n\n```\n");
    out.push_str(doc.repo_name);
    out.push('\n');
    out.push_str(doc.tree);
    out.push_str("```\n\n");

    out.push_str("## Dependency Graph\n\n```json\n");
    out.push_str(doc.graph_json);
    out.push_str("\n```\n\n");

    out.push_str("## Top-Level Structure\n\n```json\n");
    out.push_str(doc.structure_json);
    out.push_str("\n```\n\n");

    out.push_str("## Source Files\n\n");
    out.push_str(doc.documentation);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order() {
        let text = render_single_document(&SingleDocument {
            repo_name: "app",
            tree: "└── a.ts\n",
            graph_json: "{}",
            structure_json: "{}",
            documentation: "### a.ts\n\n```typescript\n\n```\n\n",
        });

        assert!(text.starts_with("# Repository Index: app\n\n## Directory Tree\n\n```\napp\n└── a.ts\n```"));
        let tree = text.find("## Directory Tree").unwrap();
        let graph = text.find("## Dependency Graph").unwrap();
        let structure = text.find("## Top-Level Structure").unwrap();
        let sources = text.find("## Source Files").unwrap();
        assert!(tree < graph && graph < structure && structure < sources);
        assert!(text.ends_with("```typescript\n\n```\n\n"));
    }
}
