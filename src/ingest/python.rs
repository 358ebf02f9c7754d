//! Python fact extraction using tree-sitter-python.
//!
//! Imports are collected anywhere in the file, in document order. Functions
//! and classes only count at module level; methods are the function-valued
//! members defined directly in a class body.

use crate::ingest::{
    ClassSummary, DependencyFacts, ExtractError, FactExtractor, Language, StructureSummary,
};
use tree_sitter::Node;

/// Extractor for `.py` files.
///
/// Pure function of `(path, source)`. The parser is reused across files.
pub struct PythonExtractor {
    parser: tree_sitter::Parser,
}

impl PythonExtractor {
    /// Create a new extractor with the Python grammar loaded.
    pub fn new() -> Result<Self, ExtractError> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_python::language())?;
        Ok(Self { parser })
    }

    /// Collect import facts under `node`, depth first, in document order.
    fn walk_imports(node: &Node, source: &[u8], imports: &mut Vec<String>) {
        match node.kind() {
            "import_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    if let Some(text) = imported_name(&name, source) {
                        imports.push(text);
                    }
                }
                return;
            }
            "import_from_statement" => {
                let module = node
                    .child_by_field_name("module_name")
                    .map(|m| module_text(&m, source))
                    .unwrap_or_default();

                let mut names = Vec::new();
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    if let Some(text) = imported_name(&name, source) {
                        names.push(text);
                    }
                }
                let mut cursor = node.walk();
                if node
                    .children(&mut cursor)
                    .any(|child| child.kind() == "wildcard_import")
                {
                    names.push("*".to_string());
                }

                for name in names {
                    imports.push(qualify(&module, &name));
                }
                return;
            }
            "future_import_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    if let Some(text) = imported_name(&name, source) {
                        imports.push(qualify("__future__", &text));
                    }
                }
                return;
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::walk_imports(&child, source, imports);
        }
    }

    /// Collect module-level functions and classes.
    fn collect_definitions(root: &Node, source: &[u8]) -> (Vec<String>, Vec<ClassSummary>) {
        let mut functions = Vec::new();
        let mut classes = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let Some(definition) = unwrap_decorated(child) else {
                continue;
            };
            match definition.kind() {
                "function_definition" => {
                    if let Some(name) = field_text(&definition, "name", source) {
                        functions.push(name);
                    }
                }
                "class_definition" => {
                    if let Some(name) = field_text(&definition, "name", source) {
                        classes.push(ClassSummary {
                            name,
                            methods: class_methods(&definition, source),
                        });
                    }
                }
                _ => {}
            }
        }

        (functions, classes)
    }
}

impl FactExtractor for PythonExtractor {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extract(&mut self, path: &str, source: &str) -> Result<DependencyFacts, ExtractError> {
        let bytes = source.as_bytes();
        let tree = self.parser.parse(bytes, None).ok_or(ExtractError::Parse {
            path: path.to_string(),
            line: 1,
        })?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(ExtractError::Parse {
                path: path.to_string(),
                line: first_error_line(&root).unwrap_or(1),
            });
        }

        let mut imports = Vec::new();
        Self::walk_imports(&root, bytes, &mut imports);

        let (functions, classes) = Self::collect_definitions(&root, bytes);

        let mut exports = functions.clone();
        exports.extend(classes.iter().map(|c| c.name.clone()));

        Ok(DependencyFacts {
            imports,
            exports,
            structure: StructureSummary {
                language: Some(Language::Python),
                functions,
                classes,
                parse_error: None,
            },
        })
    }
}

/// The definition inside a `decorated_definition`, or the node itself.
fn unwrap_decorated(node: Node) -> Option<Node> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition")
    } else {
        Some(node)
    }
}

/// Direct function-valued members of a class body, in order.
fn class_methods(class: &Node, source: &[u8]) -> Vec<String> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for item in body.children(&mut cursor) {
        if let Some(definition) = unwrap_decorated(item) {
            if definition.kind() == "function_definition" {
                if let Some(name) = field_text(&definition, "name", source) {
                    methods.push(name);
                }
            }
        }
    }
    methods
}

/// Imported name of a `dotted_name` or `aliased_import` node.
///
/// The alias is dropped; facts record what is imported, not the local binding.
fn imported_name(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "aliased_import" => field_text(node, "name", source),
        "dotted_name" | "identifier" => node.utf8_text(source).ok().map(str::to_string),
        _ => None,
    }
}

/// Module text of an import-from statement with leading dots dropped.
///
/// `from . import x` has no module; `from ..pkg.mod import x` has `pkg.mod`.
fn module_text(node: &Node, source: &[u8]) -> String {
    if node.kind() == "relative_import" {
        let mut cursor = node.walk();
        let dotted = node
            .children(&mut cursor)
            .find(|child| child.kind() == "dotted_name");
        return dotted
            .and_then(|d| d.utf8_text(source).ok())
            .unwrap_or_default()
            .to_string();
    }
    node.utf8_text(source).unwrap_or_default().to_string()
}

fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", module, name)
    }
}

fn field_text(node: &Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)?
        .utf8_text(source)
        .ok()
        .map(str::to_string)
}

/// 1-based line of the first ERROR or MISSING node under `node`.
fn first_error_line(node: &Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(line) = first_error_line(&child) {
                return Some(line);
            }
        }
    }
    None
}
