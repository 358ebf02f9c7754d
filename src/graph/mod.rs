//! Dependency graph construction.
//!
//! One walk produces the node list and a side table of per-file facts; each
//! projection ([`GraphMode`]) then decides independently which edges to
//! materialize from those facts.
pub mod context;
pub mod export;
pub mod filter;
pub mod module_resolver;
pub mod scan;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::{IgnoreConfig, LanguageHint};
use crate::diagnostics::{DiagnosticStage, ScanDiagnostic, SkipReason};
use crate::ingest::{detect_language, DependencyFacts, ExtractError, Extractors};

pub use context::collect_involved;
pub use filter::{IgnorePolicy, PatternError};
pub use module_resolver::{DiskProbe, FileProbe, ImportResolver};
pub use scan::{scan_tree, ScanResult, ScannedFile};

/// Kind of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// `from` imports `to`
    Import,
    /// `from` exports the symbols in `objects`; `to` is always null
    Export,
}

/// One edge record.
///
/// Serialized as `{"from", "to", "type", "objects"?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<String>>,
}

impl GraphEdge {
    pub fn import(from: &str, to: &str, objects: Option<Vec<String>>) -> Self {
        Self {
            from: from.to_string(),
            to: Some(to.to_string()),
            kind: EdgeKind::Import,
            objects,
        }
    }

    pub fn export(from: &str, objects: Option<Vec<String>>) -> Self {
        Self {
            from: from.to_string(),
            to: None,
            kind: EdgeKind::Export,
            objects,
        }
    }
}

/// Nodes in discovery order plus edges in assembly order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    pub fn contains_node(&self, path: &str) -> bool {
        self.nodes.iter().any(|n| n == path)
    }

    /// Edges of one kind, in order.
    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}

/// Graph projection selected at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphMode {
    /// Import and export edges with objects
    Full,
    /// Import edges only
    ImportsOnly,
    /// Export edges only
    ExportsOnly,
    /// Import and export edges without objects
    NoObjects,
}

impl GraphMode {
    /// Every projection, in artifact order.
    pub const ALL: [GraphMode; 4] = [
        GraphMode::Full,
        GraphMode::ImportsOnly,
        GraphMode::ExportsOnly,
        GraphMode::NoObjects,
    ];

    pub fn includes_imports(&self) -> bool {
        !matches!(self, GraphMode::ExportsOnly)
    }

    pub fn includes_exports(&self) -> bool {
        !matches!(self, GraphMode::ImportsOnly)
    }

    pub fn attaches_objects(&self) -> bool {
        !matches!(self, GraphMode::NoObjects)
    }

    /// Artifact file name for this projection.
    pub fn file_name(&self) -> &'static str {
        match self {
            GraphMode::Full => "dependency_graph_full.json",
            GraphMode::ImportsOnly => "dependency_graph_imports.json",
            GraphMode::ExportsOnly => "dependency_graph_exports.json",
            GraphMode::NoObjects => "dependency_graph_no_objects.json",
        }
    }
}

/// Per-file facts keyed by path, iterated in node order.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    order: Vec<String>,
    facts: HashMap<String, DependencyFacts>,
}

impl FactTable {
    /// Insert facts for `path`; the first insertion fixes its position.
    pub fn insert(&mut self, path: String, facts: DependencyFacts) {
        if !self.facts.contains_key(&path) {
            self.order.push(path.clone());
        }
        self.facts.insert(path, facts);
    }

    pub fn get(&self, path: &str) -> Option<&DependencyFacts> {
        self.facts.get(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(path, facts)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependencyFacts)> {
        self.order
            .iter()
            .filter_map(|path| self.facts.get(path).map(|facts| (path.as_str(), facts)))
    }
}

/// Output of one walk-and-extract pass.
#[derive(Debug, Default)]
pub struct GraphBuild {
    /// Supported files in discovery order
    pub nodes: Vec<String>,
    /// Facts for every node
    pub facts: FactTable,
    /// Pruned paths, unsupported files and per-file failures, sorted
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl GraphBuild {
    /// Materialize the edges of one projection.
    pub fn project<P: FileProbe>(
        &self,
        resolver: &ImportResolver<P>,
        mode: GraphMode,
    ) -> DependencyGraph {
        assemble_graph(&self.nodes, &self.facts, resolver, mode)
    }
}

/// Walk `root` and extract facts for every supported file.
///
/// Per-file failures never abort: an unreadable file keeps its node with
/// empty facts, a Python syntax error keeps its node with facts carrying
/// `parse_error`. Both are logged and recorded as diagnostics.
pub fn collect_facts(root: &Path, policy: &IgnorePolicy) -> Result<GraphBuild> {
    let scan = scan_tree(root, policy);
    let mut extractors = Extractors::new()?;
    let mut build = GraphBuild {
        diagnostics: scan.diagnostics.clone(),
        ..GraphBuild::default()
    };

    for file in &scan.files {
        if detect_language(&file.path).is_none() {
            build.diagnostics.push(ScanDiagnostic::skipped(
                file.rel_path.clone(),
                SkipReason::UnsupportedLanguage,
            ));
            continue;
        }

        let facts = match extractors.extract_path(&file.path, &file.rel_path) {
            Ok(facts) => facts,
            Err(err) => {
                warn!(path = %file.rel_path, error = %err, "fact extraction failed");
                let (stage, facts) = match &err {
                    ExtractError::Read { .. } => (DiagnosticStage::Read, DependencyFacts::empty()),
                    _ => match detect_language(&file.path) {
                        Some(language) => (
                            DiagnosticStage::Parse,
                            DependencyFacts::parse_failed(language, err.to_string()),
                        ),
                        None => (DiagnosticStage::Parse, DependencyFacts::empty()),
                    },
                };
                build.diagnostics.push(ScanDiagnostic::error(
                    file.rel_path.clone(),
                    stage,
                    err.to_string(),
                ));
                facts
            }
        };

        build.nodes.push(file.rel_path.clone());
        build.facts.insert(file.rel_path.clone(), facts);
    }

    build.diagnostics.sort();
    debug!(nodes = build.nodes.len(), "collected file facts");
    Ok(build)
}

/// Turn per-file facts into the edges of `mode`.
///
/// Edge order: node order, and within one file its import edges (in
/// specifier order) before its export edge. Every import edge of a file
/// carries the file's whole import list as `objects`, so unresolved
/// specifiers stay visible even though they produce no edge.
pub fn assemble_graph<P: FileProbe>(
    nodes: &[String],
    facts: &FactTable,
    resolver: &ImportResolver<P>,
    mode: GraphMode,
) -> DependencyGraph {
    let known: HashSet<&str> = nodes.iter().map(String::as_str).collect();
    let mut edges = Vec::new();

    for (path, file_facts) in facts.iter() {
        if mode.includes_imports() {
            for specifier in &file_facts.imports {
                let target = resolver.resolve(path, specifier);
                if known.contains(target.as_str()) {
                    let objects = mode.attaches_objects().then(|| file_facts.imports.clone());
                    edges.push(GraphEdge::import(path, &target, objects));
                }
            }
        }

        if mode.includes_exports() && !file_facts.exports.is_empty() {
            let objects = mode.attaches_objects().then(|| file_facts.exports.clone());
            edges.push(GraphEdge::export(path, objects));
        }
    }

    DependencyGraph {
        nodes: nodes.to_vec(),
        edges,
    }
}

/// Build one projection of the dependency graph for `root`.
///
/// # Returns
/// The graph plus the per-file fact table it was assembled from.
pub fn build_graph(
    root: &Path,
    hints: &[LanguageHint],
    mode: GraphMode,
    ignore: &IgnoreConfig,
) -> Result<(DependencyGraph, FactTable)> {
    let policy = IgnorePolicy::new(hints, ignore)?;
    let build = collect_facts(root, &policy)?;
    let resolver = ImportResolver::for_root(root);
    let graph = build.project(&resolver, mode);
    Ok((graph, build.facts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scenario() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("file1.ts"),
            "import { func } from \"./file2\"; export const x = 1;",
        )
        .unwrap();
        fs::write(temp_dir.path().join("file2.ts"), "export function func() {}").unwrap();
        temp_dir
    }

    #[test]
    fn test_full_graph_scenario() {
        let temp_dir = scenario();
        let (graph, facts) =
            build_graph(temp_dir.path(), &[], GraphMode::Full, &IgnoreConfig::default()).unwrap();

        assert_eq!(graph.nodes, vec!["file1.ts", "file2.ts"]);
        assert_eq!(
            graph.edges,
            vec![
                GraphEdge::import("file1.ts", "file2.ts", Some(vec!["./file2".to_string()])),
                GraphEdge::export("file1.ts", Some(vec!["x".to_string()])),
                GraphEdge::export("file2.ts", Some(vec!["func".to_string()])),
            ]
        );
        assert_eq!(facts.len(), 2);
        assert_eq!(facts.get("file2.ts").unwrap().exports, vec!["func"]);
    }

    #[test]
    fn test_projection_edge_inclusion() {
        let temp_dir = scenario();
        let policy = IgnorePolicy::new(&[], &IgnoreConfig::default()).unwrap();
        let build = collect_facts(temp_dir.path(), &policy).unwrap();
        let resolver = ImportResolver::for_root(temp_dir.path());

        let imports = build.project(&resolver, GraphMode::ImportsOnly);
        assert_eq!(imports.edges.len(), 1);
        assert_eq!(imports.edges[0].kind, EdgeKind::Import);
        assert_eq!(imports.edges[0].to.as_deref(), Some("file2.ts"));

        let exports = build.project(&resolver, GraphMode::ExportsOnly);
        assert_eq!(exports.edges.len(), 2);
        assert!(exports.edges.iter().all(|e| e.kind == EdgeKind::Export && e.to.is_none()));

        let bare = build.project(&resolver, GraphMode::NoObjects);
        assert_eq!(bare.edges.len(), 3);
        assert!(bare.edges.iter().all(|e| e.objects.is_none()));
    }

    #[test]
    fn test_unresolved_imports_produce_no_edges() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("app.ts"),
            "import React from 'react';\nimport { gone } from './gone';\n",
        )
        .unwrap();

        let (graph, facts) =
            build_graph(temp_dir.path(), &[], GraphMode::Full, &IgnoreConfig::default()).unwrap();
        assert!(graph.edges.is_empty());
        assert_eq!(facts.get("app.ts").unwrap().imports, vec!["react", "./gone"]);
    }

    #[test]
    fn test_import_objects_list_every_import() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("app.ts"),
            "import React from 'react';\nimport { f } from './m';\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("m.ts"), "export function f() {}\n").unwrap();

        let (graph, _) =
            build_graph(temp_dir.path(), &[], GraphMode::Full, &IgnoreConfig::default()).unwrap();
        let imports: Vec<_> = graph.edges_of(EdgeKind::Import).collect();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].to.as_deref(), Some("m.ts"));
        assert_eq!(
            imports[0].objects,
            Some(vec!["react".to_string(), "./m".to_string()])
        );
    }

    #[test]
    fn test_python_parse_error_keeps_node() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.py"), "def broken(:\n").unwrap();
        fs::write(temp_dir.path().join("good.py"), "def ok():\n    pass\n").unwrap();

        let policy = IgnorePolicy::new(&[], &IgnoreConfig::default()).unwrap();
        let build = collect_facts(temp_dir.path(), &policy).unwrap();

        assert_eq!(build.nodes, vec!["bad.py", "good.py"]);
        assert!(build.facts.get("bad.py").unwrap().parse_error().is_some());
        assert_eq!(build.facts.get("good.py").unwrap().exports, vec!["ok"]);
        assert!(build
            .diagnostics
            .iter()
            .any(|d| d.is_error() && d.path() == "bad.py"));
    }

    #[test]
    fn test_unsupported_files_are_not_nodes() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.md"), "# readme").unwrap();
        fs::write(temp_dir.path().join("main.py"), "import os\n").unwrap();

        let (graph, _) =
            build_graph(temp_dir.path(), &[], GraphMode::Full, &IgnoreConfig::default()).unwrap();
        assert_eq!(graph.nodes, vec!["main.py"]);
    }

    #[test]
    fn test_edge_serialization_shape() {
        let edge = GraphEdge::export("a.ts", None);
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"from": "a.ts", "to": null, "type": "export"})
        );
    }
}
