//! repindex: a deterministic repository indexer
//!
//! repindex walks a repository, extracts imports, exports and a structural
//! summary from every TypeScript and Python file, and writes a set of
//! artifacts describing it: a directory tree, dependency graphs in four
//! projections, structure documents, Markdown dumps of the source, and a
//! change log of file diffs since the previous run.
//!
//! # Paths
//!
//! Every path in every artifact is relative to the repository root and uses
//! `/` separators. Graph nodes, snapshot keys and document headings all share
//! this form, so artifacts from different runs and platforms compare equal.
//!
//! # Determinism
//!
//! Directory walks are sorted by file name with files before directories.
//! Given the same tree, every artifact except timestamps is byte-identical
//! across runs.
//!
//! # Supported languages
//!
//! - **TypeScript** (`.ts`, `.tsx`): pattern-based import/export detection
//! - **Python** (`.py`): tree-sitter based imports, functions and classes

pub mod clipboard;
pub mod config;
pub mod diagnostics;
pub mod graph;
pub mod ingest;
pub mod output;
pub mod tracker;
pub mod validation;

pub use config::{IgnoreConfig, IndexConfig, LanguageHint};
pub use diagnostics::{DiagnosticStage, ScanDiagnostic, SkipReason};
pub use graph::{
    build_graph, collect_involved, DependencyGraph, EdgeKind, FactTable, GraphBuild, GraphEdge,
    GraphMode, IgnorePolicy, ImportResolver,
};
pub use ingest::{DependencyFacts, ExtractError, FactExtractor, Language, StructureSummary};
pub use tracker::{reconcile, ChangeReport, SnapshotStore};
pub use validation::{validate_repository, RepositoryError};
