//! JSON documents derived from a graph build.
//!
//! Structure documents are keyed by path in node order, not sorted, so they
//! are serialized through [`FactTable`] directly instead of a JSON map.

use anyhow::Result;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::path::Path;

use super::{DependencyGraph, FactTable, FileProbe, GraphBuild, GraphMode, ImportResolver};
use crate::output::{self, DETAILED_STRUCTURE_FILE, TOP_LEVEL_STRUCTURE_FILE};

/// `path -> structural summary` for every node.
pub struct DetailedStructure<'a>(pub &'a FactTable);

impl Serialize for DetailedStructure<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, facts) in self.0.iter() {
            map.serialize_entry(path, &facts.structure)?;
        }
        map.end()
    }
}

/// `path -> {imports, exports}` for every node.
pub struct TopLevelStructure<'a>(pub &'a FactTable);

struct ImportsExports<'a> {
    imports: &'a [String],
    exports: &'a [String],
}

impl Serialize for ImportsExports<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImportsExports", 2)?;
        state.serialize_field("imports", self.imports)?;
        state.serialize_field("exports", self.exports)?;
        state.end()
    }
}

impl Serialize for TopLevelStructure<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, facts) in self.0.iter() {
            map.serialize_entry(
                path,
                &ImportsExports {
                    imports: &facts.imports,
                    exports: &facts.exports,
                },
            )?;
        }
        map.end()
    }
}

/// Pretty JSON for one graph projection.
pub fn graph_json(graph: &DependencyGraph) -> Result<String> {
    Ok(output::to_json_pretty(graph)?)
}

/// Pretty JSON for the top-level structure document.
pub fn top_level_json(facts: &FactTable) -> Result<String> {
    Ok(output::to_json_pretty(&TopLevelStructure(facts))?)
}

/// Write all four projections plus both structure documents.
///
/// Returns the full projection for callers that need it afterwards.
pub fn write_graph_artifacts<P: FileProbe>(
    output_path: &Path,
    build: &GraphBuild,
    resolver: &ImportResolver<P>,
) -> Result<DependencyGraph> {
    let mut full = DependencyGraph::default();
    for mode in GraphMode::ALL {
        let graph = build.project(resolver, mode);
        output::write_json(&output_path.join(mode.file_name()), &graph)?;
        if mode == GraphMode::Full {
            full = graph;
        }
    }

    output::write_json(
        &output_path.join(DETAILED_STRUCTURE_FILE),
        &DetailedStructure(&build.facts),
    )?;
    output::write_json(
        &output_path.join(TOP_LEVEL_STRUCTURE_FILE),
        &TopLevelStructure(&build.facts),
    )?;

    Ok(full)
}
