//! Transitive import reachability for context documents.

use std::collections::{BTreeSet, HashMap};

use super::{DependencyGraph, EdgeKind};

/// Collect every path reachable from `targets` over import edges.
///
/// Targets that are not graph nodes are skipped. Each path is visited at
/// most once, so import cycles terminate.
pub fn collect_involved<S: AsRef<str>>(
    graph: &DependencyGraph,
    targets: &[S],
) -> BTreeSet<String> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges_of(EdgeKind::Import) {
        if let Some(to) = edge.to.as_deref() {
            adjacency.entry(edge.from.as_str()).or_default().push(to);
        }
    }

    let mut involved = BTreeSet::new();
    for target in targets {
        let target = target.as_ref();
        if !graph.contains_node(target) {
            continue;
        }

        let mut stack = vec![target];
        while let Some(path) = stack.pop() {
            if !involved.insert(path.to_string()) {
                continue;
            }
            if let Some(next) = adjacency.get(path) {
                // Reverse so the first import is explored first
                stack.extend(next.iter().rev().copied());
            }
        }
    }

    involved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphEdge;

    fn graph(nodes: &[&str], imports: &[(&str, &str)]) -> DependencyGraph {
        DependencyGraph {
            nodes: nodes.iter().map(|n| n.to_string()).collect(),
            edges: imports
                .iter()
                .map(|(from, to)| GraphEdge::import(from, to, None))
                .collect(),
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chain() {
        let g = graph(&["a.ts", "b.ts", "c.ts", "d.ts"], &[("a.ts", "b.ts"), ("b.ts", "c.ts")]);
        assert_eq!(collect_involved(&g, &["a.ts"]), set(&["a.ts", "b.ts", "c.ts"]));
    }

    #[test]
    fn test_cycle_terminates() {
        let g = graph(&["a.ts", "b.ts"], &[("a.ts", "b.ts"), ("b.ts", "a.ts")]);
        assert_eq!(collect_involved(&g, &["a.ts"]), set(&["a.ts", "b.ts"]));
    }

    #[test]
    fn test_missing_target_skipped() {
        let g = graph(&["a.ts", "b.ts"], &[("a.ts", "b.ts")]);
        assert!(collect_involved(&g, &["nope.ts"]).is_empty());
        assert_eq!(collect_involved(&g, &["nope.ts", "b.ts"]), set(&["b.ts"]));
    }

    #[test]
    fn test_export_edges_ignored() {
        let mut g = graph(&["a.ts"], &[]);
        g.edges.push(GraphEdge::export("a.ts", Some(vec!["x".to_string()])));
        assert_eq!(collect_involved(&g, &["a.ts"]), set(&["a.ts"]));
    }
}
