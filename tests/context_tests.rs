//! Integration tests for the involved-file set and context documents.

use repindex::config::IgnoreConfig;
use repindex::graph::{build_graph, collect_involved, GraphMode};
use repindex::output::render_context;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

fn set(paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_chain_is_fully_collected() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.ts"), "import { b } from './b';\n").unwrap();
    fs::write(root.join("b.ts"), "import { c } from './c';\nexport const b = 1;\n").unwrap();
    fs::write(root.join("c.ts"), "export const c = 1;\n").unwrap();
    fs::write(root.join("unrelated.ts"), "export const u = 1;\n").unwrap();

    let (graph, _) = build_graph(root, &[], GraphMode::Full, &IgnoreConfig::default()).unwrap();

    assert_eq!(collect_involved(&graph, &["a.ts"]), set(&["a.ts", "b.ts", "c.ts"]));
    assert_eq!(collect_involved(&graph, &["c.ts"]), set(&["c.ts"]));
}

#[test]
fn test_cycle_terminates() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.ts"), "import { b } from './b';\nexport const a = 1;\n").unwrap();
    fs::write(root.join("b.ts"), "import { a } from './a';\nexport const b = 1;\n").unwrap();

    let (graph, _) = build_graph(root, &[], GraphMode::Full, &IgnoreConfig::default()).unwrap();

    assert_eq!(collect_involved(&graph, &["a.ts"]), set(&["a.ts", "b.ts"]));
}

#[test]
fn test_context_document_for_chain() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.ts"), "import { b } from './b';\n").unwrap();
    fs::write(root.join("b.ts"), "export const b = 1;\n").unwrap();

    let (graph, facts) =
        build_graph(root, &[], GraphMode::Full, &IgnoreConfig::default()).unwrap();
    let targets = vec!["a.ts".to_string(), "missing.ts".to_string()];
    let involved = collect_involved(&graph, &targets);
    let doc = render_context(root, &targets, &involved, &facts);

    assert!(doc.starts_with("# Context for Files: a.ts, missing.ts\n"));
    assert!(doc.contains("- a.ts (TARGET)\n- b.ts\n"));
    assert!(doc.contains("### a.ts (Main)\n\n```typescript\n"));
    assert!(doc.contains("### b.ts\n\n```typescript\nexport const b = 1;\n"));
    assert!(!doc.contains("### missing.ts"));
}
