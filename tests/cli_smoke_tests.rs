//! CLI smoke tests for the repindex binary
//!
//! Spawns the binary against temporary repositories and checks exit codes,
//! stdout progress lines and the artifacts written.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_repindex(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_repindex"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to start repindex binary")
}

fn index(repo: &Path, out: &Path, extra: &[&str]) -> Output {
    let mut args = vec![repo.as_os_str(), OsStr::new("-o"), out.as_os_str()];
    args.extend(extra.iter().map(OsStr::new));
    run_repindex(&args)
}

fn sample_repo() -> TempDir {
    let repo = TempDir::new().unwrap();
    fs::write(
        repo.path().join("file1.ts"),
        "import { func } from \"./file2\";\nexport const x = 1;\n",
    )
    .unwrap();
    fs::write(repo.path().join("file2.ts"), "export function func() {}\n").unwrap();
    fs::write(repo.path().join("tool.py"), "import os\n\ndef main():\n    pass\n").unwrap();
    repo
}

#[test]
fn test_nonexistent_repository_exits_1() {
    let out = TempDir::new().unwrap();
    let missing = out.path().join("does-not-exist");
    let output = index(&missing, out.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: The repository path"));
    assert!(stderr.contains("does not exist or is not a directory."));
}

#[test]
fn test_full_run_writes_artifacts() {
    let repo = sample_repo();
    let out = TempDir::new().unwrap();
    let output = index(repo.path(), out.path(), &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Detecting structure..."));
    assert!(stdout.contains("All outputs have been saved to"));

    let dir = out.path().join("repindex");
    for name in [
        "tree_structure.txt",
        "dependency_graph_full.json",
        "dependency_graph_imports.json",
        "dependency_graph_exports.json",
        "dependency_graph_no_objects.json",
        "detailed_structure.json",
        "top_level_structure.json",
        "documentation.md",
        "documentation_light.md",
        "repindex_cache.json",
        "repindex_changes.md",
    ] {
        assert!(dir.join(name).is_file(), "missing {}", name);
    }

    let graph: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("dependency_graph_full.json")).unwrap())
            .unwrap();
    assert_eq!(
        graph["nodes"],
        serde_json::json!(["file1.ts", "file2.ts", "tool.py"])
    );
    assert_eq!(
        graph["edges"][0],
        serde_json::json!({"from": "file1.ts", "to": "file2.ts", "type": "import", "objects": ["./file2"]})
    );

    let tree = fs::read_to_string(dir.join("tree_structure.txt")).unwrap();
    assert!(tree.contains("├── file1.ts"));
    assert!(tree.contains("└── tool.py"));
}

#[test]
fn test_second_run_removes_change_report() {
    let repo = sample_repo();
    let out = TempDir::new().unwrap();
    assert!(index(repo.path(), out.path(), &[]).status.success());
    let changes = out.path().join("repindex/repindex_changes.md");
    assert!(changes.is_file());

    assert!(index(repo.path(), out.path(), &[]).status.success());
    assert!(!changes.exists());

    fs::write(repo.path().join("file2.ts"), "export function func() { return 1; }\n").unwrap();
    assert!(index(repo.path(), out.path(), &[]).status.success());
    let report = fs::read_to_string(&changes).unwrap();
    assert!(report.contains("### file2.ts"));
    assert!(report.contains("```diff"));
}

#[test]
fn test_minimal_and_no_cache() {
    let repo = sample_repo();
    let out = TempDir::new().unwrap();
    assert!(index(repo.path(), out.path(), &["--minimal"]).status.success());

    let dir = out.path().join("repindex");
    assert!(!dir.join("tree_structure.txt").exists());
    assert!(!dir.join("documentation.md").exists());
    assert!(dir.join("repindex_cache.json").is_file());

    assert!(index(repo.path(), out.path(), &["--minimal", "--no-cache"]).status.success());
    assert!(!dir.join("repindex_cache.json").exists());
}

#[test]
fn test_single_file_mode() {
    let repo = sample_repo();
    let out = TempDir::new().unwrap();
    let output = index(repo.path(), out.path(), &["--single-file"]);
    assert!(output.status.success());

    let dir = out.path().join("repindex");
    let doc = fs::read_to_string(dir.join("repindex.md")).unwrap();
    assert!(doc.contains("## Dependency Graph"));
    assert!(doc.contains("### file1.ts"));
    assert!(!dir.join("documentation.md").exists());
}

#[test]
fn test_context_mode() {
    let repo = sample_repo();
    let out = TempDir::new().unwrap();
    let output = index(repo.path(), out.path(), &["--context-for", "file1.ts"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Context file generated at:"));

    let dir = out.path().join("repindex");
    let context = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .find(|e| e.file_name().to_string_lossy().starts_with("context_"))
        .expect("context document written");
    let doc = fs::read_to_string(context.path()).unwrap();
    assert!(doc.contains("- file1.ts (TARGET)\n- file2.ts\n"));
    assert!(!dir.join("dependency_graph_full.json").exists());
}

#[test]
fn test_output_dir_inside_repo_is_not_indexed() {
    let repo = sample_repo();
    let output = index(repo.path(), repo.path(), &[]);
    assert!(output.status.success());
    assert!(index(repo.path(), repo.path(), &[]).status.success());

    let dir = repo.path().join("repindex");
    let graph = fs::read_to_string(dir.join("dependency_graph_full.json")).unwrap();
    assert!(!graph.contains("repindex/"));
    assert!(!dir.join("repindex_changes.md").exists());
}
