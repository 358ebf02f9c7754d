//! Indexing run: tree, graphs, structure documents, documentation and the
//! change log.

use anyhow::{Context, Result};
use repindex::clipboard::{copy_or_warn, Clipboard};
use repindex::config::IndexConfig;
use repindex::graph::export::{graph_json, top_level_json, write_graph_artifacts};
use repindex::graph::{collect_facts, scan_tree, GraphMode, IgnorePolicy, ImportResolver};
use repindex::output::document::SingleDocument;
use repindex::output::report::CHANGES_FILE;
use repindex::output::{
    remove_if_exists, render_change_report, render_markdown, render_single_document,
    render_tree, write_atomic, MarkdownScope, DOCUMENTATION_FILE, DOCUMENTATION_LIGHT_FILE,
    SINGLE_DOCUMENT_FILE, TREE_FILE,
};
use repindex::tracker::{reconcile, SnapshotStore};
use std::path::Path;
use tracing::{debug, info};

/// Basename of the repository as given on the command line.
fn repo_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            std::fs::canonicalize(root)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| root.display().to_string())
}

/// Run a full indexing pass.
pub fn run_index(config: &IndexConfig, clipboard: Option<&Clipboard>) -> Result<()> {
    let root = config.root.as_path();
    let output_path = config.output_path();
    let policy = IgnorePolicy::new(&config.hints, &config.ignore)?;
    let write_documents = !config.minimal;

    println!("Detecting structure...");
    let tree = render_tree(root, &policy);
    let name = repo_name(root);

    if write_documents && !config.single_file {
        write_atomic(&output_path.join(TREE_FILE), &format!("{}\n{}", name, tree))?;
    }

    if write_documents {
        println!("Building dependency graphs...");
        let build = collect_facts(root, &policy)?;
        for diagnostic in &build.diagnostics {
            debug!("{}", diagnostic);
        }
        let resolver = ImportResolver::for_root(root);
        let files = scan_tree(root, &policy).files;

        if config.single_file {
            let full = build.project(&resolver, GraphMode::Full);
            let graph = graph_json(&full)?;
            let structure = top_level_json(&build.facts)?;
            let documentation = render_markdown(&files, MarkdownScope::Light);

            let document = render_single_document(&SingleDocument {
                repo_name: &name,
                tree: &tree,
                graph_json: &graph,
                structure_json: &structure,
                documentation: &documentation,
            });
            let path = output_path.join(SINGLE_DOCUMENT_FILE);
            write_atomic(&path, &document)?;
            println!("Single document generated at: {}", path.display());

            if config.copy_to_clipboard {
                copy_or_warn(clipboard, &document);
            }
        } else {
            let full = write_graph_artifacts(&output_path, &build, &resolver)?;
            info!(
                nodes = full.nodes.len(),
                edges = full.edges.len(),
                "wrote dependency graphs"
            );

            println!("Generating Markdown documentation...");
            write_atomic(
                &output_path.join(DOCUMENTATION_FILE),
                &render_markdown(&files, MarkdownScope::Full),
            )?;
            println!("Markdown documentation generated.");

            println!("Generating light Markdown documentation...");
            write_atomic(
                &output_path.join(DOCUMENTATION_LIGHT_FILE),
                &render_markdown(&files, MarkdownScope::Light),
            )?;
            println!("Light Markdown documentation generated.");
        }
    }

    if config.copy_to_clipboard && !(config.single_file && write_documents) {
        info!("--copy only applies to context and single-document runs");
    }

    println!("Updating cache and generating diffs if needed...");
    update_change_log(config, &output_path)?;

    println!("All outputs have been saved to '{}'.", output_path.display());
    Ok(())
}

/// Reconcile the snapshot and write (or clear) the change report.
fn update_change_log(config: &IndexConfig, output_path: &Path) -> Result<()> {
    let store = SnapshotStore::new(output_path);
    let changes_path = output_path.join(CHANGES_FILE);

    if config.no_cache {
        store.clear().context("Failed to disable cache")?;
        return Ok(());
    }

    let report = reconcile(&config.root, &config.hints, &config.ignore, &store)?;
    for diagnostic in &report.diagnostics {
        debug!("{}", diagnostic);
    }
    if report.is_empty() {
        remove_if_exists(&changes_path)?;
    } else {
        write_atomic(&changes_path, &render_change_report(&report))?;
    }
    Ok(())
}
