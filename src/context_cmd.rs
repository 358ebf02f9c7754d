//! Context run: one document covering a set of target files and everything
//! they transitively import.

use anyhow::Result;
use chrono::Local;
use repindex::clipboard::{copy_or_warn, Clipboard};
use repindex::config::IndexConfig;
use repindex::graph::{collect_facts, collect_involved, GraphMode, IgnorePolicy, ImportResolver};
use repindex::output::context::context_file_name;
use repindex::output::{render_context, write_atomic};
use tracing::{debug, warn};

/// Build the full graph, collect the involved set and write
/// `context_<ts>.md`.
pub fn run_context(config: &IndexConfig, clipboard: Option<&Clipboard>) -> Result<()> {
    let root = config.root.as_path();
    let targets = &config.context_targets;
    let policy = IgnorePolicy::new(&config.hints, &config.ignore)?;

    let build = collect_facts(root, &policy)?;
    let resolver = ImportResolver::for_root(root);
    let graph = build.project(&resolver, GraphMode::Full);

    for target in targets.iter().filter(|t| !graph.contains_node(t)) {
        warn!(path = %target, "context target is not an indexed file");
    }

    let involved = collect_involved(&graph, targets);
    debug!(targets = targets.len(), involved = involved.len(), "collected context");

    let document = render_context(root, targets, &involved, &build.facts);
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = config.output_path().join(context_file_name(&timestamp));
    write_atomic(&path, &document)?;
    println!("Context file generated at: {}", path.display());

    if config.copy_to_clipboard {
        copy_or_warn(clipboard, &document);
    }
    Ok(())
}
