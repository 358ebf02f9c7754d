//! CLI argument surface for repindex
//!
//! Parses arguments with clap and turns them into an [`IndexConfig`].

use anyhow::{Context, Result};
use clap::Parser;
use repindex::config::{detect_language_hints, IgnoreConfig, IndexConfig};
use repindex::validation::{normalize_slash_path, path_within_root};
use std::path::{Path, PathBuf};

/// repindex: index a repository and generate structured outputs
#[derive(Parser, Debug)]
#[command(name = "repindex", version)]
#[command(about = "Index a repository and generate structured outputs", long_about = None)]
pub struct Cli {
    /// Path to the repository to index
    pub repository_path: PathBuf,

    /// Output directory; artifacts go to <OUTPUT_DIR>/repindex
    #[arg(short = 'o', long = "output-dir", alias = "output_dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Force a language hint (python, react)
    #[arg(long)]
    pub lang: Option<String>,

    /// Do not apply any ignore rule
    #[arg(long)]
    pub no_ignore: bool,

    /// Disable caching and diff generation (deletes an existing cache)
    #[arg(long)]
    pub no_cache: bool,

    /// Generate a context document for the given file(s) and exit
    #[arg(long, num_args = 1.., value_name = "FILE")]
    pub context_for: Vec<String>,

    /// Skip tree, graph, structure and documentation artifacts
    #[arg(long)]
    pub minimal: bool,

    /// Extra glob patterns to ignore
    #[arg(long, num_args = 1.., value_name = "GLOB")]
    pub skip: Vec<String>,

    /// Write one combined repindex.md instead of separate documents
    #[arg(long)]
    pub single_file: bool,

    /// Copy the generated document to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Build the run configuration for an already validated `root`.
    ///
    /// Creates the output directory so that, when it lies inside the
    /// repository, it can be excluded from every walk.
    pub fn into_config(self, root: &Path) -> Result<IndexConfig> {
        let mut config = IndexConfig::new(root);
        config.output_dir = self.output_dir;

        let output_path = config.output_path();
        std::fs::create_dir_all(&output_path).with_context(|| {
            format!("Failed to create output directory {}", output_path.display())
        })?;

        let excluded_paths = path_within_root(&output_path, root).into_iter().collect();

        config.hints = detect_language_hints(root, self.lang.as_deref());
        config.ignore = IgnoreConfig {
            no_ignore: self.no_ignore,
            skip_patterns: self.skip,
            excluded_paths,
        };
        config.no_cache = self.no_cache;
        config.minimal = self.minimal;
        config.single_file = self.single_file;
        config.copy_to_clipboard = self.copy;
        config.debug = self.debug;
        config.context_targets = self
            .context_for
            .iter()
            .map(|target| normalize_slash_path(target))
            .collect();

        Ok(config)
    }
}
