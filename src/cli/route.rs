//! CLI route: run context built from config and CLI flags; runs the build and renders.

use crate::cli::output::render_tree_view;
use crate::cli::parse::Cli;
use crate::concurrency::CancelToken;
use crate::config::TreehashConfig;
use crate::error::ApiError;
use crate::tree::builder::TreeBuilder;
use crate::tree::render::RenderMode;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Everything needed to run one digest command.
#[derive(Debug, Clone)]
pub struct RunContext {
    root: PathBuf,
    config: TreehashConfig,
}

impl RunContext {
    /// Apply CLI overrides to `config` and validate the result.
    pub fn new(cli: &Cli, mut config: TreehashConfig) -> Result<Self, ApiError> {
        if let Some(workers) = cli.workers {
            config.scan.workers = Some(workers);
        }
        if let Some(algorithm) = cli.algorithm {
            config.scan.algorithm = algorithm;
        }
        if let Some(format) = cli.format {
            config.output.format = format;
        }
        config.ensure_valid()?;

        Ok(Self {
            root: cli.path.clone(),
            config,
        })
    }

    pub fn config(&self) -> &TreehashConfig {
        &self.config
    }

    /// Build the tree for the configured root and render it.
    pub fn execute(&self, cancel: &CancelToken) -> Result<String, ApiError> {
        let start = Instant::now();
        let workers = self.config.scan.worker_count()?;
        debug!(
            root = %self.root.display(),
            workers,
            algorithm = %self.config.scan.algorithm,
            "running digest"
        );

        let tree = TreeBuilder::new(self.root.clone())
            .with_workers(workers)
            .with_algorithm(self.config.scan.algorithm)
            .build(cancel)?;

        let output = match self.config.output.format {
            RenderMode::Flat => tree.render(RenderMode::Flat),
            RenderMode::Indented => render_tree_view(&tree.indented_lines()),
        };
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "command completed"
        );
        Ok(output)
    }
}
