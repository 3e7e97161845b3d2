//! CLI runner - executes the pipeline

use crate::cli::commands::Cli;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{Pipeline, RunSummary};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the pipeline once
    pub async fn run(&self) -> Result<RunSummary> {
        let config = self.load_config()?;
        debug!("Pipeline config: {:?}", config);

        let pipeline = Pipeline::new(config)?;
        pipeline.run().await
    }

    /// Load the config file, or defaults, then apply flags
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PipelineConfig::from_yaml_file(path)?,
            None => PipelineConfig::default(),
        };
        if self.cli.insecure {
            config.accept_invalid_certs = true;
        }
        Ok(config)
    }
}
