//! Extract pipeline
//!
//! Fetch → normalize → write → upload, strictly in sequence. The first
//! failing stage aborts the run; an artifact already written stays on disk
//! as the recovery copy for a failed upload.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::normalize::normalize;
use crate::output::{Artifact, LocalWriter, RemoteObject, Uploader};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Records fetched and written
    pub rows: usize,
    /// Flattened columns
    pub columns: usize,
    /// Local CSV file
    pub artifact: Artifact,
    /// Uploaded copy
    pub remote: RemoteObject,
}

/// The configured extract-load job
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    client: HttpClient,
    writer: LocalWriter,
    uploader: Uploader,
}

impl Pipeline {
    /// Build the pipeline, uploading to the configured destination
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let uploader = Uploader::from_config(&config)?;
        debug!("Uploading to {}", config.destination_url());
        Self::with_uploader(config, uploader)
    }

    /// Build the pipeline with an explicit upload destination
    pub fn with_uploader(config: PipelineConfig, uploader: Uploader) -> Result<Self> {
        config.validate()?;

        let http_config = HttpClientConfig::builder()
            .timeout(config.timeout())
            .accept_invalid_certs(config.accept_invalid_certs)
            .build();
        let client = HttpClient::with_config(http_config)?;
        let writer = LocalWriter::new(&config.work_dir, &config.file_stem);

        Ok(Self {
            config,
            client,
            writer,
            uploader,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all four stages once
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();

        info!("Fetching data from {}", self.config.endpoint);
        let payload = self.client.get_json(&self.config.endpoint).await?;

        let table = normalize(&payload)?;
        debug!(
            "Flattened {} records into columns {:?}",
            table.num_rows(),
            table.columns()
        );

        let artifact = self.writer.write(&table)?;
        info!("Saved locally as {}", artifact.path.display());

        let remote = self.uploader.upload_file(&artifact.path).await?;
        info!("Uploaded to {}", remote.uri);

        debug!("Run finished in {:?}", started.elapsed());

        Ok(RunSummary {
            rows: table.num_rows(),
            columns: table.num_columns(),
            artifact,
            remote,
        })
    }
}
