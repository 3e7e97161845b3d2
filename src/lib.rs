//! # fakestore-extract
//!
//! One extract-load step: pull the product catalog from an HTTP API,
//! flatten it to a table, write it as a timestamped CSV and upload that
//! file to object storage.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fakestore_extract::{Pipeline, PipelineConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pipeline = Pipeline::new(PipelineConfig::default())?;
//!     let summary = pipeline.run().await?;
//!     println!("{} rows -> {}", summary.rows, summary.remote.uri);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌───────────┐   ┌──────────────┐   ┌──────────┐
//! │  Fetch  │ → │ Normalize │ → │ Local Writer │ → │ Uploader │
//! │ (http)  │   │  (Table)  │   │   (CSV)      │   │  (GCS)   │
//! └─────────┘   └───────────┘   └──────────────┘   └──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Pipeline configuration
pub mod config;

/// HTTP fetch
pub mod http;

/// JSON flattening
pub mod normalize;

/// CSV artifacts and object storage upload
pub mod output;

/// Stage orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use normalize::{normalize, Table};
pub use pipeline::{Pipeline, RunSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
