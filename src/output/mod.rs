//! Output module
//!
//! Persists the normalized table and stages it in object storage.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Encoding a [`Table`](crate::normalize::Table) as CSV
//! - Writing timestamped artifacts to a local working directory
//! - Uploading artifacts to cloud storage (GCS) or a local directory

mod cloud;
mod writer;

pub use cloud::{RemoteObject, Uploader, USER_PROJECT_HEADER};
pub use writer::{artifact_filename, encode_csv, Artifact, LocalWriter, TIMESTAMP_FORMAT};
