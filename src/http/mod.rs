//! HTTP client module
//!
//! Fetches the raw catalog payload from the source API.
//!
//! # Behavior
//!
//! - **Bounded**: every request carries the configured timeout
//! - **Single shot**: no retries, the first failure is returned
//! - **TLS**: certificate verification stays on unless explicitly disabled

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
