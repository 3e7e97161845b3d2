//! Error types for the extract pipeline
//!
//! Every stage returns `Result<T, Error>`. Nothing is retried: the first
//! failure aborts the run and surfaces at the process boundary.

use thiserror::Error;

/// The main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Normalize Errors
    // ============================================================================
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    // ============================================================================
    // Local Write Errors
    // ============================================================================
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ============================================================================
    // Upload Errors
    // ============================================================================
    #[error("Storage authentication failed: {message}")]
    Auth { message: String },

    #[error("Upload failed: {message}")]
    Upload { message: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed payload error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Create an IO error tagged with the path it happened at
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create a storage auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an upload error
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Name of the pipeline stage this error belongs to
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::YamlParse(_) | Error::InvalidUrl(_) => "config",
            Error::Transport(_) | Error::HttpStatus { .. } => "fetch",
            Error::MalformedPayload { .. } => "normalize",
            Error::Io { .. } | Error::Csv(_) => "write",
            Error::Auth { .. } | Error::Upload { .. } => "upload",
        }
    }

    /// HTTP status code, if the API answered with a non-success status
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;
