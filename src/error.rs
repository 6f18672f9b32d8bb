//! Error types for the fetch → extract → translate pipeline.
//!
//! [`NewsError`] aborts a request and is surfaced to the client as a failure
//! payload. [`TranslationError`] never leaves the translator integration: a
//! failed translation only means the item keeps its original title.

use thiserror::Error;

/// Errors that abort a pipeline run or prevent the service from starting.
#[derive(Debug, Error)]
pub enum NewsError {
    /// The source page could not be fetched (connection, TLS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The source site answered outside the 2xx range.
    #[error("HTTP error! status: {status} ({url})")]
    HttpStatus { status: u16, url: String },

    #[error("unknown news source: {0}")]
    UnknownSource(String),

    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure modes of a single translation call.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation provider returned HTTP {0}")]
    Status(u16),

    #[error("malformed translation response: {0}")]
    Malformed(String),

    /// The provider answered 2xx but flagged the request in its payload.
    #[error("translation rejected by provider (status {status}): {detail}")]
    Rejected { status: String, detail: String },

    #[error("translation provider returned an empty text")]
    Empty,
}
