//! Error types for the catalog cache service
//!
//! Provides unified error handling using thiserror. Construction-time
//! configuration problems, snapshot export failures, and HTTP-facing errors
//! each get their own type; a missing key is a normal negative result and is
//! only turned into an error at the API boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Configuration Errors ==
/// Fatal configuration problems detected at cache construction.
///
/// No cache instance is returned when any of these fire.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Shard count of zero leaves no shard to route keys to
    #[error("shard count must be greater than zero")]
    ZeroShardCount,

    /// A zero threshold would trigger eviction on every insert
    #[error("shard threshold must be greater than zero")]
    ZeroThreshold,

    /// Eviction must have room to make progress below the threshold
    #[error("low watermark {low_watermark} must be strictly below threshold {threshold}")]
    WatermarkNotBelowThreshold {
        low_watermark: usize,
        threshold: usize,
    },
}

// == Encoding Errors ==
/// A key or value failed to produce its canonical byte encoding.
///
/// During snapshot export this skips the affected entry; it never aborts the
/// whole stream.
#[derive(Error, Debug)]
#[error("canonical encoding failed: {0}")]
pub struct EncodeError(String);

impl EncodeError {
    /// Creates a new EncodeError with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// A snapshot field could not be decoded back into a key or value.
#[derive(Error, Debug)]
#[error("canonical decoding failed: {0}")]
pub struct DecodeError(String);

impl DecodeError {
    /// Creates a new DecodeError with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

// == Snapshot Errors ==
/// Failures surfaced by snapshot export and import.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The export sink failed mid-stream; the export aborts and partially
    /// written output is the caller's responsibility to discard
    #[error("snapshot sink failed: {0}")]
    Sink(#[from] std::io::Error),

    /// The stream ended inside an entry
    #[error("snapshot stream truncated at byte {0}")]
    Truncated(usize),

    /// A length-prefixed field did not decode
    #[error("snapshot entry at byte {offset} is invalid: {source}")]
    Corrupt {
        offset: usize,
        #[source]
        source: DecodeError,
    },
}

// == API Error Enum ==
/// HTTP-facing error type for the catalog cache service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Product id not present in the cache
    #[error("Product not found: {0}")]
    NotFound(u64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Snapshot export failed
    #[error("Snapshot export failed: {0}")]
    Snapshot(#[from] SnapshotError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
