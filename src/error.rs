//! Error types for tune-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error variants (metadata lookup, fetch, tagging, etc.)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for tune-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tune-dl
///
/// Variants carry the raw underlying message where one exists, because the
/// pipeline stores that message verbatim on failed jobs for diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// Metadata lookup against a platform API failed.
    ///
    /// Fatal for catalog-platform jobs. The regional client can surface it
    /// too, but the regional strategy never depends on a lookup succeeding.
    #[error("metadata lookup failed: {0}")]
    MetadataLookup(String),

    /// The external fetch collaborator reported a failure.
    ///
    /// Terminal for a generic fetch; triggers the one-shot search fallback
    /// for a regional fetch.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Tag/remux step failed. Always recovered: the job still completes
    /// with the untagged output file.
    #[error("tag embed failed: {0}")]
    TagEmbed(String),

    /// Cover art download failed. Always recovered: tagging proceeds
    /// without artwork.
    #[error("cover art fetch failed: {0}")]
    ArtFetch(String),

    /// Job (or other resource) not found
    #[error("not found: {0}")]
    NotFound(String),

    /// A job with the same id already exists in the store
    #[error("duplicate job: {0}")]
    Duplicate(String),

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new jobs")]
    ShuttingDown,

    /// External tool execution failed (yt-dlp, ffmpeg)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// API error response format
///
/// Returned by API endpoints when an error occurs, with a machine-readable
/// code, a human-readable message, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "job 7f3a... not found"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - invalid client input
            Error::Config { .. } => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 409 Conflict
            Error::Duplicate(_) => 409,

            // 502 Bad Gateway - upstream platform or fetch collaborator
            Error::MetadataLookup(_) => 502,
            Error::Fetch(_) => 502,
            Error::Network(_) => 502,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,
            Error::ExternalTool(_) => 503,

            // 500 Internal Server Error. TagEmbed/ArtFetch are recovered in
            // the pipeline and should never reach an API response, but the
            // mapping must be total.
            Error::TagEmbed(_) => 500,
            Error::ArtFetch(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::MetadataLookup(_) => "metadata_lookup_failed",
            Error::Fetch(_) => "fetch_failed",
            Error::TagEmbed(_) => "tag_embed_failed",
            Error::ArtFetch(_) => "art_fetch_failed",
            Error::NotFound(_) => "not_found",
            Error::Duplicate(_) => "duplicate",
            Error::ShuttingDown => "shutting_down",
            Error::ExternalTool(_) => "external_tool_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
