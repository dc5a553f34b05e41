//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`jobs`] — Job submission, inspection, cancellation, event streams
//! - [`metadata`] — Platform metadata lookups
//! - [`system`] — Health, OpenAPI, shutdown

use serde::{Deserialize, Serialize};

mod jobs;
mod metadata;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use jobs::*;
pub use metadata::*;
pub use system::*;

use crate::types::{JobId, Quality, TrackMetadata};

/// Request body for POST /jobs
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitJobRequest {
    /// URL or free-text query to download
    pub url: String,
    /// Quality preset (default: m4a 320k)
    #[serde(default)]
    pub quality: Quality,
    /// Optional caller-supplied metadata, used for searching and tagging
    #[serde(default)]
    pub metadata: Option<TrackMetadata>,
}

/// Response body for POST /jobs
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitJobResponse {
    /// Identifier of the created job
    pub job_id: JobId,
    /// Always "started"
    pub status: String,
}
