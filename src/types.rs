//! Core types for tune-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

/// Unique identifier for a download job
///
/// Opaque string id (uuid-v4 under the hood). Compared as an exact string,
/// never parsed by consumers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a fresh random job id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle status
///
/// Transitions are forward-only: Pending -> Processing -> Completed | Failed,
/// plus Pending -> Cancelled. Completed, Failed and Cancelled are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, pipeline task not yet running
    Pending,
    /// Pipeline running (detection, fetch, tagging)
    Processing,
    /// Finished successfully, result_path is set
    Completed,
    /// Finished with an error, error is set
    Failed,
    /// Cancelled before the pipeline started
    Cancelled,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Source platform of a download request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Catalog-only platform (Spotify-style): metadata available, audio is not
    Catalog,
    /// Regional streaming platform (JioSaavn-style): directly fetchable
    Regional,
    /// Everything else, fetched via YouTube or a plain search
    Generic,
}

impl Platform {
    /// Detect the platform for an input string.
    ///
    /// Pure and total: any input maps to exactly one platform. Matching is
    /// by case-insensitive substring, so bare ids and malformed URLs still
    /// classify (as Generic).
    pub fn detect(input: &str) -> Self {
        let lower = input.to_lowercase();
        if lower.contains("spotify.com") {
            Platform::Catalog
        } else if lower.contains("jiosaavn.com") || lower.contains("saavn") {
            Platform::Regional
        } else {
            Platform::Generic
        }
    }

    /// Human-readable platform name used in job status lines
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Catalog => "Spotify",
            Platform::Regional => "JioSaavn",
            Platform::Generic => "YouTube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Audio quality preset requested by the caller
///
/// The wire names are a closed set: `m4a_320`, `opus_160`, `best`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Quality {
    /// m4a container at 320 kbps
    #[default]
    #[serde(rename = "m4a_320")]
    M4a320,
    /// opus at 160 kbps
    #[serde(rename = "opus_160")]
    Opus160,
    /// best available source format, no conversion
    #[serde(rename = "best")]
    Best,
}

impl Quality {
    /// Resolve this quality to its concrete preset
    pub fn preset(&self) -> QualityPreset {
        match self {
            Quality::M4a320 => QualityPreset {
                name: "m4a_320",
                codec: Some("m4a"),
                bitrate: Some("320"),
            },
            Quality::Opus160 => QualityPreset {
                name: "opus_160",
                codec: Some("opus"),
                bitrate: Some("160"),
            },
            Quality::Best => QualityPreset {
                name: "best",
                codec: None,
                bitrate: None,
            },
        }
    }
}

/// Concrete encoding parameters for a [`Quality`] value
///
/// `codec`/`bitrate` of `None` means the source format is kept as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityPreset {
    /// Preset name
    pub name: &'static str,
    /// Target audio codec passed to the fetch tool
    pub codec: Option<&'static str>,
    /// Target bitrate in kbps passed to the fetch tool
    pub bitrate: Option<&'static str>,
}

/// Track metadata used for search queries and tag embedding
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrackMetadata {
    /// Track title
    pub title: String,
    /// Performing artists
    #[serde(default)]
    pub artists: Vec<String>,
    /// Album name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Release year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Cover art URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Track duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
}

impl TrackMetadata {
    /// Search query in the form "{title} {artist1} {artist2} ..."
    pub fn search_query(&self) -> String {
        let mut query = self.title.clone();
        for artist in &self.artists {
            query.push(' ');
            query.push_str(artist);
        }
        query
    }
}

/// Full state of a download job as held by the store
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JobRecord {
    /// Unique job id, immutable after creation
    pub id: JobId,
    /// The URL or free-text query the job was submitted with, immutable
    pub source_url: String,
    /// Requested quality preset, immutable
    pub quality: Quality,
    /// Track metadata, supplied by the caller or resolved by the pipeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TrackMetadata>,
    /// Current lifecycle status
    pub status: JobStatus,
    /// Fractional progress in [0.0, 1.0]
    pub progress: f32,
    /// Free-text description of the current pipeline step
    pub status_line: String,
    /// Failure message, set only when status is Failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Path of the finished audio file, set only when status is Completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_path: Option<PathBuf>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent mutation
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a fresh Pending record for a new submission
    pub fn new(
        id: JobId,
        source_url: impl Into<String>,
        quality: Quality,
        metadata: Option<TrackMetadata>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            source_url: source_url.into(),
            quality,
            metadata,
            status: JobStatus::Pending,
            progress: 0.0,
            status_line: "Queued".to_string(),
            error: None,
            result_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Observer-facing snapshot of this record
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id.clone(),
            status: self.status,
            progress: self.progress,
            status_line: self.status_line.clone(),
            error: self.error.clone(),
            result_path: self.result_path.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Point-in-time view of a job emitted to observers (API responses, SSE)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobSnapshot {
    /// Job id
    pub id: JobId,
    /// Lifecycle status at snapshot time
    pub status: JobStatus,
    /// Progress at snapshot time
    pub progress: f32,
    /// Status line at snapshot time
    pub status_line: String,
    /// Failure message, present only for failed jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Result path, present only for completed jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_path: Option<PathBuf>,
    /// When the underlying record last changed
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to a job record
///
/// Every field is optional; `None` means "leave unchanged". Built with the
/// setter methods so call sites read as a sentence.
#[derive(Clone, Debug, Default)]
pub struct JobUpdate {
    /// New status
    pub status: Option<JobStatus>,
    /// New progress value
    pub progress: Option<f32>,
    /// New status line
    pub status_line: Option<String>,
    /// Failure message to record
    pub error: Option<String>,
    /// Result path to record
    pub result_path: Option<PathBuf>,
    /// Metadata resolved by the pipeline
    pub metadata: Option<TrackMetadata>,
}

impl JobUpdate {
    /// Empty update (no-op until fields are set)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status
    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the progress, clamped to [0.0, 1.0]
    pub fn progress(mut self, progress: f32) -> Self {
        self.progress = Some(progress.clamp(0.0, 1.0));
        self
    }

    /// Set the status line
    pub fn status_line(mut self, line: impl Into<String>) -> Self {
        self.status_line = Some(line.into());
        self
    }

    /// Set the failure message
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Set the result path
    pub fn result_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    /// Set the resolved metadata
    pub fn metadata(mut self, metadata: TrackMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Outcome of a raw fetch reported by the audio fetch collaborator
#[derive(Clone, Debug, PartialEq)]
pub struct FetchResult {
    /// Path of the downloaded audio file
    pub output_path: PathBuf,
}
