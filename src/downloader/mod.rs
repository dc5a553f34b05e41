//! Core downloader implementation split into focused submodules.
//!
//! The `MusicDownloader` struct and its methods are organized by domain:
//! - [`dispatcher`] - Job submission and pipeline task spawning
//! - [`events`] - Poll-based per-job event streams

mod dispatcher;
mod events;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::{AudioFetcher, CliFetcher};
use crate::metadata::{CatalogClient, MetadataLookup, RegionalClient};
use crate::pipeline::DownloadPipeline;
use crate::store::JobStore;
use crate::tagger::{CliTagger, Tagger};
use crate::types::{JobId, JobRecord, JobStatus, JobUpdate};

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
///
/// Owns the job store, the pipeline and its collaborators, and the
/// accepting-new flag consulted during shutdown. One instance backs both
/// embedded library use and the REST API.
#[derive(Clone)]
pub struct MusicDownloader {
    /// Job store shared with every pipeline task
    pub(crate) store: JobStore,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// The pipeline run for every submitted job
    pub(crate) pipeline: Arc<DownloadPipeline>,
    /// Regional metadata client for the metadata endpoints
    pub(crate) regional: Arc<dyn MetadataLookup>,
    /// Catalog metadata client for the metadata endpoints
    pub(crate) catalog: Arc<dyn MetadataLookup>,
    /// Cleared during shutdown so new submissions are refused
    pub(crate) accepting_new: Arc<AtomicBool>,
}

impl MusicDownloader {
    /// Create a downloader with CLI collaborators resolved from the config.
    ///
    /// Fails when the configuration is invalid or a required external binary
    /// (yt-dlp, ffmpeg) cannot be found.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tokio::fs::create_dir_all(config.download_dir()).await?;

        let ytdlp = resolve_binary(&config.tools.ytdlp_path, "yt-dlp", config.tools.search_path)
            .ok_or_else(|| Error::Config {
                message: "yt-dlp binary not found".to_string(),
                key: Some("ytdlp_path".to_string()),
            })?;
        let ffmpeg = resolve_binary(&config.tools.ffmpeg_path, "ffmpeg", config.tools.search_path)
            .ok_or_else(|| Error::Config {
                message: "ffmpeg binary not found".to_string(),
                key: Some("ffmpeg_path".to_string()),
            })?;

        let fetcher: Arc<dyn AudioFetcher> = Arc::new(CliFetcher::new(
            ytdlp,
            config.download_dir().clone(),
            config.download.output_template.clone(),
        ));
        let tagger: Arc<dyn Tagger> =
            Arc::new(CliTagger::new(ffmpeg, config.download_dir().clone()));
        let catalog: Arc<dyn MetadataLookup> =
            Arc::new(CatalogClient::new(config.catalog.clone()));
        let regional: Arc<dyn MetadataLookup> =
            Arc::new(RegionalClient::new(config.regional.clone()));

        Ok(Self::with_collaborators(
            config, fetcher, tagger, catalog, regional,
        ))
    }

    /// Create a downloader with explicit collaborators.
    ///
    /// Used by embedders that bring their own fetch or tag implementations,
    /// and by tests.
    pub fn with_collaborators(
        config: Config,
        fetcher: Arc<dyn AudioFetcher>,
        tagger: Arc<dyn Tagger>,
        catalog: Arc<dyn MetadataLookup>,
        regional: Arc<dyn MetadataLookup>,
    ) -> Self {
        let store = JobStore::new();
        let pipeline = Arc::new(DownloadPipeline::new(
            store.clone(),
            fetcher,
            tagger,
            catalog.clone(),
        ));

        Self {
            store,
            config: Arc::new(config),
            pipeline,
            regional,
            catalog,
            accepting_new: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The job store backing this downloader
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch a snapshot of one job record
    pub async fn get_job(&self, id: &JobId) -> Result<JobRecord> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("job {id}")))
    }

    /// Snapshot of all job records, newest first
    pub async fn list_jobs(&self) -> Vec<JobRecord> {
        self.store.list().await
    }

    /// Remove a job record. A pipeline task still running for it keeps
    /// going, but its reports fall into the void.
    pub async fn delete_job(&self, id: &JobId) -> Result<()> {
        if self.store.get(id).await.is_none() {
            return Err(Error::NotFound(format!("job {id}")));
        }
        self.store.delete(id).await;
        Ok(())
    }

    /// Cancel a job that has not started processing yet.
    ///
    /// Only Pending jobs can be cancelled; the pipeline observes the
    /// Cancelled status cooperatively when its task starts. There is no
    /// pre-emptive mid-fetch cancellation.
    pub async fn cancel_job(&self, id: &JobId) -> Result<()> {
        let record = self
            .store
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("job {id}")))?;

        if record.status != JobStatus::Pending {
            return Err(Error::Config {
                message: format!(
                    "job {id} is {}, only pending jobs can be cancelled",
                    record.status
                ),
                key: None,
            });
        }

        self.store
            .update(
                id,
                JobUpdate::new()
                    .status(JobStatus::Cancelled)
                    .status_line("Cancelled"),
            )
            .await;
        Ok(())
    }

    /// Look up catalog metadata for a track URL or bare id
    pub async fn catalog_metadata(&self, identifier: &str) -> Result<crate::types::TrackMetadata> {
        let identifier = canonical_identifier(identifier, "https://open.spotify.com/track/");
        self.catalog.lookup(&identifier).await
    }

    /// Look up regional metadata for a song URL or bare id
    pub async fn regional_metadata(&self, identifier: &str) -> Result<crate::types::TrackMetadata> {
        let identifier = canonical_identifier(identifier, "https://www.jiosaavn.com/song/");
        self.regional.lookup(&identifier).await
    }

    /// Stop accepting new jobs. Running pipeline tasks finish on their own;
    /// their records stay observable until the process exits.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down, refusing new submissions");
        self.accepting_new
            .store(false, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

/// Expand a bare id into a canonical URL; URLs pass through untouched
fn canonical_identifier(identifier: &str, url_prefix: &str) -> String {
    if identifier.starts_with("http") {
        identifier.to_string()
    } else {
        format!("{url_prefix}{identifier}")
    }
}

/// Resolve an external binary from an explicit config path or PATH search
fn resolve_binary(explicit: &Option<PathBuf>, name: &str, search_path: bool) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.clone());
    }
    if search_path {
        return which::which(name).ok();
    }
    None
}
