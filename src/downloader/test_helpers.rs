//! Shared mock collaborators for downloader tests

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::{AudioFetcher, ProgressSender};
use crate::metadata::MetadataLookup;
use crate::tagger::Tagger;
use crate::types::{FetchResult, JobId, Quality, TrackMetadata};

use super::MusicDownloader;

/// Fetcher that instantly succeeds with a fixed output path
pub(crate) struct InstantFetcher;

#[async_trait]
impl AudioFetcher for InstantFetcher {
    async fn fetch(
        &self,
        _input: &str,
        _quality: Quality,
        _progress: ProgressSender,
    ) -> Result<FetchResult> {
        Ok(FetchResult {
            output_path: PathBuf::from("/downloads/Song.m4a"),
        })
    }
}

/// Fetcher that always fails
pub(crate) struct FailingFetcher;

#[async_trait]
impl AudioFetcher for FailingFetcher {
    async fn fetch(
        &self,
        _input: &str,
        _quality: Quality,
        _progress: ProgressSender,
    ) -> Result<FetchResult> {
        Err(Error::Fetch("extraction failed".to_string()))
    }
}

/// Tagger that accepts everything unchanged
pub(crate) struct NoOpTagger;

#[async_trait]
impl Tagger for NoOpTagger {
    async fn embed(&self, audio_file: &Path, _metadata: &TrackMetadata) -> Result<PathBuf> {
        Ok(audio_file.to_path_buf())
    }
}

/// Lookup that always fails
pub(crate) struct NoLookup;

#[async_trait]
impl MetadataLookup for NoLookup {
    async fn lookup(&self, _identifier: &str) -> Result<TrackMetadata> {
        Err(Error::MetadataLookup("track not found".to_string()))
    }
}

/// Config with a fast poll interval so event-stream tests finish quickly
pub(crate) fn fast_config() -> Config {
    let mut config = Config::default();
    config.events.poll_interval_ms = 10;
    config
}

/// Downloader over instantly-succeeding mocks
pub(crate) fn downloader_with_mocks() -> MusicDownloader {
    MusicDownloader::with_collaborators(
        fast_config(),
        Arc::new(InstantFetcher),
        Arc::new(NoOpTagger),
        Arc::new(NoLookup),
        Arc::new(NoLookup),
    )
}

/// Downloader whose every fetch fails
pub(crate) fn downloader_with_failing_fetch() -> MusicDownloader {
    MusicDownloader::with_collaborators(
        fast_config(),
        Arc::new(FailingFetcher),
        Arc::new(NoOpTagger),
        Arc::new(NoLookup),
        Arc::new(NoLookup),
    )
}

/// Poll until the job reaches a terminal status, panicking after ~1s
pub(crate) async fn wait_for_terminal(dl: &MusicDownloader, id: &JobId) {
    for _ in 0..100 {
        if let Ok(record) = dl.get_job(id).await {
            if record.status.is_terminal() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} never reached a terminal state");
}
