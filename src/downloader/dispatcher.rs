//! Job submission and pipeline task spawning

use std::sync::atomic::Ordering;

use crate::error::{Error, Result};
use crate::types::{JobId, JobRecord, JobStatus, JobUpdate, Quality, TrackMetadata};

use super::MusicDownloader;

impl MusicDownloader {
    /// Submit a new download job.
    ///
    /// Creates a Pending record, spawns the pipeline task, and returns the
    /// job id immediately. Progress is observed through the store or an
    /// event stream.
    ///
    /// Refuses submissions during shutdown with [`Error::ShuttingDown`].
    pub async fn submit(
        &self,
        source_url: String,
        quality: Quality,
        metadata: Option<TrackMetadata>,
    ) -> Result<JobId> {
        if !self.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let id = JobId::generate();
        let record = JobRecord::new(id.clone(), source_url, quality, metadata);
        self.store.create(record).await?;

        tracing::info!(job_id = %id, "job submitted");

        // Last line of defense: any error escaping the pipeline run is
        // recorded as a job failure so every job reaches a terminal state.
        let pipeline = self.pipeline.clone();
        let store = self.store.clone();
        let job_id = id.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline.run(job_id.clone()).await {
                tracing::error!(job_id = %job_id, error = %e, "download job failed");
                store
                    .update(
                        &job_id,
                        JobUpdate::new()
                            .status(JobStatus::Failed)
                            .error(e.to_string())
                            .status_line(format!("Error: {e}")),
                    )
                    .await;
            }
        });

        Ok(id)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::super::test_helpers::{
        downloader_with_failing_fetch, downloader_with_mocks, wait_for_terminal,
    };
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_submit_returns_immediately_with_pending_or_running_job() {
        let dl = downloader_with_mocks();
        let id = dl
            .submit("https://youtu.be/x".to_string(), Quality::Best, None)
            .await
            .unwrap();

        // the record exists as soon as submit returns
        let record = dl.get_job(&id).await.unwrap();
        assert_eq!(record.source_url, "https://youtu.be/x");
        assert_eq!(record.quality, Quality::Best);
    }

    #[tokio::test]
    async fn test_submitted_job_runs_to_completion() {
        let dl = downloader_with_mocks();
        let id = dl
            .submit("https://youtu.be/x".to_string(), Quality::Best, None)
            .await
            .unwrap();

        wait_for_terminal(&dl, &id).await;

        let record = dl.get_job(&id).await.unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.progress, 1.0);
        assert_eq!(record.result_path, Some(PathBuf::from("/downloads/Song.m4a")));
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn test_escaped_pipeline_error_marks_job_failed() {
        let dl = downloader_with_failing_fetch();
        let id = dl
            .submit("https://youtu.be/x".to_string(), Quality::Best, None)
            .await
            .unwrap();

        wait_for_terminal(&dl, &id).await;

        let record = dl.get_job(&id).await.unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        let error = record.error.unwrap();
        assert!(error.contains("extraction failed"), "raw message kept: {error}");
        assert!(record.status_line.starts_with("Error:"));
        assert!(record.result_path.is_none());
    }

    #[tokio::test]
    async fn test_submit_generates_unique_ids() {
        let dl = downloader_with_mocks();
        let a = dl
            .submit("https://youtu.be/a".to_string(), Quality::Best, None)
            .await
            .unwrap();
        let b = dl
            .submit("https://youtu.be/b".to_string(), Quality::Best, None)
            .await
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(dl.list_jobs().await.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_refused_during_shutdown() {
        let dl = downloader_with_mocks();
        dl.shutdown().await.unwrap();

        let err = dl
            .submit("https://youtu.be/x".to_string(), Quality::Best, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ShuttingDown));
    }
}
