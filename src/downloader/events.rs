//! Poll-based per-job event streams
//!
//! A subscription polls the job store at the configured interval and yields
//! a snapshot whenever the job's observable state (status, progress, status
//! line) changed since the last emission. The terminal snapshot is always
//! emitted, after which the stream closes. Timestamp-only changes are not
//! events.

use chrono::Utc;
use futures::Stream;
use std::time::Duration;

use crate::store::JobStore;
use crate::types::{JobId, JobSnapshot, JobStatus};

use super::MusicDownloader;

struct PollState {
    store: JobStore,
    job_id: JobId,
    interval: Duration,
    last: Option<(JobStatus, f32, String)>,
    first_poll: bool,
    finished: bool,
}

impl MusicDownloader {
    /// Subscribe to one job's state changes.
    ///
    /// Unknown id: the stream yields exactly one synthetic failed snapshot
    /// ("job not found") and closes. A job deleted mid-stream closes the
    /// stream without a synthetic item.
    pub fn subscribe(&self, job_id: JobId) -> impl Stream<Item = JobSnapshot> + Send + use<> {
        let state = PollState {
            store: self.store.clone(),
            job_id,
            interval: self.config.events.poll_interval(),
            last: None,
            first_poll: true,
            finished: false,
        };

        futures::stream::unfold(state, |mut state| async move {
            if state.finished {
                return None;
            }

            loop {
                let Some(record) = state.store.get(&state.job_id).await else {
                    if state.first_poll {
                        state.finished = true;
                        return Some((not_found_snapshot(&state.job_id), state));
                    }
                    return None;
                };
                state.first_poll = false;

                let key = (
                    record.status,
                    record.progress,
                    record.status_line.clone(),
                );
                if state.last.as_ref() != Some(&key) {
                    state.last = Some(key);
                    if record.status.is_terminal() {
                        state.finished = true;
                    }
                    return Some((record.snapshot(), state));
                }

                tokio::time::sleep(state.interval).await;
            }
        })
    }
}

/// Synthetic snapshot for a subscription to an id the store has never seen
fn not_found_snapshot(job_id: &JobId) -> JobSnapshot {
    JobSnapshot {
        id: job_id.clone(),
        status: JobStatus::Failed,
        progress: 0.0,
        status_line: "Job not found".to_string(),
        error: Some("job not found".to_string()),
        result_path: None,
        updated_at: Utc::now(),
    }
}
