//! In-memory job store
//!
//! [`JobStore`] is the only shared mutable state in the library: a map of
//! job id to [`JobRecord`] behind a tokio `RwLock`. Every operation takes the
//! lock for a short critical section and returns cloned snapshots, so no
//! caller ever holds a reference into the map.
//!
//! Records are not persisted. A restart forgets all jobs.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::{JobId, JobRecord, JobUpdate};

/// Concurrent-safe store of job records
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
}

impl JobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record.
    ///
    /// Fails with [`Error::Duplicate`] if a record with the same id already
    /// exists; the existing record is left untouched.
    pub async fn create(&self, record: JobRecord) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&record.id) {
            return Err(Error::Duplicate(record.id.to_string()));
        }
        jobs.insert(record.id.clone(), record);
        Ok(())
    }

    /// Apply a partial update to a record.
    ///
    /// Silent no-op when the id is unknown (the job may have been deleted
    /// while its pipeline was still reporting). `updated_at` is refreshed on
    /// every applied update.
    ///
    /// Terminal records only accept the fields that make them terminal:
    /// once a record is Completed, Failed or Cancelled, later progress or
    /// status-line reports from a straggling task are ignored.
    pub async fn update(&self, id: &JobId, update: JobUpdate) {
        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.get_mut(id) else {
            return;
        };

        if record.status.is_terminal() {
            tracing::debug!(job_id = %id, "ignoring update to terminal job");
            return;
        }

        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(progress) = update.progress {
            record.progress = progress.clamp(0.0, 1.0);
        }
        if let Some(status_line) = update.status_line {
            record.status_line = status_line;
        }
        if let Some(error) = update.error {
            record.error = Some(error);
        }
        if let Some(result_path) = update.result_path {
            record.result_path = Some(result_path);
        }
        if let Some(metadata) = update.metadata {
            record.metadata = Some(metadata);
        }
        record.updated_at = Utc::now();
    }

    /// Fetch a cloned snapshot of a record
    pub async fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Remove a record. Idempotent: removing an unknown id succeeds.
    pub async fn delete(&self, id: &JobId) {
        self.jobs.write().await.remove(id);
    }

    /// Cloned snapshot of all records, newest first
    pub async fn list(&self) -> Vec<JobRecord> {
        let jobs = self.jobs.read().await;
        let mut records: Vec<JobRecord> = jobs.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

/// Cheap handle a pipeline task uses to publish progress for one job
///
/// Wraps the store and a job id so deep call stacks (fetch callbacks in
/// particular) can report without threading both around. Reports to a
/// terminal or deleted job are silently dropped by the store.
#[derive(Clone)]
pub struct ProgressReporter {
    store: JobStore,
    job_id: JobId,
}

impl ProgressReporter {
    /// Create a reporter bound to one job
    pub fn new(store: JobStore, job_id: JobId) -> Self {
        Self { store, job_id }
    }

    /// The job this reporter publishes for
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Publish a progress value and status line in one store update
    pub async fn report(&self, progress: f32, status_line: impl Into<String>) {
        self.store
            .update(
                &self.job_id,
                JobUpdate::new().progress(progress).status_line(status_line),
            )
            .await;
    }

    /// Publish a progress value without changing the status line
    pub async fn report_progress(&self, progress: f32) {
        self.store
            .update(&self.job_id, JobUpdate::new().progress(progress))
            .await;
    }
}
