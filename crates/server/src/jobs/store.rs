// crates/server/src/jobs/store.rs
//! In-memory store of job records, the single source of truth for status
//! queries.

use std::collections::HashMap;
use std::sync::RwLock;

use super::types::{Job, JobId, JobParams, JobStatus};

/// Concurrency-safe map of job records.
///
/// Owned by the application state and injected into handlers and simulator
/// tasks. Reads return owned snapshots so no reference escapes the lock and
/// nothing is held across an await point. A given job has exactly one writer
/// after creation (its simulator), so per-key read-modify-write sequences
/// are totally ordered.
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new record in its initial state.
    ///
    /// Identifiers are random UUIDs; a duplicate insert is not defended
    /// against beyond a log line.
    pub fn create(&self, id: JobId, params: JobParams) {
        match self.jobs.write() {
            Ok(mut jobs) => {
                if jobs.insert(id, Job::new(id, params)).is_some() {
                    tracing::error!(job_id = %id, "duplicate job id, record replaced");
                }
            }
            Err(e) => tracing::error!("RwLock poisoned writing jobs map: {e}"),
        }
    }

    /// Read-only lookup returning an owned snapshot.
    pub fn get(&self, id: &JobId) -> Option<Job> {
        match self.jobs.read() {
            Ok(jobs) => jobs.get(id).cloned(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading jobs map: {e}");
                None
            }
        }
    }

    /// Apply a mutation to a record under the write lock.
    ///
    /// Returns false (the write is silently dropped) if the job no longer
    /// exists; the simulator treats that as cancellation.
    pub fn update(&self, id: &JobId, mutate: impl FnOnce(&mut Job)) -> bool {
        match self.jobs.write() {
            Ok(mut jobs) => match jobs.get_mut(id) {
                Some(job) => {
                    mutate(job);
                    job.updated_at = chrono::Utc::now();
                    true
                }
                None => false,
            },
            Err(e) => {
                tracing::error!("RwLock poisoned writing jobs map: {e}");
                false
            }
        }
    }

    /// Record a new progress value for a running job.
    pub fn set_progress(&self, id: &JobId, progress: u8) -> bool {
        self.update(id, |job| job.progress = progress)
    }

    /// Mark a job completed with its final result locator.
    pub fn complete(&self, id: &JobId, result: String) -> bool {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.progress = 100;
            job.result = Some(result);
        })
    }

    /// Number of jobs not yet in a terminal state.
    pub fn active_count(&self) -> usize {
        match self.jobs.read() {
            Ok(jobs) => jobs.values().filter(|j| !j.status.is_terminal()).count(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading jobs map: {e}");
                0
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.jobs.read() {
            Ok(jobs) => jobs.len(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading jobs map: {e}");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop a record. There is no deletion in the served API; this exists so
    /// tests can exercise the simulator's vanished-record path.
    #[cfg(test)]
    pub fn remove(&self, id: &JobId) -> Option<Job> {
        self.jobs.write().ok().and_then(|mut jobs| jobs.remove(id))
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
