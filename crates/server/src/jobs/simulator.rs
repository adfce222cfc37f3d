// crates/server/src/jobs/simulator.rs
//! Per-job render simulator.
//!
//! Stands in for the real media pipeline: advances a job's recorded progress
//! on a fixed cadence with random increments until it completes. Replacing
//! this module with a real renderer is the intended evolution path; the rest
//! of the system only observes the job store.

use rand::Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::store::JobStore;
use super::types::JobId;

/// Smallest per-tick progress increment. Guarantees completion within
/// ceil(100 / MIN_STEP) = 10 ticks.
const MIN_STEP: u8 = 10;
/// Largest per-tick progress increment.
const MAX_STEP: u8 = 29;

/// Cadence and output settings for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Time between progress writes. Production default is 3s; tests shrink
    /// it so a full lifecycle runs in milliseconds.
    pub tick: Duration,
    /// Base URL the result locator is derived from.
    pub result_base_url: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(3),
            result_base_url: "https://cdn.visora.ai/videos".to_string(),
        }
    }
}

/// Handle to a running simulator task.
///
/// Retained by the [`SimulatorRegistry`] so background work stays observable
/// and abortable instead of fire-and-forget.
pub struct SimulatorHandle {
    pub job_id: JobId,
    task: JoinHandle<()>,
}

impl SimulatorHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the simulator to stop (completion or cancellation).
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// Derive the deterministic result locator for a completed job.
fn result_url(base: &str, id: &JobId) -> String {
    format!("{}/{}.mp4", base.trim_end_matches('/'), id)
}

/// Spawn the progress simulator for one job.
///
/// Every tick the task looks up its job, adds a uniform random increment in
/// [MIN_STEP, MAX_STEP], and writes the new value back. Reaching 100 clamps,
/// records the result locator, and stops the task; a vanished record stops
/// it as well (treated as cancellation). The first write lands one full tick
/// after creation.
pub fn spawn(store: Arc<JobStore>, job_id: JobId, config: SimulatorConfig) -> SimulatorHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.tick);
        // The first interval tick completes immediately; consume it so the
        // initial progress=0 state stays observable for a full period.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(job) = store.get(&job_id) else {
                tracing::debug!(%job_id, "job record gone, stopping simulator");
                break;
            };

            let step = rand::thread_rng().gen_range(MIN_STEP..=MAX_STEP);
            let next = job.progress.saturating_add(step);

            if next >= 100 {
                let result = result_url(&config.result_base_url, &job_id);
                store.complete(&job_id, result);
                tracing::info!(%job_id, "job completed");
                break;
            }

            store.set_progress(&job_id, next);
            tracing::debug!(%job_id, progress = next, "job progress");
        }
    });

    SimulatorHandle { job_id, task }
}

/// Registry of live simulator handles.
///
/// Finished handles are pruned on registration; `abort_all` is the shutdown
/// hook.
#[derive(Default)]
pub struct SimulatorRegistry {
    handles: Mutex<Vec<SimulatorHandle>>,
}

impl SimulatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: SimulatorHandle) {
        match self.handles.lock() {
            Ok(mut handles) => {
                handles.retain(|h| !h.is_finished());
                handles.push(handle);
            }
            Err(e) => tracing::error!("Mutex poisoned registering simulator: {e}"),
        }
    }

    /// Number of simulators still running.
    pub fn active(&self) -> usize {
        match self.handles.lock() {
            Ok(handles) => handles.iter().filter(|h| !h.is_finished()).count(),
            Err(e) => {
                tracing::error!("Mutex poisoned reading simulators: {e}");
                0
            }
        }
    }

    /// Abort every tracked simulator. Used at process shutdown.
    pub fn abort_all(&self) {
        match self.handles.lock() {
            Ok(handles) => {
                for handle in handles.iter() {
                    handle.abort();
                }
            }
            Err(e) => tracing::error!("Mutex poisoned aborting simulators: {e}"),
        }
    }
}
