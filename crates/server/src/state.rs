// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::jobs::{JobStore, SimulatorRegistry};

/// Shared application state accessible from all route handlers.
///
/// Owns the job store and the simulator handles; nothing in the process is
/// ambient global state, so tests can run isolated instances side by side.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Runtime configuration (port, upload dir, simulator cadence).
    pub config: Config,
    /// Authoritative store of job records.
    pub jobs: Arc<JobStore>,
    /// Retained handles for the per-job simulator tasks.
    pub simulators: SimulatorRegistry,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            config,
            jobs: Arc::new(JobStore::new()),
            simulators: SimulatorRegistry::new(),
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
