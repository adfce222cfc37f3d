// crates/server/src/config.rs
//! Process configuration, read from the environment with defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Default port for the server.
const DEFAULT_PORT: u16 = 5000;

/// Default scratch directory for uploaded voice samples.
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default base URL result locators are derived from.
const DEFAULT_RESULT_BASE_URL: &str = "https://cdn.visora.ai/videos";

/// Upload cap for multipart bodies (voice samples are short clips).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Runtime configuration.
///
/// Built once in `main` from the environment and injected everywhere through
/// the application state; tests construct it directly with whatever ports,
/// directories, and cadences they need.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Where uploaded voice samples are persisted.
    pub upload_dir: PathBuf,
    /// Base URL for completed-job result locators.
    pub result_base_url: String,
    /// Period between simulator progress writes.
    pub tick: Duration,
    /// Maximum accepted multipart body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            result_base_url: DEFAULT_RESULT_BASE_URL.to_string(),
            tick: Duration::from_secs(3),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Read configuration from environment variables, falling back to
    /// defaults. `VISORA_PORT` wins over the conventional `PORT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("VISORA_PORT")
                .ok()
                .or_else(|| std::env::var("PORT").ok())
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            upload_dir: std::env::var("VISORA_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            result_base_url: std::env::var("VISORA_RESULT_BASE_URL")
                .unwrap_or(defaults.result_base_url),
            tick: defaults.tick,
            max_upload_bytes: defaults.max_upload_bytes,
        }
    }
}
