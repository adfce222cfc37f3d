// crates/server/src/jobs/types.rs
//! Types for the video generation job system.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a generation job.
pub type JobId = Uuid;

/// Status of a generation job.
///
/// `Failed` is the terminal state a real render pipeline reports; the
/// built-in simulator never produces it, but modeling it here keeps the wire
/// contract stable when the simulator is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the job can still change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Requested output quality tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    Draft,
    #[default]
    Standard,
    High,
}

impl VideoQuality {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(VideoQuality::Draft),
            "standard" => Some(VideoQuality::Standard),
            "high" => Some(VideoQuality::High),
            _ => None,
        }
    }
}

/// Requested narration voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceType {
    Male,
    Female,
    #[default]
    Neutral,
}

impl VoiceType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Some(VoiceType::Male),
            "female" => Some(VoiceType::Female),
            "neutral" => Some(VoiceType::Neutral),
            _ => None,
        }
    }
}

/// Validated submission parameters retained on the job record.
///
/// Not exposed by the status endpoint; kept for logging and for the real
/// pipeline that will eventually consume them.
#[derive(Debug, Clone)]
pub struct JobParams {
    pub script: String,
    pub language: String,
    pub length_secs: u32,
    pub quality: VideoQuality,
    pub voice_type: VoiceType,
    pub mood: Option<String>,
    /// Path to the stored voice sample, if one was uploaded.
    pub voice_sample: Option<PathBuf>,
}

/// A single generation job record.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub params: JobParams,
    pub status: JobStatus,
    /// Integer percentage in [0, 100], monotonically non-decreasing.
    pub progress: u8,
    /// Result locator, set exactly once on completion.
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a fresh record in its initial state.
    pub fn new(id: JobId, params: JobParams) -> Self {
        let now = Utc::now();
        Self {
            id,
            params,
            status: JobStatus::Processing,
            progress: 0,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }
}
