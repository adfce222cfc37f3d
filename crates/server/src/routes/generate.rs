// crates/server/src/routes/generate.rs
//! Job submission endpoint.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::jobs::{simulator, JobParams, SimulatorConfig, VideoQuality, VoiceType};
use crate::state::AppState;
use crate::uploads;

/// Language codes the synthesis stack supports.
const SUPPORTED_LANGUAGES: &[&str] = &["en", "es", "fr", "de", "hi", "ja", "pt", "zh"];

const MAX_SCRIPT_CHARS: usize = 20_000;
const MIN_LENGTH_SECS: u32 = 5;
const MAX_LENGTH_SECS: u32 = 600;
const DEFAULT_LENGTH_SECS: u32 = 60;
const MAX_MOOD_CHARS: usize = 64;

/// Response for a successfully queued job.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub job_id: String,
    pub message: String,
}

/// Raw multipart fields as submitted, before validation.
#[derive(Debug, Default)]
struct RawSubmission {
    script: Option<String>,
    language: Option<String>,
    length: Option<String>,
    quality: Option<String>,
    voice_type: Option<String>,
    mood: Option<String>,
    /// Client filename (if any) and content of the uploaded sample.
    voice_file: Option<(Option<String>, Vec<u8>)>,
}

/// Drain the multipart body into a raw submission.
async fn collect_submission(mut multipart: Multipart) -> ApiResult<RawSubmission> {
    let mut raw = RawSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "script" => raw.script = Some(field.text().await?),
            "language" => raw.language = Some(field.text().await?),
            "length" => raw.length = Some(field.text().await?),
            "quality" => raw.quality = Some(field.text().await?),
            "voice_type" => raw.voice_type = Some(field.text().await?),
            "mood" => raw.mood = Some(field.text().await?),
            "voice_file" => {
                let filename = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await?.to_vec();
                raw.voice_file = Some((filename, data));
            }
            other => {
                tracing::debug!(field = %other, "ignoring unknown multipart field");
            }
        }
    }

    Ok(raw)
}

/// Validate the submission into job parameters.
///
/// The uploaded sample is handled separately; `voice_sample` starts out
/// unset here.
fn validate(raw: &RawSubmission) -> Result<JobParams, ApiError> {
    let script = raw
        .script
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("script must not be empty".to_string()))?;
    if script.chars().count() > MAX_SCRIPT_CHARS {
        return Err(ApiError::Validation(format!(
            "script exceeds {MAX_SCRIPT_CHARS} characters"
        )));
    }

    let language = raw
        .language
        .as_deref()
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("language is required".to_string()))?;
    if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
        return Err(ApiError::Validation(format!(
            "unsupported language '{language}', expected one of: {}",
            SUPPORTED_LANGUAGES.join(", ")
        )));
    }

    let length_secs = match raw.length.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_LENGTH_SECS,
        Some(value) => {
            let parsed: u32 = value.parse().map_err(|_| {
                ApiError::Validation(format!("length '{value}' is not a whole number of seconds"))
            })?;
            if !(MIN_LENGTH_SECS..=MAX_LENGTH_SECS).contains(&parsed) {
                return Err(ApiError::Validation(format!(
                    "length must be between {MIN_LENGTH_SECS} and {MAX_LENGTH_SECS} seconds"
                )));
            }
            parsed
        }
    };

    let quality = match raw.quality.as_deref().map(str::trim) {
        None | Some("") => VideoQuality::default(),
        Some(value) => VideoQuality::parse(value).ok_or_else(|| {
            ApiError::Validation(format!(
                "unknown quality '{value}', expected draft, standard, or high"
            ))
        })?,
    };

    let voice_type = match raw.voice_type.as_deref().map(str::trim) {
        None | Some("") => VoiceType::default(),
        Some(value) => VoiceType::parse(value).ok_or_else(|| {
            ApiError::Validation(format!(
                "unknown voice_type '{value}', expected male, female, or neutral"
            ))
        })?,
    };

    let mood = raw
        .mood
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.chars().count() > MAX_MOOD_CHARS {
                Err(ApiError::Validation(format!(
                    "mood exceeds {MAX_MOOD_CHARS} characters"
                )))
            } else {
                Ok(s.to_string())
            }
        })
        .transpose()?;

    Ok(JobParams {
        script: script.to_string(),
        language,
        length_secs,
        quality,
        voice_type,
        mood,
        voice_sample: None,
    })
}

/// POST /api/generate — Queue a new video generation job.
///
/// Validates the submission, stores the optional voice sample, inserts the
/// job record, and spawns its progress simulator. Responds 201 with the job
/// id; the client polls `/api/status/{jobId}` from there.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    let raw = collect_submission(multipart).await?;
    let mut params = validate(&raw)?;

    if let Some((filename, data)) = raw.voice_file {
        let path =
            uploads::save_voice_sample(&state.config.upload_dir, filename.as_deref(), &data)
                .await?;
        params.voice_sample = Some(path);
    }

    let job_id = Uuid::new_v4();
    tracing::info!(
        %job_id,
        language = %params.language,
        length_secs = params.length_secs,
        quality = ?params.quality,
        voice_type = ?params.voice_type,
        script_chars = params.script.chars().count(),
        has_voice_sample = params.voice_sample.is_some(),
        "new video generation request"
    );

    state.jobs.create(job_id, params);
    let handle = simulator::spawn(
        state.jobs.clone(),
        job_id,
        SimulatorConfig {
            tick: state.config.tick,
            result_base_url: state.config.result_base_url.clone(),
        },
    );
    state.simulators.register(handle);

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            job_id: job_id.to_string(),
            message: "Job queued successfully".to_string(),
        }),
    ))
}

/// Build the generate router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/generate", post(generate))
}
