// crates/server/src/routes/status.rs
//! Job status polling endpoint.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::jobs::JobStatus;
use crate::state::AppState;

/// Wire representation of a job's observable state.
///
/// `result` stays an explicit `null` while processing — clients poll on it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub result: Option<String>,
}

/// GET /api/status/{job_id} — Current state of a job.
///
/// An identifier that is not a UUID is just as unknown as a UUID that was
/// never issued; both produce the not-found error.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let id = Uuid::parse_str(&job_id).map_err(|_| ApiError::JobNotFound(job_id.clone()))?;
    let job = state
        .jobs
        .get(&id)
        .ok_or_else(|| ApiError::JobNotFound(job_id))?;

    Ok(Json(StatusResponse {
        job_id: job.id.to_string(),
        status: job.status,
        progress: job.progress,
        result: job.result,
    }))
}

/// Build the status router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/status/{job_id}", get(get_status))
}
