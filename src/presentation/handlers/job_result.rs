use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{JobId, JobStatus};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct PendingResponse {
    pub id: String,
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Full pipeline result for a finished job. In-flight jobs answer 202 with
/// the current status instead of blocking.
#[tracing::instrument(skip(state))]
pub async fn job_result_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    let snapshot = match state.job_repository.get(JobId::from_uuid(uuid)).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job not found: {}", job_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job result");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response();
        }
    };

    match snapshot.status {
        JobStatus::Success => match snapshot.result {
            Some(result) => (StatusCode::OK, Json((*result).clone())).into_response(),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Job succeeded but has no result".to_string(),
                }),
            )
                .into_response(),
        },
        JobStatus::Failure => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: snapshot
                    .error
                    .unwrap_or_else(|| "processing failed".to_string()),
            }),
        )
            .into_response(),
        status => (
            StatusCode::ACCEPTED,
            Json(PendingResponse {
                id: job_id,
                status: status.as_str().to_string(),
                message: "Job is still processing".to_string(),
            }),
        )
            .into_response(),
    }
}
