use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CancelResponse {
    pub id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Requests cooperative cancellation. The job stops at the next stage
/// boundary; a job that is already terminal answers 409.
#[tracing::instrument(skip(state))]
pub async fn cancel_handler(
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

    let id = JobId::from_uuid(uuid);
    match state.job_repository.request_cancel(id).await {
        Ok(true) => (
            StatusCode::ACCEPTED,
            Json(CancelResponse {
                id: job_id,
                message: "Cancellation requested".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => match state.job_repository.get(id).await {
            Ok(Some(_)) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "Job is already finished".to_string(),
                }),
            )
                .into_response(),
            _ => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job not found: {}", job_id),
                }),
            )
                .into_response(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to request cancellation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to cancel job: {}", e),
                }),
            )
                .into_response()
        }
    }
}
