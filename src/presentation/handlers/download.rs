use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{JobId, JobStatus, OutputFormat};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serves one rendered output of a finished job as a file attachment with
/// the format's MIME type.
#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path((job_id, format)): Path<(String, String)>,
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

    let format = match OutputFormat::from_str(&format) {
        Ok(f) => f,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Unknown output format: {}", format),
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
            tracing::error!(error = %e, "Failed to fetch job for download");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response();
        }
    };

    if snapshot.status != JobStatus::Success {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Job is not finished: {}", snapshot.status),
            }),
        )
            .into_response();
    }

    let content = snapshot
        .result
        .as_ref()
        .and_then(|r| r.outputs.get(&format).cloned());

    match content {
        Some(body) => {
            let filename = format!("{}.{}", job_id, format.extension());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, format.mime_type().to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                body,
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Format {} was not generated for this job", format.as_str()),
            }),
        )
            .into_response(),
    }
}
