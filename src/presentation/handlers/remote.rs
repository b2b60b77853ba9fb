use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::services::JobMessage;
use crate::domain::{CancelFlag, MediaInput, MediaJob, OutputFormat};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct RemoteRequest {
    pub url: String,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub enhance_audio: bool,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Accepts a remote video reference. Validation of the reference itself is
/// deferred to the worker; a malformed URL fails the job rather than the
/// submission.
#[tracing::instrument(skip(state, request))]
pub async fn remote_handler(
    State(state): State<AppState>,
    Json(request): Json<RemoteRequest>,
) -> impl IntoResponse {
    if request.url.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No URL provided".to_string(),
            }),
        )
            .into_response();
    }

    let mut formats = Vec::with_capacity(request.formats.len());
    for raw in &request.formats {
        match OutputFormat::from_str(raw) {
            Ok(format) => formats.push(format),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Unknown output format: {}", raw),
                    }),
                )
                    .into_response();
            }
        }
    }

    let target_language = request
        .target_language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    let job = MediaJob::new(
        MediaInput::Remote(request.url.trim().to_string()),
        target_language,
        formats,
        request.enhance_audio,
    );
    let job_id = job.id;
    let cancel = CancelFlag::new();

    if let Err(e) = state.job_repository.create(&job, cancel.clone()).await {
        tracing::error!(error = %e, "Failed to create job record");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to create job: {}", e),
            }),
        )
            .into_response();
    }

    if let Err(e) = state.job_sender.send(JobMessage { job, cancel }).await {
        tracing::error!(error = %e, "Failed to enqueue job");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Processing queue full or worker unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(job_id = %job_id, "Remote media job enqueued");

    (
        StatusCode::ACCEPTED,
        Json(SubmissionResponse {
            job_id: job_id.to_string(),
            status: "PENDING".to_string(),
            message: "Remote media processing started".to_string(),
        }),
    )
        .into_response()
}
