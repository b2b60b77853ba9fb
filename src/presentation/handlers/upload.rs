use std::str::FromStr;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::JobMessage;
use crate::domain::{CancelFlag, MediaInput, MediaJob, OutputFormat};
use crate::presentation::state::AppState;

const ALLOWED_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "m4a", "aac", "ogg", "wma", "mp4", "avi", "mov", "mkv", "webm", "flv",
];

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

/// Accepts a media file plus optional processing options as multipart form
/// data, stages the file, and enqueues the job.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut target_language: Option<String> = None;
    let mut formats: Vec<OutputFormat> = Vec::new();
    let mut enhance_audio = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                match field.bytes().await {
                    Ok(data) => file = Some((filename, data.to_vec())),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read file bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read file: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            "target_language" => {
                if let Ok(value) = field.text().await {
                    let trimmed = value.trim().to_string();
                    if !trimmed.is_empty() {
                        target_language = Some(trimmed);
                    }
                }
            }
            "formats" => {
                let value = field.text().await.unwrap_or_default();
                for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
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
            }
            "enhance_audio" => {
                enhance_audio = field
                    .text()
                    .await
                    .map(|v| v.trim().eq_ignore_ascii_case("true"))
                    .unwrap_or(false);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let Some((filename, data)) = file else {
        tracing::warn!("Upload request with no file");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No file uploaded".to_string(),
            }),
        )
            .into_response();
    };

    if data.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Uploaded file is empty".to_string(),
            }),
        )
            .into_response();
    }

    if data.len() > state.max_file_size_bytes {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse {
                error: format!(
                    "File exceeds the {} MB limit",
                    state.max_file_size_bytes / (1024 * 1024)
                ),
            }),
        )
            .into_response();
    }

    let extension = std::path::Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unsupported file type: {:?}", filename),
            }),
        )
            .into_response();
    }

    let staged = state
        .staging_dir
        .join(format!("{}.{}", Uuid::new_v4(), extension));
    if let Err(e) = tokio::fs::write(&staged, &data).await {
        tracing::error!(error = %e, "Failed to stage upload");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store upload: {}", e),
            }),
        )
            .into_response();
    }

    let job = MediaJob::new(
        MediaInput::LocalFile(staged),
        target_language,
        formats,
        enhance_audio,
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

    tracing::info!(job_id = %job_id, filename = %filename, bytes = data.len(), "Media job enqueued");

    (
        StatusCode::ACCEPTED,
        Json(SubmissionResponse {
            job_id: job_id.to_string(),
            status: "PENDING".to_string(),
            message: "Media processing started".to_string(),
        }),
    )
        .into_response()
}
