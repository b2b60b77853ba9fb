use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::presentation::handlers::{
    cancel_handler, download_handler, health_handler, job_result_handler, job_status_handler,
    languages_handler, remote_handler, upload_handler,
};
use crate::presentation::state::AppState;

// Allowance on top of the configured file limit for multipart boundaries
// and the other form fields.
const MULTIPART_FRAMING_OVERHEAD: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    // Axum caps request bodies at 2 MB by default; without this layer the
    // configured upload limit could never be reached.
    let body_limit = DefaultBodyLimit::max(state.max_file_size_bytes + MULTIPART_FRAMING_OVERHEAD);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/media", post(upload_handler))
        .route("/api/v1/remote", post(remote_handler))
        .route("/api/v1/jobs/{job_id}", get(job_status_handler))
        .route("/api/v1/jobs/{job_id}/result", get(job_result_handler))
        .route(
            "/api/v1/jobs/{job_id}/download/{format}",
            get(download_handler),
        )
        .route("/api/v1/jobs/{job_id}/cancel", post(cancel_handler))
        .route("/api/v1/languages", get(languages_handler))
        .layer(body_limit)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
