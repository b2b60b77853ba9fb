use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct LanguagesResponse {
    pub languages: BTreeMap<String, String>,
    pub count: usize,
}

/// Union of languages supported by the configured translation providers.
#[tracing::instrument(skip(state))]
pub async fn languages_handler(State(state): State<AppState>) -> impl IntoResponse {
    let languages = state.translator.supported_languages().await;
    let count = languages.len();
    (StatusCode::OK, Json(LanguagesResponse { languages, count }))
}
