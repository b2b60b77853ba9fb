use std::path::Path;

use async_trait::async_trait;

/// Raw model output for one audio file, before normalization into domain
/// types. Timestamps are relative to the start of the transcribed file.
#[derive(Debug, Clone)]
pub struct RawTranscription {
    pub text: String,
    pub language: String,
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Clone)]
pub struct RawSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub avg_logprob: f64,
    pub words: Option<Vec<RawWord>>,
}

#[derive(Debug, Clone)]
pub struct RawWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub probability: f64,
}

/// Thin adapter around the opaque speech-recognition model. No retries here;
/// retry and partial-failure policy belongs to the orchestrator.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language_hint: Option<&str>,
    ) -> Result<RawTranscription, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
