use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::AudioChunk;

/// A waveform brought into the fixed format the transcription model expects.
#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    pub path: PathBuf,
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// False when the input was already in the target format and was
    /// returned untouched.
    pub was_converted: bool,
}

#[async_trait]
pub trait AudioNormalizer: Send + Sync {
    /// Convert arbitrary audio/video input into a mono waveform file at the
    /// target sample rate. Idempotent: an already-normalized file is a no-op.
    async fn normalize(&self, input: &Path) -> Result<NormalizedAudio, MediaError>;

    /// Best-effort enhancement (normalization, noise gate). The pipeline
    /// continues with the original audio when this fails.
    async fn enhance(&self, input: &Path) -> Result<PathBuf, MediaError>;

    /// Split a normalized waveform into time-bounded chunks, each
    /// materialized as an independent file with its own start/end offsets.
    async fn split_chunks(
        &self,
        audio: &NormalizedAudio,
        chunk_duration: f64,
    ) -> Result<Vec<AudioChunk>, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media file unreadable: {0}")]
    Unreadable(String),
    #[error("no audio stream found: {0}")]
    NoAudioStream(String),
    #[error("audio decoding failed: {0}")]
    DecodeFailed(String),
    #[error("audio encoding failed: {0}")]
    EncodeFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
