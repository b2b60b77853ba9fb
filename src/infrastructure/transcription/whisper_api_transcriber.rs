use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{
    RawSegment, RawTranscription, RawWord, Transcriber, TranscriptionError,
};

/// Speech recognition over a Whisper-compatible REST API. Sends the audio
/// file as multipart form data and requests segment-level timestamps.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct VerboseResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<VerboseSegment>,
}

#[derive(Deserialize)]
struct VerboseSegment {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    avg_logprob: f64,
    #[serde(default)]
    words: Option<Vec<VerboseWord>>,
}

#[derive(Deserialize)]
struct VerboseWord {
    word: String,
    start: f64,
    end: f64,
    #[serde(default)]
    probability: f64,
}

impl WhisperApiTranscriber {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language_hint: Option<&str>,
    ) -> Result<RawTranscription, TranscriptionError> {
        let audio_data = tokio::fs::read(audio_path)
            .await
            .map_err(|e| TranscriptionError::UnsupportedFormat(format!("read: {}", e)))?;

        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio_data)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .part("file", file_part);
        if let Some(language) = language_hint {
            form = form.text("language", language.to_string());
        }

        tracing::debug!(model = %self.model, "Sending audio to transcription API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: VerboseResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)))?;

        tracing::info!(
            chars = parsed.text.len(),
            segments = parsed.segments.len(),
            "Transcription completed"
        );

        Ok(RawTranscription {
            text: parsed.text,
            language: parsed.language.unwrap_or_else(|| "unknown".to_string()),
            segments: parsed
                .segments
                .into_iter()
                .map(|s| RawSegment {
                    start: s.start,
                    end: s.end,
                    text: s.text,
                    avg_logprob: s.avg_logprob,
                    words: s.words.map(|words| {
                        words
                            .into_iter()
                            .map(|w| RawWord {
                                word: w.word,
                                start: w.start,
                                end: w.end,
                                probability: w.probability,
                            })
                            .collect()
                    }),
                })
                .collect(),
        })
    }
}
