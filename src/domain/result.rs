use std::collections::BTreeMap;

use serde::Serialize;

use super::{OutputFormat, TranscriptionResult, TranslationResult};

/// Timing and outcome of one pipeline stage, recorded for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub stage: String,
    pub success: bool,
    pub duration_secs: f64,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineMetadata {
    pub total_processing_time: f64,
    pub audio_duration: f64,
    pub processing_ratio: f64,
    pub word_count: usize,
    pub segment_count: usize,
    pub character_count: usize,
    pub chunks_processed: usize,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uploader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_duration: Option<f64>,
}

/// Aggregate outcome of one job. Created fresh per job by the orchestrator,
/// owned by the job repository once returned, never mutated afterward.
/// Non-fatal degradations (a failed chunk, a failed export format, a failed
/// translation) land in `errors` while the job still reports success.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub transcription: TranscriptionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationResult>,
    pub outputs: BTreeMap<OutputFormat, String>,
    pub processing_stages: Vec<StageRecord>,
    pub errors: Vec<String>,
    pub metadata: PipelineMetadata,
}
