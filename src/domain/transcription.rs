use serde::Serialize;

/// Word-level timing, passed through from the transcription model when it
/// provides one.
#[derive(Debug, Clone, Serialize)]
pub struct WordTiming {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub confidence: f64,
}

/// One timestamped transcript segment. `id`s are dense and ordered after
/// stitching; `start <= end`.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionSegment {
    pub id: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordTiming>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscriptionMetadata {
    pub audio_duration: f64,
    pub processing_time: f64,
    pub word_count: usize,
    pub character_count: usize,
    pub segment_count: usize,
    pub chunk_count: usize,
}

/// The stitched transcription for one job. `text` is the space-joined
/// non-empty chunk texts in chunk order; `segments` are sorted by `start`
/// after per-chunk offset adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub language: String,
    pub segments: Vec<TranscriptionSegment>,
    pub metadata: TranscriptionMetadata,
}

impl TranscriptionResult {
    pub fn empty(language: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            language: language.into(),
            segments: Vec::new(),
            metadata: TranscriptionMetadata::default(),
        }
    }
}
