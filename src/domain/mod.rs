mod audio;
mod job;
mod job_status;
mod language;
mod output_format;
mod progress;
mod result;
mod transcription;
mod translation;

pub use audio::{plan_chunks, AudioChunk, ChunkSpan};
pub use job::{CancelFlag, JobId, MediaInput, MediaJob};
pub use job_status::JobStatus;
pub use language::normalize_language_code;
pub use output_format::OutputFormat;
pub use progress::ProgressUpdate;
pub use result::{PipelineMetadata, PipelineResult, StageRecord};
pub use transcription::{
    TranscriptionMetadata, TranscriptionResult, TranscriptionSegment, WordTiming,
};
pub use translation::TranslationResult;
