mod exporter;
mod pipeline;
mod progress;
mod transcript;
mod translation_chain;
mod worker;

pub use exporter::{export_format, seconds_to_srt_time, seconds_to_vtt_time, ExportError};
pub use pipeline::{PipelineError, PipelineOptions, PipelineOrchestrator};
pub use progress::{PipelineStage, ProgressComposer, StageBand, LOCAL_STAGE_BANDS, REMOTE_STAGE_BANDS};
pub use transcript::{merge_chunk_results, normalize_raw, shift_segments};
pub use translation_chain::{
    split_into_sentence_chunks, TranslationChain, TranslationChainConfig, TranslationChainError,
};
pub use worker::{JobMessage, MediaWorker};
