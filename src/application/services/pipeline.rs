use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{
    AcquisitionError, AudioNormalizer, MediaError, Transcriber,
};
use crate::application::services::exporter::export_format;
use crate::application::services::progress::{PipelineStage, ProgressComposer};
use crate::application::services::transcript::{
    merge_chunk_results, normalize_raw, shift_segments,
};
use crate::application::services::translation_chain::TranslationChain;
use crate::domain::{
    AudioChunk, CancelFlag, OutputFormat, PipelineMetadata, PipelineResult, StageRecord,
    TranscriptionResult,
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    Input(String),
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Normalize(#[from] MediaError),
    #[error("all {attempted} audio chunks failed to transcribe")]
    NoChunksTranscribed { attempted: usize },
    #[error("job cancelled")]
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub target_language: Option<String>,
    pub formats: Vec<OutputFormat>,
    pub enhance_audio: bool,
    pub chunking_enabled: bool,
    /// Audio longer than this is split into chunks of at most this length.
    pub max_chunk_duration: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            target_language: None,
            formats: OutputFormat::default_set(),
            enhance_audio: false,
            chunking_enabled: true,
            max_chunk_duration: 300.0,
        }
    }
}

/// Runs the fixed stage sequence for one job: normalize, optional enhance,
/// chunk, per-chunk transcribe, stitch, optional translate, export. Fatal
/// failures abort the run; degradations are recorded in the result's error
/// list while the job still succeeds. Cancellation is honored at stage
/// boundaries only.
pub struct PipelineOrchestrator {
    normalizer: Arc<dyn AudioNormalizer>,
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<TranslationChain>,
}

impl PipelineOrchestrator {
    pub fn new(
        normalizer: Arc<dyn AudioNormalizer>,
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<TranslationChain>,
    ) -> Self {
        Self {
            normalizer,
            transcriber,
            translator,
        }
    }

    #[tracing::instrument(skip_all, fields(input = %input.display()))]
    pub async fn run(
        &self,
        input: &Path,
        options: &PipelineOptions,
        progress: &mut ProgressComposer,
        cancel: &CancelFlag,
    ) -> Result<PipelineResult, PipelineError> {
        let mut scratch: Vec<PathBuf> = Vec::new();
        let outcome = self
            .execute(input, options, progress, cancel, &mut scratch)
            .await;
        remove_scratch_files(&scratch).await;
        outcome
    }

    /// The stage sequence proper. Intermediate files it creates are recorded
    /// in `scratch` so `run` can delete them on every exit path.
    async fn execute(
        &self,
        input: &Path,
        options: &PipelineOptions,
        progress: &mut ProgressComposer,
        cancel: &CancelFlag,
        scratch: &mut Vec<PathBuf>,
    ) -> Result<PipelineResult, PipelineError> {
        let started = Instant::now();
        let mut stages: Vec<StageRecord> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        check_cancel(cancel)?;
        progress.update(PipelineStage::Initialize, 0.0, "Preparing audio");

        // Normalize. Fatal: nothing downstream can run without a waveform.
        let stage_start = Instant::now();
        let normalized = match self.normalizer.normalize(input).await {
            Ok(audio) => {
                if audio.was_converted {
                    scratch.push(audio.path.clone());
                }
                stages.push(stage_record(
                    "normalize",
                    true,
                    stage_start,
                    format!("{:.1}s of audio prepared", audio.duration),
                ));
                audio
            }
            Err(e) => {
                stages.push(stage_record("normalize", false, stage_start, e.to_string()));
                return Err(e.into());
            }
        };
        progress.update(PipelineStage::Initialize, 50.0, "Audio normalized");

        // Enhance. Degradation only: the original audio is kept on failure.
        let mut audio = normalized;
        if options.enhance_audio {
            let stage_start = Instant::now();
            match self.normalizer.enhance(&audio.path).await {
                Ok(enhanced_path) => {
                    if enhanced_path != audio.path {
                        scratch.push(enhanced_path.clone());
                    }
                    stages.push(stage_record(
                        "enhance",
                        true,
                        stage_start,
                        "Audio enhanced".to_string(),
                    ));
                    audio.path = enhanced_path;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Audio enhancement failed, continuing unenhanced");
                    stages.push(stage_record("enhance", false, stage_start, e.to_string()));
                    errors.push(format!("enhancement failed: {e}"));
                }
            }
        }
        progress.update(PipelineStage::Initialize, 100.0, "Audio ready");

        check_cancel(cancel)?;

        // Chunk. Short audio goes through as a single pseudo-chunk so the
        // transcription path is uniform.
        let chunks: Vec<AudioChunk> =
            if options.chunking_enabled && audio.duration > options.max_chunk_duration {
                let stage_start = Instant::now();
                match self
                    .normalizer
                    .split_chunks(&audio, options.max_chunk_duration)
                    .await
                {
                    Ok(chunks) => {
                        scratch.extend(chunks.iter().map(|c| c.path.clone()));
                        stages.push(stage_record(
                            "chunk",
                            true,
                            stage_start,
                            format!("Split into {} chunks", chunks.len()),
                        ));
                        chunks
                    }
                    Err(e) => {
                        stages.push(stage_record("chunk", false, stage_start, e.to_string()));
                        return Err(e.into());
                    }
                }
            } else {
                vec![AudioChunk {
                    path: audio.path.clone(),
                    start_time: 0.0,
                    end_time: audio.duration,
                    duration: audio.duration,
                    index: 0,
                }]
            };

        // Transcribe each chunk in order. A failed chunk is skipped with a
        // recorded warning; only losing every chunk is fatal.
        let stage_start = Instant::now();
        let total_chunks = chunks.len();
        let mut parts: Vec<TranscriptionResult> = Vec::with_capacity(total_chunks);
        for chunk in &chunks {
            check_cancel(cancel)?;
            progress.update(
                PipelineStage::Transcribe,
                chunk.index as f64 / total_chunks as f64 * 100.0,
                format!("Transcribing chunk {}/{}", chunk.index + 1, total_chunks),
            );

            let chunk_start = Instant::now();
            match self.transcriber.transcribe(&chunk.path, None).await {
                Ok(raw) => {
                    let mut part = normalize_raw(
                        raw,
                        chunk.duration,
                        chunk_start.elapsed().as_secs_f64(),
                    );
                    shift_segments(&mut part.segments, chunk.start_time);
                    parts.push(part);
                }
                Err(e) => {
                    tracing::warn!(chunk = chunk.index, error = %e, "Chunk transcription failed");
                    errors.push(format!(
                        "chunk {}/{} failed: {e}",
                        chunk.index + 1,
                        total_chunks
                    ));
                }
            }
        }

        if parts.is_empty() {
            stages.push(stage_record(
                "transcribe",
                false,
                stage_start,
                format!("all {total_chunks} chunks failed"),
            ));
            return Err(PipelineError::NoChunksTranscribed {
                attempted: total_chunks,
            });
        }

        let transcribed = parts.len();
        let transcription = merge_chunk_results(parts);
        stages.push(stage_record(
            "transcribe",
            true,
            stage_start,
            format!("{transcribed}/{total_chunks} chunks transcribed"),
        ));
        progress.update(PipelineStage::Transcribe, 100.0, "Transcription complete");

        check_cancel(cancel)?;

        // Translate. Degradation only.
        let translation = match &options.target_language {
            Some(target) if !transcription.text.is_empty() => {
                progress.update(PipelineStage::Translate, 0.0, "Translating transcript");
                let stage_start = Instant::now();
                match self
                    .translator
                    .translate(&transcription.text, target, &transcription.language)
                    .await
                {
                    Ok(result) => {
                        stages.push(stage_record(
                            "translate",
                            true,
                            stage_start,
                            format!("Translated to {} via {}", result.target_language, result.provider),
                        ));
                        Some(result)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Translation failed, delivering transcript only");
                        stages.push(stage_record("translate", false, stage_start, e.to_string()));
                        errors.push(format!("translation failed: {e}"));
                        None
                    }
                }
            }
            _ => None,
        };
        progress.update(PipelineStage::Translate, 100.0, "Translation finished");

        check_cancel(cancel)?;
        progress.update(PipelineStage::Finalize, 0.0, "Generating outputs");

        // Export. Each format independently; a failed format is a
        // degradation, not a job failure.
        let stage_start = Instant::now();
        let mut outputs: BTreeMap<OutputFormat, String> = BTreeMap::new();
        for format in &options.formats {
            match export_format(*format, &transcription, translation.as_ref()) {
                Ok(rendered) => {
                    outputs.insert(*format, rendered);
                }
                Err(e) => {
                    tracing::warn!(format = format.as_str(), error = %e, "Export failed");
                    errors.push(format!("export {} failed: {e}", format.as_str()));
                }
            }
        }
        stages.push(stage_record(
            "export",
            true,
            stage_start,
            format!("{} formats generated", outputs.len()),
        ));

        let metadata = build_metadata(&transcription, started.elapsed().as_secs_f64());
        progress.update(PipelineStage::Finalize, 100.0, "Processing complete");

        Ok(PipelineResult {
            transcription,
            translation,
            outputs,
            processing_stages: stages,
            errors,
            metadata,
        })
    }
}

/// Best effort: a file that is already gone or still held open is logged
/// and skipped, never an error.
async fn remove_scratch_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::debug!(path = %path.display(), error = %e, "Scratch file not removed");
        }
    }
}

fn check_cancel(cancel: &CancelFlag) -> Result<(), PipelineError> {
    if cancel.is_requested() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}

fn stage_record(stage: &str, success: bool, started: Instant, message: String) -> StageRecord {
    StageRecord {
        stage: stage.to_string(),
        success,
        duration_secs: started.elapsed().as_secs_f64(),
        message,
    }
}

fn build_metadata(transcription: &TranscriptionResult, total_time: f64) -> PipelineMetadata {
    let audio_duration = transcription.metadata.audio_duration;
    let ratio = if audio_duration > 0.0 {
        total_time / audio_duration
    } else {
        0.0
    };
    PipelineMetadata {
        total_processing_time: total_time,
        audio_duration,
        processing_ratio: ratio,
        word_count: transcription.metadata.word_count,
        segment_count: transcription.metadata.segment_count,
        character_count: transcription.metadata.character_count,
        chunks_processed: transcription.metadata.chunk_count,
        language: transcription.language.clone(),
        source_title: None,
        source_uploader: None,
        source_duration: None,
    }
}
