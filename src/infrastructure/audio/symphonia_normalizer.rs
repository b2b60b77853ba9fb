use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::decoder::{decode_to_pcm, TARGET_SAMPLE_RATE};
use crate::application::ports::{AudioNormalizer, MediaError, NormalizedAudio};
use crate::domain::{plan_chunks, AudioChunk};

/// File-based normalizer built on symphonia decoding. All outputs are
/// 16kHz mono 16-bit WAV files under `work_dir`.
pub struct SymphoniaNormalizer {
    work_dir: PathBuf,
}

impl SymphoniaNormalizer {
    pub fn new(work_dir: PathBuf) -> Result<Self, MediaError> {
        std::fs::create_dir_all(&work_dir)?;
        Ok(Self { work_dir })
    }

    fn fresh_path(&self, suffix: &str) -> PathBuf {
        self.work_dir.join(format!("{}_{}.wav", Uuid::new_v4(), suffix))
    }

    fn write_wav(&self, path: &Path, samples: &[f32]) -> Result<(), MediaError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: TARGET_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| MediaError::EncodeFailed(format!("wav create: {}", e)))?;
        for sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| MediaError::EncodeFailed(format!("wav write: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| MediaError::EncodeFailed(format!("wav finalize: {}", e)))?;
        Ok(())
    }

    fn read_wav(&self, path: &Path) -> Result<Vec<f32>, MediaError> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| MediaError::Unreadable(format!("wav open: {}", e)))?;
        reader
            .samples::<i16>()
            .map(|s| {
                s.map(|v| v as f32 / i16::MAX as f32)
                    .map_err(|e| MediaError::DecodeFailed(format!("wav read: {}", e)))
            })
            .collect()
    }

    /// True when the file is already a 16kHz mono 16-bit integer WAV.
    fn is_normalized(path: &Path) -> bool {
        hound::WavReader::open(path)
            .map(|reader| {
                let spec = reader.spec();
                spec.channels == 1
                    && spec.sample_rate == TARGET_SAMPLE_RATE
                    && spec.bits_per_sample == 16
                    && spec.sample_format == hound::SampleFormat::Int
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl AudioNormalizer for SymphoniaNormalizer {
    async fn normalize(&self, input: &Path) -> Result<NormalizedAudio, MediaError> {
        if Self::is_normalized(input) {
            let samples = self.read_wav(input)?;
            tracing::debug!(path = %input.display(), "Input already normalized");
            return Ok(NormalizedAudio {
                path: input.to_path_buf(),
                duration: samples.len() as f64 / TARGET_SAMPLE_RATE as f64,
                sample_rate: TARGET_SAMPLE_RATE,
                channels: 1,
                was_converted: false,
            });
        }

        let data = tokio::fs::read(input).await?;
        let samples = decode_to_pcm(&data)?;
        let duration = samples.len() as f64 / TARGET_SAMPLE_RATE as f64;

        let output = self.fresh_path("normalized");
        self.write_wav(&output, &samples)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            duration_secs = duration,
            "Audio normalized"
        );

        Ok(NormalizedAudio {
            path: output,
            duration,
            sample_rate: TARGET_SAMPLE_RATE,
            channels: 1,
            was_converted: true,
        })
    }

    /// Peak normalization followed by a light noise gate. Operates on an
    /// already-normalized WAV file.
    async fn enhance(&self, input: &Path) -> Result<PathBuf, MediaError> {
        let mut samples = self.read_wav(input)?;

        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        if peak > 0.0 {
            let gain = 0.9 / peak;
            for sample in samples.iter_mut() {
                *sample *= gain;
            }
        }

        let gate = 0.9 * 0.02;
        for sample in samples.iter_mut() {
            if sample.abs() < gate {
                *sample = 0.0;
            }
        }

        let output = self.fresh_path("enhanced");
        self.write_wav(&output, &samples)?;
        tracing::debug!(output = %output.display(), "Audio enhanced");
        Ok(output)
    }

    async fn split_chunks(
        &self,
        audio: &NormalizedAudio,
        chunk_duration: f64,
    ) -> Result<Vec<AudioChunk>, MediaError> {
        let samples = self.read_wav(&audio.path)?;
        let spans = plan_chunks(audio.duration, chunk_duration);

        let mut chunks = Vec::with_capacity(spans.len());
        for (index, span) in spans.iter().enumerate() {
            let start_sample = (span.start * TARGET_SAMPLE_RATE as f64) as usize;
            let end_sample = ((span.end * TARGET_SAMPLE_RATE as f64) as usize).min(samples.len());
            if start_sample >= end_sample {
                continue;
            }

            let path = self.fresh_path(&format!("chunk{}", index));
            self.write_wav(&path, &samples[start_sample..end_sample])?;
            chunks.push(AudioChunk {
                path,
                start_time: span.start,
                end_time: span.end,
                duration: span.duration(),
                index,
            });
        }

        tracing::info!(
            chunks = chunks.len(),
            chunk_duration_secs = chunk_duration,
            "Audio split into chunks"
        );
        Ok(chunks)
    }
}
