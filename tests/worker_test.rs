use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use skriva::application::ports::{
    AcquiredMedia, AcquisitionError, AudioNormalizer, DetectedLanguage, JobRepository,
    MediaAcquirer, MediaError, NormalizedAudio, RawSegment, RawTranscription, RemoteMediaInfo,
    Transcriber, TranscriptionError, TranslationProvider, TranslationProviderError,
};
use skriva::application::services::{
    JobMessage, MediaWorker, PipelineOrchestrator, TranslationChain, TranslationChainConfig,
};
use skriva::domain::{CancelFlag, JobStatus, MediaInput, MediaJob};
use skriva::infrastructure::persistence::InMemoryJobRepository;

struct FakeNormalizer;

#[async_trait::async_trait]
impl AudioNormalizer for FakeNormalizer {
    async fn normalize(&self, input: &Path) -> Result<NormalizedAudio, MediaError> {
        Ok(NormalizedAudio {
            path: input.to_path_buf(),
            duration: 30.0,
            sample_rate: 16_000,
            channels: 1,
            was_converted: false,
        })
    }

    async fn enhance(&self, input: &Path) -> Result<PathBuf, MediaError> {
        Ok(input.to_path_buf())
    }

    async fn split_chunks(
        &self,
        _audio: &NormalizedAudio,
        _chunk_duration: f64,
    ) -> Result<Vec<skriva::domain::AudioChunk>, MediaError> {
        unreachable!("thirty seconds never chunks")
    }
}

/// Stalls in normalize long enough for any small soft time limit to expire.
struct StalledNormalizer;

#[async_trait::async_trait]
impl AudioNormalizer for StalledNormalizer {
    async fn normalize(&self, input: &Path) -> Result<NormalizedAudio, MediaError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(NormalizedAudio {
            path: input.to_path_buf(),
            duration: 30.0,
            sample_rate: 16_000,
            channels: 1,
            was_converted: false,
        })
    }

    async fn enhance(&self, input: &Path) -> Result<PathBuf, MediaError> {
        Ok(input.to_path_buf())
    }

    async fn split_chunks(
        &self,
        _audio: &NormalizedAudio,
        _chunk_duration: f64,
    ) -> Result<Vec<skriva::domain::AudioChunk>, MediaError> {
        unreachable!("normalize never completes")
    }
}

struct FixedTranscriber;

#[async_trait::async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(
        &self,
        _audio_path: &Path,
        _language_hint: Option<&str>,
    ) -> Result<RawTranscription, TranscriptionError> {
        Ok(RawTranscription {
            text: "hello".to_string(),
            language: "en".to_string(),
            segments: vec![RawSegment {
                start: 0.0,
                end: 2.0,
                text: "hello".to_string(),
                avg_logprob: -0.1,
                words: None,
            }],
        })
    }
}

struct NoopProvider;

#[async_trait::async_trait]
impl TranslationProvider for NoopProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<String, TranslationProviderError> {
        Ok(text.to_string())
    }

    async fn detect_language(
        &self,
        _text: &str,
    ) -> Result<DetectedLanguage, TranslationProviderError> {
        Ok(DetectedLanguage {
            language: "en".to_string(),
            confidence: 1.0,
        })
    }

    async fn supported_languages(
        &self,
    ) -> Result<BTreeMap<String, String>, TranslationProviderError> {
        Ok(BTreeMap::new())
    }
}

struct FakeAcquirer {
    duration: f64,
    audio_path: PathBuf,
}

#[async_trait::async_trait]
impl MediaAcquirer for FakeAcquirer {
    fn validate(&self, url: &str) -> Result<String, AcquisitionError> {
        if url.contains("youtube") || url.contains("youtu.be") {
            Ok("dQw4w9WgXcQ".to_string())
        } else {
            Err(AcquisitionError::InvalidReference(url.to_string()))
        }
    }

    async fn probe(&self, _url: &str) -> Result<RemoteMediaInfo, AcquisitionError> {
        Ok(RemoteMediaInfo {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Sample title".to_string(),
            duration: self.duration,
            uploader: "Sample channel".to_string(),
            webpage_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
        })
    }

    async fn fetch(&self, _url: &str) -> Result<AcquiredMedia, AcquisitionError> {
        Ok(AcquiredMedia {
            audio_path: self.audio_path.clone(),
            info: self.probe("").await?,
            file_size: 1024,
        })
    }
}

fn build_worker(
    acquirer: FakeAcquirer,
    repository: Arc<dyn JobRepository>,
    receiver: mpsc::Receiver<JobMessage>,
) -> MediaWorker {
    build_worker_with(
        acquirer,
        repository,
        receiver,
        Arc::new(FakeNormalizer),
        Duration::from_secs(30),
    )
}

fn build_worker_with(
    acquirer: FakeAcquirer,
    repository: Arc<dyn JobRepository>,
    receiver: mpsc::Receiver<JobMessage>,
    normalizer: Arc<dyn AudioNormalizer>,
    soft_time_limit: Duration,
) -> MediaWorker {
    let translator = Arc::new(TranslationChain::new(
        vec![Arc::new(NoopProvider)],
        TranslationChainConfig {
            min_request_interval: Duration::from_millis(0),
            ..TranslationChainConfig::default()
        },
    ));
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        normalizer,
        Arc::new(FixedTranscriber),
        translator,
    ));
    MediaWorker::new(
        receiver,
        orchestrator,
        Arc::new(acquirer),
        repository,
        soft_time_limit,
        600.0,
        300.0,
    )
}

async fn submit_and_run(job: MediaJob, acquirer: FakeAcquirer) -> Arc<dyn JobRepository> {
    let repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let cancel = CancelFlag::new();
    repository.create(&job, cancel.clone()).await.unwrap();

    let (tx, rx) = mpsc::channel(1);
    tx.send(JobMessage { job, cancel }).await.unwrap();
    drop(tx);

    build_worker(acquirer, Arc::clone(&repository), rx).run().await;
    repository
}

#[tokio::test]
async fn given_local_file_job_when_processed_then_success_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("clip.wav");
    std::fs::write(&audio, b"not real audio").unwrap();

    let job = MediaJob::new(MediaInput::LocalFile(audio.clone()), None, Vec::new(), false);
    let job_id = job.id;
    let repository = submit_and_run(
        job,
        FakeAcquirer {
            duration: 30.0,
            audio_path: audio,
        },
    )
    .await;

    let snapshot = repository.get(job_id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Success);
    let result = snapshot.result.unwrap();
    assert_eq!(result.transcription.text, "hello");
    assert!(result.metadata.source_title.is_none());
}

#[tokio::test]
async fn given_finished_job_when_staging_inspected_then_uploaded_file_removed() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("clip.wav");
    std::fs::write(&audio, b"not real audio").unwrap();

    let job = MediaJob::new(MediaInput::LocalFile(audio.clone()), None, Vec::new(), false);
    let repository = submit_and_run(
        job,
        FakeAcquirer {
            duration: 30.0,
            audio_path: audio.clone(),
        },
    )
    .await;
    drop(repository);

    assert!(!audio.exists(), "staged upload was not removed");
}

#[tokio::test]
async fn given_stalled_pipeline_when_soft_limit_expires_then_job_failed() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("clip.wav");
    std::fs::write(&audio, b"not real audio").unwrap();

    let job = MediaJob::new(MediaInput::LocalFile(audio.clone()), None, Vec::new(), false);
    let job_id = job.id;
    let repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let cancel = CancelFlag::new();
    repository.create(&job, cancel.clone()).await.unwrap();

    let (tx, rx) = mpsc::channel(1);
    tx.send(JobMessage { job, cancel }).await.unwrap();
    drop(tx);

    let worker = build_worker_with(
        FakeAcquirer {
            duration: 30.0,
            audio_path: audio,
        },
        Arc::clone(&repository),
        rx,
        Arc::new(StalledNormalizer),
        Duration::from_millis(100),
    );
    worker.run().await;

    let snapshot = repository.get(job_id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Failure);
    assert!(snapshot.error.unwrap().contains("time limit"));
}

#[tokio::test]
async fn given_missing_local_file_when_processed_then_failure_recorded() {
    let job = MediaJob::new(
        MediaInput::LocalFile("/nonexistent/clip.wav".into()),
        None,
        Vec::new(),
        false,
    );
    let job_id = job.id;
    let repository = submit_and_run(
        job,
        FakeAcquirer {
            duration: 30.0,
            audio_path: "/nonexistent/clip.wav".into(),
        },
    )
    .await;

    let snapshot = repository.get(job_id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Failure);
    assert!(snapshot.error.unwrap().contains("file not found"));
}

#[tokio::test]
async fn given_remote_job_when_processed_then_source_metadata_attached() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("downloaded.wav");
    std::fs::write(&audio, b"not real audio").unwrap();

    let job = MediaJob::new(
        MediaInput::Remote("https://youtu.be/dQw4w9WgXcQ".to_string()),
        None,
        Vec::new(),
        false,
    );
    let job_id = job.id;
    let repository = submit_and_run(
        job,
        FakeAcquirer {
            duration: 240.0,
            audio_path: audio.clone(),
        },
    )
    .await;

    let snapshot = repository.get(job_id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Success);
    let result = snapshot.result.unwrap();
    assert_eq!(result.metadata.source_title.as_deref(), Some("Sample title"));
    assert_eq!(result.metadata.source_duration, Some(240.0));
    assert!(!audio.exists(), "downloaded audio was not removed");
}

#[tokio::test]
async fn given_overlong_remote_video_when_processed_then_rejected_at_probe() {
    let job = MediaJob::new(
        MediaInput::Remote("https://youtu.be/dQw4w9WgXcQ".to_string()),
        None,
        Vec::new(),
        false,
    );
    let job_id = job.id;
    let repository = submit_and_run(
        job,
        FakeAcquirer {
            duration: 9000.0,
            audio_path: "/unused".into(),
        },
    )
    .await;

    let snapshot = repository.get(job_id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Failure);
    assert!(snapshot.error.unwrap().contains("exceeds"));
}

#[tokio::test]
async fn given_invalid_remote_reference_when_processed_then_failure_recorded() {
    let job = MediaJob::new(
        MediaInput::Remote("https://example.com/clip".to_string()),
        None,
        Vec::new(),
        false,
    );
    let job_id = job.id;
    let repository = submit_and_run(
        job,
        FakeAcquirer {
            duration: 30.0,
            audio_path: "/unused".into(),
        },
    )
    .await;

    let snapshot = repository.get(job_id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Failure);
    assert!(snapshot.error.unwrap().contains("invalid remote reference"));
}
