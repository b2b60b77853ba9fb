use std::collections::BTreeMap;

use skriva::application::ports::{JobRepository, RepositoryError};
use skriva::domain::{
    CancelFlag, JobId, JobStatus, MediaInput, MediaJob, PipelineMetadata, PipelineResult,
    ProgressUpdate, TranscriptionResult,
};
use skriva::infrastructure::persistence::InMemoryJobRepository;

fn sample_job() -> MediaJob {
    MediaJob::new(
        MediaInput::LocalFile("/tmp/audio.wav".into()),
        None,
        Vec::new(),
        false,
    )
}

fn sample_result() -> PipelineResult {
    PipelineResult {
        transcription: TranscriptionResult::empty("en"),
        translation: None,
        outputs: BTreeMap::new(),
        processing_stages: Vec::new(),
        errors: Vec::new(),
        metadata: PipelineMetadata::default(),
    }
}

#[tokio::test]
async fn given_created_job_when_fetched_then_pending_snapshot() {
    let repo = InMemoryJobRepository::new();
    let job = sample_job();

    repo.create(&job, CancelFlag::new()).await.unwrap();
    let snapshot = repo.get(job.id).await.unwrap().unwrap();

    assert_eq!(snapshot.status, JobStatus::Pending);
    assert!(snapshot.progress.is_none());
    assert!(snapshot.result.is_none());
}

#[tokio::test]
async fn given_unknown_job_when_fetched_then_none() {
    let repo = InMemoryJobRepository::new();

    assert!(repo.get(JobId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn given_progress_event_when_recorded_then_status_moves_to_progress() {
    let repo = InMemoryJobRepository::new();
    let job = sample_job();
    repo.create(&job, CancelFlag::new()).await.unwrap();

    repo.record_progress(job.id, ProgressUpdate::new(40, "transcribing"))
        .await
        .unwrap();

    let snapshot = repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Progress);
    assert_eq!(snapshot.progress.unwrap().percent, 40);
}

#[tokio::test]
async fn given_completed_job_when_late_progress_arrives_then_rejected() {
    let repo = InMemoryJobRepository::new();
    let job = sample_job();
    repo.create(&job, CancelFlag::new()).await.unwrap();

    repo.complete(job.id, sample_result()).await.unwrap();
    let err = repo
        .record_progress(job.id, ProgressUpdate::new(99, "late"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::AlreadyTerminal(_)));
    let snapshot = repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Success);
}

#[tokio::test]
async fn given_failed_job_when_completed_again_then_rejected() {
    let repo = InMemoryJobRepository::new();
    let job = sample_job();
    repo.create(&job, CancelFlag::new()).await.unwrap();

    repo.fail(job.id, "decode error").await.unwrap();
    let err = repo.complete(job.id, sample_result()).await.unwrap_err();

    assert!(matches!(err, RepositoryError::AlreadyTerminal(_)));
    let snapshot = repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(snapshot.status, JobStatus::Failure);
    assert_eq!(snapshot.error.as_deref(), Some("decode error"));
}

#[tokio::test]
async fn given_running_job_when_cancel_requested_then_flag_raised() {
    let repo = InMemoryJobRepository::new();
    let job = sample_job();
    let cancel = CancelFlag::new();
    repo.create(&job, cancel.clone()).await.unwrap();

    let accepted = repo.request_cancel(job.id).await.unwrap();

    assert!(accepted);
    assert!(cancel.is_requested());
}

#[tokio::test]
async fn given_terminal_job_when_cancel_requested_then_refused() {
    let repo = InMemoryJobRepository::new();
    let job = sample_job();
    let cancel = CancelFlag::new();
    repo.create(&job, cancel.clone()).await.unwrap();
    repo.complete(job.id, sample_result()).await.unwrap();

    let accepted = repo.request_cancel(job.id).await.unwrap();

    assert!(!accepted);
    assert!(!cancel.is_requested());
}

#[tokio::test]
async fn given_unknown_job_when_cancel_requested_then_refused() {
    let repo = InMemoryJobRepository::new();

    assert!(!repo.request_cancel(JobId::new()).await.unwrap());
}
