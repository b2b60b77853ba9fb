use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CancelFlag, JobId, JobStatus, MediaJob, PipelineResult, ProgressUpdate};

/// Point-in-time view of a job as served to pollers.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub job: MediaJob,
    pub status: JobStatus,
    pub progress: Option<ProgressUpdate>,
    pub result: Option<Arc<PipelineResult>>,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Process-local store of job state. The state machine is
/// `PENDING -> PROGRESS* -> (SUCCESS | FAILURE)`; terminal states accept no
/// further events.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &MediaJob, cancel: CancelFlag) -> Result<(), RepositoryError>;

    async fn get(&self, id: JobId) -> Result<Option<JobSnapshot>, RepositoryError>;

    async fn record_progress(
        &self,
        id: JobId,
        update: ProgressUpdate,
    ) -> Result<(), RepositoryError>;

    async fn complete(&self, id: JobId, result: PipelineResult) -> Result<(), RepositoryError>;

    async fn fail(&self, id: JobId, error: &str) -> Result<(), RepositoryError>;

    /// Request cooperative cancellation. Takes effect at the next stage
    /// boundary the worker checks; returns false when the job is already
    /// terminal or unknown.
    async fn request_cancel(&self, id: JobId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job {0} is already in a terminal state")]
    AlreadyTerminal(JobId),
    #[error("storage error: {0}")]
    Storage(String),
}
