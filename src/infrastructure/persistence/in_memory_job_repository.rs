use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, JobSnapshot, RepositoryError};
use crate::domain::{
    CancelFlag, JobId, JobStatus, MediaJob, PipelineResult, ProgressUpdate,
};

struct JobEntry {
    snapshot: JobSnapshot,
    cancel: CancelFlag,
}

/// Process-local job store. State transitions are validated here so a late
/// progress event or duplicate completion can never resurrect a terminal job.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, JobEntry>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &MediaJob, cancel: CancelFlag) -> Result<(), RepositoryError> {
        let snapshot = JobSnapshot {
            job: job.clone(),
            status: JobStatus::Pending,
            progress: None,
            result: None,
            error: None,
            updated_at: Utc::now(),
        };
        self.jobs
            .write()
            .await
            .insert(job.id, JobEntry { snapshot, cancel });
        tracing::debug!(job_id = %job.id, "Job created");
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Option<JobSnapshot>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).map(|e| e.snapshot.clone()))
    }

    async fn record_progress(
        &self,
        id: JobId,
        update: ProgressUpdate,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        if entry.snapshot.status.is_terminal() {
            return Err(RepositoryError::AlreadyTerminal(id));
        }
        entry.snapshot.status = JobStatus::Progress;
        entry.snapshot.progress = Some(update);
        entry.snapshot.updated_at = Utc::now();
        Ok(())
    }

    async fn complete(&self, id: JobId, result: PipelineResult) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        if entry.snapshot.status.is_terminal() {
            return Err(RepositoryError::AlreadyTerminal(id));
        }
        entry.snapshot.status = JobStatus::Success;
        entry.snapshot.result = Some(Arc::new(result));
        entry.snapshot.updated_at = Utc::now();
        tracing::info!(job_id = %id, "Job completed");
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        if entry.snapshot.status.is_terminal() {
            return Err(RepositoryError::AlreadyTerminal(id));
        }
        entry.snapshot.status = JobStatus::Failure;
        entry.snapshot.error = Some(error.to_string());
        entry.snapshot.updated_at = Utc::now();
        tracing::warn!(job_id = %id, error, "Job failed");
        Ok(())
    }

    async fn request_cancel(&self, id: JobId) -> Result<bool, RepositoryError> {
        let jobs = self.jobs.read().await;
        match jobs.get(&id) {
            Some(entry) if !entry.snapshot.status.is_terminal() => {
                entry.cancel.request();
                tracing::info!(job_id = %id, "Cancellation requested");
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }
}
