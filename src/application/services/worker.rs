use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{JobRepository, MediaAcquirer, RemoteMediaInfo};
use crate::application::services::pipeline::{
    PipelineError, PipelineOptions, PipelineOrchestrator,
};
use crate::application::services::progress::{
    PipelineStage, ProgressComposer, LOCAL_STAGE_BANDS, REMOTE_STAGE_BANDS,
};
use crate::domain::{CancelFlag, MediaInput, MediaJob, PipelineResult};

/// One unit of work handed from the submission handlers to the worker.
#[derive(Debug)]
pub struct JobMessage {
    pub job: MediaJob,
    pub cancel: CancelFlag,
}

/// Sequential job consumer. Receives submitted jobs over a channel, drives
/// each through acquisition (for remote references) and the pipeline, and
/// records every transition in the job repository. Jobs that run past the
/// soft time limit are failed, not killed mid-stage.
pub struct MediaWorker {
    receiver: mpsc::Receiver<JobMessage>,
    orchestrator: Arc<PipelineOrchestrator>,
    acquirer: Arc<dyn MediaAcquirer>,
    repository: Arc<dyn JobRepository>,
    soft_time_limit: Duration,
    max_remote_duration: f64,
    max_chunk_duration: f64,
}

impl MediaWorker {
    pub fn new(
        receiver: mpsc::Receiver<JobMessage>,
        orchestrator: Arc<PipelineOrchestrator>,
        acquirer: Arc<dyn MediaAcquirer>,
        repository: Arc<dyn JobRepository>,
        soft_time_limit: Duration,
        max_remote_duration: f64,
        max_chunk_duration: f64,
    ) -> Self {
        Self {
            receiver,
            orchestrator,
            acquirer,
            repository,
            soft_time_limit,
            max_remote_duration,
            max_chunk_duration,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Media worker started");
        while let Some(message) = self.receiver.recv().await {
            let job_id = message.job.id;
            let span = tracing::info_span!("process_job", job_id = %job_id);
            self.handle(message).instrument(span).await;
        }
        tracing::info!("Media worker channel closed, shutting down");
    }

    async fn handle(&self, message: JobMessage) {
        let job_id = message.job.id;
        let outcome = tokio::time::timeout(
            self.soft_time_limit,
            self.process(&message.job, &message.cancel),
        )
        .await;

        let record = match outcome {
            Ok(Ok(result)) => self.repository.complete(job_id, result).await,
            Ok(Err(PipelineError::Cancelled)) => {
                tracing::info!("Job cancelled");
                self.repository.fail(job_id, "job cancelled").await
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Job failed");
                self.repository.fail(job_id, &e.to_string()).await
            }
            Err(_) => {
                tracing::error!(
                    limit_secs = self.soft_time_limit.as_secs(),
                    "Job exceeded soft time limit"
                );
                self.repository
                    .fail(job_id, "processing exceeded the time limit")
                    .await
            }
        };
        if let Err(e) = record {
            tracing::error!(error = %e, "Failed to record job outcome");
        }

        // The staged upload is per-job; drop it whatever the outcome,
        // including timeouts and cancellations.
        if let MediaInput::LocalFile(path) = &message.job.input {
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::debug!(path = %path.display(), error = %e, "Staged file not removed");
            }
        }
    }

    async fn process(
        &self,
        job: &MediaJob,
        cancel: &CancelFlag,
    ) -> Result<PipelineResult, PipelineError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = spawn_progress_forwarder(self.repository.clone(), job.id, rx);

        let options = PipelineOptions {
            target_language: job.target_language.clone(),
            formats: job.formats.clone(),
            enhance_audio: job.enhance_audio,
            max_chunk_duration: self.max_chunk_duration,
            ..PipelineOptions::default()
        };

        let result = match &job.input {
            MediaInput::LocalFile(path) => {
                let mut progress = ProgressComposer::new(LOCAL_STAGE_BANDS, tx);
                self.process_local(path.clone(), &options, &mut progress, cancel)
                    .await
            }
            MediaInput::Remote(url) => {
                let mut progress = ProgressComposer::new(REMOTE_STAGE_BANDS, tx);
                self.process_remote(url, &options, &mut progress, cancel)
                    .await
            }
        };

        forwarder.await.ok();
        result
    }

    async fn process_local(
        &self,
        path: PathBuf,
        options: &PipelineOptions,
        progress: &mut ProgressComposer,
        cancel: &CancelFlag,
    ) -> Result<PipelineResult, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::Input(format!(
                "file not found: {}",
                path.display()
            )));
        }
        self.orchestrator.run(&path, options, progress, cancel).await
    }

    async fn process_remote(
        &self,
        url: &str,
        options: &PipelineOptions,
        progress: &mut ProgressComposer,
        cancel: &CancelFlag,
    ) -> Result<PipelineResult, PipelineError> {
        progress.update(PipelineStage::Validate, 0.0, "Validating reference");
        let video_id = self.acquirer.validate(url)?;
        tracing::info!(video_id, "Remote reference validated");

        let info = self.acquirer.probe(url).await?;
        if info.duration > self.max_remote_duration {
            return Err(PipelineError::Acquisition(
                crate::application::ports::AcquisitionError::DurationExceeded {
                    actual: info.duration,
                    limit: self.max_remote_duration,
                },
            ));
        }
        progress.update(PipelineStage::Validate, 100.0, "Reference validated");

        if cancel.is_requested() {
            return Err(PipelineError::Cancelled);
        }

        progress.update(PipelineStage::Download, 0.0, "Downloading audio");
        let acquired = self.acquirer.fetch(url).await?;
        tracing::info!(
            title = acquired.info.title,
            size_bytes = acquired.file_size,
            "Audio downloaded"
        );
        progress.update(PipelineStage::Download, 100.0, "Download complete");

        let outcome = self
            .orchestrator
            .run(&acquired.audio_path, options, progress, cancel)
            .await;

        // The downloaded audio is only needed for this run.
        if let Err(e) = tokio::fs::remove_file(&acquired.audio_path).await {
            tracing::debug!(
                path = %acquired.audio_path.display(),
                error = %e,
                "Downloaded file not removed"
            );
        }

        let mut result = outcome?;
        attach_source_metadata(&mut result, &acquired.info);
        Ok(result)
    }
}

fn attach_source_metadata(result: &mut PipelineResult, info: &RemoteMediaInfo) {
    result.metadata.source_title = Some(info.title.clone());
    result.metadata.source_uploader = Some(info.uploader.clone());
    result.metadata.source_duration = Some(info.duration);
}

/// Forwards progress events from the pipeline into the repository so pollers
/// see them. Lives exactly as long as the job run that feeds it.
fn spawn_progress_forwarder(
    repository: Arc<dyn JobRepository>,
    job_id: crate::domain::JobId,
    mut rx: mpsc::UnboundedReceiver<crate::domain::ProgressUpdate>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            if let Err(e) = repository.record_progress(job_id, update).await {
                tracing::debug!(error = %e, "Progress update dropped");
            }
        }
    })
}
