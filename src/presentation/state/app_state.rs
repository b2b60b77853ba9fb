use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::JobRepository;
use crate::application::services::{JobMessage, TranslationChain};

/// Shared handler state. Submission handlers stage uploads under
/// `staging_dir`, create the job record, and hand the job to the worker
/// over `job_sender`.
#[derive(Clone)]
pub struct AppState {
    pub job_repository: Arc<dyn JobRepository>,
    pub job_sender: mpsc::Sender<JobMessage>,
    pub translator: Arc<TranslationChain>,
    pub staging_dir: PathBuf,
    pub max_file_size_bytes: usize,
}
