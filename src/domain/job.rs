use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the caller submitted: a staged local file or a remote video reference.
#[derive(Debug, Clone)]
pub enum MediaInput {
    LocalFile(PathBuf),
    Remote(String),
}

/// One end-to-end transcription request. Immutable after submission; the job
/// repository owns the mutable processing state.
#[derive(Debug, Clone)]
pub struct MediaJob {
    pub id: JobId,
    pub input: MediaInput,
    pub target_language: Option<String>,
    pub formats: Vec<OutputFormat>,
    pub enhance_audio: bool,
    pub created_at: DateTime<Utc>,
}

impl MediaJob {
    pub fn new(
        input: MediaInput,
        target_language: Option<String>,
        formats: Vec<OutputFormat>,
        enhance_audio: bool,
    ) -> Self {
        let formats = if formats.is_empty() {
            OutputFormat::default_set()
        } else {
            formats
        };
        Self {
            id: JobId::new(),
            input,
            target_language,
            formats,
            enhance_audio,
            created_at: Utc::now(),
        }
    }
}

/// Cooperative cancellation flag shared between the repository and the
/// worker. Checked at stage boundaries only; an in-flight call to an opaque
/// collaborator cannot be interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
