use std::path::PathBuf;

use async_trait::async_trait;

/// Metadata for a remote video reference, resolved without downloading.
#[derive(Debug, Clone)]
pub struct RemoteMediaInfo {
    pub video_id: String,
    pub title: String,
    pub duration: f64,
    pub uploader: String,
    pub webpage_url: String,
}

/// A remote reference resolved to a local audio file.
#[derive(Debug, Clone)]
pub struct AcquiredMedia {
    pub audio_path: PathBuf,
    pub info: RemoteMediaInfo,
    pub file_size: u64,
}

/// Resolves a remote video reference into a local audio file plus metadata.
/// Only the success/failure/progress contract is consumed here; the actual
/// downloader is an external collaborator.
#[async_trait]
pub trait MediaAcquirer: Send + Sync {
    /// Validate a remote reference and extract its video id.
    fn validate(&self, url: &str) -> Result<String, AcquisitionError>;

    /// Fetch metadata without downloading.
    async fn probe(&self, url: &str) -> Result<RemoteMediaInfo, AcquisitionError>;

    /// Download the audio track to a local file.
    async fn fetch(&self, url: &str) -> Result<AcquiredMedia, AcquisitionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("invalid remote reference: {0}")]
    InvalidReference(String),
    #[error("video is private")]
    Private,
    #[error("video is unavailable")]
    Unavailable,
    #[error("video is age-restricted")]
    AgeRestricted,
    #[error("video is geo-blocked")]
    GeoBlocked,
    #[error("media duration {actual:.0}s exceeds the configured maximum {limit:.0}s")]
    DurationExceeded { actual: f64, limit: f64 },
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}
