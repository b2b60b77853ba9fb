use std::path::PathBuf;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;
use uuid::Uuid;

use crate::application::ports::{
    AcquiredMedia, AcquisitionError, MediaAcquirer, RemoteMediaInfo,
};

/// Resolves remote video references through the external `yt-dlp` binary.
/// Metadata probes use `--dump-json --skip-download`; fetches extract the
/// audio track to a WAV file under `work_dir`.
pub struct YtDlpAcquirer {
    binary: String,
    work_dir: PathBuf,
    url_patterns: Vec<Regex>,
}

#[derive(Deserialize)]
struct ProbeOutput {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    webpage_url: Option<String>,
}

impl YtDlpAcquirer {
    pub fn new(binary: String, work_dir: PathBuf) -> Result<Self, AcquisitionError> {
        std::fs::create_dir_all(&work_dir)
            .map_err(|e| AcquisitionError::FetchFailed(format!("work dir: {}", e)))?;
        let url_patterns = [
            r"^https?://(?:www\.)?youtube\.com/watch\?v=([A-Za-z0-9_-]{11})",
            r"^https?://youtu\.be/([A-Za-z0-9_-]{11})",
            r"^https?://(?:www\.)?youtube\.com/shorts/([A-Za-z0-9_-]{11})",
            r"^https?://(?:www\.)?youtube\.com/embed/([A-Za-z0-9_-]{11})",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AcquisitionError::FetchFailed(format!("pattern: {}", e)))?;

        Ok(Self {
            binary,
            work_dir,
            url_patterns,
        })
    }

    fn classify_failure(stderr: &str) -> AcquisitionError {
        let lowered = stderr.to_lowercase();
        if lowered.contains("private video") {
            AcquisitionError::Private
        } else if lowered.contains("video unavailable") || lowered.contains("has been removed") {
            AcquisitionError::Unavailable
        } else if lowered.contains("age") && lowered.contains("restrict") {
            AcquisitionError::AgeRestricted
        } else if lowered.contains("not available in your country")
            || lowered.contains("geo restricted")
        {
            AcquisitionError::GeoBlocked
        } else {
            AcquisitionError::FetchFailed(stderr.trim().to_string())
        }
    }
}

#[async_trait]
impl MediaAcquirer for YtDlpAcquirer {
    fn validate(&self, url: &str) -> Result<String, AcquisitionError> {
        let trimmed = url.trim();
        for pattern in &self.url_patterns {
            if let Some(captures) = pattern.captures(trimmed) {
                if let Some(id) = captures.get(1) {
                    return Ok(id.as_str().to_string());
                }
            }
        }
        Err(AcquisitionError::InvalidReference(trimmed.to_string()))
    }

    async fn probe(&self, url: &str) -> Result<RemoteMediaInfo, AcquisitionError> {
        let output = Command::new(&self.binary)
            .args(["--dump-json", "--skip-download", "--no-playlist", url])
            .output()
            .await
            .map_err(|e| AcquisitionError::FetchFailed(format!("spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::classify_failure(&stderr));
        }

        let parsed: ProbeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| AcquisitionError::FetchFailed(format!("metadata: {}", e)))?;

        Ok(RemoteMediaInfo {
            video_id: parsed.id,
            title: parsed.title.unwrap_or_else(|| "unknown".to_string()),
            duration: parsed.duration.unwrap_or(0.0),
            uploader: parsed.uploader.unwrap_or_else(|| "unknown".to_string()),
            webpage_url: parsed.webpage_url.unwrap_or_else(|| url.to_string()),
        })
    }

    async fn fetch(&self, url: &str) -> Result<AcquiredMedia, AcquisitionError> {
        let info = self.probe(url).await?;
        let audio_path = self.work_dir.join(format!("{}.wav", Uuid::new_v4()));
        let template = audio_path.display().to_string();

        tracing::info!(video_id = info.video_id, "Downloading audio track");
        let output = Command::new(&self.binary)
            .args([
                "-x",
                "--audio-format",
                "wav",
                "--no-playlist",
                "-o",
                &template,
                url,
            ])
            .output()
            .await
            .map_err(|e| AcquisitionError::FetchFailed(format!("spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::classify_failure(&stderr));
        }

        let file_size = tokio::fs::metadata(&audio_path)
            .await
            .map_err(|e| AcquisitionError::FetchFailed(format!("downloaded file: {}", e)))?
            .len();

        Ok(AcquiredMedia {
            audio_path,
            info,
            file_size,
        })
    }
}
