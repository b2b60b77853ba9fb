use chrono::{DateTime, Utc};
use serde::Serialize;

/// One progress event as surfaced through the polling endpoint. `percent`
/// is the composed overall percentage and is monotonically non-decreasing
/// for the lifetime of one job.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    pub current: u32,
    pub total: u32,
    pub percent: u32,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressUpdate {
    pub fn new(percent: u32, message: impl Into<String>) -> Self {
        Self {
            current: percent.min(100),
            total: 100,
            percent: percent.min(100),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
