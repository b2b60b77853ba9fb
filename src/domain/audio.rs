use std::path::PathBuf;

/// A time-bounded span of audio, in seconds from the start of the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkSpan {
    pub start: f64,
    pub end: f64,
}

impl ChunkSpan {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A materialized slice of normalized audio, processed independently by the
/// transcription step.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub path: PathBuf,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub index: usize,
}

/// Compute chunk boundaries for audio of `total_duration` seconds split at
/// `chunk_duration`. Returns a single span covering the whole file when the
/// duration fits, otherwise consecutive full-length spans with a shorter
/// tail. Spans are contiguous and non-overlapping, covering `[0, total)`;
/// no span has zero length.
pub fn plan_chunks(total_duration: f64, chunk_duration: f64) -> Vec<ChunkSpan> {
    if total_duration <= 0.0 {
        return Vec::new();
    }
    if chunk_duration <= 0.0 || total_duration <= chunk_duration {
        return vec![ChunkSpan {
            start: 0.0,
            end: total_duration,
        }];
    }

    let mut spans = Vec::new();
    let mut start = 0.0;
    while start < total_duration {
        let end = (start + chunk_duration).min(total_duration);
        spans.push(ChunkSpan { start, end });
        start = end;
    }
    spans
}
