use tokio::sync::mpsc;

use crate::domain::ProgressUpdate;

/// Coarse stages a job moves through. Each plan below maps a subset of
/// these onto fixed percentage bands of the overall scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validate,
    Download,
    Initialize,
    Transcribe,
    Translate,
    Finalize,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validate => "validate",
            PipelineStage::Download => "download",
            PipelineStage::Initialize => "initialize",
            PipelineStage::Transcribe => "transcribe",
            PipelineStage::Translate => "translate",
            PipelineStage::Finalize => "finalize",
        }
    }
}

/// The `[low, high]` percentage band a stage is allotted within the overall
/// job progress scale.
#[derive(Debug, Clone, Copy)]
pub struct StageBand {
    pub stage: PipelineStage,
    pub low: u32,
    pub high: u32,
}

const fn band(stage: PipelineStage, low: u32, high: u32) -> StageBand {
    StageBand { stage, low, high }
}

/// Band table for jobs submitted as local files.
pub const LOCAL_STAGE_BANDS: &[StageBand] = &[
    band(PipelineStage::Initialize, 0, 20),
    band(PipelineStage::Transcribe, 20, 80),
    band(PipelineStage::Translate, 80, 90),
    band(PipelineStage::Finalize, 90, 100),
];

/// Band table for jobs submitted as remote references.
pub const REMOTE_STAGE_BANDS: &[StageBand] = &[
    band(PipelineStage::Validate, 0, 10),
    band(PipelineStage::Download, 10, 30),
    band(PipelineStage::Initialize, 30, 35),
    band(PipelineStage::Transcribe, 35, 80),
    band(PipelineStage::Translate, 80, 95),
    band(PipelineStage::Finalize, 95, 100),
];

/// Composes per-stage local progress into one overall percentage:
/// `overall = low + local/100 * (high - low)`, clamped so the emitted
/// sequence is monotonically non-decreasing and bounded to `[0, 100]`.
pub struct ProgressComposer {
    bands: &'static [StageBand],
    last_percent: u32,
    sender: mpsc::UnboundedSender<ProgressUpdate>,
}

impl ProgressComposer {
    pub fn new(
        bands: &'static [StageBand],
        sender: mpsc::UnboundedSender<ProgressUpdate>,
    ) -> Self {
        Self {
            bands,
            last_percent: 0,
            sender,
        }
    }

    /// Report `local_percent` (0-100) of `stage`, remapped into the stage's
    /// band. Events for stages missing from the plan are dropped.
    pub fn update(&mut self, stage: PipelineStage, local_percent: f64, message: impl Into<String>) {
        let Some(band) = self.bands.iter().find(|b| b.stage == stage) else {
            tracing::debug!(stage = stage.as_str(), "Stage not in progress plan, skipping");
            return;
        };

        let local = local_percent.clamp(0.0, 100.0);
        let overall = band.low as f64 + local / 100.0 * (band.high - band.low) as f64;
        let overall = (overall.round() as u32).min(100).max(self.last_percent);
        self.last_percent = overall;

        // Receiver dropped means nobody is polling anymore; not an error.
        let _ = self
            .sender
            .send(ProgressUpdate::new(overall, message));
    }

    pub fn last_percent(&self) -> u32 {
        self.last_percent
    }
}
