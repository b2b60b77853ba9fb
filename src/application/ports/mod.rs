mod audio_normalizer;
mod job_repository;
mod media_acquirer;
mod transcriber;
mod translation_provider;

pub use audio_normalizer::{AudioNormalizer, MediaError, NormalizedAudio};
pub use job_repository::{JobRepository, JobSnapshot, RepositoryError};
pub use media_acquirer::{AcquiredMedia, AcquisitionError, MediaAcquirer, RemoteMediaInfo};
pub use transcriber::{RawSegment, RawTranscription, RawWord, Transcriber, TranscriptionError};
pub use translation_provider::{DetectedLanguage, TranslationProvider, TranslationProviderError};
