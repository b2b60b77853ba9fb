mod fallback_transcriber;
mod whisper_api_transcriber;

pub use fallback_transcriber::FallbackTranscriber;
pub use whisper_api_transcriber::WhisperApiTranscriber;
