use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{RawTranscription, Transcriber, TranscriptionError};

/// Wraps a preferred engine with a fallback. Once the primary fails, all
/// later calls go straight to the fallback instead of re-probing a backend
/// that already proved unusable.
pub struct FallbackTranscriber {
    primary: Arc<dyn Transcriber>,
    fallback: Arc<dyn Transcriber>,
    degraded: AtomicBool,
}

impl FallbackTranscriber {
    pub fn new(primary: Arc<dyn Transcriber>, fallback: Arc<dyn Transcriber>) -> Self {
        Self {
            primary,
            fallback,
            degraded: AtomicBool::new(false),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for FallbackTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language_hint: Option<&str>,
    ) -> Result<RawTranscription, TranscriptionError> {
        if !self.degraded.load(Ordering::SeqCst) {
            match self.primary.transcribe(audio_path, language_hint).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(error = %e, "Primary engine failed, switching to fallback");
                    self.degraded.store(true, Ordering::SeqCst);
                }
            }
        }
        self.fallback.transcribe(audio_path, language_hint).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    struct CountingTranscriber {
        calls: Arc<AtomicUsize>,
        fails: bool,
    }

    #[async_trait]
    impl Transcriber for CountingTranscriber {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            _language_hint: Option<&str>,
        ) -> Result<RawTranscription, TranscriptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fails {
                Err(TranscriptionError::TranscriptionFailed("boom".to_string()))
            } else {
                Ok(RawTranscription {
                    text: "ok".to_string(),
                    language: "en".to_string(),
                    segments: Vec::new(),
                })
            }
        }
    }

    fn counting(fails: bool) -> (Arc<CountingTranscriber>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let transcriber = Arc::new(CountingTranscriber {
            calls: Arc::clone(&calls),
            fails,
        });
        (transcriber, calls)
    }

    #[tokio::test]
    async fn given_healthy_primary_when_transcribing_then_fallback_untouched() {
        let (primary, primary_calls) = counting(false);
        let (fallback, fallback_calls) = counting(false);
        let transcriber = FallbackTranscriber::new(primary, fallback);

        transcriber.transcribe(Path::new("/a.wav"), None).await.unwrap();
        transcriber.transcribe(Path::new("/a.wav"), None).await.unwrap();

        assert_eq!(primary_calls.load(Ordering::SeqCst), 2);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
        assert!(!transcriber.is_degraded());
    }

    #[tokio::test]
    async fn given_failed_primary_when_transcribing_again_then_stays_on_fallback() {
        let (primary, primary_calls) = counting(true);
        let (fallback, fallback_calls) = counting(false);
        let transcriber = FallbackTranscriber::new(primary, fallback);

        transcriber.transcribe(Path::new("/a.wav"), None).await.unwrap();
        transcriber.transcribe(Path::new("/a.wav"), None).await.unwrap();

        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 2);
        assert!(transcriber.is_degraded());
    }
}
