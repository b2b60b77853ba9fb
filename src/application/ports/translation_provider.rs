use std::collections::BTreeMap;

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct DetectedLanguage {
    pub language: String,
    pub confidence: f64,
}

/// One interchangeable translation back-end. Providers are constructed once
/// into an ordered list at startup; fallback, caching, and rate limiting
/// live in the chain, not here.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Translate text between normalized language codes. `source_lang` may
    /// be `auto` when the provider supports detection.
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationProviderError>;

    async fn detect_language(&self, text: &str)
        -> Result<DetectedLanguage, TranslationProviderError>;

    /// Language code -> human-readable name.
    async fn supported_languages(
        &self,
    ) -> Result<BTreeMap<String, String>, TranslationProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationProviderError {
    #[error("provider returned no translation")]
    EmptyResult,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("unsupported by this provider: {0}")]
    Unsupported(String),
}
