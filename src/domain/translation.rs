use serde::Serialize;

/// Result of one translation call through the provider chain.
/// `provider_index` is the 0-based position of the provider that produced
/// the text; `chunks` is set when the long-text path split the input.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub provider: String,
    pub provider_index: usize,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,
}
