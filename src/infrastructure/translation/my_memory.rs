use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{
    DetectedLanguage, TranslationProvider, TranslationProviderError,
};

const COMMON_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("zh-cn", "Chinese (Simplified)"),
    ("zh-tw", "Chinese (Traditional)"),
];

/// MyMemory HTTP back-end, typically the second provider in the chain. The
/// free API takes a `langpair` query parameter and no authentication.
pub struct MyMemoryProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: MyMemoryData,
    #[serde(rename = "responseStatus")]
    response_status: i64,
}

#[derive(Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl MyMemoryProvider {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| "https://api.mymemory.translated.net".to_string()),
        }
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &str {
        "mymemory"
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationProviderError> {
        let source = if source_lang == "auto" {
            "Autodetect"
        } else {
            source_lang
        };
        let url = format!("{}/get", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", text),
                ("langpair", &format!("{}|{}", source, target_lang)),
            ])
            .send()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranslationProviderError::ApiRequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let parsed: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("body: {}", e)))?;

        if parsed.response_status != 200 {
            return Err(TranslationProviderError::ApiRequestFailed(format!(
                "response status {}",
                parsed.response_status
            )));
        }
        if parsed.response_data.translated_text.trim().is_empty() {
            return Err(TranslationProviderError::EmptyResult);
        }
        Ok(parsed.response_data.translated_text)
    }

    async fn detect_language(
        &self,
        _text: &str,
    ) -> Result<DetectedLanguage, TranslationProviderError> {
        Err(TranslationProviderError::Unsupported(
            "language detection".to_string(),
        ))
    }

    async fn supported_languages(
        &self,
    ) -> Result<BTreeMap<String, String>, TranslationProviderError> {
        Ok(COMMON_LANGUAGES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect())
    }
}
