use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{
    DetectedLanguage, TranslationProvider, TranslationProviderError,
};

/// LibreTranslate HTTP back-end. Uses the instance's `/translate`, `/detect`
/// and `/languages` endpoints.
pub struct LibreTranslateProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Deserialize)]
struct DetectResponse {
    language: String,
    confidence: f64,
}

#[derive(Deserialize)]
struct LanguageEntry {
    code: String,
    name: String,
}

impl LibreTranslateProvider {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &str {
        "libretranslate"
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationProviderError> {
        let url = format!("{}/translate", self.base_url);
        let mut body = json!({
            "q": text,
            "source": source_lang,
            "target": target_lang,
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranslationProviderError::ApiRequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("body: {}", e)))?;

        if parsed.translated_text.trim().is_empty() {
            return Err(TranslationProviderError::EmptyResult);
        }
        Ok(parsed.translated_text)
    }

    async fn detect_language(
        &self,
        text: &str,
    ) -> Result<DetectedLanguage, TranslationProviderError> {
        let url = format!("{}/detect", self.base_url);
        let mut body = json!({ "q": text });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("request: {}", e)))?;

        let detections: Vec<DetectResponse> = response
            .json()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("body: {}", e)))?;

        detections
            .into_iter()
            .next()
            .map(|d| DetectedLanguage {
                language: d.language,
                confidence: d.confidence,
            })
            .ok_or(TranslationProviderError::EmptyResult)
    }

    async fn supported_languages(
        &self,
    ) -> Result<BTreeMap<String, String>, TranslationProviderError> {
        let url = format!("{}/languages", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("request: {}", e)))?;

        let entries: Vec<LanguageEntry> = response
            .json()
            .await
            .map_err(|e| TranslationProviderError::ApiRequestFailed(format!("body: {}", e)))?;

        Ok(entries.into_iter().map(|e| (e.code, e.name)).collect())
    }
}
