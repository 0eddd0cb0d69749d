use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::closest_supported_match;
use crate::providers::Engine;

/// Maximum number of strings per request accepted by the v2 API
const MAX_SEGMENTS_PER_REQUEST: usize = 128;

/// Google Cloud Translation (v2) client
#[derive(Debug)]
pub struct GoogleTranslate {
    client: Client,
    api_key: String,
    endpoint: String,
    /// Fetched on first use
    languages: OnceCell<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    q: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesData {
    languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    language: String,
}

#[derive(Debug, Deserialize)]
struct DetectionsData {
    detections: Vec<Vec<Detection>>,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
    #[serde(default)]
    confidence: f32,
}

impl GoogleTranslate {
    /// Create a new client for `endpoint` (the `.../language/translate/v2` base)
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            languages: OnceCell::new(),
        }
    }

    fn url(&self, path: &str) -> Result<Url, ProviderError> {
        let base = self.endpoint.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, path))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", self.endpoint, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google Translate API error ({}): {}", status, error_text);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(error_text),
                code => ProviderError::ApiError {
                    status_code: code,
                    message: error_text,
                },
            });
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map(|body| body.data)
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    async fn fetch_languages(&self) -> Result<Vec<String>, ProviderError> {
        let data: LanguagesData = self.send(self.client.get(self.url("/languages")?)).await?;
        debug!("Google Translate supports {} languages", data.languages.len());
        Ok(data.languages.into_iter().map(|entry| entry.language).collect())
    }

    /// Supported language codes, fetched once
    pub async fn languages(&self) -> Result<&[String], ProviderError> {
        self.languages
            .get_or_try_init(|| self.fetch_languages())
            .await
            .map(Vec::as_slice)
    }

    /// Resolve a requested code to the closest code this engine accepts
    pub async fn resolve_language(&self, language: &str) -> Result<String, TranslationError> {
        let supported = self.languages().await?;
        closest_supported_match(language, supported).ok_or_else(|| TranslationError::LanguageUnsupported {
            language: language.to_string(),
            engine: self.name().to_string(),
        })
    }

    async fn translate_request(
        &self,
        texts: &[String],
        source: Option<&str>,
        target: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let body = TranslateRequest {
            q: texts,
            target,
            source,
            format: "text",
        };
        let data: TranslationsData = self.send(self.client.post(self.url("")?).json(&body)).await?;

        if data.translations.len() != texts.len() {
            return Err(ProviderError::ParseError(format!(
                "expected {} translations, got {}",
                texts.len(),
                data.translations.len()
            )));
        }
        Ok(data.translations.into_iter().map(|t| t.translated_text).collect())
    }
}

#[async_trait]
impl Engine for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn batch_translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let target = self.resolve_language(target_language).await?;
        let source = if source_language == "auto" {
            None
        } else {
            Some(self.resolve_language(source_language).await?)
        };

        if source.as_deref() == Some(target.as_str()) {
            return Ok(texts.to_vec());
        }

        let mut translations = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_SEGMENTS_PER_REQUEST) {
            translations.extend(self.translate_request(batch, source.as_deref(), &target).await?);
        }
        Ok(translations)
    }

    async fn detect_language(&self, text: &str) -> Result<String, TranslationError> {
        let body = DetectRequest { q: [text] };
        let data: DetectionsData = self.send(self.client.post(self.url("/detect")?).json(&body)).await?;

        data.detections
            .into_iter()
            .flatten()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|detection| detection.language)
            .ok_or_else(|| ProviderError::ParseError("no language detected".to_string()).into())
    }

    async fn supported_languages(&self) -> Result<Option<Vec<String>>, TranslationError> {
        Ok(Some(self.languages().await?.to_vec()))
    }
}
