use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{ChatMessage, ChatProvider};

/// OpenAI client for chat completions
///
/// Talks either to the public API (`{endpoint}/chat/completions` with a
/// bearer token) or to an Azure deployment
/// (`{endpoint}/openai/deployments/{deployment}/chat/completions` with an
/// `api-key` header).
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model name sent with public API requests
    model: String,
    /// Azure deployment, if any
    deployment: Option<String>,
    /// Azure API version
    api_version: String,
    /// Sampling temperature
    temperature: f32,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    temperature: f32,
}

impl OpenAIRequest {
    /// Create a new request
    pub fn new(messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            model: None,
            messages,
            temperature,
        }
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Message inside a response choice
#[derive(Debug, Deserialize)]
pub struct OpenAIResponseMessage {
    #[serde(default)]
    pub role: String,
    /// Missing when the completion was filtered
    #[serde(default)]
    pub content: Option<String>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl OpenAI {
    /// Create a new client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            deployment: None,
            api_version: "2023-05-15".to_string(),
            temperature: 0.0,
        }
    }

    /// Route requests to an Azure deployment
    pub fn with_azure_deployment(mut self, deployment: impl Into<String>, api_version: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self.api_version = api_version.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn completions_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        match &self.deployment {
            Some(deployment) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                base, deployment, self.api_version
            ),
            None => format!("{}/chat/completions", base),
        }
    }

    /// Complete a chat request
    pub async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let request = match self.deployment {
            Some(_) => request,
            None => request.model(self.model.clone()),
        };

        let builder = self.client.post(self.completions_url()).json(&request);
        let builder = match self.deployment {
            Some(_) => builder.header("api-key", &self.api_key),
            None => builder.bearer_auth(&self.api_key),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::ConnectionError(format!("OpenAI request timed out: {}", e))
            } else if e.is_connect() {
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
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(error_text),
                code => ProviderError::ApiError {
                    status_code: code,
                    message: error_text,
                },
            });
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract text from a response
    pub fn extract_text(response: &OpenAIResponse) -> Option<String> {
        response.choices.first().and_then(|choice| choice.message.content.clone())
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        let response = self.complete(OpenAIRequest::new(messages, self.temperature)).await?;
        Self::extract_text(&response)
            .ok_or_else(|| ProviderError::ParseError("response has no message content".to_string()))
    }
}
