/*!
 * Translation backends.
 *
 * This module contains the interfaces the pipeline talks to and the client
 * implementations behind them:
 * - OpenAI: chat completion (OpenAI API or an Azure deployment)
 * - Google: direct machine translation (Cloud Translation v2)
 * - Mock: scripted backends for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::{ProviderError, TranslationError};
use crate::memory::TranslationMemory;

pub mod google;
pub mod mock;
pub mod openai;

/// One turn of a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A language model reachable through a chat-completion API
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Send a conversation and return the assistant reply text
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError>;
}

/// The uniform translation capability every engine exposes
#[async_trait]
pub trait Engine: Send + Sync + Debug {
    /// Registry identifier
    fn name(&self) -> &str;

    /// Translate `texts`, returning the same number of strings in the same order
    async fn batch_translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError>;

    /// Translate with an optional translation memory
    ///
    /// Engines that cannot use a TM ignore it.
    async fn batch_translate_with_memory(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        _memory: Option<&TranslationMemory>,
    ) -> Result<Vec<String>, TranslationError> {
        self.batch_translate(texts, source_language, target_language).await
    }

    /// Detect the language of `text`
    async fn detect_language(&self, text: &str) -> Result<String, TranslationError>;

    /// Languages accepted by the engine; `None` means any language
    async fn supported_languages(&self) -> Result<Option<Vec<String>>, TranslationError> {
        Ok(None)
    }
}
