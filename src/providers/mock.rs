/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock backends that simulate different behaviors
 * without touching the network:
 * - `MockChat::echo()` - Always replies with one translated line per source line
 * - `MockChat::drop_line()` - Replies with one line too few
 * - `MockChat::failing()` - Always fails with an error
 * - `MockChat::fail_above(n)` - Replies with nothing for prompts over `n` lines
 * - `MockEngine` - A direct machine-translation engine
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::{ChatMessage, ChatProvider, Engine};

/// Behavior mode for the mock chat provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Translate every source line
    Echo,
    /// Translate but leave out the last reply line
    DropLine,
    /// Always fail with an API error
    Failing,
    /// Reply with an empty string when the prompt holds more than `max_lines` lines
    FailAbove { max_lines: usize },
    /// Sleep before replying; request `k` waits `delays_ms[k % len]`
    Delayed { delays_ms: Vec<u64> },
}

/// Scripted chat-completion provider
#[derive(Debug, Clone)]
pub struct MockChat {
    behavior: MockBehavior,
    /// Shared between clones
    request_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockChat {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn drop_line() -> Self {
        Self::new(MockBehavior::DropLine)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn fail_above(max_lines: usize) -> Self {
        Self::new(MockBehavior::FailAbove { max_lines })
    }

    pub fn delayed(delays_ms: Vec<u64>) -> Self {
        Self::new(MockBehavior::Delayed { delays_ms })
    }

    /// The translation every mock applies to a non-empty line
    pub fn translate_line(line: &str) -> String {
        if line.trim().is_empty() {
            line.to_string()
        } else {
            format!("[T] {}", line)
        }
    }

    /// Number of chat requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Conversations received so far, in arrival order
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }

    /// Source lines of the final user turn
    ///
    /// The turn reads `"<lang> Source: \n" + lines + "\n\n\n<lang> Translations: \n"`.
    pub fn source_lines(messages: &[ChatMessage]) -> Option<Vec<String>> {
        let content = &messages.iter().rev().find(|m| m.role == "user")?.content;
        let start = content.find("Source: \n")? + "Source: \n".len();
        let end = content.rfind("\n\n\n")?;
        let body = content.get(start..end)?;
        Some(body.split('\n').map(str::to_string).collect())
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(messages.clone());

        let lines = Self::source_lines(&messages)
            .ok_or_else(|| ProviderError::ParseError("mock could not find the source lines".to_string()))?;
        let mut reply: Vec<String> = lines.iter().map(|line| Self::translate_line(line)).collect();

        match &self.behavior {
            MockBehavior::Echo => {}
            MockBehavior::DropLine => {
                reply.pop();
            }
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                });
            }
            MockBehavior::FailAbove { max_lines } => {
                if lines.len() > *max_lines {
                    return Ok(String::new());
                }
            }
            MockBehavior::Delayed { delays_ms } => {
                if !delays_ms.is_empty() {
                    let delay = delays_ms[count % delays_ms.len()];
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }

        Ok(reply.join("\n"))
    }
}

/// Direct machine-translation mock
#[derive(Debug, Clone)]
pub struct MockEngine {
    name: String,
    failing: bool,
    detected_language: String,
    supported: Option<Vec<String>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockEngine {
    /// An engine that prefixes every text with `[MT] `
    pub fn working(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failing: false,
            detected_language: "en".to_string(),
            supported: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An engine whose every call fails
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            failing: true,
            ..Self::working(name)
        }
    }

    /// Language reported by `detect_language`
    pub fn with_detected_language(mut self, language: impl Into<String>) -> Self {
        self.detected_language = language.into();
        self
    }

    /// Restrict the accepted languages
    pub fn with_supported_languages(mut self, languages: &[&str]) -> Self {
        self.supported = Some(languages.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Texts received by each `batch_translate` call
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Engine for MockEngine {
    fn name(&self) -> &str {
        &self.name
    }

    async fn batch_translate(
        &self,
        texts: &[String],
        _source_language: &str,
        _target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        self.calls.lock().push(texts.to_vec());
        if self.failing {
            return Err(ProviderError::ConnectionError("Simulated engine failure".to_string()).into());
        }
        Ok(texts.iter().map(|text| format!("[MT] {}", text)).collect())
    }

    async fn detect_language(&self, _text: &str) -> Result<String, TranslationError> {
        if self.failing {
            return Err(ProviderError::ConnectionError("Simulated engine failure".to_string()).into());
        }
        Ok(self.detected_language.clone())
    }

    async fn supported_languages(&self) -> Result<Option<Vec<String>>, TranslationError> {
        Ok(self.supported.clone())
    }
}
