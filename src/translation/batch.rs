/*!
 * Batch translation with a chat model.
 *
 * This module turns a list of source strings into the same number of
 * translations. Units are grouped into token-budgeted chunks, chunks are
 * dispatched concurrently in bounded windows, and the results are written
 * back by unit index so completion order never matters. Units of failed
 * chunks are retried with a halved budget until the floor is reached; what
 * is still left goes to the fallback engine.
 */

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationCommonConfig;
use crate::errors::{FailureReason, TranslationError};
use crate::language_utils::get_language_name;
use crate::memory::{TmMatches, TranslationMemory};
use crate::providers::{ChatProvider, Engine};
use crate::tokens::{HeuristicTokenEstimator, SharedTokenEstimator};

use super::chunker::{build_chunks, Chunk};
use super::prompts::build_messages;
use super::response::{align_reply, fix_ordinal_numbers, split_line_edges};

/// Returned in place of a unit that no engine could translate
pub const FAILURE_MARKER: &str = "[TranslationFailed]";

/// Outcome for a single unit
pub type UnitResult = Result<String, FailureReason>;

/// Tuning for the batch translator
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Initial chunk budget in tokens
    pub max_length: usize,
    /// Retry rounds stop once the budget is no longer above this
    pub min_length: usize,
    /// Chunk requests in flight at once
    pub window_size: usize,
    /// Ceiling for a single chunk request
    pub request_timeout: Duration,
    /// Extra style instructions for the system prompt
    pub instructions: String,
    /// TM rows considered per unit
    pub search_limit: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_config(&TranslationCommonConfig::default(), 5)
    }
}

impl BatchOptions {
    pub fn from_config(common: &TranslationCommonConfig, search_limit: usize) -> Self {
        Self {
            max_length: common.max_length,
            min_length: common.min_length,
            window_size: common.window_size.max(1),
            request_timeout: Duration::from_secs(common.request_timeout_secs),
            instructions: common.instructions.clone(),
            search_limit,
        }
    }
}

/// LLM engine with chunking, retry ladder and fallback
pub struct BatchTranslator {
    name: String,
    chat: Arc<dyn ChatProvider>,
    fallback: Arc<dyn Engine>,
    options: BatchOptions,
    estimator: SharedTokenEstimator,
}

impl std::fmt::Debug for BatchTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchTranslator")
            .field("name", &self.name)
            .field("chat", &self.chat)
            .field("fallback", &self.fallback.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn pending_indices(results: &[UnitResult]) -> Vec<usize> {
    results
        .iter()
        .enumerate()
        .filter(|(_, result)| result.is_err())
        .map(|(index, _)| index)
        .collect()
}

fn language_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(chat: Arc<dyn ChatProvider>, fallback: Arc<dyn Engine>, options: BatchOptions) -> Self {
        Self {
            name: "chatgpt".to_string(),
            chat,
            fallback,
            options,
            estimator: Arc::new(HeuristicTokenEstimator::default()),
        }
    }

    /// Register under a different engine name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the token estimator used for chunk sizing
    pub fn with_estimator(mut self, estimator: SharedTokenEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Translate `texts`, substituting `FAILURE_MARKER` for units nothing could translate
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        memory: Option<&TranslationMemory>,
    ) -> Vec<String> {
        self.translate_units(texts, source_language, target_language, memory)
            .await
            .into_iter()
            .map(|result| result.unwrap_or_else(|_| FAILURE_MARKER.to_string()))
            .collect()
    }

    /// Translate `texts` and report the outcome per unit
    pub async fn translate_units(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        memory: Option<&TranslationMemory>,
    ) -> Vec<UnitResult> {
        let mut results: Vec<UnitResult> = texts
            .iter()
            .map(|text| {
                if text.trim().is_empty() {
                    Ok(text.clone())
                } else {
                    Err(FailureReason::NotAttempted)
                }
            })
            .collect();

        let examples: Vec<TmMatches> = texts
            .iter()
            .zip(&results)
            .map(|(text, result)| match (memory, result) {
                (Some(tm), Err(_)) => tm.search(text, source_language, target_language, self.options.search_limit),
                _ => TmMatches::new(),
            })
            .collect();

        for (index, matches) in examples.iter().enumerate() {
            if results[index].is_ok() {
                continue;
            }
            if let Some(stored) = matches.get(texts[index].trim()) {
                debug!("Unit {} resolved from translation memory", index);
                results[index] = Ok(stored.clone());
            }
        }

        let costs: Vec<usize> = texts.iter().map(|text| self.estimator.estimate_tokens(text)).collect();
        let source_name = language_name(source_language);
        let target_name = language_name(target_language);

        let mut budget = self.options.max_length;
        let mut round = 0;
        loop {
            let pending = pending_indices(&results);
            if pending.is_empty() || budget <= self.options.min_length {
                break;
            }
            round += 1;

            let chunks = build_chunks(&pending, &costs, &examples, budget);
            debug!(
                "Round {}: {} units in {} chunks (budget {} tokens)",
                round,
                pending.len(),
                chunks.len(),
                budget
            );

            let outcomes: Vec<(Chunk, Result<Vec<String>, FailureReason>)> = stream::iter(chunks)
                .map(|chunk| self.dispatch(chunk, texts, &source_name, &target_name))
                .buffer_unordered(self.options.window_size.max(1))
                .collect()
                .await;

            for (chunk, outcome) in outcomes {
                match outcome {
                    Ok(translations) => {
                        for (&index, translation) in chunk.units.iter().zip(translations) {
                            let (lead, core, trail) = split_line_edges(&texts[index]);
                            let translation = fix_ordinal_numbers(core, &translation);
                            results[index] = Ok(format!("{}{}{}", lead, translation, trail));
                        }
                    }
                    Err(reason) => {
                        warn!(
                            "Chunk {} of round {} failed for {} units: {}",
                            chunk.order,
                            round,
                            chunk.units.len(),
                            reason
                        );
                        for &index in &chunk.units {
                            results[index] = Err(reason.clone());
                        }
                    }
                }
            }

            budget /= 2;
        }

        let pending = pending_indices(&results);
        if !pending.is_empty() {
            self.run_fallback(&pending, texts, source_language, target_language, &mut results)
                .await;
        }

        results
    }

    async fn dispatch(
        &self,
        chunk: Chunk,
        texts: &[String],
        source_name: &str,
        target_name: &str,
    ) -> (Chunk, Result<Vec<String>, FailureReason>) {
        let sources: Vec<&str> = chunk
            .units
            .iter()
            .map(|&index| split_line_edges(&texts[index]).1)
            .collect();
        let messages = build_messages(
            &self.options.instructions,
            source_name,
            target_name,
            &chunk.tm_examples,
            &sources,
        );

        let outcome = match tokio::time::timeout(self.options.request_timeout, self.chat.chat(messages)).await {
            Ok(Ok(reply)) => align_reply(&reply, &sources),
            Ok(Err(e)) => Err(FailureReason::Request(e.to_string())),
            Err(_) => Err(FailureReason::Timeout(self.options.request_timeout.as_secs())),
        };

        (chunk, outcome)
    }

    async fn run_fallback(
        &self,
        pending: &[usize],
        texts: &[String],
        source_language: &str,
        target_language: &str,
        results: &mut [UnitResult],
    ) {
        info!(
            "Routing {} untranslated units to fallback engine '{}'",
            pending.len(),
            self.fallback.name()
        );

        let queries: Vec<String> = pending.iter().map(|&index| texts[index].clone()).collect();
        let reason = match self
            .fallback
            .batch_translate(&queries, source_language, target_language)
            .await
        {
            Ok(translations) if translations.len() == queries.len() => {
                for (&index, translation) in pending.iter().zip(translations) {
                    results[index] = Ok(translation);
                }
                return;
            }
            Ok(translations) => FailureReason::Fallback(format!(
                "expected {} translations, got {}",
                queries.len(),
                translations.len()
            )),
            Err(e) => FailureReason::Fallback(e.to_string()),
        };

        warn!("Fallback engine failed for {} units: {}", pending.len(), reason);
        for &index in pending {
            results[index] = Err(reason.clone());
        }
    }
}

#[async_trait]
impl Engine for BatchTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn batch_translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        Ok(self.translate_batch(texts, source_language, target_language, None).await)
    }

    async fn batch_translate_with_memory(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        memory: Option<&TranslationMemory>,
    ) -> Result<Vec<String>, TranslationError> {
        Ok(self.translate_batch(texts, source_language, target_language, memory).await)
    }

    async fn detect_language(&self, text: &str) -> Result<String, TranslationError> {
        self.fallback.detect_language(text).await
    }
}
