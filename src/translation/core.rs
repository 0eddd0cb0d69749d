/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, built once at startup,
 * which owns the engine registry, the fallback engine, the optional shared
 * translation memory and the post-editor, and runs documents and cell
 * batches through segmentation, translation, post-editing and reassembly.
 */

use log::{debug, info};
use std::sync::Arc;

use crate::app_config::{Config, EngineKind};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::{canonicalize_tag, closest_supported_match, language_codes_match};
use crate::memory::TranslationMemory;
use crate::post_edit::PostEditor;
use crate::providers::google::GoogleTranslate;
use crate::providers::openai::OpenAI;
use crate::providers::{ChatProvider, Engine};
use crate::segmenter::{self, needs_translation, normalize_case, reassemble, segment};

use super::batch::{BatchOptions, BatchTranslator};
use super::registry::EngineRegistry;

/// Number of cells sampled for source language detection
const DETECTION_SAMPLE_CELLS: usize = 10;

/// Translation entry point holding every engine handle
#[derive(Debug, Clone)]
pub struct TranslationService {
    registry: EngineRegistry,
    default_engine: String,
    fallback: Arc<dyn Engine>,
    memory: Option<Arc<TranslationMemory>>,
    post_editor: PostEditor,
    normalize_case: bool,
}

impl TranslationService {
    /// Build every configured engine
    ///
    /// Fails when credentials are missing, the fallback is not a direct
    /// translation engine, or the TM corpus cannot be read.
    pub fn new(config: &Config) -> Result<Self, TranslationError> {
        config
            .validate()
            .map_err(|e| TranslationError::Configuration(e.to_string()))?;

        let translation = &config.translation;
        let common = &translation.common;
        if translation.fallback_engine != EngineKind::Google {
            return Err(TranslationError::Configuration(format!(
                "fallback engine must be a direct translation engine, got {}",
                translation.fallback_engine.display_name()
            )));
        }

        let google: Arc<dyn Engine> = Arc::new(GoogleTranslate::new(
            translation.get_api_key(EngineKind::Google),
            translation.get_endpoint(EngineKind::Google),
            common.request_timeout_secs,
        ));

        let mut registry = EngineRegistry::new();
        registry.register(&EngineKind::Google.to_lowercase_string(), google.clone());

        let chat_key = translation.get_api_key(EngineKind::ChatGpt);
        if !chat_key.is_empty() {
            let mut openai = OpenAI::new(
                chat_key,
                translation.get_endpoint(EngineKind::ChatGpt),
                translation.get_model(EngineKind::ChatGpt),
                common.request_timeout_secs,
            )
            .with_temperature(common.temperature);
            if let Some(provider) = translation.get_provider_config(EngineKind::ChatGpt) {
                if !provider.deployment.is_empty() {
                    openai = openai.with_azure_deployment(&provider.deployment, &provider.api_version);
                }
            }

            let batch = BatchTranslator::new(
                Arc::new(openai),
                google.clone(),
                BatchOptions::from_config(common, config.memory.search_limit),
            )
            .with_name(EngineKind::ChatGpt.to_lowercase_string());
            registry.register(&EngineKind::ChatGpt.to_lowercase_string(), Arc::new(batch));
        }

        let memory = match &config.memory.path {
            Some(path) => Some(Arc::new(TranslationMemory::from_tsv_path(path)?)),
            None => None,
        };

        info!(
            "Translation service ready: engines [{}], default {}, fallback {}",
            registry.names().join(", "),
            translation.engine,
            translation.fallback_engine
        );

        Ok(Self {
            registry,
            default_engine: translation.engine.to_lowercase_string(),
            post_editor: PostEditor::new(google.clone()),
            fallback: google,
            memory,
            normalize_case: common.normalize_case,
        })
    }

    /// Assemble a service from ready-made parts
    ///
    /// The chat provider is wrapped in a batch translator registered as
    /// "chatgpt" (the default engine); the fallback is registered under its
    /// own name and also drives language detection and markup re-translation.
    pub fn from_parts(
        chat: Arc<dyn ChatProvider>,
        fallback: Arc<dyn Engine>,
        options: BatchOptions,
        memory: Option<Arc<TranslationMemory>>,
    ) -> Self {
        let batch = BatchTranslator::new(chat, fallback.clone(), options);
        let default_engine = batch.name().to_string();

        let mut registry = EngineRegistry::new();
        registry.register(&default_engine, Arc::new(batch));
        registry.register(fallback.name(), fallback.clone());

        Self {
            registry,
            default_engine,
            post_editor: PostEditor::new(fallback.clone()),
            fallback,
            memory,
            normalize_case: true,
        }
    }

    /// Toggle ALL-CAPS normalization of queries
    pub fn with_case_normalization(mut self, enabled: bool) -> Self {
        self.normalize_case = enabled;
        self
    }

    /// Register an additional engine
    pub fn with_engine(mut self, name: &str, engine: Arc<dyn Engine>) -> Self {
        self.registry.register(name, engine);
        self
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn memory(&self) -> Option<&TranslationMemory> {
        self.memory.as_deref()
    }

    /// Detect the language of `text` with the fallback engine
    pub async fn detect_language(&self, text: &str) -> Result<String, TranslationError> {
        self.fallback.detect_language(text).await
    }

    fn engine(&self, name: Option<&str>) -> Result<Arc<dyn Engine>, TranslationError> {
        self.registry.get(name.unwrap_or(&self.default_engine))
    }

    async fn resolve_source(&self, sample: &str, source_language: &str) -> Result<String, TranslationError> {
        if !source_language.trim().eq_ignore_ascii_case("auto") {
            return Ok(source_language.to_string());
        }
        let detected = self.detect_language(sample).await?;
        debug!("Detected source language: {}", detected);
        Ok(detected)
    }

    /// Map both languages to codes `engine` accepts
    async fn resolve_pair(
        &self,
        engine: &dyn Engine,
        source_language: &str,
        target_language: &str,
    ) -> Result<(String, String), TranslationError> {
        let supported = engine.supported_languages().await?;
        let resolve = |language: &str| {
            let resolved = match &supported {
                Some(languages) => closest_supported_match(language, languages),
                None => canonicalize_tag(language).ok(),
            };
            resolved.ok_or_else(|| TranslationError::LanguageUnsupported {
                language: language.to_string(),
                engine: engine.name().to_string(),
            })
        };
        Ok((resolve(source_language)?, resolve(target_language)?))
    }

    fn prepare_query(&self, text: &str) -> String {
        if self.normalize_case {
            normalize_case(text)
        } else {
            text.to_string()
        }
    }

    async fn translate_queries(
        &self,
        engine: &dyn Engine,
        queries: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let translations = engine
            .batch_translate_with_memory(queries, source_language, target_language, self.memory())
            .await?;
        if translations.len() != queries.len() {
            return Err(ProviderError::ParseError(format!(
                "engine '{}' returned {} translations for {} texts",
                engine.name(),
                translations.len(),
                queries.len()
            ))
            .into());
        }

        Ok(self
            .post_editor
            .post_edit(queries, &translations, source_language, target_language)
            .await)
    }

    /// Translate a document, keeping its line structure
    pub async fn translate_text(
        &self,
        engine: Option<&str>,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let engine = self.engine(engine)?;
        let source_language = self.resolve_source(text, source_language).await?;
        let (source, target) = self
            .resolve_pair(engine.as_ref(), &source_language, target_language)
            .await?;
        if language_codes_match(&source, &target) {
            return Ok(text.to_string());
        }

        let segments = segment(text);
        let units: Vec<_> = segmenter::units(&segments, &source)
            .into_iter()
            .filter(|unit| unit.needs_translation)
            .collect();
        let queries: Vec<String> = units.iter().map(|unit| self.prepare_query(&unit.query())).collect();

        debug!(
            "Translating {} of {} segments with {}",
            units.len(),
            segments.len(),
            engine.name()
        );
        let translations = self
            .translate_queries(engine.as_ref(), &queries, &source, &target)
            .await?;

        let mut translated: Vec<Option<String>> = vec![None; segments.len()];
        for (unit, translation) in units.iter().zip(translations) {
            translated[unit.id] = Some(translation);
        }
        Ok(reassemble(&segments, &translated))
    }

    /// Translate independent cells, returning them in the same order
    ///
    /// Cells that need no translation come back unchanged.
    pub async fn translate_texts(
        &self,
        engine: Option<&str>,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let engine = self.engine(engine)?;
        let sample = texts
            .iter()
            .filter(|text| !text.trim().is_empty())
            .take(DETECTION_SAMPLE_CELLS)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        let source_language = self.resolve_source(&sample, source_language).await?;
        let (source, target) = self
            .resolve_pair(engine.as_ref(), &source_language, target_language)
            .await?;
        if language_codes_match(&source, &target) {
            return Ok(texts.to_vec());
        }

        let pending: Vec<usize> = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| needs_translation(text, &source))
            .map(|(index, _)| index)
            .collect();
        let queries: Vec<String> = pending.iter().map(|&index| self.prepare_query(&texts[index])).collect();

        let translations = self
            .translate_queries(engine.as_ref(), &queries, &source, &target)
            .await?;

        let mut output = texts.to_vec();
        for (&index, translation) in pending.iter().zip(translations) {
            output[index] = translation;
        }
        Ok(output)
    }
}
