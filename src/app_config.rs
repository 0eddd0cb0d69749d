use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default source language code (ISO), or "auto"
    pub source_language: String,

    /// Default target language code (ISO)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Translation memory config
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation engine type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    // @engine: LLM chat completion (OpenAI or Azure OpenAI)
    #[default]
    ChatGpt,
    // @engine: Google Cloud Translation v2
    Google,
}

impl EngineKind {
    // @returns: Capitalized engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::ChatGpt => "ChatGPT",
            Self::Google => "Google Translate",
        }
    }

    // @returns: Lowercase engine identifier used by the registry
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::ChatGpt => "chatgpt".to_string(),
            Self::Google => "google".to_string(),
        }
    }

    // @returns: Environment variable holding the engine credentials
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::ChatGpt => "OPENAI_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chatgpt" | "openai" => Ok(Self::ChatGpt),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid engine type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Engine type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Azure deployment id; empty for the public OpenAI API
    #[serde(default = "String::new")]
    pub deployment: String,

    // @field: Azure API version
    #[serde(default = "default_azure_api_version")]
    pub api_version: String,
}

impl ProviderConfig {
    // @param kind: Engine enum
    // @returns: Provider config with defaults
    pub fn new(kind: EngineKind) -> Self {
        match kind {
            EngineKind::ChatGpt => Self {
                provider_type: kind.to_lowercase_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                deployment: String::new(),
                api_version: default_azure_api_version(),
            },
            EngineKind::Google => Self {
                provider_type: kind.to_lowercase_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_google_endpoint(),
                deployment: String::new(),
                api_version: String::new(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Primary engine
    #[serde(default)]
    pub engine: EngineKind,

    /// Engine used for units the primary engine could not translate
    #[serde(default = "default_fallback_engine")]
    pub fallback_engine: EngineKind,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all engines
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Extra style instructions prepended to the system prompt
    #[serde(default)]
    pub instructions: String,

    /// Initial token budget of one chunk
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// The retry ladder stops once the budget is no longer above this floor
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Number of chunk requests in flight at once
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Convert ALL-CAPS source units before translation
    #[serde(default = "default_true")]
    pub normalize_case: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            instructions: String::new(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            window_size: default_window_size(),
            request_timeout_secs: default_request_timeout_secs(),
            temperature: default_temperature(),
            normalize_case: default_true(),
        }
    }
}

/// Translation memory configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MemoryConfig {
    /// Path of the tab-separated TM corpus; no TM when absent
    #[serde(default)]
    pub path: Option<String>,

    /// Number of best-scoring rows considered per search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            search_limit: default_search_limit(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_length() -> usize {
    500
}

fn default_min_length() -> usize {
    20
}

fn default_window_size() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.0
}

fn default_search_limit() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_fallback_engine() -> EngineKind {
    EngineKind::Google
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_google_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_azure_api_version() -> String {
    "2023-05-15".to_string()
}

impl Config {
    /// Load a configuration file, creating it with defaults when missing
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Fill empty API keys from the environment
    pub fn apply_env_overrides(&mut self) {
        for kind in [EngineKind::ChatGpt, EngineKind::Google] {
            let provider_str = kind.to_lowercase_string();
            let Ok(value) = std::env::var(kind.api_key_env()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            match self.translation.available_providers.iter_mut().find(|p| p.provider_type == provider_str) {
                Some(provider) if provider.api_key.is_empty() => provider.api_key = value,
                Some(_) => {}
                None => {
                    let mut provider = ProviderConfig::new(kind);
                    provider.api_key = value;
                    self.translation.available_providers.push(provider);
                }
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language != "auto" {
            crate::language_utils::get_language_name(&self.source_language)?;
        }
        crate::language_utils::get_language_name(&self.target_language)?;

        for kind in [self.translation.engine, self.translation.fallback_engine] {
            if self.translation.get_api_key(kind).is_empty() {
                return Err(anyhow!(
                    "Translation API key is required for {} engine (set {} or the config entry)",
                    kind.display_name(),
                    kind.api_key_env()
                ));
            }
        }

        let common = &self.translation.common;
        if common.window_size == 0 {
            return Err(anyhow!("window_size must be at least 1"));
        }
        if common.max_length <= common.min_length {
            return Err(anyhow!(
                "max_length ({}) must be above min_length ({})",
                common.max_length,
                common.min_length
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "auto".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            memory: MemoryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get a specific provider configuration by engine
    pub fn get_provider_config(&self, kind: EngineKind) -> Option<&ProviderConfig> {
        let provider_str = kind.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Get the model for an engine
    pub fn get_model(&self, kind: EngineKind) -> String {
        if let Some(provider_config) = self.get_provider_config(kind) {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match kind {
            EngineKind::ChatGpt => default_openai_model(),
            EngineKind::Google => String::new(),
        }
    }

    /// Get the API key for an engine
    pub fn get_api_key(&self, kind: EngineKind) -> String {
        self.get_provider_config(kind)
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for an engine
    pub fn get_endpoint(&self, kind: EngineKind) -> String {
        if let Some(provider_config) = self.get_provider_config(kind) {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match kind {
            EngineKind::ChatGpt => default_openai_endpoint(),
            EngineKind::Google => default_google_endpoint(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            fallback_engine: default_fallback_engine(),
            available_providers: vec![
                ProviderConfig::new(EngineKind::ChatGpt),
                ProviderConfig::new(EngineKind::Google),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
