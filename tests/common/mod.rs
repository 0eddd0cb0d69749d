/*!
 * Common test utilities for the mtbatch test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use mtbatch::app_config::{Config, EngineKind};
use mtbatch::providers::mock::{MockChat, MockEngine};
use mtbatch::{BatchOptions, BatchTranslator, TranslationMemory, TranslationService};

/// Routes library logs to the test output; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes a small Chinese/English/French TM corpus with a notes column
pub fn create_test_corpus(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "STR_ID\t中文\t英语\tfr\t备注\n\
                   1\t射手\tShooter\tTireur\tunit\n\
                   2\t骑手\tRider\tCavalier\tunit\n\
                   3\t射击场\tRange\tStand de tir\t\n\
                   3\t射击场\tRange\tStand de tir\t\n";
    create_test_file(dir, filename, content)
}

/// Options with a short request ceiling so timeout tests stay fast
pub fn fast_options() -> BatchOptions {
    BatchOptions {
        request_timeout: Duration::from_millis(200),
        ..BatchOptions::default()
    }
}

/// Batch translator over mocks
pub fn batch_translator(chat: &MockChat, fallback: &MockEngine, options: BatchOptions) -> BatchTranslator {
    BatchTranslator::new(Arc::new(chat.clone()), Arc::new(fallback.clone()), options)
}

/// Translation service over mocks, optionally with a TM
pub fn mock_service(chat: &MockChat, fallback: &MockEngine, memory: Option<TranslationMemory>) -> TranslationService {
    TranslationService::from_parts(
        Arc::new(chat.clone()),
        Arc::new(fallback.clone()),
        BatchOptions::default(),
        memory.map(Arc::new),
    )
}

/// A default config with credentials for both engines
pub fn config_with_keys() -> Config {
    let mut config = Config::default();
    for provider in config.translation.available_providers.iter_mut() {
        provider.api_key = format!("test-{}-key", provider.provider_type);
    }
    config
}

/// Owned strings from literals
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Registry name of an engine kind
pub fn engine_name(kind: EngineKind) -> String {
    kind.to_lowercase_string()
}
