/*!
 * Tests for application configuration functionality
 */

use mtbatch::app_config::{Config, EngineKind, LogLevel};
use mtbatch::errors::TranslationError;
use mtbatch::TranslationService;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.engine, EngineKind::ChatGpt);
    assert_eq!(config.translation.fallback_engine, EngineKind::Google);

    let common = &config.translation.common;
    assert_eq!(common.max_length, 500);
    assert_eq!(common.min_length, 20);
    assert_eq!(common.window_size, 10);
    assert_eq!(common.request_timeout_secs, 30);
    assert!(common.normalize_case);

    assert_eq!(config.memory.path, None);
    assert_eq!(config.memory.search_limit, 5);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_config_validation_withoutKeys_shouldFail() {
    let config = Config::default();
    let error = config.validate().unwrap_err().to_string();
    assert!(error.contains("OPENAI_API_KEY"));
}

#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = common::config_with_keys();
    assert!(config.validate().is_ok());

    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
    config.target_language = "zh-TW".to_string();
    assert!(config.validate().is_ok());

    config.source_language = "auto".to_string();
    assert!(config.validate().is_ok());

    config.translation.common.window_size = 0;
    assert!(config.validate().is_err());
    config.translation.common.window_size = 4;

    config.translation.common.max_length = 20;
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_missingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.target_language, "en");

    // A second load reads the file that was just written
    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.translation.common.max_length, config.translation.common.max_length);
}

#[test]
fn test_loadOrCreate_partialFile_shouldFillDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "source_language": "zh",
            "target_language": "fr",
            "translation": {
                "engine": "google",
                "available_providers": [
                    { "type": "google", "api_key": "abc" }
                ],
                "common": { "window_size": 3 }
            }
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();
    assert_eq!(config.translation.engine, EngineKind::Google);
    assert_eq!(config.translation.fallback_engine, EngineKind::Google);
    assert_eq!(config.translation.common.window_size, 3);
    assert_eq!(config.translation.common.max_length, 500);
    assert_eq!(config.translation.get_api_key(EngineKind::Google), "abc");
    assert_eq!(
        config.translation.get_endpoint(EngineKind::Google),
        "https://translation.googleapis.com/language/translate/v2"
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_invalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json").unwrap();
    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_engineKind_fromStr_shouldAcceptAliases() {
    assert_eq!("ChatGPT".parse::<EngineKind>().unwrap(), EngineKind::ChatGpt);
    assert_eq!("openai".parse::<EngineKind>().unwrap(), EngineKind::ChatGpt);
    assert_eq!("google".parse::<EngineKind>().unwrap(), EngineKind::Google);
    assert!("deepl".parse::<EngineKind>().is_err());
}

#[test]
fn test_service_new_withKeys_shouldRegisterBothEngines() {
    let service = TranslationService::new(&common::config_with_keys()).unwrap();
    assert_eq!(
        service.registry().names(),
        vec![common::engine_name(EngineKind::ChatGpt), common::engine_name(EngineKind::Google)]
    );
    assert!(service.memory().is_none());
}

#[test]
fn test_service_new_chatFallback_shouldBeRejected() {
    let mut config = common::config_with_keys();
    config.translation.fallback_engine = EngineKind::ChatGpt;
    let result = TranslationService::new(&config);
    assert!(matches!(result, Err(TranslationError::Configuration(_))));
}

#[test]
fn test_service_new_missingCorpus_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut config = common::config_with_keys();
    config.memory.path = Some(temp_dir.path().join("missing.tsv").to_string_lossy().into_owned());

    let result = TranslationService::new(&config);
    assert!(matches!(result, Err(TranslationError::Memory(_))));
}
