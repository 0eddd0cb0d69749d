/*!
 * Tests for error types and conversions
 */

use mtbatch::errors::{AppError, FailureReason, ProviderError, TranslationError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_timeout_shouldDisplaySeconds() {
    let display = ProviderError::Timeout(30).to_string();
    assert!(display.contains("30 seconds"));
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::ConnectionError("Host unreachable".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::ConnectionError(_))));
    assert!(error.to_string().contains("Host unreachable"));
}

#[test]
fn test_translationError_languageUnsupported_shouldNameLanguageAndEngine() {
    let error = TranslationError::LanguageUnsupported {
        language: "tlh".to_string(),
        engine: "google".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("'tlh'"));
    assert!(display.contains("'google'"));
}

#[test]
fn test_appError_fromTranslationError_shouldWrap() {
    let error: AppError = TranslationError::UnknownEngine("deepl".to_string()).into();
    assert!(matches!(error, AppError::Translation(TranslationError::UnknownEngine(_))));
    assert!(error.to_string().contains("deepl"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "tm.tsv missing");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_failureReason_misaligned_shouldDisplayCounts() {
    let reason = FailureReason::Misaligned {
        expected: 5,
        received: 4,
    };
    assert_eq!(reason.to_string(), "reply has 4 usable lines, expected 5");
    assert_eq!(reason.clone(), reason);
}
