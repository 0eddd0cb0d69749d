/*!
 * Integration tests for the full translation pipeline.
 *
 * Documents and cell batches go through segmentation, the batch
 * translator, the post-editor and reassembly with mock backends.
 */

use std::sync::Arc;

use mtbatch::providers::mock::{MockChat, MockEngine};
use mtbatch::{BatchOptions, TranslationService, FAILURE_MARKER};

use crate::common::{self, strings};

#[tokio::test]
async fn test_translateText_document_shouldKeepLayoutAndSkipPlaceholders() {
    let chat = MockChat::echo();
    let service = common::mock_service(&chat, &MockEngine::working("google"), None);

    let document = "第一行\n\n{$thinkTips}\n第二行\r\n第三行";
    let result = service.translate_text(None, document, "zh", "en").await.unwrap();

    assert_eq!(result, "[T] 第一行\n\n{$thinkTips}\n[T] 第二行\r\n[T] 第三行");
    assert_eq!(chat.request_count(), 1);
}

#[tokio::test]
async fn test_translateText_chatDown_shouldUseFallbackEngine() {
    common::init_test_logging();
    let chat = MockChat::failing();
    let fallback = MockEngine::working("google");
    let service = common::mock_service(&chat, &fallback, None);

    let result = service.translate_text(None, "一\n\n二", "zh", "en").await.unwrap();
    assert_eq!(result, "[MT] 一\n\n[MT] 二");
    assert_eq!(fallback.calls(), vec![strings(&["一", "二"])]);
}

#[tokio::test]
async fn test_translateText_everyEngineDown_shouldEmbedMarkers() {
    let service = common::mock_service(&MockChat::failing(), &MockEngine::failing("google"), None);

    let result = service.translate_text(None, "一\n\n二", "zh", "en").await.unwrap();
    assert_eq!(result, format!("{0}\n\n{0}", FAILURE_MARKER));
}

#[tokio::test]
async fn test_translateText_namedEngine_shouldBypassChat() {
    let chat = MockChat::echo();
    let fallback = MockEngine::working("google");
    let service = common::mock_service(&chat, &fallback, None);

    let result = service.translate_text(Some("Google"), "攻击", "zh", "en").await.unwrap();
    assert_eq!(result, "[MT] 攻击");
    assert_eq!(chat.request_count(), 0);
}

#[tokio::test]
async fn test_translateText_whitespaceOnly_shouldReturnInput() {
    let chat = MockChat::echo();
    let service = common::mock_service(&chat, &MockEngine::working("google"), None);

    let result = service.translate_text(None, " \n\n ", "zh", "en").await.unwrap();
    assert_eq!(result, " \n\n ");
    assert_eq!(chat.request_count(), 0);
}

#[tokio::test]
async fn test_translateTexts_autoSource_shouldDetectFromSample() {
    let chat = MockChat::echo();
    let fallback = MockEngine::working("google").with_detected_language("zh");
    let service = common::mock_service(&chat, &fallback, None);

    let cells = strings(&["攻击", "", "防御", "Ⅱ"]);
    let result = service.translate_texts(None, &cells, "auto", "en").await.unwrap();
    assert_eq!(result, strings(&["[T] 攻击", "", "[T] 防御", "Ⅱ"]));
}

#[tokio::test]
async fn test_translateTexts_manyCells_shouldKeepOrderAcrossChunks() {
    let chat = MockChat::delayed(vec![15, 0, 5, 25, 10]);
    let fallback = Arc::new(MockEngine::working("google"));
    let options = BatchOptions {
        max_length: 30,
        min_length: 20,
        ..BatchOptions::default()
    };
    let service = TranslationService::from_parts(Arc::new(chat.clone()), fallback, options, None);

    let cells: Vec<String> = (0..25).map(|i| format!("Cell number {} of the sheet", i)).collect();
    let result = service.translate_texts(None, &cells, "en", "de").await.unwrap();

    let expected: Vec<String> = cells.iter().map(|c| format!("[T] {}", c)).collect();
    assert_eq!(result, expected);
    assert!(chat.request_count() > 1);
}

#[tokio::test]
async fn test_translateTexts_sameLanguage_shouldMakeNoRequests() {
    let chat = MockChat::echo();
    let service = common::mock_service(&chat, &MockEngine::working("google"), None);

    let cells = strings(&["Hello", "World"]);
    let result = service.translate_texts(None, &cells, "en-GB", "eng").await.unwrap();
    assert_eq!(result, cells);
    assert_eq!(chat.request_count(), 0);
}

#[tokio::test]
async fn test_detectLanguage_shouldUseFallbackEngine() {
    let fallback = MockEngine::working("google").with_detected_language("fr");
    let service = common::mock_service(&MockChat::echo(), &fallback, None);
    assert_eq!(service.detect_language("Bonjour").await.unwrap(), "fr");
}
