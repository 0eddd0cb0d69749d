/*!
 * Tests for chunked batch translation: ordering, retry ladder and fallback
 */

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use mtbatch::errors::FailureReason;
use mtbatch::providers::mock::{MockChat, MockEngine};
use mtbatch::{BatchOptions, FAILURE_MARKER};

use crate::common::{self, strings};

fn sentences(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Sentence number {} goes here", i)).collect()
}

#[tokio::test]
async fn test_translateBatch_randomCompletionOrder_shouldKeepInputOrder() {
    let mut rng = rand::rng();
    let mut delays: Vec<u64> = (0..10).map(|_| rng.random_range(0..30)).collect();
    delays.shuffle(&mut rng);

    let chat = MockChat::delayed(delays);
    let fallback = MockEngine::working("google");
    let options = BatchOptions {
        max_length: 30,
        min_length: 20,
        window_size: 8,
        ..BatchOptions::default()
    };
    let batch = common::batch_translator(&chat, &fallback, options);

    // Every sentence costs 7 tokens, so each 30-token chunk holds four
    let texts = sentences(40);
    let result = batch.translate_batch(&texts, "en", "fr", None).await;

    let expected: Vec<String> = texts.iter().map(|t| format!("[T] {}", t)).collect();
    assert_eq!(result, expected);
    assert_eq!(chat.request_count(), 10);
    assert!(fallback.calls().is_empty());
}

#[tokio::test]
async fn test_translateBatch_chunkBoundary_shouldFlushBeforeOverflow() {
    // 800 ASCII characters cost 200 tokens
    let unit = "b".repeat(800);
    let texts = vec![unit.clone(), unit.clone(), unit];
    let chat = MockChat::echo();
    let batch = common::batch_translator(&chat, &MockEngine::working("google"), BatchOptions::default());

    let result = batch.translate_batch(&texts, "en", "fr", None).await;
    assert!(result.iter().all(|t| t.starts_with("[T] ")));

    let mut sizes: Vec<usize> = chat
        .requests()
        .iter()
        .filter_map(|messages| MockChat::source_lines(messages))
        .map(|lines| lines.len())
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 2]);
}

#[tokio::test]
async fn test_translateBatch_replyMissingLine_shouldRetryThenFallback() {
    let chat = MockChat::drop_line();
    let fallback = MockEngine::working("google");
    let batch = common::batch_translator(&chat, &fallback, BatchOptions::default());

    let texts = strings(&["一", "二", "三", "四", "五"]);
    let result = batch.translate_units(&texts, "zh", "en", None).await;

    let expected: Vec<Result<String, FailureReason>> = texts.iter().map(|t| Ok(format!("[MT] {}", t))).collect();
    assert_eq!(result, expected);
    // One request per budget: 500, 250, 125, 62 and 31
    assert_eq!(chat.request_count(), 5);
    assert_eq!(fallback.calls(), vec![texts]);
}

#[tokio::test]
async fn test_translateBatch_onlyBadChunkRetried_shouldKeepGoodChunks() {
    // Two 15-token units per 30-token chunk; the three-line unit overflows the mock
    let short = "c".repeat(60);
    let texts = vec![short.clone(), short.clone(), "x\ny\nz".to_string(), short];
    let chat = MockChat::fail_above(2);
    let fallback = MockEngine::working("google");
    let options = BatchOptions {
        max_length: 30,
        min_length: 1,
        ..BatchOptions::default()
    };
    let batch = common::batch_translator(&chat, &fallback, options);

    let result = batch.translate_units(&texts, "en", "fr", None).await;

    assert_eq!(result[0], Ok(format!("[T] {}", texts[0])));
    assert_eq!(result[1], Ok(format!("[T] {}", texts[1])));
    assert_eq!(result[3], Ok(format!("[T] {}", texts[3])));
    // A lone three-line unit always exceeds the mock's limit
    assert_eq!(result[2], Ok("[MT] x\ny\nz".to_string()));
    assert_eq!(fallback.calls(), vec![vec!["x\ny\nz".to_string()]]);
}

#[tokio::test]
async fn test_translateBatch_requestTimeout_shouldFallBack() {
    let chat = MockChat::delayed(vec![2_000]);
    let fallback = MockEngine::working("google");
    let batch = common::batch_translator(&chat, &fallback, common::fast_options());

    let result = batch.translate_batch(&strings(&["一", "二"]), "zh", "en", None).await;
    assert_eq!(result, strings(&["[MT] 一", "[MT] 二"]));
    assert_eq!(chat.request_count(), 5);
}

#[tokio::test]
async fn test_translateBatch_everyEngineFails_shouldReturnMarkers() {
    let batch = common::batch_translator(
        &MockChat::failing(),
        &MockEngine::failing("google"),
        BatchOptions::default(),
    );

    let texts = strings(&["一", "", "三"]);
    let result = batch.translate_batch(&texts, "zh", "en", None).await;
    assert_eq!(result, vec![FAILURE_MARKER.to_string(), String::new(), FAILURE_MARKER.to_string()]);
}

#[tokio::test]
async fn test_translateBatch_multiLineUnit_shouldKeepBlankLines() {
    let chat = MockChat::echo();
    let batch = common::batch_translator(&chat, &MockEngine::working("google"), BatchOptions::default());

    let texts = strings(&["第一段\n\n第二段", "三"]);
    let result = batch.translate_batch(&texts, "zh", "en", None).await;
    assert_eq!(result, strings(&["[T] 第一段\n\n[T] 第二段", "[T] 三"]));
    assert_eq!(chat.request_count(), 1);
}

#[tokio::test]
async fn test_translateBatch_edgeLineBreaks_shouldStayWithChatEngine() {
    let chat = MockChat::echo();
    let fallback = MockEngine::working("google");
    let batch = common::batch_translator(&chat, &fallback, BatchOptions::default());

    let texts = strings(&["Hello", "World", "Good bye\n", "\r\nSee you"]);
    let result = batch.translate_batch(&texts, "en", "fr", None).await;
    assert_eq!(result, strings(&["[T] Hello", "[T] World", "[T] Good bye\n", "\r\n[T] See you"]));
    assert_eq!(chat.request_count(), 1);
    assert!(fallback.calls().is_empty());

    let request = &chat.requests()[0];
    assert_eq!(
        MockChat::source_lines(request),
        Some(strings(&["Hello", "World", "Good bye", "See you"]))
    );
}

#[tokio::test]
async fn test_translateBatch_emptyInput_shouldMakeNoRequests() {
    let chat = MockChat::echo();
    let fallback = MockEngine::working("google");
    let batch = common::batch_translator(&chat, &fallback, BatchOptions::default());

    let result = batch.translate_batch(&[], "zh", "en", Some(&Default::default())).await;
    assert!(result.is_empty());
    assert_eq!(chat.request_count(), 0);
    assert!(fallback.calls().is_empty());
}

#[tokio::test]
async fn test_translateBatch_slowWindow_shouldNotExceedTimeout() {
    let chat = MockChat::delayed(vec![10]);
    let batch = common::batch_translator(&chat, &MockEngine::working("google"), common::fast_options());

    let started = std::time::Instant::now();
    let result = batch.translate_batch(&sentences(3), "en", "fr", None).await;
    assert!(result.iter().all(|t| t.starts_with("[T] ")));
    assert!(started.elapsed() < Duration::from_secs(2));
}
