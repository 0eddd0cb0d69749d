/*!
 * Integration tests for translation memory corpora loaded from disk
 */

use mtbatch::providers::mock::{MockChat, MockEngine};
use mtbatch::{TranslationMemory, TranslationService};

use crate::common::{self, strings};

#[test]
fn test_fromTsvPath_corpusFile_shouldIndexLanguageColumns() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_corpus(temp_dir.path(), "tm.tsv").unwrap();

    let tm = TranslationMemory::from_tsv_path(&path).unwrap();
    assert_eq!(tm.len(), 3);
    assert_eq!(tm.languages(), strings(&["zh", "en", "fr"]));

    let result = tm.search("射手和骑手", "zh", "fr", 5);
    assert_eq!(result.get("射手").map(String::as_str), Some("Tireur"));
    assert_eq!(result.get("骑手").map(String::as_str), Some("Cavalier"));
}

#[tokio::test]
async fn test_translateTexts_withMemory_shouldPinTerminology() {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_corpus(temp_dir.path(), "tm.tsv").unwrap();
    let tm = TranslationMemory::from_tsv_path(&path).unwrap();

    let chat = MockChat::echo();
    let service = common::mock_service(&chat, &MockEngine::working("google"), Some(tm));

    let cells = strings(&["射手", "射手出击", "骑手"]);
    let result = service.translate_texts(None, &cells, "zh", "en").await.unwrap();

    // Exact hits are answered from the memory without a request
    assert_eq!(result, strings(&["Shooter", "[T] 射手出击", "Rider"]));
    assert_eq!(chat.request_count(), 1);

    let request = &chat.requests()[0];
    assert_eq!(request.len(), 4);
    assert_eq!(request[1].role, "user");
    assert!(request[1].content.contains("射手"));
    assert_eq!(request[2].role, "assistant");
    assert_eq!(request[2].content, "Shooter");
    assert_eq!(MockChat::source_lines(request), Some(strings(&["射手出击"])));
}

#[tokio::test]
async fn test_translateText_memoryUpdatedAtRuntime_shouldBeUsed() {
    let tm = TranslationMemory::empty();
    tm.add("boss", "首领", "Boss", "zh", "en").unwrap();

    let chat = MockChat::echo();
    let service = common::mock_service(&chat, &MockEngine::working("google"), Some(tm));

    let result = service.translate_text(None, "首领\n首领登场", "zh", "en").await.unwrap();
    assert_eq!(result, "Boss\n[T] 首领登场");
    assert_eq!(chat.request_count(), 1);
}

#[test]
fn test_serviceNew_configuredCorpus_shouldLoadMemory() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_corpus(temp_dir.path(), "tm.tsv").unwrap();

    let mut config = common::config_with_keys();
    config.memory.path = Some(path.to_string_lossy().into_owned());

    let service = TranslationService::new(&config).unwrap();
    assert_eq!(service.memory().map(|tm| tm.len()), Some(3));
}

#[test]
fn test_translateTexts_blockingCaller_shouldUseExactHits() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_corpus(temp_dir.path(), "tm.tsv").unwrap();
    let tm = TranslationMemory::from_tsv_path(&path).unwrap();

    let chat = MockChat::echo();
    let service = common::mock_service(&chat, &MockEngine::working("google"), Some(tm));

    let result = tokio_test::block_on(async {
        service
            .translate_texts(None, &strings(&["射手", "射击场"]), "zh-CN", "fr")
            .await
            .unwrap()
    });
    assert_eq!(result, strings(&["Tireur", "Stand de tir"]));
    assert_eq!(chat.request_count(), 0);
}
