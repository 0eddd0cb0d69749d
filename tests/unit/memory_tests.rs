/*!
 * Tests for the translation memory
 */

use mtbatch::{TmTable, TranslationMemory};

use crate::common::strings;

fn corpus() -> TmTable {
    TmTable::from_tsv_str(
        "STR_ID\t中文\t英语\n\
         1\t射手\tShooter\n\
         2\t骑手\tRider\n\
         3\t射击场\tRange\n\
         4\t攻击力\tAttack Power\n",
    )
    .unwrap()
}

#[test]
fn test_tmTable_fromTsvStr_shouldPadShortRows() {
    let table = TmTable::from_tsv_str("id\tzh\ten\tfr\r\n1\t射手\tShooter\r\n\r\n").unwrap();
    assert_eq!(table.headers, strings(&["id", "zh", "en", "fr"]));
    assert_eq!(table.rows, vec![strings(&["1", "射手", "Shooter", ""])]);
}

#[test]
fn test_tmTable_fromTsvStr_quotedCells_shouldBeKeptVerbatim() {
    // No quoting: a tab inside quotes still splits the cell
    let table = TmTable::from_tsv_str("id\tzh\ten\n1\t\"射手\"\t\"Sho\tter\"\n").unwrap();
    assert_eq!(table.rows, vec![strings(&["1", "\"射手\"", "\"Sho"])]);
}

#[test]
fn test_tmTable_fromTsvStr_withoutLanguageColumn_shouldFail() {
    assert!(TmTable::from_tsv_str("id\n1\n").is_err());
    assert!(TmTable::from_tsv_str("").is_err());
}

#[test]
fn test_search_everyResult_shouldBeSubstringOfQuery() {
    let tm = TranslationMemory::build(&corpus());
    let queries = ["射手的攻击力", "骑手", "射击", "完全无关", "射手射击场"];

    for query in queries {
        for (source, target) in tm.search(query, "zh", "en", 5) {
            assert!(query.contains(&source), "{:?} is not part of {:?}", source, query);
            assert!(!target.is_empty());
        }
    }
}

#[test]
fn test_search_regionalCodes_shouldResolveToCorpusLanguages() {
    let tm = TranslationMemory::build(&corpus());
    let result = tm.search("射手的攻击力", "zh-CN", "en-GB", 5);
    assert_eq!(result.get("射手").map(String::as_str), Some("Shooter"));
    assert_eq!(result.get("攻击力").map(String::as_str), Some("Attack Power"));
}

#[test]
fn test_search_reverseDirection_shouldUseOtherColumn() {
    let tm = TranslationMemory::build(&corpus());
    let result = tm.search("Rider ready", "en", "zh", 5);
    assert_eq!(result.get("Rider").map(String::as_str), Some("骑手"));
}

#[test]
fn test_search_concurrentReaders_shouldAgree() {
    let tm = std::sync::Arc::new(TranslationMemory::build(&corpus()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tm = tm.clone();
            std::thread::spawn(move || tm.search("射手和骑手", "zh", "en", 5))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.iter().all(|r| r == &results[0]));
    assert_eq!(results[0].len(), 2);
}
