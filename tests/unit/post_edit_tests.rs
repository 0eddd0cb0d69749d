/*!
 * Tests for the placeholder guard and stylistic corrections
 */

use std::sync::Arc;

use mtbatch::post_edit::{repair_syntax, split_markup, verify_placeholders, Piece};
use mtbatch::providers::mock::MockEngine;
use mtbatch::PostEditor;

use crate::common::strings;

#[test]
fn test_verifyPlaceholders_countsAndFormatting_shouldCompare() {
    let source = "造成[color=#FF0000]{0}点[/color]伤害";
    assert!(verify_placeholders(source, "Deal [color=#FF0000]{0}[/color] damage"));
    assert!(!verify_placeholders(source, "Deal {0} damage"));
    assert!(!verify_placeholders(source, "Deal [Color=#ff0000]{0}[/color] damage"));
    assert!(verify_placeholders("攻击", "Attack"));
}

#[test]
fn test_repairSyntax_spacedMarkup_shouldBeRestored() {
    assert_eq!(
        repair_syntax("Deal [color=#FF0000] {0} [ / color] damage"),
        "Deal [color=#FF0000]{0}[/color] damage"
    );
    assert_eq!(repair_syntax("{ 1 } and { 2 }"), "{1} and {2}");
}

#[test]
fn test_splitMarkup_shouldAlternateTextAndTags() {
    let pieces = split_markup("[b]攻击[/b]+{0}");
    assert_eq!(
        pieces,
        vec![
            Piece::Markup("[b]"),
            Piece::Text("攻击"),
            Piece::Markup("[/b]"),
            Piece::Text("+"),
            Piece::Markup("{0}"),
        ]
    );
}

#[tokio::test]
async fn test_postEdit_mixedBatch_shouldFixEveryUnit() {
    let engine = MockEngine::working("google");
    let editor = PostEditor::new(Arc::new(engine.clone()));

    let origin = strings(&["近战部队攻击Ⅰ", "[b]攻击[/b]", "造成{0}点伤害"]);
    let target = strings(&["melee troop attack i", "[b]attack[ / b]", "deal { 0 } damage"]);
    let result = editor.post_edit(&origin, &target, "zh", "en").await;

    assert_eq!(result, strings(&["Melee troop attack Ⅰ", "[b]attack[/b]", "Deal {0} damage"]));
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_postEdit_turkishPercent_shouldMoveSign() {
    let editor = PostEditor::new(Arc::new(MockEngine::working("google")));
    let result = editor.post_edit_one("攻击力+{0}%", "saldırı gücü +{0}%", "zh", "tr").await;
    assert_eq!(result, "Saldırı gücü +%{0}");
}
