/*!
 * Post-edit pass over raw engine output.
 *
 * Every translation gets the target-language rules, Roman numeral
 * restoration and an upper-case first letter. When placeholders did not
 * survive, the markup is repaired syntactically; if that is not enough the
 * source is split around its markup, only the text between tags is
 * re-translated, and the untouched tags are spliced back in.
 */

use log::{debug, warn};
use std::sync::Arc;

use crate::providers::Engine;
use crate::translation::FAILURE_MARKER;

pub mod placeholders;
pub mod roman;
pub mod rules;

pub use placeholders::{repair_syntax, split_markup, verify_placeholders, Piece};
pub use roman::normalize_unicode_romans;
pub use rules::apply_language_rules;

/// Upper-case the first character
pub fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rules applied to every translation regardless of placeholder state
fn normalize(source: &str, target: &str, target_language: &str) -> String {
    let target = apply_language_rules(source, target, target_language);
    let target = normalize_unicode_romans(source, &target);
    upper_first(&target)
}

/// Placeholder guard and stylistic corrections
#[derive(Debug, Clone)]
pub struct PostEditor {
    /// Engine for re-translating text between markup
    engine: Arc<dyn Engine>,
}

impl PostEditor {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Correct every translation in `target` against its source in `origin`
    pub async fn post_edit(
        &self,
        origin: &[String],
        target: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Vec<String> {
        let mut edited = Vec::with_capacity(target.len());
        for (index, translation) in target.iter().enumerate() {
            let source = origin.get(index).map(String::as_str).unwrap_or_default();
            edited.push(
                self.post_edit_one(source, translation, source_language, target_language)
                    .await,
            );
        }
        edited
    }

    /// Correct a single translation
    pub async fn post_edit_one(
        &self,
        source: &str,
        target: &str,
        source_language: &str,
        target_language: &str,
    ) -> String {
        if target == FAILURE_MARKER {
            return target.to_string();
        }

        let edited = normalize(source, target, target_language);
        if verify_placeholders(source, &edited) {
            return edited;
        }

        let repaired = normalize(source, &repair_syntax(&edited), target_language);
        if verify_placeholders(source, &repaired) {
            return repaired;
        }

        debug!("Placeholders lost in '{}', re-translating around markup", source);
        match self.stitch(source, source_language, target_language).await {
            Some(stitched) => {
                let stitched = normalize(source, &stitched, target_language);
                if verify_placeholders(source, &stitched) {
                    return stitched;
                }
                warn!("Could not restore placeholders for '{}'", source);
                repaired
            }
            None => repaired,
        }
    }

    /// Translate the text between markup of `source` and splice the markup back in
    async fn stitch(&self, source: &str, source_language: &str, target_language: &str) -> Option<String> {
        let pieces = split_markup(source);
        let texts: Vec<String> = pieces
            .iter()
            .filter_map(|piece| match piece {
                Piece::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
                _ => None,
            })
            .collect();

        let translations = if texts.is_empty() {
            Vec::new()
        } else {
            match self.engine.batch_translate(&texts, source_language, target_language).await {
                Ok(translations) if translations.len() == texts.len() => translations,
                Ok(_) => {
                    warn!("Engine '{}' returned a wrong number of segments", self.engine.name());
                    return None;
                }
                Err(e) => {
                    warn!("Re-translation around markup failed: {}", e);
                    return None;
                }
            }
        };

        let mut translations = translations.into_iter();
        let mut stitched = String::with_capacity(source.len());
        for piece in pieces {
            match piece {
                Piece::Markup(markup) => stitched.push_str(markup),
                Piece::Text(text) if text.trim().is_empty() => stitched.push_str(text),
                Piece::Text(text) => {
                    let leading = &text[..text.len() - text.trim_start().len()];
                    let trailing = &text[text.trim_end().len()..];
                    stitched.push_str(leading);
                    stitched.push_str(translations.next()?.trim());
                    stitched.push_str(trailing);
                }
            }
        }

        Some(stitched)
    }
}
