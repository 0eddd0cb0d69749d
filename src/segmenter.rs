/*!
 * Text segmentation into translation units.
 *
 * A document is split on runs of line breaks. Every run is kept as its own
 * pass-through segment, so joining all segment texts gives back the input
 * byte for byte. Each remaining piece becomes a translation unit.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language_utils::closest_supported_match;

/// Runs of line breaks
static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\r]+").unwrap());

/// A single Latin letter on both sides of a line break (broken hyphenation)
static MERGE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z](\s*[\n\r]+\s*)[A-Za-z]").unwrap());

/// Whitespace around line breaks inside a merged unit
static MERGED_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[\n\r]+\s*").unwrap());

/// Units consisting of a single `{$identifier}` placeholder
static PLACEHOLDER_ONLY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{\$[A-Za-z_][A-Za-z0-9_]*\}$").unwrap());

static HAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}").unwrap());

static LATIN_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]{2,}").unwrap());

/// Below this many words, letters split by a line break are merged back
const MERGE_WORD_LIMIT: usize = 5;

/// Kind of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Text that may be sent to translation
    Unit,
    /// A run of line breaks, never translated
    Separator,
}

/// A contiguous slice of the original document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Exact original text
    pub text: String,
    pub kind: SegmentKind,
    /// Whether a line break inside this unit was merged away
    pub merged: bool,
}

/// The smallest independently translatable span of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Ordinal position of the unit's segment in the document
    pub id: usize,
    /// Original text of the unit
    pub text: String,
    /// Whether the unit has to be sent to an engine at all
    pub needs_translation: bool,
    merged: bool,
}

impl TranslationUnit {
    /// Build a standalone unit, e.g. one spreadsheet cell
    pub fn new(id: usize, text: impl Into<String>, source_language: &str) -> Self {
        let text = text.into();
        Self {
            id,
            needs_translation: needs_translation(&text, source_language),
            text,
            merged: false,
        }
    }

    /// Text sent to the engine
    ///
    /// Merged hyphenation breaks are collapsed to a single space; other
    /// embedded line breaks are kept.
    pub fn query(&self) -> String {
        if self.merged {
            MERGED_BREAK_REGEX.replace_all(&self.text, " ").into_owned()
        } else {
            self.text.clone()
        }
    }
}

/// Split a document into units and pass-through separators
pub fn segment(text: &str) -> Vec<Segment> {
    let protected: Vec<std::ops::Range<usize>> = if text.split_whitespace().count() < MERGE_WORD_LIMIT {
        MERGE_REGEX
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.range())
            .collect()
    } else {
        Vec::new()
    };

    let mut segments = Vec::new();
    let mut unit_start = 0;
    let mut merged = false;

    for separator in SEPARATOR_REGEX.find_iter(text) {
        if protected.iter().any(|range| range.contains(&separator.start())) {
            merged = true;
            continue;
        }

        if separator.start() > unit_start {
            segments.push(Segment {
                text: text[unit_start..separator.start()].to_string(),
                kind: SegmentKind::Unit,
                merged,
            });
        }
        segments.push(Segment {
            text: separator.as_str().to_string(),
            kind: SegmentKind::Separator,
            merged: false,
        });
        unit_start = separator.end();
        merged = false;
    }

    if unit_start < text.len() {
        segments.push(Segment {
            text: text[unit_start..].to_string(),
            kind: SegmentKind::Unit,
            merged,
        });
    }

    segments
}

/// Translation units of a segmented document, in document order
pub fn units(segments: &[Segment], source_language: &str) -> Vec<TranslationUnit> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.kind == SegmentKind::Unit)
        .map(|(id, segment)| TranslationUnit {
            id,
            text: segment.text.clone(),
            needs_translation: needs_translation(&segment.text, source_language),
            merged: segment.merged,
        })
        .collect()
}

/// Join segments back together, substituting translated units
///
/// `translated` is indexed like `segments`; `None` keeps the original text.
pub fn reassemble(segments: &[Segment], translated: &[Option<String>]) -> String {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| match translated.get(i) {
            Some(Some(text)) if segment.kind == SegmentKind::Unit => text.as_str(),
            _ => segment.text.as_str(),
        })
        .collect()
}

/// Whether a unit has to be translated for the given source language
pub fn needs_translation(text: &str, source_language: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || PLACEHOLDER_ONLY_REGEX.is_match(trimmed) {
        return false;
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return false;
    }

    match closest_supported_match(source_language, &["en", "zh"]).as_deref() {
        // Acronyms and codes such as "HP", "123ABC"
        Some("en") => trimmed.chars().any(|c| !(c.is_ascii_digit() || c.is_ascii_uppercase())),
        Some("zh") => HAN_REGEX.is_match(trimmed) || LATIN_WORD_REGEX.is_match(trimmed),
        _ => true,
    }
}

/// Tame ALL-CAPS text: Title Case for short text, lower case otherwise
pub fn normalize_case(text: &str) -> String {
    let has_cased = text.chars().any(|c| c.is_lowercase() || c.is_uppercase());
    if !has_cased || text.chars().any(char::is_lowercase) {
        return text.to_string();
    }

    if text.split_whitespace().count() < 4 {
        title_case(text)
    } else {
        text.to_lowercase()
    }
}

fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_alphabetic = false;
    for c in text.chars() {
        if previous_alphabetic {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_alphabetic = c.is_alphabetic();
    }
    result
}
