/*!
 * Reply parsing for chunk requests.
 *
 * The model answers with one line per source line. Source units may span
 * several lines, so the reply is walked unit by unit, each consuming as
 * many lines as it has. Any disagreement fails the whole chunk.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::FailureReason;

static LEADING_ORDINAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());

static DOUBLED_ORDINAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s?(\d+\.)").unwrap());

fn followed_by_digit(text: &str, at: usize) -> bool {
    text[at..].starts_with(|c: char| c.is_ascii_digit())
}

/// End of a leading "N." list number; "2.5" is a decimal, not numbering
fn leading_ordinal(text: &str) -> Option<usize> {
    let found = LEADING_ORDINAL_REGEX.find(text)?;
    let dot_end = text[..found.end()].trim_end().len();
    (!followed_by_digit(text, dot_end)).then_some(found.end())
}

/// A leading "N. M." pair, unless the second number is a decimal
fn doubled_ordinal(text: &str) -> bool {
    DOUBLED_ORDINAL_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .is_some_and(|second| !followed_by_digit(text, second.end()))
}

/// Split off the line breaks around a unit
///
/// Returns the leading whitespace up to its last line break, the core text
/// and the trailing whitespace from its first line break. A chat reply
/// cannot carry those edge lines, so they are restored after alignment.
pub fn split_line_edges(text: &str) -> (&str, &str, &str) {
    let content_start = text.len() - text.trim_start().len();
    let content_end = text.trim_end().len();
    if content_start >= content_end {
        return ("", text, "");
    }

    let lead_end = text[..content_start].rfind('\n').map_or(0, |i| i + 1);
    let trail_start = text[content_end..]
        .find(['\r', '\n'])
        .map_or(text.len(), |i| content_end + i);

    (&text[..lead_end], &text[lead_end..trail_start], &text[trail_start..])
}

fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

fn blank_layout<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<bool> {
    lines.map(|line| line.trim().is_empty()).collect()
}

/// Split a reply into per-unit translations
///
/// Translations are trimmed; the chunk fails unless every unit receives a
/// non-empty translation and every reply line is consumed.
pub fn align_reply(reply: &str, sources: &[&str]) -> Result<Vec<String>, FailureReason> {
    let reply = reply.trim_matches(|c| c == '\n' || c == '\r');
    let lines: Vec<&str> = if reply.is_empty() {
        Vec::new()
    } else {
        reply.split('\n').map(|line| line.trim_end_matches('\r')).collect()
    };

    let expected: usize = sources.iter().map(|source| line_count(source)).sum();
    let misaligned = || FailureReason::Misaligned {
        expected,
        received: lines.len(),
    };

    let mut translations = Vec::with_capacity(sources.len());
    let mut consumed = 0;
    for source in sources {
        let needed = line_count(source);
        let Some(taken) = lines.get(consumed..consumed + needed) else {
            return Err(misaligned());
        };
        consumed += needed;

        if needed > 1
            && blank_layout(source.split('\n')) != blank_layout(taken.iter().copied())
        {
            return Err(FailureReason::LayoutChanged);
        }

        let translation = taken.join("\n").trim().to_string();
        if translation.is_empty() {
            return Err(misaligned());
        }
        translations.push(translation);
    }

    if consumed != lines.len() {
        return Err(misaligned());
    }

    Ok(translations)
}

/// Remove list numbering the model invented
///
/// A leading "N." is dropped when the source has none; a doubled "N. M."
/// is collapsed to "M." when the source starts with a single "N.".
pub fn fix_ordinal_numbers(source: &str, target: &str) -> String {
    let source_numbered = leading_ordinal(source).is_some();

    if !source_numbered && leading_ordinal(target).is_some() {
        let mut stripped = target;
        while let Some(end) = leading_ordinal(stripped) {
            stripped = &stripped[end..];
        }
        return stripped.trim().to_string();
    }

    if source_numbered && !doubled_ordinal(source) && doubled_ordinal(target) {
        return DOUBLED_ORDINAL_REGEX.replace(target, "$1").trim().to_string();
    }

    target.to_string()
}
