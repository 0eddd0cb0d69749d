use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Numeric substitution tokens: `{0}`
static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\d+\}").unwrap());

static COLOR_SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[color=#[0-9A-F]{6}\].*?\[/color\]").unwrap());

static BOLD_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[b\].*?\[/b\]").unwrap());

static CLOSING_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[/[\x20-\x7E]+?\]").unwrap());

static COLOR_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[color[\x20-\x7E]+?\]").unwrap());

static SPACED_NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\s*(\d+)\s*\}").unwrap());

/// Whitespace between two bracket characters
static BRACKET_GAP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\]\{\}/]\s+[\[\]\{\}/]").unwrap());

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static MARKUP_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<colorprefix>\[color=#[0-9A-F]{6}\])(?P<colorcontent>.*?)(?P<colorsuffix>\[/color\])|(?P<boldprefix>\[b\])(?P<boldcontent>.*?)(?P<boldsuffix>\[/b\])",
    )
    .unwrap()
});

/// Occurrences of each placeholder family: numeric, color span, bold span
pub fn placeholder_counts(text: &str) -> [usize; 3] {
    [
        NUMERIC_REGEX.find_iter(text).count(),
        COLOR_SPAN_REGEX.find_iter(text).count(),
        BOLD_SPAN_REGEX.find_iter(text).count(),
    ]
}

/// Whether every placeholder family occurs as often in `target` as in `source`
pub fn verify_placeholders(source: &str, target: &str) -> bool {
    placeholder_counts(source) == placeholder_counts(target)
}

fn compact(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, "").into_owned()
}

fn normalize_color_tag(tag: &str) -> String {
    let tag = compact(tag);
    match tag.split_once('#') {
        Some((head, hex)) => format!("{}#{}", head.to_lowercase(), hex.to_uppercase()),
        None => tag.to_lowercase(),
    }
}

fn repair_once(target: &str) -> String {
    let repaired = CLOSING_TAG_REGEX.replace_all(target, |caps: &Captures| compact(&caps[0]).to_lowercase());
    let repaired = COLOR_TAG_REGEX.replace_all(&repaired, |caps: &Captures| normalize_color_tag(&caps[0]));
    let repaired = SPACED_NUMERIC_REGEX.replace_all(&repaired, "{$1}");
    BRACKET_GAP_REGEX
        .replace_all(&repaired, |caps: &Captures| compact(&caps[0]))
        .into_owned()
}

/// Undo whitespace and case damage inside markup
///
/// `[/ Color ]` becomes `[/color]`, `[Color = #ff00aa]` becomes
/// `[color=#FF00AA]`, `{ 0 }` becomes `{0}`, and whitespace between
/// adjacent bracket characters is removed. Repeats until stable.
pub fn repair_syntax(target: &str) -> String {
    let mut current = target.to_string();
    loop {
        let next = repair_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// A slice of a source string, either translatable text or markup to keep verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    Markup(&'a str),
}

fn push_text<'a>(pieces: &mut Vec<Piece<'a>>, text: &'a str) {
    let mut last = 0;
    for token in NUMERIC_REGEX.find_iter(text) {
        if token.start() > last {
            pieces.push(Piece::Text(&text[last..token.start()]));
        }
        pieces.push(Piece::Markup(token.as_str()));
        last = token.end();
    }
    if last < text.len() {
        pieces.push(Piece::Text(&text[last..]));
    }
}

/// Split `text` at every color/bold span boundary and numeric token
///
/// Concatenating the pieces gives back `text`.
pub fn split_markup(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for caps in MARKUP_SPAN_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut pieces, &text[last..whole.start()]);

        let (prefix, content, suffix) = if caps.name("colorprefix").is_some() {
            ("colorprefix", "colorcontent", "colorsuffix")
        } else {
            ("boldprefix", "boldcontent", "boldsuffix")
        };
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());

        pieces.push(Piece::Markup(group(prefix)));
        push_text(&mut pieces, group(content));
        pieces.push(Piece::Markup(group(suffix)));
        last = whole.end();
    }

    push_text(&mut pieces, &text[last..]);
    pieces
}
