use once_cell::sync::Lazy;
use regex::Regex;

/// Glyph, ASCII spelling, Arabic value
const ROMAN_NUMERALS: [(char, &str, &str); 10] = [
    ('Ⅰ', "I", "1"),
    ('Ⅱ', "II", "2"),
    ('Ⅲ', "III", "3"),
    ('Ⅳ', "IV", "4"),
    ('Ⅴ', "V", "5"),
    ('Ⅵ', "VI", "6"),
    ('Ⅶ', "VII", "7"),
    ('Ⅷ', "VIII", "8"),
    ('Ⅸ', "IX", "9"),
    ('Ⅹ', "X", "10"),
];

struct RomanForms {
    glyph: String,
    ascii: Regex,
    arabic: Regex,
}

static ROMAN_FORMS: Lazy<Vec<RomanForms>> = Lazy::new(|| {
    ROMAN_NUMERALS
        .iter()
        .map(|(glyph, ascii, arabic)| RomanForms {
            glyph: glyph.to_string(),
            ascii: Regex::new(&format!(r"(?i)\b{}\b", ascii)).unwrap(),
            arabic: Regex::new(&format!(r"\b{}\b", arabic)).unwrap(),
        })
        .collect()
});

/// Offset of `byte` within `text` as a fraction of its character length
fn relative_position(text: &str, byte: usize) -> f64 {
    let total = text.chars().count().max(1);
    text[..byte].chars().count() as f64 / total as f64
}

/// Rewrite the matches of `form` that line up with the glyphs of `source`
///
/// Each glyph claims the unclaimed match whose relative position in `target`
/// is closest to its own in `source`, so a pronoun "I" far from where the
/// numeral sits is left alone.
fn restore_nearest(source: &str, target: &str, glyph: &str, form: &Regex) -> String {
    let candidates: Vec<(usize, usize)> = form.find_iter(target).map(|m| (m.start(), m.end())).collect();
    let positions: Vec<f64> = candidates
        .iter()
        .map(|&(start, end)| relative_position(target, (start + end) / 2))
        .collect();
    let mut claimed: Vec<usize> = Vec::new();

    for (offset, _) in source.match_indices(glyph) {
        let spot = relative_position(source, offset);
        let nearest = positions
            .iter()
            .enumerate()
            .filter(|(index, _)| !claimed.contains(index))
            .min_by(|(_, a), (_, b)| (*a - spot).abs().total_cmp(&(*b - spot).abs()))
            .map(|(index, _)| index);
        match nearest {
            Some(index) => claimed.push(index),
            None => break,
        }
    }

    let mut restored = target.to_string();
    claimed.sort_unstable_by(|a, b| b.cmp(a));
    for index in claimed {
        let (start, end) = candidates[index];
        restored.replace_range(start..end, glyph);
    }
    restored
}

/// Restore Roman numeral glyphs the engine spelled out
///
/// For every glyph in `source` that is missing from `target`, a whole-word
/// ASCII ("ii") or Arabic ("2") rendering in `target` is rewritten back to
/// the glyph, unless `source` uses that rendering itself. Only as many
/// renderings as the source has glyphs are rewritten, picked by position.
pub fn normalize_unicode_romans(source: &str, target: &str) -> String {
    let mut target = target.to_string();

    for forms in ROMAN_FORMS.iter() {
        if !source.contains(&forms.glyph) || target.contains(&forms.glyph) {
            continue;
        }
        for form in [&forms.ascii, &forms.arabic] {
            if form.is_match(source) || !form.is_match(&target) {
                continue;
            }
            target = restore_nearest(source, &target, &forms.glyph, form);
            break;
        }
    }

    target
}
