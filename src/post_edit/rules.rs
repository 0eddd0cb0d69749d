use once_cell::sync::Lazy;
use regex::Regex;

use crate::language_utils::language_codes_match;

/// Rewrites one target string given its source
pub type LanguageRule = fn(&str, &str) -> String;

static PERCENT_AFTER_PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\{\d+\})(\s*)%").unwrap());

/// Turkish writes the percent sign before the number
fn turkish_percent(_source: &str, target: &str) -> String {
    PERCENT_AFTER_PLACEHOLDER_REGEX
        .replace_all(target, "%${1}${2}")
        .into_owned()
}

static LANGUAGE_RULES: &[(&str, LanguageRule)] = &[("tr", turkish_percent)];

/// Apply the rules registered for `target_language`
pub fn apply_language_rules(source: &str, target: &str, target_language: &str) -> String {
    LANGUAGE_RULES
        .iter()
        .filter(|(language, _)| language_codes_match(language, target_language))
        .fold(target.to_string(), |text, (_, rule)| rule(source, &text))
}
