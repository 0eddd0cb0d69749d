use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for language tag handling
///
/// Translation backends and translation-memory corpora name languages in
/// slightly different ways ("zh", "zh-TW", "zh_Hant", "chi", "英语").
/// Everything in this module funnels those spellings into one canonical
/// form: an ISO 639-1 base (ISO 639-2/T when no 639-1 code exists),
/// followed by an optional title-case script and upper-case region.
/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Informal codes that show up in spreadsheet headers
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("cn", "zh"),
    ("tw", "zh-TW"),
    ("hk", "zh-HK"),
    ("jp", "ja"),
    ("kr", "ko"),
    ("br", "pt-BR"),
];

/// Chinese language names used as column headers, longest first so that
/// "巴西葡萄牙语" wins over "葡萄牙语"
const CHINESE_HEADER_NAMES: &[(&str, &str)] = &[
    ("巴西葡萄牙语", "pt-BR"),
    ("中文繁體", "zh-Hant"),
    ("中文繁体", "zh-Hant"),
    ("繁體中文", "zh-Hant"),
    ("繁体中文", "zh-Hant"),
    ("简体中文", "zh-Hans"),
    ("葡萄牙语", "pt"),
    ("西班牙语", "es"),
    ("意大利语", "it"),
    ("阿拉伯语", "ar"),
    ("土耳其语", "tr"),
    ("印尼语", "id"),
    ("越南语", "vi"),
    ("丹麦语", "da"),
    ("挪威语", "no"),
    ("瑞典语", "sv"),
    ("芬兰语", "fi"),
    ("荷兰语", "nl"),
    ("波兰语", "pl"),
    ("马来语", "ms"),
    ("繁體", "zh-Hant"),
    ("繁体", "zh-Hant"),
    ("中文", "zh"),
    ("简体", "zh-Hans"),
    ("英文", "en"),
    ("英语", "en"),
    ("日语", "ja"),
    ("日文", "ja"),
    ("韩语", "ko"),
    ("韩文", "ko"),
    ("法语", "fr"),
    ("德语", "de"),
    ("俄语", "ru"),
    ("泰语", "th"),
];

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        if let Some((_, part2t)) = PART2B_TO_PART2T.iter().find(|(b, _)| *b == normalized_code) {
            return Ok((*part2t).to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let part2t = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&part2t)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(lang.to_639_1().map(str::to_string).unwrap_or(part2t))
}

/// A parsed language tag
#[derive(Debug, Clone, PartialEq, Eq)]
struct LanguageTag {
    base: String,
    script: Option<String>,
    region: Option<String>,
}

impl LanguageTag {
    fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        let mut parts = code.split(['-', '_']).filter(|p| !p.is_empty());

        let base = parts.next().ok_or_else(|| anyhow!("Empty language code"))?;
        if matches!(base.to_lowercase().as_str(), "und" | "auto") {
            return Err(anyhow!("Undetermined language code: {}", code));
        }
        let base = normalize_to_part1_or_part2t(base)?;

        let mut script = None;
        let mut region = None;
        for part in parts {
            if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                let mut chars = part.chars();
                if let Some(first) = chars.next() {
                    script = Some(format!(
                        "{}{}",
                        first.to_ascii_uppercase(),
                        chars.as_str().to_ascii_lowercase()
                    ));
                }
            } else if (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
            {
                region = Some(part.to_ascii_uppercase());
            }
        }

        Ok(Self { base, script, region })
    }

    /// Script in effect, including the one implied by the region
    fn effective_script(&self) -> Option<&str> {
        if let Some(script) = &self.script {
            return Some(script.as_str());
        }
        if self.base != "zh" {
            return None;
        }
        match self.region.as_deref() {
            Some("TW") | Some("HK") | Some("MO") => Some("Hant"),
            _ => Some("Hans"),
        }
    }

    fn to_code(&self) -> String {
        let mut code = self.base.clone();
        if let Some(script) = &self.script {
            code.push('-');
            code.push_str(script);
        }
        if let Some(region) = &self.region {
            code.push('-');
            code.push_str(region);
        }
        code
    }
}

/// Canonicalize a language tag ("zh_tw" -> "zh-TW", "eng" -> "en")
pub fn canonicalize_tag(code: &str) -> Result<String> {
    Ok(LanguageTag::parse(code)?.to_code())
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (LanguageTag::parse(code1), LanguageTag::parse(code2)) {
        (Ok(a), Ok(b)) => a.base == b.base && a.effective_script() == b.effective_script(),
        _ => false,
    }
}

/// Resolve a requested language to the closest entry of `supported`
///
/// Returns the supported entry verbatim. Tags of a different base language
/// are never considered close enough.
pub fn closest_supported_match<S: AsRef<str>>(requested: &str, supported: &[S]) -> Option<String> {
    if let Some(exact) = supported.iter().find(|s| s.as_ref().eq_ignore_ascii_case(requested.trim())) {
        return Some(exact.as_ref().to_string());
    }

    let wanted = LanguageTag::parse(requested).ok()?;

    let mut best: Option<(u8, &str)> = None;
    for candidate in supported {
        let Ok(tag) = LanguageTag::parse(candidate.as_ref()) else {
            continue;
        };
        if tag.base != wanted.base {
            continue;
        }

        let score = if tag == wanted {
            0
        } else if tag.effective_script() == wanted.effective_script() {
            if tag.region.is_none() || tag.region == wanted.region { 1 } else { 2 }
        } else {
            3
        };

        if best.is_none_or(|(best_score, _)| score < best_score) {
            best = Some((score, candidate.as_ref()));
        }
    }

    best.map(|(_, code)| code.to_string())
}

/// Map a corpus column header to a canonical language code
///
/// Headers may be codes ("en", "zh-TW"), English names ("Russian"), or
/// Chinese language names ("英语", "俄语Russian"). Columns that name no
/// language (ids, paths, notes) yield `None`.
pub fn normalize_header(header: &str) -> Option<String> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }

    if header.is_ascii() {
        let lower = header.to_ascii_lowercase();
        if let Some((_, code)) = HEADER_ALIASES.iter().find(|(alias, _)| *alias == lower) {
            return Some((*code).to_string());
        }
        // Only accept bases with a 639-1 code so "STR_ID" is not read as Straits Salish
        let base = header.split(['-', '_']).next().unwrap_or_default();
        let base_is_common = match base.len() {
            2 => true,
            3 => normalize_to_part2t(base)
                .ok()
                .and_then(|part2t| Language::from_639_3(&part2t))
                .is_some_and(|lang| lang.to_639_1().is_some()),
            _ => false,
        };
        if header.len() <= 8 && base_is_common {
            if let Ok(code) = canonicalize_tag(header) {
                return Some(code);
            }
        }
        return language_from_english_name(header);
    }

    if let Some((_, code)) = CHINESE_HEADER_NAMES.iter().find(|(name, _)| header.contains(name)) {
        return Some((*code).to_string());
    }

    // Mixed headers such as "Русский Russian"
    header
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| word.len() > 3)
        .find_map(language_from_english_name)
}

fn language_from_english_name(name: &str) -> Option<String> {
    let mut chars = name.trim().chars();
    let first = chars.next()?;
    let titled = format!("{}{}", first.to_ascii_uppercase(), chars.as_str().to_ascii_lowercase());

    let lang = Language::from_name(&titled)?;
    Some(lang.to_639_1().unwrap_or_else(|| lang.to_639_3()).to_string())
}

/// Get the English language name for a code, with script or region qualifiers
pub fn get_language_name(code: &str) -> Result<String> {
    let tag = LanguageTag::parse(code)?;
    let part2t = normalize_to_part2t(&tag.base)?;
    let lang = Language::from_639_3(&part2t)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", part2t))?;
    let name = lang.to_name();

    if tag.base == "zh" && (tag.script.is_some() || tag.region.is_some()) {
        return Ok(match tag.effective_script() {
            Some("Hant") => format!("{} (Traditional)", name),
            _ => format!("{} (Simplified)", name),
        });
    }

    Ok(match &tag.region {
        Some(region) => format!("{} ({})", name, region),
        None => name.to_string(),
    })
}
