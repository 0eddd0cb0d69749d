/*!
 * Prompt construction for chat-model translation.
 *
 * A request is a system instruction, an optional few-shot exchange that
 * pins TM terminology, and a user turn listing the chunk's source lines.
 */

use crate::memory::TmMatches;
use crate::providers::ChatMessage;

/// Roman numeral glyphs the model must leave untouched
pub const ROMAN_GLYPHS: &str = "Ⅰ Ⅱ Ⅲ Ⅳ Ⅴ Ⅵ Ⅶ Ⅷ Ⅸ Ⅹ";

/// System instruction naming the target language
pub fn system_prompt(instructions: &str, target_language_name: &str) -> String {
    let mut prompt = String::new();
    if !instructions.trim().is_empty() {
        prompt.push_str(instructions.trim());
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "You will be provided with sentences, and your task is to translate them into {}.\n\
         Follow these rules:\n\
         1. Keep the original order and write exactly one translation per line.\n\
         2. Do not add or remove punctuation marks or numbers.\n\
         3. Reply with the translations only, do not explain them.\n\
         4. Keep the Roman numerals {} exactly as they are.",
        target_language_name, ROMAN_GLYPHS
    ));
    prompt
}

/// User turn for a list of source lines
pub fn source_block(source_language_name: &str, target_language_name: &str, lines: &[&str]) -> String {
    format!(
        "{} Source: \n{}\n\n\n{} Translations: \n",
        source_language_name,
        lines.join("\n"),
        target_language_name
    )
}

/// Full conversation for one chunk
pub fn build_messages(
    instructions: &str,
    source_language_name: &str,
    target_language_name: &str,
    tm_examples: &TmMatches,
    sources: &[&str],
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt(instructions, target_language_name))];

    if !tm_examples.is_empty() {
        let terms: Vec<&str> = tm_examples.keys().map(String::as_str).collect();
        let translations: Vec<&str> = tm_examples.values().map(String::as_str).collect();
        messages.push(ChatMessage::user(format!(
            "Please translate these terms. All translations must follow these terms.\n{}",
            source_block(source_language_name, target_language_name, &terms)
        )));
        messages.push(ChatMessage::assistant(translations.join("\n")));
    }

    messages.push(ChatMessage::user(source_block(
        source_language_name,
        target_language_name,
        sources,
    )));
    messages
}
