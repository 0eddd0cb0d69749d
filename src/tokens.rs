/*!
 * Token cost estimation for chunk sizing.
 *
 * Chunks are budgeted in model tokens. An exact tokenizer is not needed:
 * the budget only has to track the real cost closely enough that halving
 * it on retry actually halves the request size.
 */

use std::sync::Arc;

/// Estimates the number of model tokens contained in a string
pub trait TokenEstimator: Send + Sync {
    /// Estimate the number of tokens for the provided text
    fn estimate_tokens(&self, text: &str) -> usize;
}

/// Shared token estimator handle
pub type SharedTokenEstimator = Arc<dyn TokenEstimator>;

/// Character-class heuristic
///
/// Ideographs, kana and hangul are close to one token per character in
/// BPE vocabularies; other scripts average about four characters per token.
#[derive(Debug, Clone)]
pub struct HeuristicTokenEstimator {
    chars_per_token: usize,
}

impl HeuristicTokenEstimator {
    /// Create an estimator with a custom ratio for non-CJK text
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for HeuristicTokenEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenEstimator for HeuristicTokenEstimator {
    fn estimate_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let mut wide: usize = 0;
        let mut narrow: usize = 0;
        for c in text.chars() {
            if is_cjk(c) {
                wide += 1;
            } else {
                narrow += 1;
            }
        }

        let tokens = wide + narrow.div_ceil(self.chars_per_token);
        tokens.max(1)
    }
}

/// Whether a character belongs to a script without word spacing
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'     // hiragana, katakana
        | '\u{3400}'..='\u{4DBF}'   // CJK extension A
        | '\u{4E00}'..='\u{9FFF}'   // CJK unified ideographs
        | '\u{AC00}'..='\u{D7AF}'   // hangul syllables
        | '\u{F900}'..='\u{FAFF}'   // compatibility ideographs
        | '\u{20000}'..='\u{2A6DF}')
}
