/*!
 * In-memory full-text index used by the translation memory.
 *
 * One `FieldIndex` exists per language column. Documents are scored with
 * BM25 over a term stream that treats scripts without word spacing as
 * overlapping unigrams and bigrams.
 */

use std::collections::HashMap;

use crate::tokens::is_cjk;

const BM25_K1: f32 = 1.2;
const BM25_B: f32 = 0.75;

/// Split text into index terms
///
/// Alphanumeric runs become lower-cased words. CJK runs emit every
/// character and every adjacent pair, so "射手" matches both the exact
/// term and texts that only share one character with it.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut word = String::new();
    let mut cjk_run: Vec<char> = Vec::new();

    for c in text.chars() {
        if is_cjk(c) {
            flush_word(&mut word, &mut terms);
            cjk_run.push(c);
        } else if c.is_alphanumeric() {
            flush_cjk(&mut cjk_run, &mut terms);
            word.extend(c.to_lowercase());
        } else {
            flush_word(&mut word, &mut terms);
            flush_cjk(&mut cjk_run, &mut terms);
        }
    }
    flush_word(&mut word, &mut terms);
    flush_cjk(&mut cjk_run, &mut terms);

    terms
}

fn flush_word(word: &mut String, terms: &mut Vec<String>) {
    if !word.is_empty() {
        terms.push(std::mem::take(word));
    }
}

fn flush_cjk(run: &mut Vec<char>, terms: &mut Vec<String>) {
    for (i, c) in run.iter().enumerate() {
        terms.push(c.to_string());
        if let Some(next) = run.get(i + 1) {
            terms.push(format!("{}{}", c, next));
        }
    }
    run.clear();
}

/// Inverted index over one text field
#[derive(Debug, Default)]
pub struct FieldIndex {
    /// term -> (document -> term frequency)
    postings: HashMap<String, HashMap<usize, u32>>,
    /// document -> number of terms
    lengths: HashMap<usize, usize>,
    total_length: usize,
}

impl FieldIndex {
    /// Index a document's terms
    pub fn insert(&mut self, doc: usize, terms: &[String]) {
        if terms.is_empty() {
            return;
        }
        for term in terms {
            *self
                .postings
                .entry(term.clone())
                .or_default()
                .entry(doc)
                .or_insert(0) += 1;
        }
        self.lengths.insert(doc, terms.len());
        self.total_length += terms.len();
    }

    /// Remove a document previously indexed with `terms`
    pub fn remove(&mut self, doc: usize, terms: &[String]) {
        for term in terms {
            if let Some(docs) = self.postings.get_mut(term) {
                docs.remove(&doc);
                if docs.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
        if let Some(length) = self.lengths.remove(&doc) {
            self.total_length -= length;
        }
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// OR-query: every document sharing at least one term, best first
    pub fn search(&self, query_terms: &[String], limit: usize) -> Vec<(usize, f32)> {
        if self.is_empty() || limit == 0 {
            return Vec::new();
        }

        let doc_count = self.lengths.len() as f32;
        let average_length = self.total_length as f32 / doc_count;

        let mut unique_terms: Vec<&String> = query_terms.iter().collect();
        unique_terms.sort();
        unique_terms.dedup();

        let mut scores: HashMap<usize, f32> = HashMap::new();
        for term in unique_terms {
            let Some(docs) = self.postings.get(term) else {
                continue;
            };
            let df = docs.len() as f32;
            let idf = (1.0 + (doc_count - df + 0.5) / (df + 0.5)).ln();

            for (doc, tf) in docs {
                let tf = *tf as f32;
                let length = self.lengths.get(doc).copied().unwrap_or_default() as f32;
                let norm = 1.0 - BM25_B + BM25_B * length / average_length;
                *scores.entry(*doc).or_insert(0.0) += idf * tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * norm);
            }
        }

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}
