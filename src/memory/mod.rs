/*!
 * Translation memory (TM).
 *
 * The TM is an indexed parallel corpus of known-good segment pairs. It is
 * built once from a table and then queried concurrently by the batch
 * translator to seed few-shot examples and pin terminology. A TM is
 * advisory: searches never fail, they only come back empty.
 */

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::errors::TranslationError;
use crate::language_utils::{canonicalize_tag, closest_supported_match, normalize_header};

pub mod corpus;
pub mod index;

pub use corpus::TmTable;
use index::{tokenize, FieldIndex};

/// Source span -> translated span, ordered by source text
pub type TmMatches = BTreeMap<String, String>;

/// One row of the corpus
#[derive(Debug, Clone)]
pub struct TranslationMemoryEntry {
    pub id: String,
    /// language code -> text
    pub per_language_text: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    languages: Vec<String>,
    entries: Vec<TranslationMemoryEntry>,
    ids: HashMap<String, usize>,
    fields: HashMap<String, FieldIndex>,
}

impl MemoryState {
    fn index_entry(&mut self, doc: usize) {
        let entry = &self.entries[doc];
        for (language, text) in &entry.per_language_text {
            self.fields
                .entry(language.clone())
                .or_default()
                .insert(doc, &tokenize(text));
        }
    }

    fn push_entry(&mut self, entry: TranslationMemoryEntry) -> usize {
        let doc = self.entries.len();
        self.ids.insert(entry.id.clone(), doc);
        self.entries.push(entry);
        self.index_entry(doc);
        doc
    }

    fn ensure_language(&mut self, language: &str) {
        if !self.languages.iter().any(|l| l == language) {
            self.languages.push(language.to_string());
        }
    }
}

/// Searchable in-memory translation memory
#[derive(Debug, Default)]
pub struct TranslationMemory {
    state: RwLock<MemoryState>,
}

impl TranslationMemory {
    /// A TM without corpus; every search returns nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from a table
    ///
    /// Duplicate rows are dropped, headers are mapped to canonical language
    /// codes and columns that name no language are ignored.
    pub fn build(table: &TmTable) -> Self {
        let mut state = MemoryState::default();

        let mut columns: Vec<(usize, String)> = Vec::new();
        for (col, header) in table.headers.iter().enumerate().skip(1) {
            match normalize_header(header) {
                Some(code) if columns.iter().any(|(_, c)| *c == code) => {
                    warn!("Dropping duplicate language column '{}' ({})", header, code);
                }
                Some(code) => {
                    debug!("TM column '{}' mapped to {}", header, code);
                    state.ensure_language(&code);
                    columns.push((col, code));
                }
                None => warn!("Dropping TM column '{}': not a language", header),
            }
        }

        let mut seen: HashSet<&Vec<String>> = HashSet::new();
        for row in &table.rows {
            if !seen.insert(row) {
                continue;
            }

            let per_language_text: HashMap<String, String> = columns
                .iter()
                .filter_map(|(col, code)| {
                    let text = row.get(*col)?.trim();
                    (!text.is_empty()).then(|| (code.clone(), text.to_string()))
                })
                .collect();
            if per_language_text.is_empty() {
                continue;
            }

            let id = row.first().cloned().unwrap_or_default();
            state.push_entry(TranslationMemoryEntry { id, per_language_text });
        }

        info!(
            "Built translation memory with {} entries in {} languages ({})",
            state.entries.len(),
            state.languages.len(),
            state.languages.join(", ")
        );

        Self {
            state: RwLock::new(state),
        }
    }

    /// Load and build from a tab-separated corpus file
    pub fn from_tsv_path(path: impl AsRef<Path>) -> Result<Self, TranslationError> {
        Ok(Self::build(&TmTable::from_tsv_path(path)?))
    }

    /// Indexed language codes
    pub fn languages(&self) -> Vec<String> {
        self.state.read().languages.clone()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Insert or update the entry with `id` for one language pair
    pub fn add(
        &self,
        id: &str,
        source: &str,
        target: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<(), TranslationError> {
        let source_language = canonicalize_tag(source_language)
            .map_err(|e| TranslationError::Memory(e.to_string()))?;
        let target_language = canonicalize_tag(target_language)
            .map_err(|e| TranslationError::Memory(e.to_string()))?;

        let mut state = self.state.write();
        state.ensure_language(&source_language);
        state.ensure_language(&target_language);

        let updates = [(source_language, source), (target_language, target)];
        match state.ids.get(id).copied() {
            Some(doc) => {
                for (language, text) in updates {
                    let old = state.entries[doc].per_language_text.insert(language.clone(), text.to_string());
                    let field = state.fields.entry(language).or_default();
                    if let Some(old) = old {
                        field.remove(doc, &tokenize(&old));
                    }
                    field.insert(doc, &tokenize(text));
                }
            }
            None => {
                let per_language_text = updates
                    .into_iter()
                    .map(|(language, text)| (language, text.to_string()))
                    .collect();
                state.push_entry(TranslationMemoryEntry {
                    id: id.to_string(),
                    per_language_text,
                });
            }
        }

        Ok(())
    }

    /// Find TM pairs whose source text occurs literally in `text`
    ///
    /// The index retrieves up to `limit` best-scoring rows for an OR query
    /// of the text's terms. Fuzzy hits are then discarded unless their
    /// source side is a substring of `text`, so only exact terminology is
    /// injected into prompts.
    pub fn search(&self, text: &str, source_language: &str, target_language: &str, limit: usize) -> TmMatches {
        let state = self.state.read();

        let (Some(source_language), Some(target_language)) = (
            closest_supported_match(source_language, &state.languages),
            closest_supported_match(target_language, &state.languages),
        ) else {
            return TmMatches::new();
        };

        let Some(field) = state.fields.get(&source_language) else {
            return TmMatches::new();
        };

        let terms = tokenize(text);
        if terms.is_empty() {
            return TmMatches::new();
        }

        field
            .search(&terms, limit)
            .into_iter()
            .filter_map(|(doc, _)| {
                let entry = state.entries.get(doc)?;
                let source = entry.per_language_text.get(&source_language)?;
                let target = entry.per_language_text.get(&target_language)?;
                text.contains(source.as_str()).then(|| (source.clone(), target.clone()))
            })
            .collect()
    }
}
