/*!
 * Tabular translation-memory corpora.
 *
 * A corpus has one row per concept: the first column holds an id, every
 * other column holds that concept's text in one language. Files are
 * tab-separated with a header row. There is no quoting: a cell cannot
 * contain a tab or a line break, and quote characters are kept verbatim.
 */

use std::path::Path;

use crate::errors::TranslationError;

/// An in-memory TM table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TmTable {
    /// Column headers; the first one names the id column
    pub headers: Vec<String>,
    /// Rows, each padded to the header width
    pub rows: Vec<Vec<String>>,
}

impl TmTable {
    /// Create a table from headers and rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Parse tab-separated text
    pub fn from_tsv_str(content: &str) -> Result<Self, TranslationError> {
        let mut lines = content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty());

        let header_line = lines
            .next()
            .ok_or_else(|| TranslationError::Memory("corpus has no header row".to_string()))?;
        let headers: Vec<String> = header_line.split('\t').map(|h| h.trim().to_string()).collect();
        if headers.len() < 2 {
            return Err(TranslationError::Memory(
                "corpus needs an id column and at least one language column".to_string(),
            ));
        }

        let rows = lines
            .map(|line| line.split('\t').map(|cell| cell.trim().to_string()).collect())
            .collect();

        Ok(Self::new(headers, rows))
    }

    /// Read a tab-separated corpus file
    pub fn from_tsv_path(path: impl AsRef<Path>) -> Result<Self, TranslationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::Memory(format!("failed to read corpus {}: {}", path.display(), e))
        })?;
        Self::from_tsv_str(&content)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
