use serde::Serialize;

use crate::entry::Entry;

const WORD_SEPARATORS: [char; 4] = [' ', '\t', '\n', '\r'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WordStats {
    pub total: usize,
    /// Unrounded mean words per entry; 0.0 when there are no entries.
    pub average: f64,
}

impl WordStats {
    /// Average for display, rounded half away from zero.
    pub fn rounded_average(&self) -> u64 {
        self.average.round() as u64
    }
}

/// Counts tokens separated by runs of spaces, tabs, newlines or carriage
/// returns.
pub fn count_words(text: &str) -> usize {
    text.split(WORD_SEPARATORS)
        .filter(|token| !token.is_empty())
        .count()
}

pub fn aggregate_words(entries: &[Entry]) -> WordStats {
    let total: usize = entries.iter().map(Entry::word_count).sum();
    let average = if entries.is_empty() {
        0.0
    } else {
        total as f64 / entries.len() as f64
    };
    WordStats { total, average }
}
