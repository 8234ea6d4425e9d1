use indexmap::IndexMap;
use serde::Serialize;

use super::mood::{classify, MoodCategory};
use crate::entry::Entry;

/// Label used for entries whose primary mood is blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Share of one exact mood label. `percent` is truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodShare {
    pub label: String,
    pub count: usize,
    pub percent: u32,
}

/// Share of one mood category among entries with a recognised mood.
/// `percent` is rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: MoodCategory,
    pub count: usize,
    pub percent: u32,
}

/// Groups entries by primary mood, most frequent first.
///
/// Labels with equal counts keep the order in which they were first seen.
pub fn compute_distribution(entries: &[Entry]) -> Vec<MoodShare> {
    let mut groups: IndexMap<&str, usize> = IndexMap::new();
    for entry in entries {
        let label = match entry.primary_mood.trim() {
            "" => UNKNOWN_LABEL,
            label => label,
        };
        *groups.entry(label).or_default() += 1;
    }

    let total = entries.len();
    let mut shares: Vec<MoodShare> = groups
        .into_iter()
        .map(|(label, count)| MoodShare {
            label: label.to_string(),
            count,
            percent: (count * 100 / total) as u32,
        })
        .collect();
    // stable: ties stay in first-seen order
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// The leading share of an exact-label distribution.
pub fn most_frequent(distribution: &[MoodShare]) -> Option<&MoodShare> {
    distribution.first()
}

/// Positive / Neutral / Negative breakdown. Unrecognised labels are left out
/// of both the counts and the denominator.
pub fn compute_category_distribution(entries: &[Entry]) -> Vec<CategoryShare> {
    let mut counts = [0usize; MoodCategory::KNOWN.len()];
    for entry in entries {
        let category = classify(&entry.primary_mood);
        if let Some(slot) = MoodCategory::KNOWN.iter().position(|known| *known == category) {
            counts[slot] += 1;
        }
    }
    let known: usize = counts.iter().sum();
    MoodCategory::KNOWN
        .iter()
        .zip(counts)
        .map(|(&category, count)| CategoryShare {
            category,
            count,
            percent: rounded_percent(count, known),
        })
        .collect()
}

fn rounded_percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 * 100.0 / total as f64).round() as u32
}
