use serde::Serialize;
use time::Date;

use super::dates::{
    current_run_ending_at_last, distinct_sorted_dates, longest_consecutive_run, missed_days_in,
    DateRange,
};
use super::AnalyticsError;
use crate::entry::Entry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub missed_days: u32,
    pub total_entries: usize,
}

/// Streaks and gaps for the entries dated within `[start, end]`.
pub fn compute_coverage(
    entries: &[Entry],
    start: Date,
    end: Date,
) -> Result<CoverageStats, AnalyticsError> {
    let range = DateRange::new(start, end)?;
    Ok(compute_coverage_in(entries, &range))
}

pub fn compute_coverage_in(entries: &[Entry], range: &DateRange) -> CoverageStats {
    let in_range: Vec<Entry> = entries
        .iter()
        .filter(|entry| range.contains(entry.entry_date))
        .cloned()
        .collect();
    let stats = coverage_over(&in_range, Some(range));
    tracing::debug!(
        start = %range.start(),
        end = %range.end(),
        total = stats.total_entries,
        longest = stats.longest_streak,
        missed = stats.missed_days,
        "computed ranged coverage"
    );
    stats
}

/// Whole-history variant: missed days are counted between the first and last
/// entry dates.
pub fn compute_history_coverage(entries: &[Entry]) -> CoverageStats {
    let stats = coverage_over(entries, None);
    tracing::debug!(
        total = stats.total_entries,
        longest = stats.longest_streak,
        missed = stats.missed_days,
        "computed history coverage"
    );
    stats
}

fn coverage_over(entries: &[Entry], range: Option<&DateRange>) -> CoverageStats {
    if entries.is_empty() {
        return CoverageStats::default();
    }
    let dates = distinct_sorted_dates(entries);
    let Some(span) = range.copied().or_else(|| DateRange::spanning(&dates)) else {
        return CoverageStats::default();
    };
    CoverageStats {
        current_streak: current_run_ending_at_last(&dates),
        longest_streak: longest_consecutive_run(&dates),
        missed_days: missed_days_in(&dates, &span),
        total_entries: entries.len(),
    }
}
