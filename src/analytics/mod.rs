//! Pure statistics over a snapshot of journal entries: streaks and missed
//! days, mood breakdowns, word counts and the month calendar grid.
//!
//! Nothing in here touches storage or keeps state between calls; callers
//! fetch the entries they care about and pass them in.

use serde::Serialize;
use thiserror::Error;
use time::Date;

use crate::entry::Entry;

pub mod calendar;
pub mod coverage;
pub mod dates;
pub mod distribution;
pub mod mood;
pub mod words;

pub use calendar::{
    build_month_grid, build_month_grid_with, CalendarPalette, DayCell, DAYS_PER_WEEK, GRID_CELLS,
};
pub use coverage::{compute_coverage, compute_coverage_in, compute_history_coverage, CoverageStats};
pub use dates::{
    current_run_ending_at_last, distinct_sorted_dates, longest_consecutive_run, missed_days,
    DateRange,
};
pub use distribution::{
    compute_category_distribution, compute_distribution, most_frequent, CategoryShare, MoodShare,
};
pub use mood::{classify, Mood, MoodCategory};
pub use words::{aggregate_words, count_words, WordStats};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: Date, end: Date },

    #[error("invalid calendar date: {0}")]
    InvalidDate(#[from] time::error::ComponentRange),

    #[error("date arithmetic overflowed near {0}")]
    DateOverflow(Date),
}

/// Everything the dashboard and range views display, computed in one pass
/// over the same entry set.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    /// `None` for the whole-history view.
    pub range: Option<DateRange>,
    pub coverage: CoverageStats,
    pub distribution: Vec<MoodShare>,
    pub categories: Vec<CategoryShare>,
    pub most_frequent: Option<MoodShare>,
    pub words: WordStats,
}

/// Report for the entries dated within `range`.
pub fn analyze_range(entries: &[Entry], range: &DateRange) -> AnalyticsReport {
    let selected: Vec<Entry> = entries
        .iter()
        .filter(|entry| range.contains(entry.entry_date))
        .cloned()
        .collect();
    build_report(chronological(selected), Some(*range))
}

/// Report over every entry; missed days span first to last entry.
pub fn analyze_history(entries: &[Entry]) -> AnalyticsReport {
    build_report(chronological(entries.to_vec()), None)
}

fn chronological(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by_key(|entry| entry.entry_date);
    entries
}

fn build_report(entries: Vec<Entry>, range: Option<DateRange>) -> AnalyticsReport {
    let coverage = match &range {
        Some(range) => compute_coverage_in(&entries, range),
        None => compute_history_coverage(&entries),
    };
    let distribution = compute_distribution(&entries);
    let leading = most_frequent(&distribution).cloned();
    AnalyticsReport {
        range,
        coverage,
        categories: compute_category_distribution(&entries),
        most_frequent: leading,
        distribution,
        words: aggregate_words(&entries),
    }
}
