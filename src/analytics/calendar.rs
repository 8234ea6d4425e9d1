use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use super::mood::{classify, MoodCategory};
use super::AnalyticsError;
use crate::entry::{serialize_date, Entry};

pub const DAYS_PER_WEEK: usize = 7;
pub const GRID_WEEKS: usize = 6;
pub const GRID_CELLS: usize = DAYS_PER_WEEK * GRID_WEEKS;

/// Background colours for calendar cells, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarPalette {
    pub in_month: String,
    pub out_of_month: String,
    pub positive: String,
    pub neutral: String,
    pub negative: String,
    pub today: String,
}

impl Default for CalendarPalette {
    fn default() -> Self {
        Self {
            in_month: "#FFFFFF".into(),
            out_of_month: "#EEEEEE".into(),
            positive: "#C8E6C9".into(),
            neutral: "#FFF3C4".into(),
            negative: "#FFCDD2".into(),
            today: "#BBDEFB".into(),
        }
    }
}

impl CalendarPalette {
    fn mood_color(&self, category: MoodCategory) -> Option<&str> {
        match category {
            MoodCategory::Positive => Some(&self.positive),
            MoodCategory::Neutral => Some(&self.neutral),
            MoodCategory::Negative => Some(&self.negative),
            MoodCategory::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub in_current_month: bool,
    pub is_today: bool,
    pub entry_id: Option<i64>,
    pub mood: Option<MoodCategory>,
    pub background: String,
    /// Mood glyph when the day has an entry, empty otherwise.
    pub emoji: &'static str,
}

impl DayCell {
    pub fn has_entry(&self) -> bool {
        self.entry_id.is_some()
    }
}

/// Builds the Sunday-first 6×7 grid for `year`/`month` with the default
/// palette.
pub fn build_month_grid(
    entries: &[Entry],
    year: i32,
    month: Month,
    today: Date,
) -> Result<Vec<DayCell>, AnalyticsError> {
    build_month_grid_with(entries, year, month, today, &CalendarPalette::default())
}

pub fn build_month_grid_with(
    entries: &[Entry],
    year: i32,
    month: Month,
    today: Date,
    palette: &CalendarPalette,
) -> Result<Vec<DayCell>, AnalyticsError> {
    let first_of_month = Date::from_calendar_date(year, month, 1)?;
    let offset = first_of_month.weekday().number_days_from_sunday();
    let start = first_of_month
        .checked_sub(Duration::days(i64::from(offset)))
        .ok_or(AnalyticsError::DateOverflow(first_of_month))?;

    // later entries for the same day replace earlier ones
    let by_date: HashMap<Date, &Entry> = entries
        .iter()
        .map(|entry| (entry.entry_date, entry))
        .collect();

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for index in 0..GRID_CELLS {
        let date = start
            .checked_add(Duration::days(index as i64))
            .ok_or(AnalyticsError::DateOverflow(start))?;
        let in_current_month = date.year() == year && date.month() == month;
        let is_today = date == today;
        let entry = by_date.get(&date).copied();
        let mood = entry.map(|entry| classify(&entry.primary_mood));

        let mut background = if in_current_month {
            palette.in_month.as_str()
        } else {
            palette.out_of_month.as_str()
        };
        if let Some(color) = mood.and_then(|category| palette.mood_color(category)) {
            background = color;
        }
        if is_today {
            background = palette.today.as_str();
        }

        cells.push(DayCell {
            date,
            in_current_month,
            is_today,
            entry_id: entry.map(|entry| entry.id),
            mood,
            background: background.to_string(),
            emoji: mood.map(MoodCategory::emoji).unwrap_or(""),
        });
    }
    tracing::debug!(year, month = %month, start = %start, "built month grid");
    Ok(cells)
}
