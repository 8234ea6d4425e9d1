use anyhow::{bail, Context, Result};
use time::{Date, Month};

use crate::entry::{Entry, ISO_DATE};

/// Text and mood criteria for narrowing an entry list. Blank criteria are
/// ignored; both criteria must hold when both are set.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub search_text: Option<String>,
    pub mood: Option<String>,
}

impl EntryFilter {
    pub fn new(search_text: Option<&str>, mood: Option<&str>) -> Self {
        Self {
            search_text: normalize(search_text).map(|text| text.to_lowercase()),
            mood: normalize(mood).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search_text.is_none() && self.mood.is_none()
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(needle) = &self.search_text {
            let hit = entry.title.to_lowercase().contains(needle.as_str())
                || entry.content.to_lowercase().contains(needle.as_str())
                || entry.tags_joined().to_lowercase().contains(needle.as_str());
            if !hit {
                return false;
            }
        }
        if let Some(mood) = &self.mood {
            let wanted = mood.to_lowercase();
            let hit = entry.primary_mood.trim().to_lowercase() == wanted
                || entry
                    .secondary_moods_joined()
                    .to_lowercase()
                    .contains(&wanted);
            if !hit {
                return false;
            }
        }
        true
    }

    /// Matching entries, cloned, in their original order.
    pub fn apply(&self, entries: &[Entry]) -> Vec<Entry> {
        if self.is_empty() {
            return entries.to_vec();
        }
        let matched: Vec<Entry> = entries
            .iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect();
        tracing::debug!(
            total = entries.len(),
            matched = matched.len(),
            "filtered entries"
        );
        matched
    }
}

pub fn filter_entries(
    entries: &[Entry],
    search_text: Option<&str>,
    mood_label: Option<&str>,
) -> Vec<Entry> {
    EntryFilter::new(search_text, mood_label).apply(entries)
}

fn normalize(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<Date> {
    Date::parse(input.trim(), ISO_DATE)
        .with_context(|| format!("expected a date like 2024-01-31, got '{input}'"))
}

/// Parses `YYYY-MM` into a year and month.
pub fn parse_month(input: &str) -> Result<(i32, Month)> {
    let trimmed = input.trim();
    let Some((year, month)) = trimmed.split_once('-') else {
        bail!("expected a month like 2024-01, got '{input}'");
    };
    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in '{input}'"))?;
    let month: u8 = month
        .parse()
        .with_context(|| format!("invalid month in '{input}'"))?;
    let month = Month::try_from(month).with_context(|| format!("invalid month in '{input}'"))?;
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new(1, date!(2024 - 01 - 01), "Happy")
                .with_title("Road TRIP day one")
                .with_content("Drove north."),
            Entry::new(2, date!(2024 - 01 - 02), "Sad")
                .with_title("Home")
                .with_content("Rain all day")
                .with_secondary_moods("Lonely, Bored"),
            Entry::new(3, date!(2024 - 01 - 03), "Calm")
                .with_title("Notes")
                .with_content("Quiet evening")
                .with_tags("trips, family"),
            Entry::new(4, date!(2024 - 01 - 04), "happy")
                .with_title("Work")
                .with_content("Shipped the release, planning a trip"),
        ]
    }

    fn ids(entries: &[Entry]) -> Vec<i64> {
        entries.iter().map(|entry| entry.id).collect()
    }

    #[test]
    fn search_matches_title_content_and_tags_case_insensitively() {
        let found = filter_entries(&entries(), Some("trip"), None);
        assert_eq!(ids(&found), vec![1, 3, 4]);
        let found = filter_entries(&entries(), Some("  RAIN "), None);
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn mood_matches_primary_or_secondary() {
        let found = filter_entries(&entries(), None, Some("HAPPY"));
        assert_eq!(ids(&found), vec![1, 4]);
        let found = filter_entries(&entries(), None, Some("bored"));
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn mood_match_folds_non_ascii_case() {
        let entries = vec![
            Entry::new(1, date!(2024 - 01 - 01), "Éveillé"),
            Entry::new(2, date!(2024 - 01 - 02), "Calm").with_secondary_moods("ÉVEILLÉ"),
        ];
        let found = filter_entries(&entries, None, Some("éveillé"));
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let found = filter_entries(&entries(), Some("trip"), Some("Happy"));
        assert_eq!(ids(&found), vec![1, 4]);
        let found = filter_entries(&entries(), Some("trip"), Some("Sad"));
        assert!(found.is_empty());
    }

    #[test]
    fn blank_criteria_return_everything() {
        let all = entries();
        assert_eq!(filter_entries(&all, None, None), all);
        assert_eq!(filter_entries(&all, Some("   "), Some("")), all);
        assert!(EntryFilter::new(Some(" "), None).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let filter = EntryFilter::new(Some("trip"), Some("happy"));
        let once = filter.apply(&entries());
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn parses_dates_and_months() -> anyhow::Result<()> {
        assert_eq!(parse_date("2024-02-29")?, date!(2024 - 02 - 29));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(parse_month("2024-02")?, (2024, Month::February));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024").is_err());
        Ok(())
    }
}
