use anyhow::{bail, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_with::formats::CommaSeparator;
use serde_with::{serde_as, StringWithSeparator};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

use crate::analytics::words::count_words;

/// Maximum number of secondary moods kept on an entry.
pub const MAX_SECONDARY_MOODS: usize = 2;

const LIST_DELIMITER: char = ',';
pub(crate) const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A single day's journal entry as handed to the analytics engine.
///
/// `entry_date` carries no time of day; two entries share a day exactly when
/// their dates compare equal.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(with = "iso_date")]
    pub entry_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub primary_mood: String,
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(default)]
    pub secondary_moods: Vec<String>,
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entry {
    /// Bare entry for `entry_date`, timestamped at midnight UTC of that day.
    pub fn new(id: i64, entry_date: Date, primary_mood: impl Into<String>) -> Self {
        let stamp = entry_date.with_time(Time::MIDNIGHT).assume_utc();
        Self {
            id,
            title: format!("Entry for {}", format_date(entry_date)),
            content: String::new(),
            entry_date,
            created_at: stamp,
            updated_at: stamp,
            primary_mood: primary_mood.into(),
            secondary_moods: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = parse_list(tags);
        self
    }

    pub fn with_secondary_moods(mut self, moods: &str) -> Self {
        self.secondary_moods = parse_list(moods);
        self
    }

    pub fn word_count(&self) -> usize {
        count_words(&self.content)
    }

    /// Tags in their flat storage form, e.g. `"work, travel"`.
    pub fn tags_joined(&self) -> String {
        join_list(&self.tags)
    }

    pub fn secondary_moods_joined(&self) -> String {
        join_list(&self.secondary_moods)
    }
}

/// Fields a caller supplies when writing the entry for a day.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub entry_date: Date,
    pub primary_mood: String,
    pub secondary_moods: Vec<String>,
    pub tags: Vec<String>,
}

impl NewEntry {
    pub fn new(entry_date: Date, primary_mood: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            entry_date,
            primary_mood: primary_mood.into(),
            secondary_moods: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Validates the draft and applies the editor's defaults: a blank title
    /// becomes "Entry for <date>", secondary moods are de-duplicated against
    /// the primary and each other and capped at two.
    pub fn normalized(mut self) -> Result<Self> {
        let primary = self.primary_mood.trim().to_string();
        if primary.is_empty() {
            bail!("primary mood is required");
        }
        self.primary_mood = primary;

        let title = self.title.trim();
        self.title = if title.is_empty() {
            format!("Entry for {}", format_date(self.entry_date))
        } else {
            title.to_string()
        };

        let mut secondary: Vec<String> = Vec::with_capacity(MAX_SECONDARY_MOODS);
        for mood in self.secondary_moods.iter().map(|m| m.trim()) {
            if mood.is_empty() || mood.eq_ignore_ascii_case(&self.primary_mood) {
                continue;
            }
            if secondary.iter().any(|kept| kept.eq_ignore_ascii_case(mood)) {
                continue;
            }
            if secondary.len() == MAX_SECONDARY_MOODS {
                tracing::warn!(mood, "dropping secondary mood beyond the limit of two");
                continue;
            }
            secondary.push(mood.to_string());
        }
        self.secondary_moods = secondary;

        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags.iter().map(|t| t.trim()) {
            if !tag.is_empty() && !tags.iter().any(|kept| kept == tag) {
                tags.push(tag.to_string());
            }
        }
        self.tags = tags;
        Ok(self)
    }
}

/// Splits a comma-separated field, trimming items and dropping empty ones.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Display form of a list field.
pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Stored form of a list field; matches the JSON encoding.
pub fn encode_list(items: &[String]) -> String {
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push(LIST_DELIMITER);
        }
        out.push_str(item);
    }
    out
}

pub fn format_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

pub(crate) fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}
