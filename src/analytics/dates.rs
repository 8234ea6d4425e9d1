use std::collections::BTreeSet;
use std::iter;

use serde::Serialize;
use time::{Date, Month};

use super::AnalyticsError;
use crate::entry::{serialize_date, Entry};

/// Inclusive span of calendar days, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(serialize_with = "serialize_date")]
    start: Date,
    #[serde(serialize_with = "serialize_date")]
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// `[today - months, today]`, clamping the day of month when the earlier
    /// month is shorter (March 31 minus one month is February 28/29).
    pub fn trailing_months(today: Date, months: u8) -> Result<Self, AnalyticsError> {
        let index = today.year() * 12 + i32::from(u8::from(today.month())) - 1 - i32::from(months);
        let year = index.div_euclid(12);
        let month = Month::try_from((index.rem_euclid(12) + 1) as u8)?;
        let day = today.day().min(month.length(year));
        let start = Date::from_calendar_date(year, month, day)?;
        Self::new(start, today)
    }

    /// Smallest range holding every date of an ascending slice.
    pub fn spanning(dates: &[Date]) -> Option<Self> {
        let (first, last) = (dates.first()?, dates.last()?);
        Self::new(*first, *last).ok()
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> u32 {
        (self.end - self.start).whole_days() as u32 + 1
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn iter_days(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        iter::successors(Some(self.start), move |day| {
            day.next_day().filter(|next| *next <= end)
        })
    }
}

/// Entry dates, de-duplicated and sorted ascending.
pub fn distinct_sorted_dates(entries: &[Entry]) -> Vec<Date> {
    entries
        .iter()
        .map(|entry| entry.entry_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Longest run of back-to-back days in `dates` (distinct, ascending).
pub fn longest_consecutive_run(dates: &[Date]) -> u32 {
    let Some((first, rest)) = dates.split_first() else {
        return 0;
    };
    let mut longest = 1;
    let mut run = 1;
    let mut previous = *first;
    for &date in rest {
        if previous.next_day() == Some(date) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
        previous = date;
    }
    longest
}

/// Length of the run that ends on the latest date in `dates`.
///
/// This is the streak as of the most recent entry, not as of today.
pub fn current_run_ending_at_last(dates: &[Date]) -> u32 {
    let Some(&last) = dates.last() else {
        return 0;
    };
    let mut run = 1;
    let mut cursor = last;
    for &date in dates.iter().rev().skip(1) {
        if date.next_day() != Some(cursor) {
            break;
        }
        run += 1;
        cursor = date;
    }
    run
}

/// Days in `[start, end]` without an entry.
pub fn missed_days(dates: &[Date], start: Date, end: Date) -> Result<u32, AnalyticsError> {
    let range = DateRange::new(start, end)?;
    Ok(missed_days_in(dates, &range))
}

pub(crate) fn missed_days_in(dates: &[Date], range: &DateRange) -> u32 {
    let mut covered = 0u32;
    let mut previous: Option<Date> = None;
    for &date in dates {
        if previous != Some(date) && range.contains(date) {
            covered += 1;
        }
        previous = Some(date);
    }
    range.days() - covered
}
