use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime};
use unicode_width::UnicodeWidthStr;

use crate::analytics::{
    analyze_history, analyze_range, build_month_grid_with, classify, AnalyticsReport, DateRange,
    DayCell, Mood, MoodCategory, DAYS_PER_WEEK,
};
use crate::config::{AppConfig, ConfigPaths};
use crate::entry::{format_date, join_list, parse_list, Entry, NewEntry};
use crate::export::{export_entries, ExportFormat};
use crate::search::{parse_date, parse_month, EntryFilter};
use crate::storage::{EntryStore, StorageHandle, UpsertOutcome};

const CELL_WIDTH: usize = 5;
const WEEKDAYS: [&str; DAYS_PER_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Args, Debug, Clone, Default)]
pub struct WriteArgs {
    /// Day to write for, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    /// Entry title (defaults to "Entry for <date>", or the existing title)
    #[arg(long)]
    pub title: Option<String>,
    /// Primary mood (prompted if omitted)
    #[arg(long)]
    pub mood: Option<String>,
    /// Secondary mood; repeat for a second one
    #[arg(long, value_name = "MOOD")]
    pub also: Vec<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    /// Provide the entry body inline. If omitted, reads from stdin.
    #[arg(long)]
    pub body: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Day to show, YYYY-MM-DD
    pub date: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Day whose entry is deleted, YYYY-MM-DD
    pub date: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text matched against title, body and tags
    #[arg(long)]
    pub search: Option<String>,
    /// Mood matched against the primary or secondary moods
    #[arg(long)]
    pub mood: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    /// First day of the range, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// Last day of the range, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub to: Option<String>,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CalendarArgs {
    /// Month to show, YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub month: Option<String>,
    /// Print the grid cells as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// First day to export, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// Last day to export, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub to: Option<String>,
    /// Output format (defaults to the configured one)
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,
    /// Directory the export is written to
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn write_entry(storage: &StorageHandle, args: WriteArgs, today: Date) -> Result<String> {
    let date = match args.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let mood = match args.mood {
        Some(mood) => mood,
        None => prompt("Mood")?,
    };
    let existing = storage.get_by_date(date)?;
    let body = match args.body {
        Some(body) => Some(body),
        None => read_stdin()?,
    };

    let mut draft = NewEntry::new(date, mood);
    draft.title = args
        .title
        .or_else(|| existing.as_ref().map(|entry| entry.title.clone()))
        .unwrap_or_default();
    draft.content = body
        .or_else(|| existing.as_ref().map(|entry| entry.content.clone()))
        .unwrap_or_default();
    draft.secondary_moods = args.also;
    draft.tags = match args.tags.as_deref() {
        Some(raw) => parse_list(raw),
        None => existing.map(|entry| entry.tags).unwrap_or_default(),
    };

    let (saved, outcome) = storage
        .upsert_for_date(draft)
        .with_context(|| format!("saving entry for {}", format_date(date)))?;
    if saved.primary_mood.parse::<Mood>().is_err() {
        tracing::warn!(
            mood = %saved.primary_mood,
            "mood is not in the lexicon and will count as unknown in category breakdowns"
        );
    }
    let verb = match outcome {
        UpsertOutcome::Created(_) => "Created",
        UpsertOutcome::Updated(_) => "Updated",
    };
    Ok(format!(
        "{verb} entry #{} for {}\n",
        saved.id,
        format_date(saved.entry_date)
    ))
}

pub fn show_entry(store: &dyn EntryStore, args: &ShowArgs) -> Result<String> {
    let date = parse_date(&args.date)?;
    let Some(entry) = store.get_by_date(date)? else {
        bail!("no entry exists for {}", format_date(date));
    };
    Ok(format_entry_detail(&entry))
}

pub fn delete_entry(store: &dyn EntryStore, args: &DeleteArgs) -> Result<String> {
    let date = parse_date(&args.date)?;
    let day = format_date(date);
    let Some(entry) = store.get_by_date(date)? else {
        bail!("no entry exists for {day}");
    };
    if !args.yes {
        let answer = prompt(&format!("Delete the entry for {day}? [y/N]"))?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            return Ok("Kept the entry.\n".to_string());
        }
    }
    store
        .delete(entry.id)
        .with_context(|| format!("deleting entry for {day}"))?;
    Ok(format!("Deleted the entry for {day}.\n"))
}

pub fn list_entries(store: &dyn EntryStore, args: &ListArgs) -> Result<String> {
    let entries = store.list_entries()?;
    let filter = EntryFilter::new(args.search.as_deref(), args.mood.as_deref());
    let matched = filter.apply(&entries);
    Ok(format_entry_list(entries.len(), &matched))
}

pub fn stats(
    store: &dyn EntryStore,
    config: &AppConfig,
    args: &StatsArgs,
    today: Date,
) -> Result<String> {
    let range = resolve_range(
        args.from.as_deref(),
        args.to.as_deref(),
        today,
        config.analytics.default_range_months,
    )?;
    let entries = store.list_entries()?;
    let (report, recent) = match &range {
        Some(range) => (analyze_range(&entries, range), None),
        None => {
            let take = config.analytics.recent_entries.min(entries.len());
            (analyze_history(&entries), Some(&entries[..take]))
        }
    };

    if args.json {
        #[derive(Serialize)]
        struct StatsJson<'a> {
            #[serde(flatten)]
            report: &'a AnalyticsReport,
            #[serde(skip_serializing_if = "Option::is_none")]
            recent: Option<&'a [Entry]>,
        }
        let json = serde_json::to_string_pretty(&StatsJson {
            report: &report,
            recent,
        })
        .context("serializing report")?;
        return Ok(format!("{json}\n"));
    }
    Ok(format_report(&report, recent))
}

pub fn calendar(
    store: &dyn EntryStore,
    config: &AppConfig,
    args: &CalendarArgs,
    today: Date,
) -> Result<String> {
    let (year, month) = match args.month.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };
    let entries = store.list_entries()?;
    let cells = build_month_grid_with(&entries, year, month, today, &config.calendar)?;
    if args.json {
        let json = serde_json::to_string_pretty(&cells).context("serializing calendar")?;
        return Ok(format!("{json}\n"));
    }
    Ok(format_calendar(year, month, &cells))
}

pub fn export(
    store: &dyn EntryStore,
    config: &AppConfig,
    paths: &ConfigPaths,
    args: &ExportArgs,
    today: Date,
) -> Result<String> {
    let months = config.analytics.default_range_months;
    let range = match resolve_range(args.from.as_deref(), args.to.as_deref(), today, months)? {
        Some(range) => range,
        None => DateRange::trailing_months(today, months)?,
    };
    let dir = args
        .out
        .clone()
        .unwrap_or_else(|| config.export.directory_or(paths).to_path_buf());
    let format = args.format.unwrap_or(config.export.format);
    let entries = store.list_entries()?;
    let path = export_entries(&entries, &range, &dir, format)?;
    Ok(format!("Export saved to: {}\n", path.display()))
}

pub fn moods() -> String {
    let mut out = String::new();
    for category in MoodCategory::KNOWN {
        let labels: Vec<String> = category.moods().map(|mood| mood.to_string()).collect();
        let _ = writeln!(
            out,
            "{} {}: {}",
            category.emoji(),
            category.as_ref(),
            labels.join(", ")
        );
    }
    out
}

/// `None` when neither end is given; a missing `from` reaches back
/// `months` from `to`, a missing `to` is today.
fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
    today: Date,
    months: u8,
) -> Result<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let end = match to {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let start = match from {
        Some(raw) => parse_date(raw)?,
        None => DateRange::trailing_months(end, months)?.start(),
    };
    if start > end {
        bail!(
            "from date {} must be on or before to date {}",
            format_date(start),
            format_date(end)
        );
    }
    Ok(Some(DateRange::new(start, end)?))
}

fn prompt(label: &str) -> Result<String> {
    use std::io::Write;
    let mut stdout = io::stdout();
    write!(stdout, "{}: ", label)?;
    stdout.flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end().to_owned())
}

fn read_stdin() -> Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(Some(buf))
}

fn format_entry_headline(entry: &Entry) -> String {
    let mood = entry.primary_mood.trim();
    if mood.is_empty() {
        format!("{}  {}", format_date(entry.entry_date), entry.title)
    } else {
        format!("{}  {} ({mood})", format_date(entry.entry_date), entry.title)
    }
}

fn format_entry_list(total: usize, entries: &[Entry]) -> String {
    if total == 0 {
        return "No entries yet. Run `moodjournal write` to create your first journal entry.\n"
            .to_string();
    }
    if entries.is_empty() {
        return "No entries match your search or filter criteria.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(&mut out, "{}", format_entry_headline(entry));
        if !entry.secondary_moods.is_empty() {
            let _ = writeln!(&mut out, "    also    {}", entry.secondary_moods_joined());
        }
        if !entry.tags.is_empty() {
            let _ = writeln!(&mut out, "    tags    {}", entry.tags_joined());
        }
    }
    let _ = writeln!(&mut out);
    let _ = writeln!(&mut out, "{} of {} entries", entries.len(), total);
    out
}

fn format_entry_detail(entry: &Entry) -> String {
    let mut out = String::new();
    let category = classify(&entry.primary_mood);
    let _ = writeln!(&mut out, "{}  {}", format_date(entry.entry_date), entry.title);
    let _ = write!(&mut out, "Mood: {} {}", category.emoji(), entry.primary_mood);
    if !entry.secondary_moods.is_empty() {
        let _ = write!(&mut out, " (also {})", join_list(&entry.secondary_moods));
    }
    let _ = writeln!(&mut out);
    if !entry.tags.is_empty() {
        let _ = writeln!(&mut out, "Tags: {}", entry.tags_joined());
    }
    let _ = writeln!(&mut out, "Words: {}", entry.word_count());
    let _ = writeln!(&mut out, "Created: {}", format_timestamp(entry.created_at));
    let _ = writeln!(&mut out, "Updated: {}", format_timestamp(entry.updated_at));
    let content = entry.content.trim_end();
    if !content.is_empty() {
        let _ = writeln!(&mut out);
        let _ = writeln!(&mut out, "{content}");
    }
    out
}

fn format_report(report: &AnalyticsReport, recent: Option<&[Entry]>) -> String {
    let mut out = String::new();
    match &report.range {
        Some(range) => {
            let _ = writeln!(
                &mut out,
                "Journal analytics {} - {}",
                format_date(range.start()),
                format_date(range.end())
            );
        }
        None => {
            let _ = writeln!(&mut out, "Journal overview");
        }
    }
    let coverage = &report.coverage;
    let _ = writeln!(&mut out, "  Total entries: {}", coverage.total_entries);
    let _ = writeln!(&mut out, "  Current streak: {} day(s)", coverage.current_streak);
    let _ = writeln!(&mut out, "  Longest streak: {} day(s)", coverage.longest_streak);
    let _ = writeln!(&mut out, "  Missed days: {}", coverage.missed_days);

    let _ = writeln!(&mut out);
    let _ = writeln!(&mut out, "Mood distribution");
    if report.distribution.is_empty() {
        let _ = writeln!(&mut out, "  No entries in this range.");
    }
    for share in &report.distribution {
        let _ = writeln!(
            &mut out,
            "  {}: {} ({}%)",
            share.label, share.count, share.percent
        );
    }
    match &report.most_frequent {
        Some(share) => {
            let _ = writeln!(
                &mut out,
                "  Most frequent: {} appeared {} time(s).",
                share.label, share.count
            );
        }
        None => {
            let _ = writeln!(&mut out, "  Most frequent: -");
        }
    }

    let _ = writeln!(&mut out);
    let _ = writeln!(&mut out, "Mood categories");
    for share in &report.categories {
        let _ = writeln!(
            &mut out,
            "  {} {}: {}%",
            share.category.emoji(),
            share.category.as_ref(),
            share.percent
        );
    }

    let _ = writeln!(&mut out);
    let _ = writeln!(&mut out, "Words");
    let _ = writeln!(&mut out, "  Total: {}", report.words.total);
    let _ = writeln!(
        &mut out,
        "  Average per entry: {}",
        report.words.rounded_average()
    );

    if let Some(recent) = recent {
        let _ = writeln!(&mut out);
        let _ = writeln!(&mut out, "Recent entries");
        if recent.is_empty() {
            let _ = writeln!(&mut out, "  No entries yet.");
        }
        for entry in recent {
            let _ = writeln!(&mut out, "  {}", format_entry_headline(entry));
        }
    }
    out
}

fn format_calendar(year: i32, month: Month, cells: &[DayCell]) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "{month} {year}");
    let header: Vec<String> = WEEKDAYS.iter().map(|day| pad_cell(day)).collect();
    let _ = writeln!(&mut out, "{}", header.join(" ").trim_end());
    for week in cells.chunks(DAYS_PER_WEEK) {
        let row: Vec<String> = week.iter().map(|cell| pad_cell(&render_cell(cell))).collect();
        let _ = writeln!(&mut out, "{}", row.join(" ").trim_end());
    }
    let _ = writeln!(&mut out);
    let _ = writeln!(
        &mut out,
        "😊 positive  😐 neutral  😔 negative  📝 other  * today"
    );
    out
}

fn render_cell(cell: &DayCell) -> String {
    let mut text = if cell.in_current_month {
        format!("{:>2}", cell.date.day())
    } else {
        format!("{:>2}", "·")
    };
    text.push_str(cell.emoji);
    if cell.is_today {
        text.push('*');
    }
    text
}

fn pad_cell(text: &str) -> String {
    let width = UnicodeWidthStr::width(text);
    let mut padded = text.to_string();
    padded.extend(std::iter::repeat(' ').take(CELL_WIDTH.saturating_sub(width)));
    padded
}

fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigPaths, StorageOptions};
    use crate::storage;
    use tempfile::TempDir;
    use time::macros::date;

    type TestResult<T = ()> = Result<T>;

    const TODAY: Date = date!(2024 - 01 - 10);

    fn setup_storage() -> TestResult<(TempDir, ConfigPaths, StorageHandle)> {
        let temp = TempDir::new().context("creating temp dir")?;
        let root = temp.path();
        let paths = ConfigPaths::rooted(
            root.join("config"),
            root.join("config/config.toml"),
            root.join("data"),
        );
        let storage_opts = StorageOptions {
            database_path: paths.database_path.clone(),
            ..StorageOptions::default()
        };
        let handle = storage::init(&paths, &storage_opts)?;
        Ok((temp, paths, handle))
    }

    fn write(
        storage: &StorageHandle,
        day: &str,
        title: &str,
        mood: &str,
        body: &str,
    ) -> TestResult<String> {
        write_entry(
            storage,
            WriteArgs {
                date: Some(day.into()),
                title: Some(title.into()),
                mood: Some(mood.into()),
                body: Some(body.into()),
                ..WriteArgs::default()
            },
            TODAY,
        )
    }

    fn seed(storage: &StorageHandle) -> TestResult {
        write(storage, "2023-12-20", "Before the break", "Calm", "outside range")?;
        write(storage, "2024-01-01", "New year", "Happy", "new year walk")?;
        write(storage, "2024-01-02", "Rainy", "Sad", "")?;
        write(storage, "2024-01-03", "Trip planning", "Happy", "trip planning")?;
        write(storage, "2024-01-05", "Late shift", "Anxious", "late night again")?;
        Ok(())
    }

    #[test]
    fn write_creates_then_updates_the_days_entry() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        let created = write_entry(
            &storage,
            WriteArgs {
                title: Some("Deadline".into()),
                mood: Some("Anxious".into()),
                also: vec!["Stressed".into(), "anxious".into()],
                tags: Some("work, q1, ".into()),
                body: Some("Too many meetings".into()),
                ..WriteArgs::default()
            },
            TODAY,
        )?;
        assert_eq!(created, "Created entry #1 for 2024-01-10\n");
        let first = storage.get_by_date(TODAY)?.expect("entry for today");
        assert_eq!(first.secondary_moods, vec!["Stressed"]);
        assert_eq!(first.tags, vec!["work", "q1"]);

        let updated = write_entry(
            &storage,
            WriteArgs {
                mood: Some("Relaxed".into()),
                body: Some("Calmer after the walk".into()),
                ..WriteArgs::default()
            },
            TODAY,
        )?;
        assert_eq!(updated, "Updated entry #1 for 2024-01-10\n");

        let entry = storage.get_by_date(TODAY)?.expect("entry for today");
        assert_eq!(entry.primary_mood, "Relaxed");
        assert_eq!(entry.content, "Calmer after the walk");
        // omitted title and tags carry over
        assert_eq!(entry.title, "Deadline");
        assert_eq!(entry.tags, vec!["work", "q1"]);
        assert!(entry.secondary_moods.is_empty());
        assert_eq!(entry.created_at, first.created_at);
        assert_eq!(storage.list_entries()?.len(), 1);
        Ok(())
    }

    #[test]
    fn show_prints_entry_details() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        write_entry(
            &storage,
            WriteArgs {
                date: Some("2024-01-05".into()),
                title: Some("Deadline".into()),
                mood: Some("Anxious".into()),
                also: vec!["Stressed".into()],
                tags: Some("work,q1".into()),
                body: Some("Too many meetings.".into()),
            },
            TODAY,
        )?;
        let output = show_entry(
            &storage,
            &ShowArgs {
                date: "2024-01-05".into(),
            },
        )?;
        assert!(output.starts_with("2024-01-05  Deadline\nMood: 😔 Anxious (also Stressed)\n"));
        assert!(output.contains("Tags: work, q1\n"));
        assert!(output.contains("Words: 3\n"));
        assert!(output.ends_with("\nToo many meetings.\n"));

        let missing = show_entry(
            &storage,
            &ShowArgs {
                date: "2024-01-06".into(),
            },
        );
        assert_eq!(
            missing.unwrap_err().to_string(),
            "no entry exists for 2024-01-06"
        );
        Ok(())
    }

    #[test]
    fn delete_removes_the_days_entry() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        write(&storage, "2024-01-05", "Late shift", "Anxious", "")?;
        let args = DeleteArgs {
            date: "2024-01-05".into(),
            yes: true,
        };
        assert_eq!(
            delete_entry(&storage, &args)?,
            "Deleted the entry for 2024-01-05.\n"
        );
        assert!(storage.list_entries()?.is_empty());
        assert!(delete_entry(&storage, &args).is_err());
        Ok(())
    }

    #[test]
    fn list_distinguishes_empty_journal_from_no_matches() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        let output = list_entries(&storage, &ListArgs::default())?;
        assert!(output.starts_with("No entries yet."));

        seed(&storage)?;
        let output = list_entries(
            &storage,
            &ListArgs {
                search: Some("trip".into()),
                mood: Some("angry".into()),
            },
        )?;
        assert_eq!(output, "No entries match your search or filter criteria.\n");

        let output = list_entries(
            &storage,
            &ListArgs {
                search: None,
                mood: Some("happy".into()),
            },
        )?;
        insta::assert_snapshot!(output, @r###"
        2024-01-03  Trip planning (Happy)
        2024-01-01  New year (Happy)

        2 of 5 entries
        "###);
        Ok(())
    }

    #[test]
    fn dashboard_covers_whole_history() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        seed(&storage)?;
        let mut config = AppConfig::default();
        config.analytics.recent_entries = 2;
        let output = stats(&storage, &config, &StatsArgs::default(), TODAY)?;
        insta::assert_snapshot!(output, @r###"
        Journal overview
          Total entries: 5
          Current streak: 1 day(s)
          Longest streak: 3 day(s)
          Missed days: 12

        Mood distribution
          Happy: 2 (40%)
          Calm: 1 (20%)
          Sad: 1 (20%)
          Anxious: 1 (20%)
          Most frequent: Happy appeared 2 time(s).

        Mood categories
          😊 Positive: 40%
          😐 Neutral: 20%
          😔 Negative: 40%

        Words
          Total: 10
          Average per entry: 2

        Recent entries
          2024-01-05  Late shift (Anxious)
          2024-01-03  Trip planning (Happy)
        "###);
        Ok(())
    }

    #[test]
    fn ranged_stats_only_count_the_range() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        seed(&storage)?;
        let args = StatsArgs {
            from: Some("2024-01-01".into()),
            to: Some("2024-01-07".into()),
            json: true,
        };
        let output = stats(&storage, &AppConfig::default(), &args, TODAY)?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(value["range"]["start"], "2024-01-01");
        assert_eq!(value["coverage"]["total_entries"], 4);
        assert_eq!(value["coverage"]["missed_days"], 3);
        assert_eq!(value["coverage"]["current_streak"], 1);
        assert!(value.get("recent").is_none());

        let empty = stats(
            &storage,
            &AppConfig::default(),
            &StatsArgs {
                from: Some("2023-06-01".into()),
                to: Some("2023-06-30".into()),
                json: false,
            },
            TODAY,
        )?;
        assert!(empty.contains("  Missed days: 0\n"));
        assert!(empty.contains("  No entries in this range.\n"));
        assert!(empty.contains("  Most frequent: -\n"));
        Ok(())
    }

    #[test]
    fn inverted_range_is_rejected_up_front() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        let args = StatsArgs {
            from: Some("2024-01-07".into()),
            to: Some("2024-01-01".into()),
            json: false,
        };
        let err = stats(&storage, &AppConfig::default(), &args, TODAY).unwrap_err();
        assert_eq!(
            err.to_string(),
            "from date 2024-01-07 must be on or before to date 2024-01-01"
        );
        Ok(())
    }

    #[test]
    fn partial_range_defaults_to_trailing_window() -> TestResult {
        let range = resolve_range(None, Some("2024-03-31"), TODAY, 1)?.expect("range");
        assert_eq!(range.start(), date!(2024 - 02 - 29));
        assert_eq!(range.end(), date!(2024 - 03 - 31));
        let range = resolve_range(Some("2024-01-01"), None, TODAY, 1)?.expect("range");
        assert_eq!(range.end(), TODAY);
        assert!(resolve_range(None, None, TODAY, 1)?.is_none());
        Ok(())
    }

    #[test]
    fn calendar_marks_moods_and_today() -> TestResult {
        let (_temp, _paths, storage) = setup_storage()?;
        seed(&storage)?;
        let output = calendar(
            &storage,
            &AppConfig::default(),
            &CalendarArgs {
                month: Some("2024-01".into()),
                json: false,
            },
            TODAY,
        )?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "January 2024");
        assert_eq!(lines[1], "Su    Mo    Tu    We    Th    Fr    Sa");
        // 2024-01-01 is a Monday
        assert_eq!(lines[2], " ·     1😊   2😔   3😊   4     5😔   6");
        assert!(lines[3].contains("10*"));
        assert_eq!(lines.len(), 2 + 6 + 2);

        let json = calendar(
            &storage,
            &AppConfig::default(),
            &CalendarArgs {
                month: Some("2024-01".into()),
                json: true,
            },
            TODAY,
        )?;
        let cells: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(cells.as_array().map(Vec::len), Some(42));
        assert_eq!(cells[0]["date"], "2023-12-31");
        Ok(())
    }

    #[test]
    fn export_writes_into_configured_directory() -> TestResult {
        let (_temp, paths, storage) = setup_storage()?;
        seed(&storage)?;
        let args = ExportArgs {
            from: Some("2024-01-01".into()),
            to: Some("2024-01-07".into()),
            format: Some(ExportFormat::Json),
            out: None,
        };
        let output = export(&storage, &AppConfig::default(), &paths, &args, TODAY)?;
        let expected = paths.export_dir.join("JournalExport_20240101_20240107.json");
        assert_eq!(output, format!("Export saved to: {}\n", expected.display()));
        assert!(expected.exists());

        let err = export(
            &storage,
            &AppConfig::default(),
            &paths,
            &ExportArgs {
                from: Some("2023-06-01".into()),
                to: Some("2023-06-30".into()),
                ..ExportArgs::default()
            },
            TODAY,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "no entries in the selected date range");
        Ok(())
    }

    #[test]
    fn moods_lists_lexicon_by_category() {
        insta::assert_snapshot!(moods(), @r###"
        😊 Positive: Happy, Excited, Relaxed, Grateful, Confident
        😐 Neutral: Calm, Thoughtful, Curious, Nostalgic, Bored
        😔 Negative: Sad, Angry, Stressed, Lonely, Anxious
        "###);
    }
}
