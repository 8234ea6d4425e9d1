use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::analytics::DateRange;
use crate::entry::{format_date, Entry};

const FILE_STAMP: &[FormatItem<'static>] = format_description!("[year][month][day]");

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

/// Writes the entries dated inside `range` to a new file in `dir`, oldest
/// first, and returns its path. Fails when the range holds no entries.
pub fn export_entries(
    entries: &[Entry],
    range: &DateRange,
    dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf> {
    let mut selected: Vec<&Entry> = entries
        .iter()
        .filter(|entry| range.contains(entry.entry_date))
        .collect();
    if selected.is_empty() {
        bail!("no entries in the selected date range");
    }
    selected.sort_by_key(|entry| entry.entry_date);

    let body = match format {
        ExportFormat::Markdown => render_markdown(&selected, range),
        ExportFormat::Json => {
            serde_json::to_string_pretty(&selected).context("serializing entries for export")?
        }
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("creating export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(range, format)?);
    write_atomically(&path, body.as_bytes())?;
    tracing::info!(
        path = %path.display(),
        entries = selected.len(),
        format = %format,
        "exported journal entries"
    );
    Ok(path)
}

pub fn export_file_name(range: &DateRange, format: ExportFormat) -> Result<String> {
    let start = range
        .start()
        .format(FILE_STAMP)
        .context("formatting export start date")?;
    let end = range
        .end()
        .format(FILE_STAMP)
        .context("formatting export end date")?;
    Ok(format!("JournalExport_{start}_{end}.{}", format.extension()))
}

pub fn render_markdown(entries: &[&Entry], range: &DateRange) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Journal Export {} - {}",
        format_date(range.start()),
        format_date(range.end())
    );
    for entry in entries {
        let _ = writeln!(out);
        let mood = entry.primary_mood.trim();
        if mood.is_empty() {
            let _ = writeln!(out, "## {} - {}", format_date(entry.entry_date), entry.title);
        } else {
            let _ = writeln!(
                out,
                "## {} - {} ({mood})",
                format_date(entry.entry_date),
                entry.title
            );
        }
        if !entry.secondary_moods.is_empty() {
            let _ = writeln!(out, "Also: {}", entry.secondary_moods_joined());
        }
        if !entry.tags.is_empty() {
            let _ = writeln!(out, "Tags: {}", entry.tags_joined());
        }
        let content = entry.content.trim_end();
        if !content.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{content}");
        }
    }
    out
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).with_context(|| format!("writing export {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("finalizing export {}", path.display()))?;
    Ok(())
}
