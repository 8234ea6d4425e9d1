use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rusqlite::config::DbConfig;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use time::{Date, OffsetDateTime};

use crate::config::{ConfigPaths, StorageOptions};
use crate::entry::{encode_list, format_date, parse_list, Entry, NewEntry};
use crate::search::parse_date;

mod schema;

const ENTRY_COLUMNS: &str = "id, title, content, entry_date, created_at, updated_at, \
                             primary_mood, secondary_moods, tags";

/// Where journal entries live. The analytics engine never sees this; callers
/// fetch a snapshot with `list_entries` and hand it over.
pub trait EntryStore {
    /// All entries, newest date first.
    fn list_entries(&self) -> Result<Vec<Entry>>;
    fn get_by_id(&self, id: i64) -> Result<Option<Entry>>;
    fn get_by_date(&self, date: Date) -> Result<Option<Entry>>;
    fn add(&self, draft: NewEntry) -> Result<Entry>;
    fn update(&self, entry: &Entry) -> Result<Entry>;
    fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(i64),
    Updated(i64),
}

#[derive(Clone)]
pub struct StorageHandle {
    db_path: Arc<PathBuf>,
    options: Arc<StorageOptions>,
}

impl StorageHandle {
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&*self.db_path)
            .with_context(|| format!("opening database {}", self.db_path.display()))?;
        prepare_connection(&conn, &self.options)?;
        Ok(conn)
    }

    /// Runs `f` on a fresh connection that is closed when `f` returns.
    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Writes the entry for the draft's day, replacing the existing one if
    /// there is one. The original creation time is kept on replace.
    pub fn upsert_for_date(&self, draft: NewEntry) -> Result<(Entry, UpsertOutcome)> {
        let draft = draft.normalized()?;
        match self.get_by_date(draft.entry_date)? {
            Some(mut existing) => {
                existing.title = draft.title;
                existing.content = draft.content;
                existing.primary_mood = draft.primary_mood;
                existing.secondary_moods = draft.secondary_moods;
                existing.tags = draft.tags;
                let saved = self.update(&existing)?;
                let id = saved.id;
                Ok((saved, UpsertOutcome::Updated(id)))
            }
            None => {
                let saved = self.add(draft)?;
                let id = saved.id;
                Ok((saved, UpsertOutcome::Created(id)))
            }
        }
    }

    fn fetch_one(&self, clause: &str, param: &dyn rusqlite::ToSql) -> Result<Option<Entry>> {
        self.with_connection(|conn| {
            let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE {clause}");
            let entry = conn
                .query_row(&sql, [param], entry_from_row)
                .optional()
                .context("fetching entry")?;
            Ok(entry)
        })
    }
}

impl EntryStore for StorageHandle {
    fn list_entries(&self) -> Result<Vec<Entry>> {
        self.with_connection(|conn| {
            let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries ORDER BY entry_date DESC");
            let mut stmt = conn.prepare(&sql)?;
            let entries = stmt
                .query_map([], entry_from_row)?
                .collect::<Result<Vec<_>, _>>()
                .context("listing entries")?;
            Ok(entries)
        })
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Entry>> {
        self.fetch_one("id = ?1", &id)
    }

    fn get_by_date(&self, date: Date) -> Result<Option<Entry>> {
        self.fetch_one("entry_date = ?1", &format_date(date))
    }

    fn add(&self, draft: NewEntry) -> Result<Entry> {
        let draft = draft.normalized()?;
        let day = format_date(draft.entry_date);
        if self.get_by_date(draft.entry_date)?.is_some() {
            bail!("an entry already exists for {day}");
        }
        let id = self.with_connection(|conn| {
            let now = OffsetDateTime::now_utc().unix_timestamp();
            conn.execute(
                "INSERT INTO entries
                    (title, content, entry_date, created_at, updated_at,
                     primary_mood, secondary_moods, tags)
                 VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?7)",
                params![
                    draft.title,
                    draft.content,
                    day,
                    now,
                    draft.primary_mood,
                    encode_list(&draft.secondary_moods),
                    encode_list(&draft.tags),
                ],
            )
            .context("inserting entry")?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::info!(id, date = %day, "created journal entry");
        self.get_by_id(id)?
            .with_context(|| format!("entry {id} vanished after insert"))
    }

    fn update(&self, entry: &Entry) -> Result<Entry> {
        let title = entry.title.trim();
        if title.is_empty() {
            bail!("entry title cannot be empty");
        }
        self.with_connection(|conn| {
            let now = OffsetDateTime::now_utc().unix_timestamp();
            let updated = conn
                .execute(
                    "UPDATE entries
                     SET title = ?1, content = ?2, entry_date = ?3, updated_at = ?4,
                         primary_mood = ?5, secondary_moods = ?6, tags = ?7
                     WHERE id = ?8",
                    params![
                        title,
                        entry.content,
                        format_date(entry.entry_date),
                        now,
                        entry.primary_mood.trim(),
                        encode_list(&entry.secondary_moods),
                        encode_list(&entry.tags),
                        entry.id,
                    ],
                )
                .with_context(|| format!("updating entry {}", entry.id))?;
            if updated == 0 {
                bail!("entry {} not found", entry.id);
            }
            Ok(())
        })?;
        tracing::info!(id = entry.id, "updated journal entry");
        self.get_by_id(entry.id)?
            .with_context(|| format!("entry {} vanished after update", entry.id))
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.with_connection(|conn| {
            let deleted = conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?;
            if deleted == 0 {
                bail!("entry {id} not found");
            }
            Ok(())
        })?;
        tracing::info!(id, "deleted journal entry");
        Ok(())
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let entry_date: String = row.get(3)?;
    let secondary: String = row.get(7)?;
    let tags: String = row.get(8)?;
    Ok(Entry {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        entry_date: parse_date(&entry_date)
            .map_err(|err| conversion_error(3, Type::Text, err))?,
        created_at: timestamp(row, 4)?,
        updated_at: timestamp(row, 5)?,
        primary_mood: row.get(6)?,
        secondary_moods: parse_list(&secondary),
        tags: parse_list(&tags),
    })
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<OffsetDateTime> {
    let raw: i64 = row.get(idx)?;
    OffsetDateTime::from_unix_timestamp(raw).map_err(|err| conversion_error(idx, Type::Integer, err))
}

fn conversion_error(
    idx: usize,
    ty: Type,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, err.into())
}

pub fn init(paths: &ConfigPaths, storage: &StorageOptions) -> Result<StorageHandle> {
    let db_path = if storage.database_path.as_os_str().is_empty() {
        paths.database_path.clone()
    } else {
        storage.database_path.clone()
    };
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }
    let conn = Connection::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;
    prepare_connection(&conn, storage)?;
    schema::apply(&conn)?;
    if !existed {
        tracing::info!(path = %db_path.display(), "created journal database");
    }
    Ok(StorageHandle {
        db_path: Arc::new(db_path),
        options: Arc::new(storage.clone()),
    })
}

fn prepare_connection(conn: &Connection, storage: &StorageOptions) -> Result<()> {
    conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)
        .context("enabling foreign keys")?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .context("setting journal_mode=WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")
        .context("setting synchronous=NORMAL")?;
    conn.pragma_update(
        None,
        "wal_autocheckpoint",
        storage.wal_autocheckpoint.to_string(),
    )
    .context("setting wal_autocheckpoint")?;
    Ok(())
}
