use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn apply(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            entry_date TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            primary_mood TEXT NOT NULL DEFAULT '',
            secondary_moods TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS entries_primary_mood ON entries(primary_mood);
        "#,
    )
    .context("applying schema migrations")?;
    Ok(())
}
