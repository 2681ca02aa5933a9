use rusqlite::Connection;

use crate::db::repository::MetaRepo;
use crate::error::Result;

pub const SCHEMA_VERSION: &str = "1";

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS mosques (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            location      TEXT NOT NULL,
            imam          TEXT NOT NULL,
            longitude     REAL NOT NULL CHECK(longitude BETWEEN -180 AND 180),
            latitude      REAL NOT NULL CHECK(latitude BETWEEN -90 AND 90),
            prayer_times  TEXT NOT NULL,
            azan_times    TEXT NOT NULL DEFAULT '{}',
            photos        TEXT NOT NULL DEFAULT '[]',
            verified      INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT DEFAULT (datetime('now')),
            updated_at    TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_mosques_verified ON mosques(verified);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;

    MetaRepo::set(conn, "schema_version", SCHEMA_VERSION)?;
    Ok(())
}
