//! Database schema migrations for taskloop.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration
//! version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    // Apply migrations sequentially
    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version, assuming 0");
        }
        0
    })
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: initial schema.
///
/// Tables for tasks, streaks, badges, and profiles. Dates are stored as
/// TEXT: RFC 3339 for timestamps, `YYYY-MM-DD` for day-granular fields.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS tasks (
            username      TEXT NOT NULL,
            id            TEXT NOT NULL,
            name          TEXT NOT NULL,
            frequency     TEXT NOT NULL DEFAULT 'daily',
            reminder_time TEXT,
            completed     INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL,
            PRIMARY KEY (username, id)
        );

        CREATE TABLE IF NOT EXISTS streaks (
            username            TEXT PRIMARY KEY,
            current_streak      INTEGER NOT NULL DEFAULT 0,
            longest_streak      INTEGER NOT NULL DEFAULT 0,
            last_completed_date TEXT
        );

        CREATE TABLE IF NOT EXISTS badges (
            username    TEXT NOT NULL,
            id          TEXT NOT NULL,
            name        TEXT NOT NULL,
            icon        TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            kind        TEXT NOT NULL,
            threshold   INTEGER NOT NULL DEFAULT 0,
            earned      INTEGER NOT NULL DEFAULT 0,
            earned_at   TEXT,
            PRIMARY KEY (username, id)
        );

        CREATE TABLE IF NOT EXISTS profiles (
            username        TEXT PRIMARY KEY,
            points          INTEGER NOT NULL DEFAULT 0,
            completed_count INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_username ON tasks(username);
        CREATE INDEX IF NOT EXISTS idx_badges_earned ON badges(username, earned);",
    )?;

    set_schema_version(&tx, 1)?;

    tx.commit()?;
    Ok(())
}

/// Migration v2: task descriptions and public profiles.
///
/// Adds:
/// - tasks.description: optional free-form text
/// - profiles.public_profile: leaderboard opt-in flag
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE tasks ADD COLUMN description TEXT;
         ALTER TABLE profiles ADD COLUMN public_profile INTEGER NOT NULL DEFAULT 0;",
    )?;

    set_schema_version(&tx, 2)?;

    tx.commit()?;
    Ok(())
}
