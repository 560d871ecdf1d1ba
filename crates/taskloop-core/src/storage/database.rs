//! SQLite-backed task store.
//!
//! Persists tasks, streaks, badges, and profiles per user. State for an
//! unknown user is initialized on first read: profiles start zeroed and
//! the badge table is seeded with the default catalog. Badge writes are
//! monotonic at this layer; `mark_badge_earned` can only set the flag.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::badge::{self, Badge, ThresholdKind};
use crate::error::DatabaseError;
use crate::profile::Profile;
use crate::streak::StreakRecord;
use crate::task::{Frequency, Task};

use super::data_dir;
use super::store::TaskStore;

/// SQLite database implementing [`TaskStore`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/taskloop/taskloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::DataDirFailed(e.to_string()))?;
        Self::open_at(dir.join("taskloop.db"))
    }

    /// Open the database at an explicit path, creating it if needed.
    pub fn open_at(path: PathBuf) -> Result<Self, DatabaseError> {
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path,
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests and ephemeral runs).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        super::migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    fn seed_badges(&self, username: &str) -> Result<Vec<Badge>, DatabaseError> {
        let catalog = badge::default_catalog();
        let tx = self.conn.unchecked_transaction()?;
        for badge in &catalog {
            tx.execute(
                "INSERT INTO badges (username, id, name, icon, description, kind, threshold, earned, earned_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    username,
                    badge.id,
                    badge.name,
                    badge.icon,
                    badge.description,
                    format_kind(badge.kind),
                    badge.threshold,
                    badge.earned,
                    badge.earned_at.map(|d| d.to_string()),
                ],
            )?;
        }
        tx.commit()?;
        Ok(catalog)
    }
}

impl TaskStore for Database {
    fn get_tasks(&self, username: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, frequency, reminder_time, completed, created_at
             FROM tasks WHERE username = ?1 ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map(params![username], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    fn get_task(&self, username: &str, task_id: &str) -> Result<Option<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, frequency, reminder_time, completed, created_at
             FROM tasks WHERE username = ?1 AND id = ?2",
        )?;
        match stmt.query_row(params![username, task_id], row_to_task) {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn add_task(&self, username: &str, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (username, id, name, description, frequency, reminder_time, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                username,
                task.id,
                task.name,
                task.description,
                task.frequency.as_str(),
                task.reminder_time.map(|t| t.format("%H:%M").to_string()),
                task.completed,
                task.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete_task(&self, username: &str, task_id: &str) -> Result<bool, DatabaseError> {
        let affected = self.conn.execute(
            "DELETE FROM tasks WHERE username = ?1 AND id = ?2",
            params![username, task_id],
        )?;
        Ok(affected > 0)
    }

    fn set_task_completed(
        &self,
        username: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE tasks SET completed = ?3 WHERE username = ?1 AND id = ?2",
            params![username, task_id, completed],
        )?;
        Ok(())
    }

    fn get_streak(&self, username: &str) -> Result<StreakRecord, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT current_streak, longest_streak, last_completed_date
             FROM streaks WHERE username = ?1",
        )?;
        let result = stmt.query_row(params![username], |row| {
            let last = match row.get::<_, Option<String>>(2)? {
                Some(s) => Some(parse_date(&s, 2)?),
                None => None,
            };
            Ok(StreakRecord {
                current_streak: row.get(0)?,
                longest_streak: row.get(1)?,
                last_completed_date: last,
            })
        });
        match result {
            Ok(record) => Ok(record),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(StreakRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn set_streak(&self, username: &str, record: &StreakRecord) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO streaks (username, current_streak, longest_streak, last_completed_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                username,
                record.current_streak,
                record.longest_streak,
                record.last_completed_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    fn get_badges(&self, username: &str) -> Result<Vec<Badge>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, icon, description, kind, threshold, earned, earned_at
             FROM badges WHERE username = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![username], row_to_badge)?;
        let mut badges = Vec::new();
        for row in rows {
            badges.push(row?);
        }
        if badges.is_empty() {
            return self.seed_badges(username);
        }
        badge::validate_catalog(&badges).map_err(|e| DatabaseError::Corrupt(e.to_string()))?;
        Ok(badges)
    }

    fn mark_badge_earned(
        &self,
        username: &str,
        badge_id: &str,
        on: NaiveDate,
    ) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE badges SET earned = 1, earned_at = COALESCE(earned_at, ?3)
             WHERE username = ?1 AND id = ?2",
            params![username, badge_id, on.to_string()],
        )?;
        Ok(())
    }

    fn insert_badge(&self, username: &str, badge: &Badge) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO badges (username, id, name, icon, description, kind, threshold, earned, earned_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                username,
                badge.id,
                badge.name,
                badge.icon,
                badge.description,
                format_kind(badge.kind),
                badge.threshold,
                badge.earned,
                badge.earned_at.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    fn get_profile(&self, username: &str) -> Result<Profile, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT username, points, completed_count, public_profile, created_at
             FROM profiles WHERE username = ?1",
        )?;
        match stmt.query_row(params![username], row_to_profile) {
            Ok(profile) => Ok(profile),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                let profile = Profile::new(username);
                self.save_profile(&profile)?;
                Ok(profile)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save_profile(&self, profile: &Profile) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO profiles (username, points, completed_count, public_profile, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                profile.username,
                profile.points,
                profile.completed_count,
                profile.public_profile,
                profile.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn list_public_profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT username, points, completed_count, public_profile, created_at
             FROM profiles WHERE public_profile = 1 ORDER BY points DESC, username",
        )?;
        let rows = stmt.query_map([], row_to_profile)?;
        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(row?);
        }
        Ok(profiles)
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let frequency: String = row.get(3)?;
    let frequency = frequency
        .parse::<Frequency>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    let reminder_time = match row.get::<_, Option<String>>(4)? {
        Some(s) => Some(parse_time(&s, 4)?),
        None => None,
    };
    let created_at: String = row.get(6)?;
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        frequency,
        reminder_time,
        completed: row.get(5)?,
        created_at: parse_timestamp(&created_at, 6)?,
    })
}

fn row_to_badge(row: &Row<'_>) -> rusqlite::Result<Badge> {
    let kind: String = row.get(4)?;
    let kind = parse_kind(&kind)
        .ok_or_else(|| invalid_text(4, format!("unknown badge kind '{kind}'")))?;
    let earned_at = match row.get::<_, Option<String>>(7)? {
        Some(s) => Some(parse_date(&s, 7)?),
        None => None,
    };
    Ok(Badge {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        description: row.get(3)?,
        kind,
        threshold: row.get(5)?,
        earned: row.get(6)?,
        earned_at,
    })
}

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let created_at: String = row.get(4)?;
    Ok(Profile {
        username: row.get(0)?,
        points: row.get(1)?,
        completed_count: row.get(2)?,
        public_profile: row.get(3)?,
        created_at: parse_timestamp(&created_at, 4)?,
    })
}

fn format_kind(kind: ThresholdKind) -> &'static str {
    match kind {
        ThresholdKind::Streak => "streak",
        ThresholdKind::CompletionCount => "completion_count",
        ThresholdKind::Special => "special",
    }
}

fn parse_kind(s: &str) -> Option<ThresholdKind> {
    match s {
        "streak" => Some(ThresholdKind::Streak),
        "completion_count" => Some(ThresholdKind::CompletionCount),
        "special" => Some(ThresholdKind::Special),
        _ => None,
    }
}

fn parse_date(s: &str, idx: usize) -> rusqlite::Result<NaiveDate> {
    s.parse::<NaiveDate>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_time(s: &str, idx: usize) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(s: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn invalid_text(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        message.into(),
    )
}
