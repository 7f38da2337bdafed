//! SQLite-based activity and hydration storage.
//!
//! Provides persistent storage for:
//! - Completed activities (the suggestion engine's history)
//! - Water intake entries
//! - Key-value store for application state (reminder scheduler)
//!
//! Timestamps are local wall-clock times stored as `YYYY-MM-DDTHH:MM:SS`
//! text, so day ranges compare lexicographically.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::engine::{ActivityCategory, CompletedActivity};
use crate::error::{DatabaseError, Result};
use crate::events::Event;
use crate::providers::{ActivityHistory, HydrationTracker};

use super::data_dir;
use super::migrations;
use super::streak::consecutive_days;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn encode_time(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn decode_time(table: &'static str, raw: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| DatabaseError::CorruptRow {
        table,
        message: format!("bad timestamp '{raw}': {e}"),
    })
}

fn decode_date(table: &'static str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| DatabaseError::CorruptRow {
        table,
        message: format!("bad date '{raw}': {e}"),
    })
}

/// Half-open `[start, end)` bounds of `date` as encoded timestamps.
fn day_bounds(date: NaiveDate) -> (String, String) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date
        .succ_opt()
        .map(|next| encode_time(next.and_time(NaiveTime::MIN)))
        .unwrap_or_else(|| "9999-12-31T23:59:59".to_string());
    (encode_time(start), end)
}

/// SQLite database for activity history and water intake.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/touchgrass.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("touchgrass.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        migrations::migrate(&self.conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Record a completed activity.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_activity(&self, activity: &CompletedActivity) -> Result<Event> {
        self.conn.execute(
            "INSERT INTO activities (activity_id, category, completed_at, duration_seconds)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                activity.activity_id,
                activity.category.name(),
                encode_time(activity.completed_at),
                activity.duration_seconds,
            ],
        )?;
        info!(
            activity = %activity.activity_id,
            category = %activity.category,
            "recorded activity"
        );
        Ok(Event::ActivityRecorded {
            activity_id: activity.activity_id.clone(),
            category: activity.category,
            duration_seconds: activity.duration_seconds,
            at: activity.completed_at,
        })
    }

    /// Activities completed on `date`, oldest first.
    pub fn activities_on(&self, date: NaiveDate) -> Result<Vec<CompletedActivity>> {
        let (start, end) = day_bounds(date);
        let mut stmt = self.conn.prepare(
            "SELECT activity_id, category, completed_at, duration_seconds
             FROM activities
             WHERE completed_at >= ?1 AND completed_at < ?2
             ORDER BY completed_at, id",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u64>(3)?,
            ))
        })?;

        let mut activities = Vec::new();
        for row in rows {
            let (activity_id, category, completed_at, duration_seconds) = row?;
            let category: ActivityCategory =
                category
                    .parse()
                    .map_err(|message| DatabaseError::CorruptRow {
                        table: "activities",
                        message,
                    })?;
            activities.push(CompletedActivity {
                activity_id,
                category,
                completed_at: decode_time("activities", &completed_at)?,
                duration_seconds,
            });
        }
        Ok(activities)
    }

    /// Most recent completion of `activity_id`.
    pub fn last_completed_at(&self, activity_id: &str) -> Result<Option<NaiveDateTime>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT MAX(completed_at) FROM activities WHERE activity_id = ?1",
                params![activity_id],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        Ok(raw
            .map(|raw| decode_time("activities", &raw))
            .transpose()?)
    }

    /// Distinct days with at least one completed activity.
    pub fn active_days(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(completed_at, 1, 10) AS day FROM activities ORDER BY day",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut days = Vec::new();
        for row in rows {
            days.push(decode_date("activities", &row?)?);
        }
        Ok(days)
    }

    /// Consecutive active days ending today or yesterday.
    pub fn activity_streak(&self, today: NaiveDate) -> Result<u32> {
        Ok(consecutive_days(self.active_days()?, today))
    }

    /// Log `amount` water servings at `at`.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn log_water(&self, amount: u32, at: NaiveDateTime) -> Result<Event> {
        self.conn.execute(
            "INSERT INTO water_log (amount, logged_at) VALUES (?1, ?2)",
            params![amount, encode_time(at)],
        )?;
        let total_today = self.water_on(at.date())?;
        info!(amount, total_today, "logged water");
        Ok(Event::WaterLogged {
            amount,
            total_today,
            at,
        })
    }

    /// Total water logged on `date`.
    pub fn water_on(&self, date: NaiveDate) -> Result<u32> {
        let (start, end) = day_bounds(date);
        let total: u32 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM water_log
             WHERE logged_at >= ?1 AND logged_at < ?2",
            params![start, end],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Consecutive days on which the water goal was met, ending today or yesterday.
    pub fn water_streak(&self, today: NaiveDate, goal: u32) -> Result<u32> {
        if goal == 0 {
            return Ok(0);
        }
        let mut stmt = self.conn.prepare(
            "SELECT substr(logged_at, 1, 10) AS day, SUM(amount)
             FROM water_log
             GROUP BY day
             HAVING SUM(amount) >= ?1",
        )?;
        let rows = stmt.query_map(params![goal], |row| row.get::<_, String>(0))?;
        let mut days = Vec::new();
        for row in rows {
            days.push(decode_date("water_log", &row?)?);
        }
        Ok(consecutive_days(days, today))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl ActivityHistory for Database {
    fn activities_today(&self, now: NaiveDateTime) -> Result<Vec<CompletedActivity>> {
        let mut activities = self.activities_on(now.date())?;
        activities.retain(|a| a.completed_at <= now);
        Ok(activities)
    }

    fn last_completed(&self, activity_id: &str) -> Result<Option<NaiveDateTime>> {
        self.last_completed_at(activity_id)
    }

    fn current_streak(&self, today: NaiveDate) -> Result<u32> {
        self.activity_streak(today)
    }
}

/// Hydration tracker over the water log with a configured goal.
pub struct WaterLog<'a> {
    db: &'a Database,
    goal: u32,
}

impl<'a> WaterLog<'a> {
    pub fn new(db: &'a Database, goal: u32) -> Self {
        Self { db, goal }
    }
}

impl HydrationTracker for WaterLog<'_> {
    fn current_intake(&self, now: NaiveDateTime) -> Result<u32> {
        self.db.water_on(now.date())
    }

    fn daily_goal(&self) -> u32 {
        self.goal
    }
}
