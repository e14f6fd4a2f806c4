/// SQLite implementation of the habit repository
///
/// This module holds the connection, the SQL for every habit-side operation
/// and the row-to-entity conversions. Each entity has exactly one conversion
/// function, so field mapping and date formatting cannot drift between
/// queries.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};

use crate::domain::{
    parse_date, parse_habit_id, Achievement, AchievementId, Detail, DetailId, DetailInput,
    Habit, HabitId, DATE_FORMAT,
};
use crate::storage::{migrations, HabitRepository, PhotoStore, RepositoryError};

/// How long a writer waits for another connection's lock before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const HABIT_COLUMNS: &str = "id, title, description, created_at";
const ACHIEVEMENT_COLUMNS: &str = "id, habit_id, date, achieved";
const DETAIL_COLUMNS: &str = "id, habit_id, date, notes, duration_minutes, photo_path";

/// SQLite-backed repository
///
/// One connection, guarded by a mutex: a repository runs one unit of work at
/// a time. Writers that must read-then-write open an IMMEDIATE transaction so
/// other processes sharing the file cannot interleave.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
    photos: PhotoStore,
}

impl SqliteRepository {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: PathBuf, photos: PhotoStore) -> Result<Self, RepositoryError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| RepositoryError::Unavailable(format!("Failed to open database: {}", e)))?;

        let repository = Self::with_connection(conn, photos)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(repository)
    }

    /// Open a private in-memory database (for tests)
    pub fn open_in_memory(photos: PhotoStore) -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::Unavailable(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn, photos)
    }

    fn with_connection(mut conn: Connection, photos: PhotoStore) -> Result<Self, RepositoryError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| RepositoryError::Unavailable(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            photos,
        })
    }

    /// The file store photo paths are resolved against
    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("database connection lock poisoned".to_string()))
    }

    /// Run a per-habit SELECT and convert every row
    fn list_for_habit<T>(
        &self,
        sql: &str,
        habit_id: &HabitId,
        convert: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, RepositoryError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![habit_id.to_string()], convert)?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }

        Ok(items)
    }
}

impl HabitRepository for SqliteRepository {
    fn list_habits(&self) -> Result<Vec<Habit>, RepositoryError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM habits ORDER BY rowid ASC",
            HABIT_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_habit)?;

        let mut habits = Vec::new();
        for habit in rows {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn get_habit(&self, id: &str) -> Result<Habit, RepositoryError> {
        let habit_id = parse_habit_id(id)?;

        let conn = self.lock()?;
        let habit = conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![habit_id.to_string()],
                row_to_habit,
            )
            .optional()?;

        habit.ok_or_else(|| RepositoryError::NotFound {
            entity: "Habit",
            id: habit_id.to_string(),
        })
    }

    fn create_habit(&self, title: &str, description: Option<&str>) -> Result<Habit, RepositoryError> {
        let habit = Habit::new(title, description.map(str::to_string))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO habits (id, title, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                habit.id.to_string(),
                habit.title,
                habit.description,
                timestamp(&habit.created_at),
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.title, habit.id);
        Ok(habit)
    }

    fn update_habit(
        &self,
        id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let habit_id = parse_habit_id(id)?;
        let title = Habit::validate_title(title)?;

        let conn = self.lock()?;
        let rows_affected = conn.execute(
            "UPDATE habits SET title = ?2, description = ?3 WHERE id = ?1",
            params![habit_id.to_string(), title, description],
        )?;

        if rows_affected > 0 {
            tracing::debug!("Updated habit: {} ({})", title, habit_id);
        }
        Ok(rows_affected > 0)
    }

    fn delete_habit(&self, id: &str) -> Result<bool, RepositoryError> {
        let habit_id = parse_habit_id(id)?;
        let key = habit_id.to_string();

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !habit_exists(&tx, &habit_id)? {
            return Ok(false);
        }

        let photo_paths = {
            let mut stmt = tx.prepare(
                "SELECT photo_path FROM habit_details
                 WHERE habit_id = ?1 AND photo_path IS NOT NULL",
            )?;
            let rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        // Dependents first so no foreign key is ever left dangling
        let details = tx.execute("DELETE FROM habit_details WHERE habit_id = ?1", params![key])?;
        let achievements = tx.execute(
            "DELETE FROM habit_achievements WHERE habit_id = ?1",
            params![key],
        )?;
        tx.execute("DELETE FROM habits WHERE id = ?1", params![key])?;
        tx.commit()?;
        drop(conn);

        // Files go only after the rows are gone for good
        for path in &photo_paths {
            self.photos.remove(path);
        }

        tracing::debug!(
            "Deleted habit {} with {} achievements and {} details",
            key,
            achievements,
            details
        );
        Ok(true)
    }

    fn list_achievements(&self, habit_id: &str) -> Result<Vec<Achievement>, RepositoryError> {
        let habit_id = parse_habit_id(habit_id)?;
        self.list_for_habit(
            &format!(
                "SELECT {} FROM habit_achievements WHERE habit_id = ?1 ORDER BY date ASC",
                ACHIEVEMENT_COLUMNS
            ),
            &habit_id,
            row_to_achievement,
        )
    }

    fn upsert_achievement(
        &self,
        habit_id: &str,
        date: &str,
        achieved: bool,
    ) -> Result<Achievement, RepositoryError> {
        let habit_id = parse_habit_id(habit_id)?;
        let date = parse_date(date)?;
        let candidate = Achievement::new(habit_id, date, achieved);

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !habit_exists(&tx, &candidate.habit_id)? {
            return Err(RepositoryError::NotFound {
                entity: "Habit",
                id: candidate.habit_id.to_string(),
            });
        }

        // The unique index on (habit_id, date) decides between insert and update
        tx.execute(
            "INSERT INTO habit_achievements (id, habit_id, date, achieved, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (habit_id, date) DO UPDATE SET achieved = excluded.achieved",
            params![
                candidate.id.to_string(),
                candidate.habit_id.to_string(),
                candidate.date.to_string(),
                candidate.achieved,
                timestamp(&Utc::now()),
            ],
        )?;

        let stored = tx.query_row(
            &format!(
                "SELECT {} FROM habit_achievements WHERE habit_id = ?1 AND date = ?2",
                ACHIEVEMENT_COLUMNS
            ),
            params![candidate.habit_id.to_string(), candidate.date.to_string()],
            row_to_achievement,
        )?;
        tx.commit()?;

        tracing::debug!(
            "Recorded achievement {} for habit {} on {}: {}",
            stored.id,
            stored.habit_id,
            stored.date,
            stored.achieved
        );
        Ok(stored)
    }

    fn create_detail(
        &self,
        habit_id: &str,
        date: &str,
        input: DetailInput,
    ) -> Result<Detail, RepositoryError> {
        let habit_id = parse_habit_id(habit_id)?;
        let date = parse_date(date)?;
        let detail = Detail::new(habit_id, date, input)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !habit_exists(&tx, &detail.habit_id)? {
            return Err(RepositoryError::NotFound {
                entity: "Habit",
                id: detail.habit_id.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO habit_details (
                id, habit_id, date, notes, duration_minutes, photo_path, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                detail.id.to_string(),
                detail.habit_id.to_string(),
                detail.date.to_string(),
                detail.notes,
                detail.duration_minutes,
                detail.photo_path,
                timestamp(&Utc::now()),
            ],
        )
        .map_err(|e| map_detail_conflict(e, &detail))?;
        tx.commit()?;

        tracing::debug!(
            "Created detail {} for habit {} on {}",
            detail.id,
            detail.habit_id,
            detail.date
        );
        Ok(detail)
    }

    fn delete_detail(&self, habit_id: &str, date: &str) -> Result<bool, RepositoryError> {
        let habit_id = parse_habit_id(habit_id)?;
        let date = parse_date(date)?;
        let key = (habit_id.to_string(), date.to_string());

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let found = tx
            .query_row(
                "SELECT photo_path FROM habit_details WHERE habit_id = ?1 AND date = ?2",
                params![key.0, key.1],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;

        let Some(photo_path) = found else {
            return Ok(false);
        };

        tx.execute(
            "DELETE FROM habit_details WHERE habit_id = ?1 AND date = ?2",
            params![key.0, key.1],
        )?;
        tx.commit()?;
        drop(conn);

        if let Some(path) = photo_path {
            self.photos.remove(&path);
        }

        tracing::debug!("Deleted detail for habit {} on {}", key.0, key.1);
        Ok(true)
    }

    fn list_details(&self, habit_id: &str) -> Result<Vec<Detail>, RepositoryError> {
        let habit_id = parse_habit_id(habit_id)?;
        self.list_for_habit(
            &format!(
                "SELECT {} FROM habit_details WHERE habit_id = ?1 ORDER BY date ASC",
                DETAIL_COLUMNS
            ),
            &habit_id,
            row_to_detail,
        )
    }
}

fn habit_exists(conn: &Connection, habit_id: &HabitId) -> Result<bool, RepositoryError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn map_detail_conflict(err: rusqlite::Error, detail: &Detail) -> RepositoryError {
    if is_constraint_violation(&err) {
        return RepositoryError::ConstraintViolation {
            entity: "detail",
            habit_id: detail.habit_id.to_string(),
            date: detail.date.to_string(),
        };
    }
    RepositoryError::Persistence(err)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message
                    .as_deref()
                    .is_some_and(|value| value.contains("UNIQUE constraint failed"))
        }
        _ => false,
    }
}

/// Fixed-width RFC 3339 so stored timestamps sort as text
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn column_habit_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<HabitId> {
    let raw: String = row.get(idx)?;
    HabitId::from_string(&raw).map_err(|e| conversion_error(idx, e))
}

fn column_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn row_to_habit(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let id = column_habit_id(row, 0)?;

    let created_at_str: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| conversion_error(3, e))?
        .with_timezone(&Utc);

    Ok(Habit::from_existing(
        id,
        row.get(1)?, // title
        row.get(2)?, // description
        created_at,
    ))
}

fn row_to_achievement(row: &Row<'_>) -> rusqlite::Result<Achievement> {
    let id_str: String = row.get(0)?;
    let id = AchievementId::from_string(&id_str).map_err(|e| conversion_error(0, e))?;

    Ok(Achievement::from_existing(
        id,
        column_habit_id(row, 1)?,
        column_date(row, 2)?,
        row.get(3)?, // achieved
    ))
}

fn row_to_detail(row: &Row<'_>) -> rusqlite::Result<Detail> {
    let id_str: String = row.get(0)?;
    let id = DetailId::from_string(&id_str).map_err(|e| conversion_error(0, e))?;

    Ok(Detail::from_existing(
        id,
        column_habit_id(row, 1)?,
        column_date(row, 2)?,
        row.get(3)?, // notes
        row.get(4)?, // duration_minutes
        row.get(5)?, // photo_path
    ))
}
