/// Database migration management
///
/// This module creates and upgrades the SQLite schema. Each numbered
/// migration runs in its own transaction together with the version bump, so
/// a crash mid-migration leaves the previous version intact.

use rusqlite::{Connection, OptionalExtension, Transaction};
use crate::storage::RepositoryError;

/// Current database schema version
///
/// Increment this when you add new migrations
pub const CURRENT_VERSION: i32 = 2;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
pub fn initialize_database(conn: &mut Connection) -> Result<(), RepositoryError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < 1 {
        apply(conn, 1, migration_v1)?;
    }
    if current_version < 2 {
        apply(conn, 2, migration_v2)?;
    }

    Ok(())
}

/// Get the current database schema version (0 for a fresh database)
pub fn get_current_version(conn: &Connection) -> Result<i32, RepositoryError> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten()
        .unwrap_or(0);

    Ok(version)
}

fn apply(
    conn: &mut Connection,
    version: i32,
    migration: fn(&Transaction<'_>) -> Result<(), RepositoryError>,
) -> Result<(), RepositoryError> {
    let tx = conn.transaction()?;
    migration(&tx)?;
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    tx.commit()?;

    tracing::info!("Applied database migration v{}", version);
    Ok(())
}

/// Migration to version 1: habits and their per-day records
///
/// The two unique indexes on (habit_id, date) are what keep a day from ever
/// holding two achievements or two details, whatever the writers do.
fn migration_v1(tx: &Transaction<'_>) -> Result<(), RepositoryError> {
    tx.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS habit_achievements (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            date TEXT NOT NULL,
            achieved BOOLEAN NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS habit_details (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            date TEXT NOT NULL,
            notes TEXT,
            duration_minutes INTEGER,
            photo_path TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        )",
        [],
    )?;

    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits (created_at)",
        [],
    )?;

    tx.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_achievements_habit_date
         ON habit_achievements (habit_id, date)",
        [],
    )?;

    tx.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_details_habit_date
         ON habit_details (habit_id, date)",
        [],
    )?;

    Ok(())
}

/// Migration to version 2: standalone todos
fn migration_v2(tx: &Transaction<'_>) -> Result<(), RepositoryError> {
    tx.execute(
        "CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            priority INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_initialize_database() {
        let mut conn = Connection::open_in_memory().unwrap();

        // Should succeed on a fresh database
        assert!(initialize_database(&mut conn).is_ok());

        // Should succeed when called again (idempotent)
        assert!(initialize_database(&mut conn).is_ok());

        let table_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
                 AND name IN ('habits', 'habit_achievements', 'habit_details', 'todos')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 4);
    }

    #[test]
    fn test_version_tracking() {
        let mut conn = Connection::open_in_memory().unwrap();

        initialize_database(&mut conn).unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_upgrade_from_v1() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE schema_version (version INTEGER PRIMARY KEY)", [])
            .unwrap();
        apply(&mut conn, 1, migration_v1).unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), 1);

        initialize_database(&mut conn).unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), CURRENT_VERSION);

        let todos_exists: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'todos'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(todos_exists, 1);
    }

    #[test]
    fn test_unique_index_rejects_second_achievement() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize_database(&mut conn).unwrap();

        conn.execute(
            "INSERT INTO habits (id, title, created_at) VALUES ('h1', 'Exercise', '2024-03-18T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO habit_achievements (id, habit_id, date, achieved, created_at)
             VALUES ('a1', 'h1', '2024-03-18', 1, '2024-03-18T00:00:00Z')",
            [],
        )
        .unwrap();

        let second = conn.execute(
            "INSERT INTO habit_achievements (id, habit_id, date, achieved, created_at)
             VALUES ('a2', 'h1', '2024-03-18', 0, '2024-03-18T00:00:00Z')",
            [],
        );
        assert!(second.is_err());
    }
}
