/// Storage layer for persisting journal data
///
/// This module defines the repository interfaces and their SQLite
/// implementation. The repository is the only code that writes the habits,
/// achievements and details tables, and it is where the uniqueness and
/// cascade rules are enforced.

pub mod sqlite;
pub mod migrations;
pub mod photos;
pub mod todos;

// Re-export the main storage types
pub use sqlite::*;
pub use photos::PhotoStore;

use std::fmt;

use thiserror::Error;

use crate::domain::{Achievement, Detail, DetailInput, DomainError, Habit, NewTodo, Todo};

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Duplicate {entity}: habit {habit_id} already has one for {date}")]
    ConstraintViolation {
        entity: &'static str,
        habit_id: String,
        date: String,
    },

    #[error("Database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Database unavailable: {0}")]
    Unavailable(String),
}

/// The four failure classes a caller branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    ConstraintViolation,
    PersistenceFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ConstraintViolation => "constraint_violation",
            ErrorKind::PersistenceFailure => "persistence_failure",
        };
        f.write_str(name)
    }
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            RepositoryError::Persistence(_) | RepositoryError::Unavailable(_) => {
                ErrorKind::PersistenceFailure
            }
        }
    }
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        RepositoryError::InvalidArgument(err.to_string())
    }
}

/// Reads and writes of habits and their per-day records
///
/// Identifiers and dates are accepted in string form. Anything that does not
/// parse fails with `InvalidArgument` before the database is touched.
pub trait HabitRepository {
    /// All habits in creation order
    fn list_habits(&self) -> Result<Vec<Habit>, RepositoryError>;

    fn get_habit(&self, id: &str) -> Result<Habit, RepositoryError>;

    fn create_habit(&self, title: &str, description: Option<&str>) -> Result<Habit, RepositoryError>;

    /// Overwrite title and description; `Ok(false)` when no such habit exists
    fn update_habit(
        &self,
        id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<bool, RepositoryError>;

    /// Delete a habit with all of its achievements and details in one transaction
    fn delete_habit(&self, id: &str) -> Result<bool, RepositoryError>;

    fn list_achievements(&self, habit_id: &str) -> Result<Vec<Achievement>, RepositoryError>;

    /// Insert or update the achievement for (habit_id, date)
    fn upsert_achievement(
        &self,
        habit_id: &str,
        date: &str,
        achieved: bool,
    ) -> Result<Achievement, RepositoryError>;

    /// Insert a detail; a second detail for the same date is a `ConstraintViolation`
    fn create_detail(
        &self,
        habit_id: &str,
        date: &str,
        input: DetailInput,
    ) -> Result<Detail, RepositoryError>;

    /// Delete the detail for (habit_id, date) and, best-effort, its photo file
    fn delete_detail(&self, habit_id: &str, date: &str) -> Result<bool, RepositoryError>;

    fn list_details(&self, habit_id: &str) -> Result<Vec<Detail>, RepositoryError>;
}

/// CRUD over standalone todo items
pub trait TodoRepository {
    fn list_todos(&self) -> Result<Vec<Todo>, RepositoryError>;

    fn get_todo(&self, id: i64) -> Result<Todo, RepositoryError>;

    fn create_todo(&self, todo: NewTodo) -> Result<Todo, RepositoryError>;

    fn update_todo(&self, id: i64, todo: NewTodo) -> Result<bool, RepositoryError>;

    fn delete_todo(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Flip the completed flag
    fn toggle_todo(&self, id: i64) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_invalid_arguments() {
        let err: RepositoryError = DomainError::InvalidTitle("empty".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_persistence_kinds() {
        let err = RepositoryError::Unavailable("lock poisoned".to_string());
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);

        let err: RepositoryError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert_eq!(err.kind().to_string(), "persistence_failure");
    }
}
