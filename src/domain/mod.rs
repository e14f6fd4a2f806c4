/// Domain module containing the core entities and their validation rules
///
/// This module defines Habit, Achievement and Detail (plus the standalone
/// Todo item). The storage layer persists these types; everything that
/// reaches the database has been through the constructors here first.

pub mod habit;
pub mod achievement;
pub mod detail;
pub mod todo;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use achievement::*;
pub use detail::*;
pub use todo::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur while validating domain input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
