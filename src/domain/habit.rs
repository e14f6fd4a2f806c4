/// Habit entity
///
/// A habit is the parent record of the journal: achievements and details are
/// keyed by a habit and live no longer than it does.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId};

/// Longest title the habits table accepts
pub const MAX_TITLE_CHARS: usize = 255;

/// A user-defined recurring activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier, fixed at creation
    pub id: HabitId,
    /// Display title (e.g., "Exercise")
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with a fresh ID and creation timestamp
    ///
    /// The title is trimmed and must be non-empty. The timestamp is truncated
    /// to microseconds so that it survives a round trip through the database.
    pub fn new(title: &str, description: Option<String>) -> Result<Self, DomainError> {
        let title = Self::validate_title(title)?;

        Ok(Self {
            id: HabitId::new(),
            title,
            description,
            created_at: Utc::now().trunc_subsecs(6),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    pub fn from_existing(
        id: HabitId,
        title: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            created_at,
        }
    }

    /// Check a title and return its trimmed form
    pub fn validate_title(title: &str) -> Result<String, DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > MAX_TITLE_CHARS {
            return Err(DomainError::InvalidTitle(format!(
                "Habit title cannot be longer than {} characters",
                MAX_TITLE_CHARS
            )));
        }

        Ok(trimmed.to_string())
    }
}
