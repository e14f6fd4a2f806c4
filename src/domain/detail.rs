/// Detail entity for enriching a habit-day
///
/// A detail carries the free-form parts of a day's record: notes, how long
/// the habit took, and a reference to a photo kept in the file store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DetailId, DomainError, HabitId};

/// Longest notes text accepted for a single detail
pub const MAX_NOTES_CHARS: usize = 255;

/// Longest photo path the details table accepts
pub const MAX_PHOTO_PATH_CHARS: usize = 255;

/// Notes, duration and photo recorded for one habit on one date
///
/// At most one detail exists per (habit, date). Unlike achievements, a second
/// write for the same pair is rejected rather than merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    pub id: DetailId,
    pub habit_id: HabitId,
    pub date: NaiveDate,
    /// User's notes about the day
    pub notes: Option<String>,
    /// Time spent, in whole minutes
    pub duration_minutes: Option<u32>,
    /// Path of an already-stored photo file
    pub photo_path: Option<String>,
}

/// The caller-supplied part of a detail
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailInput {
    pub notes: Option<String>,
    pub duration_minutes: Option<u32>,
    pub photo_path: Option<String>,
}

impl Detail {
    /// Create a new detail with validation
    ///
    /// A blank photo path is treated as no photo.
    pub fn new(habit_id: HabitId, date: NaiveDate, input: DetailInput) -> Result<Self, DomainError> {
        Self::validate_notes(&input.notes)?;

        let photo_path = input.photo_path.filter(|p| !p.trim().is_empty());
        Self::validate_photo_path(&photo_path)?;

        Ok(Self {
            id: DetailId::new(),
            habit_id,
            date,
            notes: input.notes,
            duration_minutes: input.duration_minutes,
            photo_path,
        })
    }

    /// Create a detail from existing data (used when loading from database)
    pub fn from_existing(
        id: DetailId,
        habit_id: HabitId,
        date: NaiveDate,
        notes: Option<String>,
        duration_minutes: Option<u32>,
        photo_path: Option<String>,
    ) -> Self {
        Self {
            id,
            habit_id,
            date,
            notes,
            duration_minutes,
            photo_path,
        }
    }

    fn validate_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(text) = notes {
            if text.chars().count() > MAX_NOTES_CHARS {
                return Err(DomainError::InvalidValue {
                    message: format!("Notes cannot be longer than {} characters", MAX_NOTES_CHARS),
                });
            }
        }
        Ok(())
    }

    fn validate_photo_path(photo_path: &Option<String>) -> Result<(), DomainError> {
        if let Some(path) = photo_path {
            if path.chars().count() > MAX_PHOTO_PATH_CHARS {
                return Err(DomainError::InvalidValue {
                    message: format!(
                        "Photo path cannot be longer than {} characters",
                        MAX_PHOTO_PATH_CHARS
                    ),
                });
            }
        }
        Ok(())
    }
}
