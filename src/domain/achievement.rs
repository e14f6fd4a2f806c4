/// Daily achievement flag for a habit

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AchievementId, HabitId};

/// Whether a habit was performed on a given calendar date
///
/// There is at most one achievement per (habit, date). Writing the same pair
/// again updates `achieved` and keeps the original `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: AchievementId,
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub achieved: bool,
}

impl Achievement {
    /// Build a candidate record with a fresh ID
    ///
    /// The ID is only kept if no record exists yet for (habit_id, date).
    pub fn new(habit_id: HabitId, date: NaiveDate, achieved: bool) -> Self {
        Self {
            id: AchievementId::new(),
            habit_id,
            date,
            achieved,
        }
    }

    pub fn from_existing(
        id: AchievementId,
        habit_id: HabitId,
        date: NaiveDate,
        achieved: bool,
    ) -> Self {
        Self {
            id,
            habit_id,
            date,
            achieved,
        }
    }
}
