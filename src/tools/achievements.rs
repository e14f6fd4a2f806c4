/// Tools for reading and recording daily achievements

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Achievement;
use crate::storage::{HabitRepository, RepositoryError};

/// Parameters for listing the achievements of a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListAchievementsParams {
    /// Habit ID (UUID)
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListAchievementsResponse {
    pub achievements: Vec<Achievement>,
    pub achieved_days: usize,
}

/// Parameters for marking a day achieved or not achieved
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpsertAchievementParams {
    /// Habit ID (UUID)
    pub habit_id: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    /// Whether the habit was performed that day
    pub achieved: bool,
}

pub fn list_achievements<S: HabitRepository>(
    storage: &S,
    params: ListAchievementsParams,
) -> Result<ListAchievementsResponse, RepositoryError> {
    let achievements = storage.list_achievements(&params.habit_id)?;
    let achieved_days = achievements.iter().filter(|a| a.achieved).count();

    Ok(ListAchievementsResponse {
        achievements,
        achieved_days,
    })
}

/// Record the achievement flag for one day; repeated calls update in place
pub fn upsert_achievement<S: HabitRepository>(
    storage: &S,
    params: UpsertAchievementParams,
) -> Result<Achievement, RepositoryError> {
    storage.upsert_achievement(&params.habit_id, &params.date, params.achieved)
}
