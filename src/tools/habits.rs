/// Tools for creating, reading, updating and deleting habits

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::storage::{HabitRepository, RepositoryError};
use crate::tools::MutationResponse;

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Return the most recently created habit first
    #[serde(default)]
    pub newest_first: bool,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<Habit>,
    pub total: usize,
}

/// Parameters for tools that address a single habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitIdParams {
    /// Habit ID (UUID)
    pub habit_id: String,
}

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Title of the habit
    pub title: String,
    /// Optional description
    pub description: Option<String>,
}

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// Habit ID (UUID)
    pub habit_id: String,
    /// New title
    pub title: String,
    /// New description; omitting it clears the description
    pub description: Option<String>,
}

pub fn list_habits<S: HabitRepository>(
    storage: &S,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, RepositoryError> {
    let mut habits = storage.list_habits()?;
    if params.newest_first {
        habits.reverse();
    }

    Ok(ListHabitsResponse {
        total: habits.len(),
        habits,
    })
}

pub fn get_habit<S: HabitRepository>(
    storage: &S,
    params: HabitIdParams,
) -> Result<Habit, RepositoryError> {
    storage.get_habit(&params.habit_id)
}

pub fn create_habit<S: HabitRepository>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<Habit, RepositoryError> {
    storage.create_habit(&params.title, params.description.as_deref())
}

pub fn update_habit<S: HabitRepository>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<MutationResponse, RepositoryError> {
    let updated = storage.update_habit(
        &params.habit_id,
        &params.title,
        params.description.as_deref(),
    )?;

    Ok(MutationResponse::from_outcome(
        updated,
        format!("Updated habit '{}'", params.title.trim()),
        format!("Habit not found: {}", params.habit_id),
    ))
}

/// Delete a habit together with its achievements and details
pub fn delete_habit<S: HabitRepository>(
    storage: &S,
    params: HabitIdParams,
) -> Result<MutationResponse, RepositoryError> {
    let deleted = storage.delete_habit(&params.habit_id)?;

    Ok(MutationResponse::from_outcome(
        deleted,
        format!("Deleted habit {}", params.habit_id),
        format!("Habit not found: {}", params.habit_id),
    ))
}
