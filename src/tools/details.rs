/// Tools for the per-day detail records (notes, duration, photo)

use chrono::Utc;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{Detail, DetailInput, DATE_FORMAT};
use crate::storage::{HabitRepository, RepositoryError};
use crate::tools::MutationResponse;

/// Parameters for recording a detail
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateDetailParams {
    /// Habit ID (UUID)
    pub habit_id: String,
    /// Calendar date (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
    /// Notes, at most 255 characters
    pub notes: Option<String>,
    /// Time spent in minutes
    pub duration_minutes: Option<u32>,
    /// Path of a photo that has already been stored
    pub photo_path: Option<String>,
}

/// Parameters addressing the detail of one habit-day
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DetailKeyParams {
    /// Habit ID (UUID)
    pub habit_id: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListDetailsParams {
    /// Habit ID (UUID)
    pub habit_id: String,
}

pub fn create_detail<S: HabitRepository>(
    storage: &S,
    params: CreateDetailParams,
) -> Result<Detail, RepositoryError> {
    let date = params
        .date
        .unwrap_or_else(|| Utc::now().naive_utc().date().format(DATE_FORMAT).to_string());

    storage.create_detail(
        &params.habit_id,
        &date,
        DetailInput {
            notes: params.notes,
            duration_minutes: params.duration_minutes,
            photo_path: params.photo_path,
        },
    )
}

/// Remove the detail for a day, including its photo file
pub fn delete_detail<S: HabitRepository>(
    storage: &S,
    params: DetailKeyParams,
) -> Result<MutationResponse, RepositoryError> {
    let deleted = storage.delete_detail(&params.habit_id, &params.date)?;

    Ok(MutationResponse::from_outcome(
        deleted,
        format!("Deleted detail for {}", params.date),
        format!("No detail recorded for {}", params.date),
    ))
}

pub fn list_details<S: HabitRepository>(
    storage: &S,
    params: ListDetailsParams,
) -> Result<Vec<Detail>, RepositoryError> {
    storage.list_details(&params.habit_id)
}
