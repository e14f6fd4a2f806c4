/// Tools for standalone todo items

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{NewTodo, Todo, DEFAULT_PRIORITY};
use crate::storage::{RepositoryError, TodoRepository};
use crate::tools::MutationResponse;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListTodosParams {}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TodoIdParams {
    /// Todo ID
    pub id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTodoParams {
    pub title: String,
    pub description: Option<String>,
    /// Priority, defaults to 1
    pub priority: Option<i32>,
}

/// Replaces every field of an existing todo
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTodoParams {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub priority: Option<i32>,
}

pub fn list_todos<S: TodoRepository>(
    storage: &S,
    _params: ListTodosParams,
) -> Result<Vec<Todo>, RepositoryError> {
    storage.list_todos()
}

pub fn get_todo<S: TodoRepository>(storage: &S, params: TodoIdParams) -> Result<Todo, RepositoryError> {
    storage.get_todo(params.id)
}

pub fn create_todo<S: TodoRepository>(
    storage: &S,
    params: CreateTodoParams,
) -> Result<Todo, RepositoryError> {
    storage.create_todo(NewTodo {
        title: params.title,
        description: params.description,
        completed: false,
        priority: params.priority.unwrap_or(DEFAULT_PRIORITY),
    })
}

pub fn update_todo<S: TodoRepository>(
    storage: &S,
    params: UpdateTodoParams,
) -> Result<MutationResponse, RepositoryError> {
    let updated = storage.update_todo(
        params.id,
        NewTodo {
            title: params.title,
            description: params.description,
            completed: params.completed,
            priority: params.priority.unwrap_or(DEFAULT_PRIORITY),
        },
    )?;

    Ok(MutationResponse::from_outcome(
        updated,
        "Todo updated".to_string(),
        format!("Todo not found: {}", params.id),
    ))
}

pub fn delete_todo<S: TodoRepository>(
    storage: &S,
    params: TodoIdParams,
) -> Result<MutationResponse, RepositoryError> {
    let deleted = storage.delete_todo(params.id)?;

    Ok(MutationResponse::from_outcome(
        deleted,
        "Todo deleted".to_string(),
        format!("Todo not found: {}", params.id),
    ))
}

/// Flip a todo between done and not done
pub fn toggle_todo<S: TodoRepository>(
    storage: &S,
    params: TodoIdParams,
) -> Result<MutationResponse, RepositoryError> {
    let toggled = storage.toggle_todo(params.id)?;

    Ok(MutationResponse::from_outcome(
        toggled,
        "Todo status toggled".to_string(),
        format!("Todo not found: {}", params.id),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{PhotoStore, SqliteRepository};

    #[test]
    fn test_create_uses_default_priority() {
        let storage = SqliteRepository::open_in_memory(PhotoStore::new(std::env::temp_dir())).unwrap();
        let todo = create_todo(
            &storage,
            CreateTodoParams { title: "Buy milk".to_string(), description: None, priority: None },
        )
        .unwrap();

        assert_eq!(todo.priority, DEFAULT_PRIORITY);
        assert!(toggle_todo(&storage, TodoIdParams { id: todo.id }).unwrap().success);
        assert!(get_todo(&storage, TodoIdParams { id: todo.id }).unwrap().completed);
    }
}
