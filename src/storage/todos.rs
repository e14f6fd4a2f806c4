/// SQLite implementation of the todo repository

use rusqlite::{params, OptionalExtension, Row};

use crate::domain::{NewTodo, Todo};
use crate::storage::{RepositoryError, SqliteRepository, TodoRepository};

const TODO_COLUMNS: &str = "id, title, description, completed, priority";

impl TodoRepository for SqliteRepository {
    fn list_todos(&self) -> Result<Vec<Todo>, RepositoryError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM todos ORDER BY id ASC", TODO_COLUMNS))?;
        let rows = stmt.query_map([], row_to_todo)?;

        let mut todos = Vec::new();
        for todo in rows {
            todos.push(todo?);
        }

        Ok(todos)
    }

    fn get_todo(&self, id: i64) -> Result<Todo, RepositoryError> {
        let conn = self.lock()?;
        let todo = conn
            .query_row(
                &format!("SELECT {} FROM todos WHERE id = ?1", TODO_COLUMNS),
                params![id],
                row_to_todo,
            )
            .optional()?;

        todo.ok_or_else(|| RepositoryError::NotFound {
            entity: "Todo",
            id: id.to_string(),
        })
    }

    fn create_todo(&self, todo: NewTodo) -> Result<Todo, RepositoryError> {
        let todo = todo.validated()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO todos (title, description, completed, priority) VALUES (?1, ?2, ?3, ?4)",
            params![todo.title, todo.description, todo.completed, todo.priority],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!("Created todo {}: {}", id, todo.title);
        Ok(Todo {
            id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            priority: todo.priority,
        })
    }

    fn update_todo(&self, id: i64, todo: NewTodo) -> Result<bool, RepositoryError> {
        let todo = todo.validated()?;

        let conn = self.lock()?;
        let rows_affected = conn.execute(
            "UPDATE todos SET title = ?2, description = ?3, completed = ?4, priority = ?5
             WHERE id = ?1",
            params![id, todo.title, todo.description, todo.completed, todo.priority],
        )?;

        Ok(rows_affected > 0)
    }

    fn delete_todo(&self, id: i64) -> Result<bool, RepositoryError> {
        let conn = self.lock()?;
        let rows_affected = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;

        if rows_affected > 0 {
            tracing::debug!("Deleted todo {}", id);
        }
        Ok(rows_affected > 0)
    }

    fn toggle_todo(&self, id: i64) -> Result<bool, RepositoryError> {
        let conn = self.lock()?;
        let rows_affected = conn.execute(
            "UPDATE todos SET completed = NOT completed WHERE id = ?1",
            params![id],
        )?;

        Ok(rows_affected > 0)
    }
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        priority: row.get(4)?,
    })
}
