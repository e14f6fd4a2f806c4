/// Standalone to-do items
///
/// Todos are independent of habits and keyed by an integer assigned by the
/// database.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const MAX_TODO_TITLE_CHARS: usize = 100;

pub const DEFAULT_PRIORITY: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: i32,
}

/// Fields a caller supplies when creating or replacing a todo
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Validate and normalize; the title is trimmed
    pub fn validated(mut self) -> Result<Self, DomainError> {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle("Todo title cannot be empty".to_string()));
        }
        if trimmed.chars().count() > MAX_TODO_TITLE_CHARS {
            return Err(DomainError::InvalidTitle(format!(
                "Todo title cannot be longer than {} characters",
                MAX_TODO_TITLE_CHARS
            )));
        }
        self.title = trimmed.to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let todo: NewTodo = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert!(!todo.completed);
        assert_eq!(todo.priority, DEFAULT_PRIORITY);
        assert_eq!(todo.description, None);
    }

    #[test]
    fn test_validation() {
        assert!(NewTodo::new(" ").validated().is_err());
        assert!(NewTodo::new("x".repeat(MAX_TODO_TITLE_CHARS + 1)).validated().is_err());
        assert_eq!(NewTodo::new("  Buy milk ").validated().unwrap().title, "Buy milk");
    }
}
