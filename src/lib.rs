/// Public library interface for the habit journal
///
/// This module exports the journal server, the repository and the domain
/// types, so other applications or tests can drive the store directly.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{
    ErrorKind, HabitRepository, PhotoStore, RepositoryError, SqliteRepository, TodoRepository,
};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the journal keeps its data
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Directory that relative photo paths are resolved against
    pub photo_root: PathBuf,
}

impl ServerConfig {
    pub fn new(database_path: PathBuf, photo_root: PathBuf) -> Self {
        Self {
            database_path,
            photo_root,
        }
    }

    /// Keep photos next to the database file
    pub fn with_database(database_path: PathBuf) -> Self {
        let photo_root = database_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            database_path,
            photo_root,
        }
    }
}

/// The habit journal: one repository, served as JSON-RPC tools
///
/// The repository is constructed once here and handed to the tools by
/// reference.
pub struct HabitJournalServer {
    repository: SqliteRepository,
}

impl HabitJournalServer {
    /// Open the database (creating the schema if needed)
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        tracing::info!(
            "Initializing habit journal with database {:?} and photo root {:?}",
            config.database_path,
            config.photo_root
        );

        let photos = PhotoStore::new(config.photo_root);
        let repository = SqliteRepository::new(config.database_path, photos)?;

        Ok(Self { repository })
    }

    /// Serve JSON-RPC requests over stdin/stdout until stdin closes
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting tool server...");

        // Test database connectivity
        let habits = self.repository.list_habits()?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut server = mcp::McpServer::new(self);
        server.run().await?;

        Ok(())
    }

    pub fn repository(&self) -> &SqliteRepository {
        &self.repository
    }
}
