/// Public library interface for the Habit Journal MCP server
///
/// Exports the habit and journal engines, the storage ports they run on,
/// the dashboard analytics and the server that exposes them as MCP tools.

use std::path::PathBuf;
use thiserror::Error;

pub mod domain;
pub mod storage;
pub mod services;
pub mod analytics;
pub mod tools;
pub mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
pub use services::{HabitTracker, MoodJournal, ServiceError, ToggleOutcome};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The habit tracker and mood journal for one session user
///
/// Owns the key-value store both engines read and write, and the id of the
/// user every MCP tool call acts on.
pub struct JournalServer {
    store: Box<dyn KeyValueStore>,
    user_id: UserId,
}

impl JournalServer {
    /// Open a server backed by the SQLite database at `db_path`
    ///
    /// The database file and schema are created if they don't exist yet.
    pub async fn new(db_path: PathBuf, user_id: UserId) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Journal server with database: {:?}", db_path);

        let store = SqliteStore::new(&db_path)?;
        Ok(Self::with_store(Box::new(store), user_id))
    }

    /// A server whose data lives only as long as the process
    pub fn in_memory(user_id: UserId) -> Self {
        tracing::info!("Initializing Habit Journal server with an in-memory store");
        Self::with_store(Box::new(MemoryStore::new()), user_id)
    }

    pub fn with_store(store: Box<dyn KeyValueStore>, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin is closed.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server for user '{}'...", self.user_id);

        let habits = self.habits().list_habits(&self.user_id)?;
        let entries = self.journal().list_entries(&self.user_id)?;
        tracing::info!(
            "Server started successfully, found {} habits and {} journal entries",
            habits.len(),
            entries.len()
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn habits(&self) -> HabitTracker<'_, dyn KeyValueStore> {
        HabitTracker::new(self.store.as_ref())
    }

    pub fn journal(&self) -> MoodJournal<'_, dyn KeyValueStore> {
        MoodJournal::new(self.store.as_ref())
    }
}
