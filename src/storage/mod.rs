/// Storage layer for persisting habit and journal data
///
/// The engines only see a key-value port: each logical collection is a JSON
/// array stored under its own key, read whole and rewritten whole on every
/// mutation. Two ports ship, an in-memory map and a SQLite key-value table.

pub mod memory;
pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Key of the habit definitions collection
pub const HABITS_KEY: &str = "zennis_habits";
/// Key of the habit completion records collection
pub const COMPLETIONS_KEY: &str = "zennis_habit_completions";
/// Key of the mood journal collection
pub const JOURNAL_KEY: &str = "zennis_journal_entries";
/// Reserved for the credentials collection; never read or written here
pub const USERS_KEY: &str = "zennis_users";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Synchronous key-value persistence port
///
/// Values are whole serialized collections. Implementations must treat a
/// missing key as "no data yet" and return `Ok(None)`.
pub trait KeyValueStore {
    /// Read the serialized collection stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace whatever is stored under `key`
    fn write(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Load a whole collection, treating an absent key as empty
pub fn load_collection<T, S>(store: &S, key: &str) -> Result<Vec<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.read(key)? {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(Vec::new()),
    }
}

/// Serialize and rewrite a whole collection
pub fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(items)?;
    store.write(key, raw)?;
    tracing::debug!("Wrote {} records to '{}'", items.len(), key);
    Ok(())
}
