/// Habit and journal engines
///
/// Both engines borrow a key-value store and hold no state of their own;
/// every call loads the collections it needs and rewrites any it changes.

pub mod habits;
pub mod journal;

pub use habits::{HabitTracker, ToggleOutcome};
pub use journal::MoodJournal;

use thiserror::Error;
use crate::domain::{DomainError, EntryId, HabitId};
use crate::storage::StorageError;

/// Errors reported by the engine operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: HabitId },

    #[error("Journal entry not found: {entry_id}")]
    EntryNotFound { entry_id: EntryId },

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::HabitNotFound { .. } | ServiceError::EntryNotFound { .. })
    }
}
