/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, HabitCompletion, MoodEntry),
/// the streak and mood statistics calculations, and their validation rules.

pub mod habit;
pub mod completion;
pub mod streak;
pub mod mood;
pub mod catalog;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use completion::*;
pub use streak::*;
pub use mood::*;
pub use catalog::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit title: {0}")]
    InvalidTitle(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid energy level {0}: must be between 1 and 5")]
    InvalidEnergy(u8),

    #[error("Unknown mood: {0}")]
    UnknownMood(String),
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(s: &str) -> Result<chrono::NaiveDate, DomainError> {
    chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
}
