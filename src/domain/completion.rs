/// Per-day completion records for habits
///
/// A habit has at most one HabitCompletion per calendar date. Toggling a
/// date flips the record in place rather than appending a new one.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::HabitId;

/// Whether a habit was done on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCompletion {
    pub habit_id: HabitId,
    /// Which day this record is for
    pub date: NaiveDate,
    pub completed: bool,
    /// When the record was last created or flipped
    pub timestamp: DateTime<Utc>,
}

impl HabitCompletion {
    /// First toggle of a day always marks it completed
    pub fn completed_on(habit_id: HabitId, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            habit_id,
            date,
            completed: true,
            timestamp: now,
        }
    }

    /// Flip the completed flag and return the new value
    pub fn toggle(&mut self, now: DateTime<Utc>) -> bool {
        self.completed = !self.completed;
        self.timestamp = now;
        self.completed
    }

    pub fn is_for(&self, habit_id: &HabitId, date: NaiveDate) -> bool {
        self.habit_id == *habit_id && self.date == date
    }
}
