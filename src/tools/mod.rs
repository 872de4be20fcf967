/// MCP tool implementations
///
/// Every tool has a `*Params` struct deserialized from the call arguments
/// (its JSON schema is what `tools/list` advertises) and a `*Response`
/// struct carrying the structured result plus a human-readable message.
/// Tools act on one user, the session user chosen at startup.

pub mod create;
pub mod update;
pub mod toggle;
pub mod list;
pub mod status;
pub mod journal;
pub mod insights;

pub use create::{create_habit, CreateHabitParams, CreateHabitResponse};
pub use update::{
    delete_habit, update_habit, DeleteHabitParams, DeleteHabitResponse, UpdateHabitParams,
    UpdateHabitResponse,
};
pub use toggle::{toggle_habit, ToggleHabitParams, ToggleHabitResponse};
pub use list::{list_habits, HabitSummary, ListHabitsParams, ListHabitsResponse};
pub use status::{get_habit_status, StatusParams, StatusResponse};
pub use journal::{
    delete_mood, list_moods, log_mood, update_mood, DeleteMoodParams, DeleteMoodResponse,
    ListMoodsParams, ListMoodsResponse, LogMoodParams, LogMoodResponse, UpdateMoodParams,
    UpdateMoodResponse,
};
pub use insights::{
    dashboard, mood_stats, DashboardParams, DashboardResponse, MoodStatsParams, MoodStatsResponse,
};

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{find_mood, parse_date, DomainError, EntryId, Habit, HabitId, MoodType, UserId};
use crate::services::{HabitTracker, ServiceError};
use crate::storage::KeyValueStore;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<DomainError> for ToolError {
    fn from(err: DomainError) -> Self {
        ToolError::Service(ServiceError::Validation(err))
    }
}

pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    HabitId::from_string(raw.trim())
        .map_err(|_| ToolError::InvalidParams(format!("'{}' is not a valid habit id", raw)))
}

pub(crate) fn parse_entry_id(raw: &str) -> Result<EntryId, ToolError> {
    EntryId::from_string(raw.trim())
        .map_err(|_| ToolError::InvalidParams(format!("'{}' is not a valid entry id", raw)))
}

/// An active habit belonging to `user_id`; anyone else's habit is not found
pub(crate) fn owned_habit<S: KeyValueStore + ?Sized>(
    tracker: &HabitTracker<'_, S>,
    user_id: &UserId,
    habit_id: &HabitId,
) -> Result<Habit, ToolError> {
    tracker
        .get_habit(habit_id)?
        .filter(|h| h.user_id == *user_id)
        .ok_or_else(|| ServiceError::HabitNotFound { habit_id: habit_id.clone() }.into())
}

/// Parse an optional `YYYY-MM-DD` argument, falling back to `today`
pub(crate) fn date_or_today(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ToolError> {
    match raw {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today),
    }
}

pub(crate) fn resolve_mood(id: &str) -> Result<MoodType, ToolError> {
    let id = id.trim().to_lowercase();
    find_mood(&id)
        .cloned()
        .ok_or(ToolError::Service(ServiceError::Validation(DomainError::UnknownMood(id))))
}
