/// Habit completion toggle tool
///
/// Handles the `habit_toggle` MCP tool call: flips a habit's completion for a
/// day (today unless a date is given) and reports the refreshed streak.

use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{streak_message, UserId};
use crate::services::HabitTracker;
use crate::storage::KeyValueStore;
use crate::tools::{date_or_today, owned_habit, parse_habit_id, ToolError};

/// Parameters for the habit_toggle tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    /// ID of the habit to toggle
    pub habit_id: String,
    /// Day to toggle (YYYY-MM-DD, optional - defaults to today)
    #[serde(default)]
    pub date: Option<String>,
}

/// Response from the habit_toggle tool
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub streak: u32,
    pub longest_streak: u32,
    pub message: String,
}

pub fn toggle_habit<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: ToggleHabitParams,
) -> Result<ToggleHabitResponse, ToolError> {
    let now = Utc::now();
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = date_or_today(params.date.as_deref(), now.date_naive())?;

    let tracker = HabitTracker::new(store);
    let habit = owned_habit(&tracker, user_id, &habit_id)?;

    let outcome = tracker.toggle_completion_at(&habit_id, date, now)?;
    let info = tracker.get_streak_info(&habit_id)?;

    let message = if outcome.completed {
        format!(
            "✅ '{}' completed for {}\n🔥 {}",
            habit.title,
            date,
            streak_message(outcome.streak)
        )
    } else {
        format!(
            "↩️ '{}' marked not done for {}\n🔥 Current streak: {} days",
            habit.title, date, outcome.streak
        )
    };

    Ok(ToggleHabitResponse {
        habit_id: habit_id.to_string(),
        date,
        completed: outcome.completed,
        streak: outcome.streak,
        longest_streak: info.longest,
        message,
    })
}
