/// Habit status tool
///
/// Handles the `habit_status` MCP tool call: streaks, today's state and the
/// last week of one habit, or of every habit when no id is given.

use chrono::{Duration, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::completion_rate;
use crate::domain::{streak_message, Habit, UserId};
use crate::services::{HabitTracker, ServiceError};
use crate::storage::KeyValueStore;
use crate::tools::{owned_habit, parse_habit_id, ToolError};

/// Parameters for the habit_status tool
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// ID of a specific habit (optional - shows all if omitted)
    #[serde(default)]
    pub habit_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitStatus {
    pub id: String,
    pub title: String,
    pub completed_today: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: f64,
    /// Completion of the last seven days, oldest first, ending today
    pub last_seven_days: Vec<bool>,
}

/// Response from the habit_status tool
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStatus>,
    pub message: String,
}

pub fn get_habit_status<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let tracker = HabitTracker::new(store);

    let habits = match params.habit_id.as_deref() {
        Some(raw) => {
            let habit_id = parse_habit_id(raw)?;
            vec![owned_habit(&tracker, user_id, &habit_id)?]
        }
        None => tracker.list_habits(user_id)?,
    };

    let statuses = habits
        .into_iter()
        .map(|habit| habit_status(&tracker, habit))
        .collect::<Result<Vec<_>, _>>()?;

    let message = if statuses.is_empty() {
        "No habits to report on yet.".to_string()
    } else {
        statuses.iter().map(format_status).collect::<Vec<_>>().join("\n\n")
    };

    Ok(StatusResponse {
        habits: statuses,
        message,
    })
}

fn habit_status<S: KeyValueStore + ?Sized>(
    tracker: &HabitTracker<'_, S>,
    habit: Habit,
) -> Result<HabitStatus, ServiceError> {
    let now = Utc::now();
    let today = now.date_naive();
    let completions = tracker.get_habit_completions(&habit.id)?;

    let done_on = |date: NaiveDate| completions.iter().any(|c| c.date == date && c.completed);
    let last_seven_days = (0..7).rev().map(|offset| done_on(today - Duration::days(offset))).collect();

    Ok(HabitStatus {
        id: habit.id.to_string(),
        completed_today: done_on(today),
        current_streak: habit.streak,
        longest_streak: habit.longest_streak,
        completion_rate: completion_rate(&habit, &completions, now),
        last_seven_days,
        title: habit.title,
    })
}

fn format_status(status: &HabitStatus) -> String {
    let week: String = status
        .last_seven_days
        .iter()
        .map(|done| if *done { '■' } else { '□' })
        .collect();

    format!(
        "🎯 **{}** {}\n   🔥 {} (best {} days)\n   📊 Rate: {:.1}% | Last 7 days: {}",
        status.title,
        if status.completed_today { "✅" } else { "⏳" },
        streak_message(status.current_streak),
        status.longest_streak,
        status.completion_rate,
        week
    )
}
