/// Habit creation tool
///
/// Handles the `habit_create` MCP tool call.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, NewHabit, UserId};
use crate::services::HabitTracker;
use crate::storage::KeyValueStore;
use crate::tools::ToolError;

/// Parameters for the habit_create tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit (e.g., "Morning Run")
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Category: health, mindfulness, productivity, learning, social, creativity or lifestyle
    pub category: String,
    /// How often: daily, weekly or custom (defaults to daily)
    #[serde(default = "default_frequency")]
    pub frequency: String,
    /// Hex color; defaults to the category color
    #[serde(default)]
    pub color: Option<String>,
    /// Emoji icon; defaults to the category icon
    #[serde(default)]
    pub icon: Option<String>,
    /// Days of the week for weekly habits (0 = Sunday ... 6 = Saturday)
    #[serde(default)]
    pub target_days: Option<Vec<u8>>,
}

fn default_frequency() -> String {
    "daily".to_string()
}

/// Response from the habit_create tool
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Create a new habit for the session user
pub fn create_habit<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let tracker = HabitTracker::new(store);
    let habit = tracker.create_habit(
        user_id,
        NewHabit {
            title: params.title,
            description: params.description,
            category: params.category,
            color: params.color,
            icon: params.icon,
            frequency: params.frequency,
            target_days: params.target_days,
        },
    )?;

    let message = format!(
        "{} Created habit '{}' ({}, {})\nHabit ID: {}",
        habit.icon,
        habit.title,
        habit.category,
        habit.frequency.as_str(),
        habit.id
    );

    Ok(CreateHabitResponse { habit, message })
}
