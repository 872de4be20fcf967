/// Habit update and delete tools
///
/// Handles the `habit_update` and `habit_delete` MCP tool calls.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit, HabitUpdate, UserId};
use crate::services::HabitTracker;
use crate::storage::KeyValueStore;
use crate::tools::{owned_habit, parse_habit_id, ToolError};

/// Parameters for the habit_update tool
///
/// Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// New description; an empty string clears it
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// daily, weekly or custom
    #[serde(default)]
    pub frequency: Option<String>,
    /// Days of the week (0 = Sunday ... 6 = Saturday); an empty list clears them
    #[serde(default)]
    pub target_days: Option<Vec<u8>>,
}

/// Response from the habit_update tool
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Parameters for the habit_delete tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

/// Response from the habit_delete tool
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub habit_id: String,
    pub message: String,
}

/// Merge the supplied fields into an existing habit
pub fn update_habit<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let frequency = params.frequency.as_deref().map(Frequency::parse).transpose()?;

    let update = HabitUpdate {
        title: params.title,
        description: params.description.map(Some),
        category: params.category,
        color: params.color,
        icon: params.icon,
        frequency,
        target_days: params
            .target_days
            .map(|days| if days.is_empty() { None } else { Some(days) }),
    };

    let tracker = HabitTracker::new(store);
    owned_habit(&tracker, user_id, &habit_id)?;
    let habit = tracker.update_habit(&habit_id, update)?;
    let message = format!("✏️ Updated habit '{}'", habit.title);

    Ok(UpdateHabitResponse { habit, message })
}

/// Deactivate a habit and drop its completion history
pub fn delete_habit<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let tracker = HabitTracker::new(store);

    let habit = owned_habit(&tracker, user_id, &habit_id)?;
    tracker.delete_habit(&habit_id)?;

    let message = format!("🗑️ Deleted habit '{}' and its completion history", habit.title);

    Ok(DeleteHabitResponse {
        habit_id: habit_id.to_string(),
        message,
    })
}
