/// Habit listing tool
///
/// Handles the `habit_list` MCP tool call with optional category filtering
/// and sorting.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::completion_rate;
use crate::domain::UserId;
use crate::services::HabitTracker;
use crate::storage::KeyValueStore;
use crate::tools::ToolError;

/// Parameters for the habit_list tool
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only list habits in this category
    #[serde(default)]
    pub category: Option<String>,
    /// Sort by: 'created' (default), 'title', 'streak' or 'completion_rate'
    #[serde(default)]
    pub sort_by: Option<String>,
}

/// One listed habit with its progress figures
#[derive(Debug, Clone, Serialize)]
pub struct HabitSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub icon: String,
    pub frequency: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
    /// Percentage of days since creation with a completion
    pub completion_rate: f64,
}

/// Response from the habit_list tool
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub message: String,
}

pub fn list_habits<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let now = Utc::now();
    let today = now.date_naive();
    let tracker = HabitTracker::new(store);

    let category = params.category.map(|c| c.trim().to_lowercase());
    let mut habits = Vec::new();

    for habit in tracker.list_habits(user_id)? {
        if category.as_ref().is_some_and(|c| *c != habit.category) {
            continue;
        }

        let completions = tracker.get_habit_completions(&habit.id)?;
        let completed_today = completions.iter().any(|c| c.date == today && c.completed);

        habits.push(HabitSummary {
            id: habit.id.to_string(),
            completion_rate: completion_rate(&habit, &completions, now),
            frequency: habit.frequency.as_str().to_string(),
            current_streak: habit.streak,
            longest_streak: habit.longest_streak,
            completed_today,
            title: habit.title,
            category: habit.category,
            icon: habit.icon,
        });
    }

    match params.sort_by.as_deref().unwrap_or("created") {
        "title" | "name" => habits.sort_by_key(|h| h.title.to_lowercase()),
        "streak" => habits.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
        "completion_rate" => habits.sort_by(|a, b| b.completion_rate.total_cmp(&a.completion_rate)),
        "created" => {}
        other => {
            return Err(ToolError::InvalidParams(format!(
                "Unknown sort_by '{}': expected created, title, streak or completion_rate",
                other
            )))
        }
    }

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let lines = habits
            .iter()
            .map(|h| {
                format!(
                    "{} **{}** ({})\n   📅 {} | 🔥 Streak: {} days (best {}) | 📊 Rate: {:.1}%{}\n   ID: {}",
                    h.icon,
                    h.title,
                    h.category,
                    h.frequency,
                    h.current_streak,
                    h.longest_streak,
                    h.completion_rate,
                    if h.completed_today { " | ✅ done today" } else { "" },
                    h.id
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("📋 **Habits** ({})\n\n{}", habits.len(), lines)
    };

    Ok(ListHabitsResponse { habits, message })
}
