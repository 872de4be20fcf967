/// Mood statistics and dashboard tools
///
/// Handles the `mood_stats` and `dashboard` MCP tool calls. The dashboard
/// gathers the session user's habits and journal and runs the analytics
/// summaries over them.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    completion_rate, streak_summary, top_moods, weekly_completion, MoodFrequency, StreakSummary,
    WeeklyCompletion,
};
use crate::domain::{find_mood, MoodEntry, MoodStats, UserId};
use crate::services::{HabitTracker, MoodJournal};
use crate::storage::KeyValueStore;
use crate::tools::ToolError;

/// Window used by mood_stats when none is given
pub const DEFAULT_STATS_DAYS: u32 = 30;

/// Window of the dashboard's mood summary
const DASHBOARD_MOOD_DAYS: u32 = 7;

/// Number of moods in the dashboard's top list
const TOP_MOOD_COUNT: usize = 3;

/// Parameters for the mood_stats tool
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MoodStatsParams {
    /// Look back this many days from today (optional - defaults to 30)
    #[serde(default)]
    pub days: Option<u32>,
}

/// Response from the mood_stats tool
#[derive(Debug, Serialize)]
pub struct MoodStatsResponse {
    pub days: u32,
    pub stats: MoodStats,
    pub message: String,
}

/// The dashboard takes no parameters
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DashboardParams {}

#[derive(Debug, Clone, Serialize)]
pub struct HabitRate {
    pub habit_id: String,
    pub title: String,
    pub completion_rate: f64,
}

/// Response from the dashboard tool
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_habits: usize,
    pub completed_today: u32,
    pub weekly: WeeklyCompletion,
    pub streaks: StreakSummary,
    pub completion_rates: Vec<HabitRate>,
    pub weekly_mood: MoodStats,
    pub top_moods: Vec<MoodFrequency>,
    pub todays_entry: Option<MoodEntry>,
    pub message: String,
}

pub fn mood_stats<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: MoodStatsParams,
) -> Result<MoodStatsResponse, ToolError> {
    let days = params.days.unwrap_or(DEFAULT_STATS_DAYS);
    let stats = MoodJournal::new(store).get_mood_stats(user_id, days)?;

    let message = if stats.total_entries == 0 {
        format!("No journal entries in the last {} days.", days)
    } else {
        let breakdown = stats
            .mood_counts
            .iter()
            .map(|(mood_id, count)| format!("{} {}", mood_label(mood_id), count))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "📊 **Mood over the last {} days** ({} entries)\n- Average mood: {:.1}/5\n- Average energy: {:.1}/5\n- Moods: {}",
            days, stats.total_entries, stats.average_mood, stats.average_energy, breakdown
        )
    };

    Ok(MoodStatsResponse { days, stats, message })
}

pub fn dashboard<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    _params: DashboardParams,
) -> Result<DashboardResponse, ToolError> {
    let now = Utc::now();
    let today = now.date_naive();
    let tracker = HabitTracker::new(store);
    let journal = MoodJournal::new(store);

    let habits = tracker.list_habits(user_id)?;
    let mut completions = Vec::new();
    let mut streaks = Vec::with_capacity(habits.len());
    let mut completion_rates = Vec::with_capacity(habits.len());

    for habit in &habits {
        let history = tracker.get_habit_completions(&habit.id)?;
        completion_rates.push(HabitRate {
            habit_id: habit.id.to_string(),
            title: habit.title.clone(),
            completion_rate: completion_rate(habit, &history, now),
        });
        streaks.push(tracker.get_streak_info(&habit.id)?);
        completions.extend(history);
    }

    let weekly = weekly_completion(&habits, &completions, today);
    let completed_today = weekly.days.last().map(|d| d.completed).unwrap_or(0);
    let streaks = streak_summary(&streaks);

    let entries = journal.list_entries(user_id)?;
    let top_moods = top_moods(&entries, TOP_MOOD_COUNT);
    let weekly_mood = journal.get_mood_stats_at(user_id, DASHBOARD_MOOD_DAYS, today)?;
    let todays_entry = entries.into_iter().find(|e| e.date == today);

    let mut message = format!(
        "🏠 **Dashboard** for {}\n\n✅ Today: {}/{} habits done\n📈 Weekly average: {:.0}%\n🔥 Active streaks: {} (average {:.1} days)",
        today,
        completed_today,
        habits.len(),
        weekly.average_percentage,
        streaks.active_streaks,
        streaks.average_streak
    );
    match &todays_entry {
        Some(entry) => message.push_str(&format!(
            "\n{} Today's mood: {} (energy {}/5)",
            entry.mood.emoji, entry.mood.name, entry.energy
        )),
        None => message.push_str("\n📝 No journal entry yet today"),
    }
    if weekly_mood.total_entries > 0 {
        message.push_str(&format!(
            "\n😊 Mood this week: {:.1}/5 over {} entries",
            weekly_mood.average_mood, weekly_mood.total_entries
        ));
    }
    if !top_moods.is_empty() {
        let top = top_moods
            .iter()
            .map(|m| format!("{} ({})", mood_label(&m.mood_id), m.count))
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!("\n🏆 Top moods: {}", top));
    }

    Ok(DashboardResponse {
        total_habits: habits.len(),
        completed_today,
        weekly,
        streaks,
        completion_rates,
        weekly_mood,
        top_moods,
        todays_entry,
        message,
    })
}

fn mood_label(mood_id: &str) -> String {
    match find_mood(mood_id) {
        Some(mood) => format!("{} {}", mood.emoji, mood.name),
        None => mood_id.to_string(),
    }
}
