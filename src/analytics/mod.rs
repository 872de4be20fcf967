/// Derived dashboard views
///
/// Pure summaries computed from what the engines return: the last week's
/// completion percentages, per-habit completion rates, streak summaries and
/// the most frequent moods.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{Habit, HabitCompletion, MoodEntry, StreakInfo};

/// Completion figures for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCompletion {
    /// Oldest day first, ending today
    pub days: Vec<DailyCompletion>,
    pub average_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub active_streaks: u32,
    pub average_streak: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodFrequency {
    pub mood_id: String,
    pub count: u32,
}

/// How many of `habits` were completed on each of the last seven days
pub fn weekly_completion(habits: &[Habit], completions: &[HabitCompletion], today: NaiveDate) -> WeeklyCompletion {
    let total = habits.len() as u32;

    let days: Vec<DailyCompletion> = (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let completed = habits
                .iter()
                .filter(|habit| {
                    completions
                        .iter()
                        .any(|c| c.habit_id == habit.id && c.date == date && c.completed)
                })
                .count() as u32;
            let percentage = if total > 0 {
                f64::from(completed) / f64::from(total) * 100.0
            } else {
                0.0
            };

            DailyCompletion {
                date,
                completed,
                total,
                percentage,
            }
        })
        .collect();

    let average_percentage = days.iter().map(|d| d.percentage).sum::<f64>() / 7.0;

    WeeklyCompletion {
        days,
        average_percentage,
    }
}

/// Completed records per day since the habit was created, as a percentage
///
/// The day count is never below one so a brand new habit does not divide
/// by zero.
pub fn completion_rate(habit: &Habit, completions: &[HabitCompletion], now: DateTime<Utc>) -> f64 {
    let elapsed = now - habit.created_at;
    let mut days = elapsed.num_days();
    if elapsed > Duration::days(days) {
        days += 1;
    }
    let days = days.max(1);

    let completed = completions
        .iter()
        .filter(|c| c.habit_id == habit.id && c.completed)
        .count();

    completed as f64 / days as f64 * 100.0
}

pub fn streak_summary(streaks: &[StreakInfo]) -> StreakSummary {
    if streaks.is_empty() {
        return StreakSummary {
            active_streaks: 0,
            average_streak: 0.0,
        };
    }

    let active_streaks = streaks.iter().filter(|s| s.current > 0).count() as u32;
    let total: u32 = streaks.iter().map(|s| s.current).sum();

    StreakSummary {
        active_streaks,
        average_streak: f64::from(total) / streaks.len() as f64,
    }
}

/// The `limit` most frequent moods, most frequent first, ties by mood id
pub fn top_moods(entries: &[MoodEntry], limit: usize) -> Vec<MoodFrequency> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for entry in entries {
        *counts.entry(&*entry.mood.id).or_insert(0) += 1;
    }

    let mut frequencies: Vec<MoodFrequency> = counts
        .into_iter()
        .map(|(mood_id, count)| MoodFrequency {
            mood_id: mood_id.to_string(),
            count,
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.mood_id.cmp(&b.mood_id)));
    frequencies.truncate(limit);
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{find_mood, NewHabit, NewMoodEntry, UserId};
    use chrono::TimeZone;

    fn habit(created_at: DateTime<Utc>) -> Habit {
        Habit::new(
            UserId::from("u"),
            NewHabit {
                title: "Walk".to_string(),
                category: "health".to_string(),
                frequency: "daily".to_string(),
                ..Default::default()
            },
            created_at,
        )
        .unwrap()
    }

    fn done(habit: &Habit, date: NaiveDate, completed: bool) -> HabitCompletion {
        HabitCompletion {
            habit_id: habit.id.clone(),
            date,
            completed,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_weekly_completion() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let a = habit(created);
        let b = habit(created);
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        let completions = vec![
            done(&a, today, true),
            done(&b, today, true),
            done(&a, today - Duration::days(1), true),
            done(&b, today - Duration::days(1), false),
            done(&a, today - Duration::days(7), true),
        ];

        let weekly = weekly_completion(&[a, b], &completions, today);
        assert_eq!(weekly.days.len(), 7);
        assert_eq!(weekly.days[6].date, today);
        assert_eq!(weekly.days[6].percentage, 100.0);
        assert_eq!(weekly.days[5].completed, 1);
        assert_eq!(weekly.days[0].completed, 0);
        assert!((weekly.average_percentage - 150.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_completion_without_habits() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let weekly = weekly_completion(&[], &[], today);
        assert!(weekly.days.iter().all(|d| d.percentage == 0.0));
        assert_eq!(weekly.average_percentage, 0.0);
    }

    #[test]
    fn test_completion_rate() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let h = habit(created);
        let completions: Vec<_> = (1..=5)
            .map(|d| done(&h, NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), d != 3))
            .collect();

        let now = Utc.with_ymd_and_hms(2024, 1, 11, 8, 0, 0).unwrap();
        assert!((completion_rate(&h, &completions, now) - 40.0).abs() < 1e-9);

        // Partial days round up; a brand new habit counts as one day
        assert_eq!(completion_rate(&h, &[], created), 0.0);
        let same_day = vec![done(&h, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), true)];
        assert_eq!(completion_rate(&h, &same_day, created + Duration::hours(3)), 100.0);
    }

    #[test]
    fn test_streak_summary() {
        let streaks = vec![
            StreakInfo { current: 3, longest: 5 },
            StreakInfo { current: 0, longest: 2 },
            StreakInfo { current: 6, longest: 6 },
        ];
        let summary = streak_summary(&streaks);
        assert_eq!(summary.active_streaks, 2);
        assert!((summary.average_streak - 3.0).abs() < 1e-9);
        assert_eq!(streak_summary(&[]).average_streak, 0.0);
    }

    #[test]
    fn test_top_moods() {
        let now = Utc::now();
        let make = |d: u32, mood: &str| {
            MoodEntry::new(
                UserId::from("u"),
                NewMoodEntry {
                    date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                    mood: find_mood(mood).unwrap().clone(),
                    energy: 3,
                    notes: String::new(),
                    tags: Vec::new(),
                },
                now,
            )
            .unwrap()
        };
        let entries = vec![make(1, "calm"), make(2, "happy"), make(3, "calm"), make(4, "sad"), make(5, "happy"), make(6, "calm")];

        let top = top_moods(&entries, 2);
        assert_eq!(
            top,
            vec![
                MoodFrequency { mood_id: "calm".to_string(), count: 3 },
                MoodFrequency { mood_id: "happy".to_string(), count: 2 },
            ]
        );
    }
}
