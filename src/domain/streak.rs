/// Streak calculation
///
/// Streaks are counted in calendar days from a habit's completion history.
/// The current streak walks backward from today; the longest streak is the
/// longest run of consecutive completed days ever seen.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::HabitCompletion;

/// Current and best streak for a habit, as cached on the habit record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current: u32,
    pub longest: u32,
}

/// Result of recomputing a habit's streak fields from its completion log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streak {
    pub current: u32,
    /// Never lower than the longest streak previously recorded
    pub longest: u32,
    /// Completed days, ascending
    pub completed_dates: Vec<NaiveDate>,
}

impl Streak {
    /// Recompute streak data from every completion record of one habit
    ///
    /// `previous_longest` is the value stored on the habit before this call;
    /// the longest streak only ever grows, even when days are un-completed.
    pub fn calculate(
        completions: &[HabitCompletion],
        created_on: NaiveDate,
        previous_longest: u32,
        today: NaiveDate,
    ) -> Self {
        let completed: BTreeSet<NaiveDate> = completions
            .iter()
            .filter(|c| c.completed)
            .map(|c| c.date)
            .collect();

        if completed.is_empty() {
            return Self {
                current: 0,
                longest: previous_longest,
                completed_dates: Vec::new(),
            };
        }

        let completed_dates: Vec<NaiveDate> = completed.iter().copied().collect();
        let current = calculate_current_streak(&completed, created_on, today);
        let longest = calculate_longest_streak(&completed_dates);

        Self {
            current,
            longest: longest.max(previous_longest),
            completed_dates,
        }
    }

    pub fn info(&self) -> StreakInfo {
        StreakInfo {
            current: self.current,
            longest: self.longest,
        }
    }
}

/// Count completed days backward from today
///
/// Today not being completed yet does not break the chain. Any earlier day
/// that is not completed does. The walk never goes past the creation date.
pub fn calculate_current_streak(
    completed: &BTreeSet<NaiveDate>,
    created_on: NaiveDate,
    today: NaiveDate,
) -> u32 {
    let mut streak = 0;
    let mut checking_date = today;

    loop {
        if completed.contains(&checking_date) {
            streak += 1;
        } else if checking_date != today {
            break;
        }

        checking_date = match checking_date.pred_opt() {
            Some(previous) => previous,
            None => break,
        };

        if checking_date < created_on {
            break;
        }
    }

    streak
}

/// Longest run of consecutive days in an ascending list of dates
pub fn calculate_longest_streak(sorted_dates: &[NaiveDate]) -> u32 {
    let Some(first) = sorted_dates.first() else {
        return 0;
    };

    let mut longest_streak = 0;
    let mut current_run = 1;
    let mut last_date = *first;

    for date in sorted_dates.iter().skip(1) {
        if (*date - last_date).num_days() == 1 {
            current_run += 1;
        } else {
            longest_streak = longest_streak.max(current_run);
            current_run = 1;
        }
        last_date = *date;
    }

    longest_streak.max(current_run)
}

/// Short encouragement for a given current streak
pub fn streak_message(current: u32) -> String {
    match current {
        0 => "No streak yet. Today is a good day to start.".to_string(),
        1 => "Streak started: 1 day.".to_string(),
        2..=6 => format!("{} days in a row.", current),
        7..=29 => format!("{} days strong. Keep it going!", current),
        _ => format!("{} day streak. Remarkable consistency!", current),
    }
}
