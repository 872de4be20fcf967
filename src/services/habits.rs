/// Habit store and streak engine
///
/// Owns the habit definitions and completion collections. Streak fields on
/// a habit are a cache, refreshed only when one of its days is toggled.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::{
    Habit, HabitCompletion, HabitId, HabitUpdate, NewHabit, Streak, StreakInfo, UserId,
};
use crate::services::ServiceError;
use crate::storage::{load_collection, save_collection, KeyValueStore, COMPLETIONS_KEY, HABITS_KEY};

/// What a toggle did: the day's new state and the recomputed current streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub completed: bool,
    pub streak: u32,
}

pub struct HabitTracker<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> HabitTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Active habits of a user, in the order they were created
    pub fn list_habits(&self, user_id: &UserId) -> Result<Vec<Habit>, ServiceError> {
        Ok(self
            .all_habits()?
            .into_iter()
            .filter(|h| h.user_id == *user_id && h.is_active)
            .collect())
    }

    /// Look up an active habit; deleted or unknown ids give `None`
    pub fn get_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, ServiceError> {
        Ok(self
            .all_habits()?
            .into_iter()
            .find(|h| h.id == *habit_id && h.is_active))
    }

    pub fn create_habit(&self, user_id: &UserId, definition: NewHabit) -> Result<Habit, ServiceError> {
        self.create_habit_at(user_id, definition, Utc::now())
    }

    /// Create a habit as of `now`
    pub fn create_habit_at(
        &self,
        user_id: &UserId,
        definition: NewHabit,
        now: DateTime<Utc>,
    ) -> Result<Habit, ServiceError> {
        let habit = Habit::new(user_id.clone(), definition, now)?;

        let mut habits = self.all_habits()?;
        habits.push(habit.clone());
        save_collection(self.store, HABITS_KEY, &habits)?;

        debug!("Created habit '{}' ({}) for user {}", habit.title, habit.id, user_id);
        Ok(habit)
    }

    /// Merge a partial update into an active habit
    pub fn update_habit(&self, habit_id: &HabitId, update: HabitUpdate) -> Result<Habit, ServiceError> {
        let mut habits = self.all_habits()?;
        let habit = habits
            .iter_mut()
            .find(|h| h.id == *habit_id && h.is_active)
            .ok_or_else(|| ServiceError::HabitNotFound { habit_id: habit_id.clone() })?;

        habit.apply_update(update)?;
        let updated = habit.clone();
        save_collection(self.store, HABITS_KEY, &habits)?;

        debug!("Updated habit '{}' ({})", updated.title, updated.id);
        Ok(updated)
    }

    /// Soft-delete a habit, then purge its completion records
    pub fn delete_habit(&self, habit_id: &HabitId) -> Result<(), ServiceError> {
        let mut habits = self.all_habits()?;
        let habit = habits
            .iter_mut()
            .find(|h| h.id == *habit_id && h.is_active)
            .ok_or_else(|| ServiceError::HabitNotFound { habit_id: habit_id.clone() })?;

        habit.is_active = false;
        save_collection(self.store, HABITS_KEY, &habits)?;

        let mut completions = self.all_completions()?;
        let before = completions.len();
        completions.retain(|c| c.habit_id != *habit_id);
        save_collection(self.store, COMPLETIONS_KEY, &completions)?;

        debug!("Deleted habit {} and {} completion records", habit_id, before - completions.len());
        Ok(())
    }

    pub fn toggle_completion(&self, habit_id: &HabitId, date: NaiveDate) -> Result<ToggleOutcome, ServiceError> {
        self.toggle_completion_at(habit_id, date, Utc::now())
    }

    /// Flip a habit's completion for `date` and refresh its streak cache
    ///
    /// The first toggle of a date marks it completed; later toggles flip the
    /// same record. `now` stamps the record and its date is "today" for the
    /// streak walk.
    pub fn toggle_completion_at(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome, ServiceError> {
        let mut habits = self.all_habits()?;
        let habit = habits
            .iter_mut()
            .find(|h| h.id == *habit_id && h.is_active)
            .ok_or_else(|| ServiceError::HabitNotFound { habit_id: habit_id.clone() })?;

        let mut completions = self.all_completions()?;
        let completed = match completions.iter_mut().find(|c| c.is_for(habit_id, date)) {
            Some(existing) => existing.toggle(now),
            None => {
                completions.push(HabitCompletion::completed_on(habit_id.clone(), date, now));
                true
            }
        };
        save_collection(self.store, COMPLETIONS_KEY, &completions)?;

        let history: Vec<HabitCompletion> = completions
            .into_iter()
            .filter(|c| c.habit_id == *habit_id)
            .collect();
        let streak = Streak::calculate(&history, habit.created_on(), habit.longest_streak, now.date_naive());

        habit.streak = streak.current;
        habit.longest_streak = streak.longest;
        habit.completed_dates = streak.completed_dates;
        save_collection(self.store, HABITS_KEY, &habits)?;

        debug!(
            "Toggled habit {} on {}: completed={} streak={}",
            habit_id, date, completed, streak.current
        );
        Ok(ToggleOutcome {
            completed,
            streak: streak.current,
        })
    }

    /// Whether the habit is marked completed on `date`; false when no record
    pub fn is_completed_on(&self, habit_id: &HabitId, date: NaiveDate) -> Result<bool, ServiceError> {
        Ok(self
            .all_completions()?
            .iter()
            .any(|c| c.is_for(habit_id, date) && c.completed))
    }

    pub fn is_completed_today(&self, habit_id: &HabitId) -> Result<bool, ServiceError> {
        self.is_completed_on(habit_id, Utc::now().date_naive())
    }

    /// Every completion record of a habit, completed or not
    pub fn get_habit_completions(&self, habit_id: &HabitId) -> Result<Vec<HabitCompletion>, ServiceError> {
        Ok(self
            .all_completions()?
            .into_iter()
            .filter(|c| c.habit_id == *habit_id)
            .collect())
    }

    /// Cached streak values; zeros for an unknown habit
    pub fn get_streak_info(&self, habit_id: &HabitId) -> Result<StreakInfo, ServiceError> {
        Ok(self
            .get_habit(habit_id)?
            .map(|h| StreakInfo {
                current: h.streak,
                longest: h.longest_streak,
            })
            .unwrap_or_default())
    }

    fn all_habits(&self) -> Result<Vec<Habit>, ServiceError> {
        Ok(load_collection(self.store, HABITS_KEY)?)
    }

    fn all_completions(&self) -> Result<Vec<HabitCompletion>, ServiceError> {
        Ok(load_collection(self.store, COMPLETIONS_KEY)?)
    }
}
