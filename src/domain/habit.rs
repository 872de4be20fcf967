/// Habit entity and related functionality
///
/// This module defines the Habit record a user tracks, the definition used to
/// create one, and the partial update merged into an existing one.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{find_category, DomainError, Frequency, HabitId, UserId};

/// Fallback color for habits whose category has no catalog entry
pub const DEFAULT_HABIT_COLOR: &str = "#6B7280";
/// Fallback icon for habits whose category has no catalog entry
pub const DEFAULT_HABIT_ICON: &str = "🎯";

/// A habit represents something the user wants to do regularly
///
/// Besides the user-supplied definition, the record caches streak data
/// (`streak`, `longest_streak`, `completed_dates`) which is recomputed every
/// time a completion is toggled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Owner of the habit
    pub user_id: UserId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category id (e.g., "health", "mindfulness")
    pub category: String,
    pub color: String,
    pub icon: String,
    pub frequency: Frequency,
    /// Days of the week for weekly habits (0 = Sunday ... 6 = Saturday)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_days: Option<Vec<u8>>,
    /// Current streak as of the last toggle
    pub streak: u32,
    /// Best streak ever recorded; never decreases
    pub longest_streak: u32,
    /// Completed dates, ascending
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Everything a caller supplies to create a habit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    /// Defaults to the category's catalog color
    #[serde(default)]
    pub color: Option<String>,
    /// Defaults to the category's catalog icon
    #[serde(default)]
    pub icon: Option<String>,
    /// One of "daily", "weekly", "custom"
    pub frequency: String,
    #[serde(default)]
    pub target_days: Option<Vec<u8>>,
}

/// Partial update for an existing habit
///
/// `None` leaves a field untouched. For optional fields, `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub frequency: Option<Frequency>,
    pub target_days: Option<Option<Vec<u8>>>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// Streak fields start at zero and the habit starts active.
    pub fn new(user_id: UserId, definition: NewHabit, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let title = Self::validate_title(&definition.title)?;
        let category = Self::validate_category(&definition.category)?;
        let frequency = Frequency::parse(&definition.frequency)?;
        let description = Self::normalize_description(definition.description);
        let target_days = Self::validate_target_days(definition.target_days)?;

        let catalog = find_category(&category);
        let color = definition
            .color
            .filter(|c| !c.trim().is_empty())
            .or_else(|| catalog.map(|c| c.color.to_string()))
            .unwrap_or_else(|| DEFAULT_HABIT_COLOR.to_string());
        let icon = definition
            .icon
            .filter(|i| !i.trim().is_empty())
            .or_else(|| catalog.map(|c| c.icon.to_string()))
            .unwrap_or_else(|| DEFAULT_HABIT_ICON.to_string());

        Ok(Self {
            id: HabitId::new(),
            user_id,
            title,
            description,
            category,
            color,
            icon,
            frequency,
            target_days,
            streak: 0,
            longest_streak: 0,
            completed_dates: Vec::new(),
            created_at: now,
            is_active: true,
        })
    }

    /// Merge a partial update into this habit
    ///
    /// Every new value is validated before any of them is applied, so a
    /// failed update leaves the habit unchanged.
    pub fn apply_update(&mut self, update: HabitUpdate) -> Result<(), DomainError> {
        let title = update.title.as_deref().map(Self::validate_title).transpose()?;
        let category = update.category.as_deref().map(Self::validate_category).transpose()?;
        let target_days = match update.target_days {
            Some(days) => Some(Self::validate_target_days(days)?),
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Self::normalize_description(description);
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(color) = update.color.filter(|c| !c.trim().is_empty()) {
            self.color = color;
        }
        if let Some(icon) = update.icon.filter(|i| !i.trim().is_empty()) {
            self.icon = icon;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(target_days) = target_days {
            self.target_days = target_days;
        }

        Ok(())
    }

    /// Calendar date the habit was created on
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    // Validation helper methods

    fn validate_title(title: &str) -> Result<String, DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle("Habit title cannot be empty".to_string()));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(trimmed.to_string())
    }

    fn validate_category(category: &str) -> Result<String, DomainError> {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Habit category is required".to_string(),
            });
        }
        Ok(trimmed.to_lowercase())
    }

    fn normalize_description(description: Option<String>) -> Option<String> {
        description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
    }

    /// Target days must be weekday numbers 0-6; duplicates are dropped
    fn validate_target_days(days: Option<Vec<u8>>) -> Result<Option<Vec<u8>>, DomainError> {
        let Some(mut days) = days else {
            return Ok(None);
        };

        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(DomainError::Validation {
                message: format!("Target day {} is out of range (0 = Sunday ... 6 = Saturday)", bad),
            });
        }

        days.sort_unstable();
        days.dedup();
        Ok(Some(days))
    }
}
