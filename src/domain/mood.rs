/// Mood journal entities and aggregate statistics
///
/// A MoodEntry records how a user felt on one calendar day. Each user has at
/// most one entry per date; MoodStats summarizes a set of entries.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{DomainError, EntryId, UserId};

/// A mood a user can pick, with the 1-5 value used for averaging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodType {
    pub id: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub emoji: Cow<'static, str>,
    pub color: Cow<'static, str>,
    pub value: u8,
}

impl MoodType {
    pub const fn builtin(
        id: &'static str,
        name: &'static str,
        emoji: &'static str,
        color: &'static str,
        value: u8,
    ) -> Self {
        Self {
            id: Cow::Borrowed(id),
            name: Cow::Borrowed(name),
            emoji: Cow::Borrowed(emoji),
            color: Cow::Borrowed(color),
            value,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::UnknownMood("mood id cannot be empty".to_string()));
        }
        if !(1..=5).contains(&self.value) {
            return Err(DomainError::Validation {
                message: format!("Mood value {} is out of range (1-5)", self.value),
            });
        }
        Ok(())
    }
}

/// One day's journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub date: NaiveDate,
    /// Snapshot of the mood as it was defined when the entry was written
    pub mood: MoodType,
    /// 1-5
    pub energy: u8,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data supplied when writing an entry for a date
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoodEntry {
    pub date: NaiveDate,
    pub mood: MoodType,
    pub energy: u8,
    pub notes: String,
    pub tags: Vec<String>,
}

/// Partial update of an existing entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodEntryUpdate {
    pub date: Option<NaiveDate>,
    pub mood: Option<MoodType>,
    pub energy: Option<u8>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl MoodEntry {
    /// Create a validated entry stamped with `now`
    pub fn new(user_id: UserId, data: NewMoodEntry, now: DateTime<Utc>) -> Result<Self, DomainError> {
        data.mood.validate()?;
        validate_energy(data.energy)?;

        Ok(Self {
            id: EntryId::new(),
            user_id,
            date: data.date,
            mood: data.mood,
            energy: data.energy,
            notes: data.notes.trim().to_string(),
            tags: normalize_tags(data.tags),
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge an update, validating first and bumping `updated_at`
    pub fn apply_update(&mut self, update: MoodEntryUpdate, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(ref mood) = update.mood {
            mood.validate()?;
        }
        if let Some(energy) = update.energy {
            validate_energy(energy)?;
        }

        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(mood) = update.mood {
            self.mood = mood;
        }
        if let Some(energy) = update.energy {
            self.energy = energy;
        }
        if let Some(notes) = update.notes {
            self.notes = notes.trim().to_string();
        }
        if let Some(tags) = update.tags {
            self.tags = normalize_tags(tags);
        }
        self.updated_at = now;

        Ok(())
    }
}

fn validate_energy(energy: u8) -> Result<(), DomainError> {
    if (1..=5).contains(&energy) {
        Ok(())
    } else {
        Err(DomainError::InvalidEnergy(energy))
    }
}

/// Tags are a set: trimmed, lowercased, empties dropped, first occurrence kept
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

/// Aggregate mood statistics over a set of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStats {
    pub average_mood: f64,
    pub average_energy: f64,
    /// Number of entries per mood id
    pub mood_counts: BTreeMap<String, u32>,
    pub total_entries: u32,
}

impl MoodStats {
    /// Summarize entries; an empty slice gives all zeros
    pub fn from_entries(entries: &[MoodEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let total = entries.len() as f64;
        let total_mood: u32 = entries.iter().map(|e| u32::from(e.mood.value)).sum();
        let total_energy: u32 = entries.iter().map(|e| u32::from(e.energy)).sum();

        let mut mood_counts = BTreeMap::new();
        for entry in entries {
            *mood_counts.entry(entry.mood.id.to_string()).or_insert(0) += 1;
        }

        Self {
            average_mood: f64::from(total_mood) / total,
            average_energy: f64::from(total_energy) / total,
            mood_counts,
            total_entries: entries.len() as u32,
        }
    }
}
