/// Journal store and mood statistics engine
///
/// Each user has at most one entry per calendar date. Writing an entry for a
/// date that already has one replaces it.

use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::debug;

use crate::domain::{DomainError, EntryId, MoodEntry, MoodEntryUpdate, MoodStats, NewMoodEntry, UserId};
use crate::services::ServiceError;
use crate::storage::{load_collection, save_collection, KeyValueStore, JOURNAL_KEY};

pub struct MoodJournal<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> MoodJournal<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// A user's entries, most recent date first
    pub fn list_entries(&self, user_id: &UserId) -> Result<Vec<MoodEntry>, ServiceError> {
        let mut entries: Vec<MoodEntry> = self
            .all_entries()?
            .into_iter()
            .filter(|e| e.user_id == *user_id)
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    pub fn get_entry(&self, user_id: &UserId, date: NaiveDate) -> Result<Option<MoodEntry>, ServiceError> {
        Ok(self
            .all_entries()?
            .into_iter()
            .find(|e| e.user_id == *user_id && e.date == date))
    }

    pub fn get_todays_entry(&self, user_id: &UserId) -> Result<Option<MoodEntry>, ServiceError> {
        self.get_todays_entry_at(user_id, Utc::now().date_naive())
    }

    pub fn get_todays_entry_at(&self, user_id: &UserId, today: NaiveDate) -> Result<Option<MoodEntry>, ServiceError> {
        self.get_entry(user_id, today)
    }

    pub fn has_entry_for_date(&self, user_id: &UserId, date: NaiveDate) -> Result<bool, ServiceError> {
        Ok(self.get_entry(user_id, date)?.is_some())
    }

    /// Entries dated within `start..=end`, most recent first
    pub fn get_entries_for_date_range(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoodEntry>, ServiceError> {
        Ok(self
            .list_entries(user_id)?
            .into_iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect())
    }

    pub fn create_entry(&self, user_id: &UserId, data: NewMoodEntry) -> Result<MoodEntry, ServiceError> {
        self.create_entry_at(user_id, data, Utc::now())
    }

    /// Write the entry for `data.date`, replacing any existing one
    pub fn create_entry_at(
        &self,
        user_id: &UserId,
        data: NewMoodEntry,
        now: DateTime<Utc>,
    ) -> Result<MoodEntry, ServiceError> {
        let entry = MoodEntry::new(user_id.clone(), data, now)?;

        let mut entries = self.all_entries()?;
        let before = entries.len();
        entries.retain(|e| !(e.user_id == *user_id && e.date == entry.date));
        let replaced = before != entries.len();
        entries.push(entry.clone());
        save_collection(self.store, JOURNAL_KEY, &entries)?;

        debug!(
            "{} journal entry {} for user {} on {}",
            if replaced { "Replaced" } else { "Created" },
            entry.id,
            user_id,
            entry.date
        );
        Ok(entry)
    }

    pub fn update_entry(&self, entry_id: &EntryId, update: MoodEntryUpdate) -> Result<MoodEntry, ServiceError> {
        self.update_entry_at(entry_id, update, Utc::now())
    }

    /// Merge an update into an entry and bump its `updated_at`
    ///
    /// Moving an entry onto a date the same user already has an entry for
    /// is rejected.
    pub fn update_entry_at(
        &self,
        entry_id: &EntryId,
        update: MoodEntryUpdate,
        now: DateTime<Utc>,
    ) -> Result<MoodEntry, ServiceError> {
        let mut entries = self.all_entries()?;
        let index = entries
            .iter()
            .position(|e| e.id == *entry_id)
            .ok_or_else(|| ServiceError::EntryNotFound { entry_id: entry_id.clone() })?;

        if let Some(date) = update.date {
            let owner = &entries[index].user_id;
            let taken = entries
                .iter()
                .any(|e| e.id != *entry_id && e.user_id == *owner && e.date == date);
            if taken {
                return Err(DomainError::InvalidDate(format!("an entry for {} already exists", date)).into());
            }
        }

        entries[index].apply_update(update, now)?;
        let updated = entries[index].clone();
        save_collection(self.store, JOURNAL_KEY, &entries)?;

        debug!("Updated journal entry {}", entry_id);
        Ok(updated)
    }

    pub fn delete_entry(&self, entry_id: &EntryId) -> Result<(), ServiceError> {
        let mut entries = self.all_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != *entry_id);

        if entries.len() == before {
            return Err(ServiceError::EntryNotFound { entry_id: entry_id.clone() });
        }

        save_collection(self.store, JOURNAL_KEY, &entries)?;
        debug!("Deleted journal entry {}", entry_id);
        Ok(())
    }

    pub fn get_mood_stats(&self, user_id: &UserId, window_days: u32) -> Result<MoodStats, ServiceError> {
        self.get_mood_stats_at(user_id, window_days, Utc::now().date_naive())
    }

    /// Statistics over entries dated `today - window_days ..= today`
    ///
    /// Windows reaching past the earliest representable date start there.
    pub fn get_mood_stats_at(
        &self,
        user_id: &UserId,
        window_days: u32,
        today: NaiveDate,
    ) -> Result<MoodStats, ServiceError> {
        let start = today
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);
        let entries = self.get_entries_for_date_range(user_id, start, today)?;
        Ok(MoodStats::from_entries(&entries))
    }

    fn all_entries(&self) -> Result<Vec<MoodEntry>, ServiceError> {
        Ok(load_collection(self.store, JOURNAL_KEY)?)
    }
}
