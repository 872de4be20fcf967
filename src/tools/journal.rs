/// Mood journal tools
///
/// Handles the `mood_log`, `mood_list`, `mood_update` and `mood_delete` MCP
/// tool calls.

use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{parse_date, EntryId, MoodEntry, MoodEntryUpdate, NewMoodEntry, UserId};
use crate::services::{MoodJournal, ServiceError};
use crate::storage::KeyValueStore;
use crate::tools::{date_or_today, parse_entry_id, resolve_mood, ToolError};

/// Parameters for the mood_log tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LogMoodParams {
    /// Day of the entry (YYYY-MM-DD, optional - defaults to today)
    #[serde(default)]
    pub date: Option<String>,
    /// Mood id: amazing, happy, good, okay, sad, anxious, angry, excited, calm or grateful
    pub mood: String,
    /// Energy level from 1 (very low) to 5 (very high)
    pub energy: u8,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Response from the mood_log tool
#[derive(Debug, Serialize)]
pub struct LogMoodResponse {
    pub entry: MoodEntry,
    /// Whether an earlier entry for the same day was replaced
    pub replaced: bool,
    pub message: String,
}

/// Parameters for the mood_list tool
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListMoodsParams {
    /// Earliest day to include (YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Latest day to include (YYYY-MM-DD)
    #[serde(default)]
    pub end_date: Option<String>,
    /// Maximum number of entries, most recent first
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Response from the mood_list tool
#[derive(Debug, Serialize)]
pub struct ListMoodsResponse {
    pub entries: Vec<MoodEntry>,
    pub message: String,
}

/// Parameters for the mood_update tool
///
/// Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateMoodParams {
    /// ID of the entry to update
    pub entry_id: String,
    /// Move the entry to another day (YYYY-MM-DD)
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub energy: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Response from the mood_update tool
#[derive(Debug, Serialize)]
pub struct UpdateMoodResponse {
    pub entry: MoodEntry,
    pub message: String,
}

/// Parameters for the mood_delete tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteMoodParams {
    /// ID of the entry to delete
    pub entry_id: String,
}

/// Response from the mood_delete tool
#[derive(Debug, Serialize)]
pub struct DeleteMoodResponse {
    pub entry_id: String,
    pub message: String,
}

/// Write the session user's entry for a day, replacing any earlier one
pub fn log_mood<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: LogMoodParams,
) -> Result<LogMoodResponse, ToolError> {
    let date = date_or_today(params.date.as_deref(), Utc::now().date_naive())?;
    let mood = resolve_mood(&params.mood)?;

    let journal = MoodJournal::new(store);
    let replaced = journal.has_entry_for_date(user_id, date)?;
    let entry = journal.create_entry(
        user_id,
        NewMoodEntry {
            date,
            mood,
            energy: params.energy,
            notes: params.notes.unwrap_or_default(),
            tags: params.tags.unwrap_or_default(),
        },
    )?;

    let message = format!(
        "{} {} entry for {}: feeling {} with energy {}/5",
        entry.mood.emoji,
        if replaced { "Replaced" } else { "Logged" },
        entry.date,
        entry.mood.name,
        entry.energy
    );

    Ok(LogMoodResponse {
        entry,
        replaced,
        message,
    })
}

/// The session user's entries, most recent first
pub fn list_moods<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: ListMoodsParams,
) -> Result<ListMoodsResponse, ToolError> {
    let start = params.start_date.as_deref().map(parse_date).transpose()?;
    let end = params.end_date.as_deref().map(parse_date).transpose()?;

    let journal = MoodJournal::new(store);
    let mut entries = journal.get_entries_for_date_range(
        user_id,
        start.unwrap_or(NaiveDate::MIN),
        end.unwrap_or(NaiveDate::MAX),
    )?;
    if let Some(limit) = params.limit {
        entries.truncate(limit);
    }

    let message = if entries.is_empty() {
        "No journal entries found.".to_string()
    } else {
        let lines = entries
            .iter()
            .map(format_entry)
            .collect::<Vec<_>>()
            .join("\n");
        format!("📔 **Journal** ({} entries)\n\n{}", entries.len(), lines)
    };

    Ok(ListMoodsResponse { entries, message })
}

/// Merge the supplied fields into one of the session user's entries
pub fn update_mood<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: UpdateMoodParams,
) -> Result<UpdateMoodResponse, ToolError> {
    let entry_id = parse_entry_id(&params.entry_id)?;
    let update = MoodEntryUpdate {
        date: params.date.as_deref().map(parse_date).transpose()?,
        mood: params.mood.as_deref().map(resolve_mood).transpose()?,
        energy: params.energy,
        notes: params.notes,
        tags: params.tags,
    };

    let journal = MoodJournal::new(store);
    owned_entry(&journal, user_id, &entry_id)?;
    let entry = journal.update_entry(&entry_id, update)?;
    let message = format!("✏️ Updated journal entry for {}", entry.date);

    Ok(UpdateMoodResponse { entry, message })
}

pub fn delete_mood<S: KeyValueStore + ?Sized>(
    store: &S,
    user_id: &UserId,
    params: DeleteMoodParams,
) -> Result<DeleteMoodResponse, ToolError> {
    let entry_id = parse_entry_id(&params.entry_id)?;

    let journal = MoodJournal::new(store);
    let entry = owned_entry(&journal, user_id, &entry_id)?;
    journal.delete_entry(&entry_id)?;

    Ok(DeleteMoodResponse {
        entry_id: entry_id.to_string(),
        message: format!("🗑️ Deleted journal entry for {}", entry.date),
    })
}

fn owned_entry<S: KeyValueStore + ?Sized>(
    journal: &MoodJournal<'_, S>,
    user_id: &UserId,
    entry_id: &EntryId,
) -> Result<MoodEntry, ToolError> {
    journal
        .list_entries(user_id)?
        .into_iter()
        .find(|e| e.id == *entry_id)
        .ok_or_else(|| ServiceError::EntryNotFound { entry_id: entry_id.clone() }.into())
}

fn format_entry(entry: &MoodEntry) -> String {
    let mut line = format!(
        "{} {} {} | ⚡ {}/5",
        entry.date, entry.mood.emoji, entry.mood.name, entry.energy
    );
    if !entry.tags.is_empty() {
        line.push_str(&format!(" | #{}", entry.tags.join(" #")));
    }
    if !entry.notes.is_empty() {
        line.push_str(&format!("\n   {}", entry.notes));
    }
    line.push_str(&format!("\n   ID: {}", entry.id));
    line
}
