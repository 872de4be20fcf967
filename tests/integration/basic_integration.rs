/// Persistence tests against real SQLite files
use chrono::{Duration, Utc};
use habit_journal_mcp::storage::{load_collection, COMPLETIONS_KEY, HABITS_KEY, JOURNAL_KEY};
use habit_journal_mcp::*;
use serde_json::Value;
use tempfile::tempdir;

fn new_habit(title: &str) -> NewHabit {
    NewHabit {
        title: title.to_string(),
        category: "mindfulness".to_string(),
        frequency: "daily".to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("journal.db");
        let user = UserId::from("alice");
        let today = Utc::now().date_naive();

        let habit_id = {
            let server = JournalServer::new(db_path.clone(), user.clone())
                .await
                .expect("Failed to create server");
            assert_eq!(server.user_id(), &user);

            let habit = server.habits().create_habit(&user, new_habit("Meditate")).unwrap();
            server.habits().toggle_completion(&habit.id, today - Duration::days(1)).unwrap();
            server.habits().toggle_completion(&habit.id, today).unwrap();
            habit.id
        };

        // A second server on the same file sees everything the first one wrote
        let server = JournalServer::new(db_path, user.clone())
            .await
            .expect("Failed to reopen server");
        let habits = server.habits().list_habits(&user).unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].id, habit_id);
        assert_eq!(habits[0].streak, 2);
        assert!(server.habits().is_completed_today(&habit_id).unwrap());
        assert_eq!(server.habits().get_habit_completions(&habit_id).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_journal_persistence() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("journal.db");
        let user = UserId::from("alice");
        let today = Utc::now().date_naive();

        {
            let server = JournalServer::new(db_path.clone(), user.clone()).await.unwrap();
            server
                .journal()
                .create_entry(
                    &user,
                    NewMoodEntry {
                        date: today,
                        mood: find_mood("grateful").unwrap().clone(),
                        energy: 4,
                        notes: "Dinner with friends".to_string(),
                        tags: vec!["Friends".to_string()],
                    },
                )
                .unwrap();
        }

        let server = JournalServer::new(db_path, user.clone()).await.unwrap();
        let entry = server.journal().get_todays_entry(&user).unwrap().expect("entry survives reopen");
        assert_eq!(&*entry.mood.id, "grateful");
        assert_eq!(entry.tags, vec!["friends".to_string()]);

        let stats = server.journal().get_mood_stats(&user, 7).unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.average_energy, 4.0);
    }

    #[test]
    fn test_collections_are_camel_case_json() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("journal.db")).unwrap();
        let user = UserId::from("alice");

        let tracker = HabitTracker::new(&store);
        let habit = tracker.create_habit(&user, new_habit("Breathe")).unwrap();
        tracker.toggle_completion(&habit.id, Utc::now().date_naive()).unwrap();

        let raw = store.read(HABITS_KEY).unwrap().expect("habits written");
        let habits: Value = serde_json::from_str(&raw).unwrap();
        let stored = &habits[0];
        assert_eq!(stored["id"], Value::String(habit.id.to_string()));
        assert_eq!(stored["userId"], "alice");
        assert_eq!(stored["frequency"], "daily");
        assert_eq!(stored["longestStreak"], 1);
        assert_eq!(stored["isActive"], true);
        assert_eq!(stored["completedDates"].as_array().unwrap().len(), 1);

        let completions: Vec<HabitCompletion> = load_collection(&store, COMPLETIONS_KEY).unwrap();
        assert_eq!(completions.len(), 1);
        assert!(completions[0].completed);
    }

    #[test]
    fn test_browser_collections_are_readable() {
        let store = MemoryStore::new();
        let habit_id = HabitId::new();
        let entry_id = EntryId::new();

        store
            .write(
                HABITS_KEY,
                format!(
                    r##"[{{"id":"{}","userId":"alice","title":"Drink water","category":"health","color":"#10B981","icon":"💧","frequency":"daily","streak":2,"longestStreak":5,"completedDates":["2024-01-01","2024-01-02"],"createdAt":"2023-12-30T09:00:00.000Z","isActive":true}}]"##,
                    habit_id
                ),
            )
            .unwrap();
        store
            .write(
                JOURNAL_KEY,
                format!(
                    r##"[{{"id":"{}","userId":"alice","date":"2024-01-02","mood":{{"id":"happy","name":"Happy","emoji":"😊","color":"#10B981","value":4}},"energy":4,"notes":"","tags":["work"],"createdAt":"2024-01-02T20:00:00.000Z","updatedAt":"2024-01-02T20:00:00.000Z"}}]"##,
                    entry_id
                ),
            )
            .unwrap();

        let user = UserId::from("alice");
        let habits = HabitTracker::new(&store).list_habits(&user).unwrap();
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].longest_streak, 5);
        assert_eq!(habits[0].description, None);

        let entries = MoodJournal::new(&store).list_entries(&user).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry_id);
        assert_eq!(entries[0].mood.value, 4);
    }

    #[test]
    fn test_corrupt_collection_is_an_error() {
        let store = MemoryStore::new();
        store.write(HABITS_KEY, "{not json".to_string()).unwrap();

        let err = HabitTracker::new(&store)
            .list_habits(&UserId::from("alice"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StorageError::Serialization(_))));

        // The bad value is left in place
        assert_eq!(store.read(HABITS_KEY).unwrap().as_deref(), Some("{not json"));
    }
}
