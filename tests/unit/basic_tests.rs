/// Habit streak and mood journal behaviour through the public API
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use habit_journal_mcp::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

fn new_habit(title: &str) -> NewHabit {
    NewHabit {
        title: title.to_string(),
        category: "health".to_string(),
        frequency: "daily".to_string(),
        ..Default::default()
    }
}

fn new_entry(day: NaiveDate, mood: &str, energy: u8) -> NewMoodEntry {
    NewMoodEntry {
        date: day,
        mood: find_mood(mood).unwrap().clone(),
        energy,
        notes: String::new(),
        tags: Vec::new(),
    }
}

#[cfg(test)]
mod habit_tests {
    use super::*;

    #[test]
    fn test_absent_today_keeps_the_chain() {
        let store = MemoryStore::new();
        let tracker = HabitTracker::new(&store);
        let user = UserId::from("alice");
        let habit = tracker
            .create_habit_at(&user, new_habit("Run"), noon(date(2024, 1, 1)))
            .unwrap();

        let today = noon(date(2024, 1, 4));
        for day in 1..=3 {
            tracker.toggle_completion_at(&habit.id, date(2024, 1, day), today).unwrap();
        }

        let info = tracker.get_streak_info(&habit.id).unwrap();
        assert_eq!(info, StreakInfo { current: 3, longest: 3 });

        let stored = tracker.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(stored.completed_dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[test]
    fn test_gap_limits_longest_streak() {
        let store = MemoryStore::new();
        let tracker = HabitTracker::new(&store);
        let habit = tracker
            .create_habit_at(&UserId::from("alice"), new_habit("Run"), noon(date(2024, 1, 1)))
            .unwrap();

        let today = noon(date(2024, 1, 3));
        tracker.toggle_completion_at(&habit.id, date(2024, 1, 1), today).unwrap();
        let outcome = tracker.toggle_completion_at(&habit.id, date(2024, 1, 3), today).unwrap();

        assert_eq!(outcome, ToggleOutcome { completed: true, streak: 1 });
        assert_eq!(tracker.get_streak_info(&habit.id).unwrap().longest, 1);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let store = MemoryStore::new();
        let tracker = HabitTracker::new(&store);
        let habit = tracker.create_habit(&UserId::from("alice"), new_habit("Read")).unwrap();
        let day = date(2024, 6, 15);

        assert!(!tracker.is_completed_on(&habit.id, day).unwrap());
        tracker.toggle_completion(&habit.id, day).unwrap();
        assert!(tracker.is_completed_on(&habit.id, day).unwrap());
        tracker.toggle_completion(&habit.id, day).unwrap();
        assert!(!tracker.is_completed_on(&habit.id, day).unwrap());

        // The flip keeps a single record for the day
        assert_eq!(tracker.get_habit_completions(&habit.id).unwrap().len(), 1);
    }

    #[test]
    fn test_longest_streak_never_decreases() {
        let store = MemoryStore::new();
        let tracker = HabitTracker::new(&store);
        let habit = tracker
            .create_habit_at(&UserId::from("alice"), new_habit("Run"), noon(date(2024, 3, 1)))
            .unwrap();
        let today = noon(date(2024, 3, 10));

        let toggles = [5, 6, 7, 8, 6, 9, 10, 7, 6, 8, 1, 2];
        let mut previous = 0;
        for day in toggles {
            tracker.toggle_completion_at(&habit.id, date(2024, 3, day), today).unwrap();
            let longest = tracker.get_streak_info(&habit.id).unwrap().longest;
            assert!(longest >= previous, "longest dropped from {} to {}", previous, longest);
            previous = longest;
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn test_delete_hides_habit_and_purges_completions() {
        let store = MemoryStore::new();
        let tracker = HabitTracker::new(&store);
        let user = UserId::from("alice");
        let keep = tracker.create_habit(&user, new_habit("Keep")).unwrap();
        let dropped = tracker.create_habit(&user, new_habit("Drop")).unwrap();
        tracker.toggle_completion(&keep.id, date(2024, 1, 1)).unwrap();
        tracker.toggle_completion(&dropped.id, date(2024, 1, 1)).unwrap();

        tracker.delete_habit(&dropped.id).unwrap();

        let titles: Vec<_> = tracker.list_habits(&user).unwrap().into_iter().map(|h| h.title).collect();
        assert_eq!(titles, vec!["Keep".to_string()]);
        assert!(tracker.get_habit_completions(&dropped.id).unwrap().is_empty());
        assert_eq!(tracker.get_habit_completions(&keep.id).unwrap().len(), 1);

        assert!(tracker.delete_habit(&dropped.id).unwrap_err().is_not_found());
        assert!(tracker.toggle_completion(&dropped.id, date(2024, 1, 2)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_habits_are_partitioned_by_user() {
        let store = MemoryStore::new();
        let tracker = HabitTracker::new(&store);
        tracker.create_habit(&UserId::from("alice"), new_habit("Run")).unwrap();
        tracker.create_habit(&UserId::from("bob"), new_habit("Swim")).unwrap();

        let alice = tracker.list_habits(&UserId::from("alice")).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].title, "Run");
        assert!(tracker.list_habits(&UserId::from("carol")).unwrap().is_empty());
    }
}

#[cfg(test)]
mod journal_tests {
    use super::*;

    #[test]
    fn test_same_day_entry_is_replaced() {
        let store = MemoryStore::new();
        let journal = MoodJournal::new(&store);
        let user = UserId::from("alice");

        journal.create_entry(&user, new_entry(date(2024, 2, 1), "okay", 3)).unwrap();
        journal.create_entry(&user, new_entry(date(2024, 2, 1), "amazing", 5)).unwrap();

        let entries = journal.list_entries(&user).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(&*entries[0].mood.id, "amazing");
        assert_eq!(entries[0].energy, 5);
    }

    #[test]
    fn test_empty_window_stats_are_zero() {
        let store = MemoryStore::new();
        let journal = MoodJournal::new(&store);
        let user = UserId::from("alice");
        journal.create_entry(&user, new_entry(date(2024, 1, 1), "happy", 4)).unwrap();

        let stats = journal.get_mood_stats_at(&user, 7, date(2024, 3, 1)).unwrap();
        assert_eq!(stats.average_mood, 0.0);
        assert_eq!(stats.average_energy, 0.0);
        assert!(stats.mood_counts.is_empty());
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_stats_window_is_inclusive() {
        let store = MemoryStore::new();
        let journal = MoodJournal::new(&store);
        let user = UserId::from("alice");
        let today = date(2024, 3, 10);

        journal.create_entry(&user, new_entry(date(2024, 3, 3), "calm", 2)).unwrap();
        journal.create_entry(&user, new_entry(date(2024, 3, 10), "excited", 4)).unwrap();
        journal.create_entry(&user, new_entry(date(2024, 3, 2), "sad", 1)).unwrap();
        journal
            .create_entry(&UserId::from("bob"), new_entry(date(2024, 3, 9), "angry", 1))
            .unwrap();

        let stats = journal.get_mood_stats_at(&user, 7, today).unwrap();
        assert_eq!(stats.total_entries, 2);
        assert!((stats.average_mood - 3.5).abs() < 1e-9);
        assert!((stats.average_energy - 3.0).abs() < 1e-9);
        assert_eq!(stats.mood_counts.get("calm"), Some(&1));
        assert_eq!(stats.mood_counts.get("excited"), Some(&1));
    }

    #[test]
    fn test_update_and_delete_entry() {
        let store = MemoryStore::new();
        let journal = MoodJournal::new(&store);
        let user = UserId::from("alice");
        let first = journal.create_entry(&user, new_entry(date(2024, 4, 1), "good", 3)).unwrap();
        journal.create_entry(&user, new_entry(date(2024, 4, 2), "good", 3)).unwrap();

        let err = journal
            .update_entry(
                &first.id,
                MoodEntryUpdate {
                    date: Some(date(2024, 4, 2)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(DomainError::InvalidDate(_))));

        let updated = journal
            .update_entry(
                &first.id,
                MoodEntryUpdate {
                    tags: Some(vec!["Family".to_string(), " family ".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.tags, vec!["family".to_string()]);
        assert!(updated.updated_at >= updated.created_at);

        journal.delete_entry(&first.id).unwrap();
        assert!(journal.get_entry(&user, date(2024, 4, 1)).unwrap().is_none());
        assert!(journal.delete_entry(&first.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_server_creation() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let server = tokio_test::block_on(JournalServer::new(
            temp_dir.path().join("journal.db"),
            UserId::from("alice"),
        ));
        assert!(server.is_ok());
    }
}
