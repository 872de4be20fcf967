/// Static reference data: habit categories, icons, moods, energy levels and tags

use serde::Serialize;
use crate::domain::MoodType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

pub const HABIT_CATEGORIES: &[HabitCategory] = &[
    HabitCategory { id: "health", name: "Health & Fitness", color: "#10B981", icon: "💪" },
    HabitCategory { id: "mindfulness", name: "Mindfulness", color: "#8B5CF6", icon: "🧘" },
    HabitCategory { id: "productivity", name: "Productivity", color: "#F59E0B", icon: "⚡" },
    HabitCategory { id: "learning", name: "Learning", color: "#3B82F6", icon: "📚" },
    HabitCategory { id: "social", name: "Social", color: "#EF4444", icon: "👥" },
    HabitCategory { id: "creativity", name: "Creativity", color: "#EC4899", icon: "🎨" },
    HabitCategory { id: "lifestyle", name: "Lifestyle", color: "#6B7280", icon: "🏠" },
];

pub const HABIT_ICONS: &[&str] = &[
    "💪", "🏃", "🧘", "📚", "💧", "🥗", "😴", "🎯", "⚡", "🎨",
    "🎵", "📝", "🌱", "🧠", "❤️", "🌟", "🔥", "💎", "🚀", "🎪",
];

/// Mood definitions offered when writing a journal entry
///
/// Entries embed a copy of the mood, so changing this table never rewrites
/// history.
pub static MOOD_TYPES: &[MoodType] = &[
    MoodType::builtin("amazing", "Amazing", "😍", "#10B981", 5),
    MoodType::builtin("happy", "Happy", "😊", "#34D399", 4),
    MoodType::builtin("good", "Good", "🙂", "#60A5FA", 3),
    MoodType::builtin("okay", "Okay", "😐", "#A78BFA", 2),
    MoodType::builtin("sad", "Sad", "😢", "#F87171", 1),
    MoodType::builtin("anxious", "Anxious", "😰", "#FBBF24", 2),
    MoodType::builtin("angry", "Angry", "😠", "#EF4444", 1),
    MoodType::builtin("excited", "Excited", "🤩", "#F59E0B", 4),
    MoodType::builtin("calm", "Calm", "😌", "#8B5CF6", 3),
    MoodType::builtin("grateful", "Grateful", "🙏", "#EC4899", 4),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnergyLevel {
    pub value: u8,
    pub label: &'static str,
    pub color: &'static str,
}

pub const ENERGY_LEVELS: &[EnergyLevel] = &[
    EnergyLevel { value: 1, label: "Very Low", color: "#EF4444" },
    EnergyLevel { value: 2, label: "Low", color: "#F97316" },
    EnergyLevel { value: 3, label: "Moderate", color: "#EAB308" },
    EnergyLevel { value: 4, label: "High", color: "#22C55E" },
    EnergyLevel { value: 5, label: "Very High", color: "#10B981" },
];

pub const COMMON_TAGS: &[&str] = &[
    "work", "family", "friends", "exercise", "sleep", "stress", "achievement", "challenge",
    "relaxation", "creativity", "health", "travel", "learning", "gratitude", "reflection",
];

pub fn find_category(id: &str) -> Option<&'static HabitCategory> {
    HABIT_CATEGORIES.iter().find(|c| c.id.eq_ignore_ascii_case(id.trim()))
}

pub fn find_mood(id: &str) -> Option<&'static MoodType> {
    MOOD_TYPES.iter().find(|m| m.id.eq_ignore_ascii_case(id.trim()))
}

pub fn energy_level(value: u8) -> Option<&'static EnergyLevel> {
    ENERGY_LEVELS.iter().find(|l| l.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        assert_eq!(find_category("Health").map(|c| c.icon), Some("💪"));
        assert!(find_category("gardening").is_none());
        assert_eq!(find_mood("calm").map(|m| m.value), Some(3));
        assert_eq!(energy_level(5).map(|l| l.label), Some("Very High"));
        assert!(energy_level(0).is_none());
    }

    #[test]
    fn test_mood_values_are_in_range() {
        assert!(MOOD_TYPES.iter().all(|m| (1..=5).contains(&m.value)));
    }
}
