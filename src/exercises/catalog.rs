//! Built-in exercise records.

use super::Exercise;
use crate::constants::RECOMMENDED_ID_PREFIX;
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
fn exercise(
    id: &str,
    name: &str,
    description: &str,
    duration: &str,
    category: &str,
    steps: &[&str],
    targets: &[&str],
    priority: u8,
) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        duration: duration.to_string(),
        category: category.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        mental_health_targets: targets.iter().map(|t| t.to_string()).collect(),
        priority,
    }
}

/// Fresh id for a recommendation minted during a chat turn.
pub fn recommended_id() -> String {
    format!("{}{}", RECOMMENDED_ID_PREFIX, Uuid::new_v4().simple())
}

/// The catalog every new or reset store starts from.
pub fn default_catalog() -> Vec<Exercise> {
    vec![
        exercise(
            "default-1",
            "5-Minute Breathing",
            "Deep breathing exercise for stress relief",
            "5 mins",
            "Relaxation",
            &[
                "Find a comfortable seated position",
                "Breathe in through your nose for 4 counts",
                "Hold for 2 counts",
                "Exhale through your mouth for 6 counts",
                "Repeat for 5 minutes",
            ],
            &["anxiety", "stress"],
            3,
        ),
        exercise(
            "default-2",
            "Gratitude Journal",
            "Write down three things you're grateful for",
            "10 mins",
            "Mindfulness",
            &[
                "Find a quiet space with minimal distractions",
                "Reflect on your day or week",
                "Write down three specific things you're grateful for",
                "For each item, write why you're grateful for it",
                "Review your entries regularly",
            ],
            &["depression", "negative thinking"],
            4,
        ),
        exercise(
            "default-3",
            "Progressive Relaxation",
            "Tense and relax each muscle group",
            "15 mins",
            "Relaxation",
            &[
                "Lie down in a comfortable position",
                "Starting with your feet, tense the muscles for 5 seconds",
                "Release and notice the feeling of relaxation",
                "Move up to your calves, thighs, and so on",
                "Continue until you've relaxed your entire body",
            ],
            &["anxiety", "physical tension", "stress"],
            3,
        ),
    ]
}

/// Recommended whenever a chat turn cannot produce anything better.
pub fn default_exercise() -> Exercise {
    exercise(
        "default-exercise",
        "Simple Breathing Exercise",
        "A quick breathing technique to reduce stress and anxiety",
        "5 mins",
        "Relaxation",
        &[
            "Find a comfortable seated position",
            "Breathe in through your nose for 4 counts",
            "Hold for 2 counts",
            "Exhale through your mouth for 6 counts",
            "Repeat for 5 minutes",
        ],
        &["anxiety", "stress"],
        3,
    )
}

/// Shown when the exercise store itself cannot be used.
pub fn fallback_exercises() -> Vec<Exercise> {
    vec![
        exercise(
            "fallback-1",
            "Deep Breathing",
            "Simple breathing exercise for immediate stress relief",
            "3 mins",
            "Relaxation",
            &[
                "Sit comfortably with your back straight",
                "Breathe in deeply through your nose for 4 counts",
                "Hold your breath for 2 counts",
                "Exhale slowly through your mouth for 6 counts",
                "Repeat 10 times",
            ],
            &["stress", "anxiety"],
            3,
        ),
        exercise(
            "fallback-2",
            "Mindful Walking",
            "A walking meditation to clear your mind",
            "10 mins",
            "Mindfulness",
            &[
                "Find a quiet place to walk",
                "Walk at a natural pace",
                "Focus on the sensation of your feet touching the ground",
                "When your mind wanders, gently bring it back to your walking",
                "Continue for 10 minutes",
            ],
            &["mindfulness", "stress"],
            3,
        ),
        exercise(
            "fallback-3",
            "Gratitude Practice",
            "Shift focus to positive aspects of your life",
            "5 mins",
            "Cognitive",
            &[
                "Find a quiet place to sit",
                "Think of three things you're grateful for today",
                "For each item, reflect on why it brings you joy",
                "Write these down if possible",
                "Review your list when feeling low",
            ],
            &["gratitude", "low mood"],
            3,
        ),
    ]
}

pub(crate) fn grounding_technique() -> Exercise {
    exercise(
        &recommended_id(),
        "Grounding Technique",
        "A simple exercise to reduce anxiety by connecting with your senses",
        "3 mins",
        "Mindfulness",
        &[
            "Name 5 things you can see",
            "Name 4 things you can touch",
            "Name 3 things you can hear",
            "Name 2 things you can smell",
            "Name 1 thing you can taste",
        ],
        &["anxiety", "panic", "stress"],
        4,
    )
}

pub(crate) fn gratitude_practice() -> Exercise {
    exercise(
        &recommended_id(),
        "Gratitude Practice",
        "Focus on positive aspects to improve mood",
        "5 mins",
        "Cognitive",
        &[
            "Find a quiet place to sit",
            "Think of three things you're grateful for today",
            "For each item, reflect on why it brings you joy",
            "Write these down if possible",
            "Review your list when feeling low",
        ],
        &["depression", "negative thinking", "low mood"],
        4,
    )
}

pub(crate) fn muscle_relaxation() -> Exercise {
    exercise(
        &recommended_id(),
        "Progressive Muscle Relaxation",
        "Release physical tension to reduce stress",
        "10 mins",
        "Relaxation",
        &[
            "Find a comfortable position sitting or lying down",
            "Starting with your feet, tense the muscles for 5 seconds",
            "Release and notice the feeling of relaxation",
            "Move up through each muscle group in your body",
            "Breathe deeply throughout the exercise",
        ],
        &["stress", "physical tension", "anxiety"],
        4,
    )
}

pub(crate) fn breathing_recommendation() -> Exercise {
    Exercise {
        id: recommended_id(),
        ..default_exercise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_is_well_formed() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 3);

        let ids: HashSet<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        let names: HashSet<_> = catalog.iter().map(|e| e.name_key()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(names.len(), catalog.len());
        assert!(catalog.iter().all(|e| e.is_valid_recommendation()));
        assert!(catalog.iter().all(|e| (1..=5).contains(&e.priority)));
    }

    #[test]
    fn test_fallback_exercises_are_valid() {
        assert!(fallback_exercises()
            .iter()
            .all(|e| e.is_valid_recommendation()));
    }

    #[test]
    fn test_recommended_ids_are_unique() {
        let a = grounding_technique();
        let b = grounding_technique();
        assert!(a.id.starts_with(RECOMMENDED_ID_PREFIX));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_breathing_recommendation_keeps_default_fields() {
        let rec = breathing_recommendation();
        let default = default_exercise();
        assert_ne!(rec.id, default.id);
        assert_eq!(rec.name, default.name);
        assert_eq!(rec.priority, 3);
    }
}
