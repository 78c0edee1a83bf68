//! Self-help exercises: the record type, the built-in catalog, and matching.

pub mod catalog;
pub mod matcher;

pub use catalog::{default_catalog, default_exercise, fallback_exercises};
pub use matcher::{classify_analysis, recommend, targets_for_mood, MoodTargets};

use crate::constants::{MAX_EXERCISE_PRIORITY, MIN_EXERCISE_PRIORITY};
use serde::{Deserialize, Serialize};

/// A structured self-help activity.
///
/// Serialized with camelCase field names, matching the persisted store layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Unique within a catalog.
    pub id: String,
    /// Unique within a catalog, compared case-insensitively.
    pub name: String,
    pub description: String,
    /// Free-form duration label, e.g. "5 mins".
    pub duration: String,
    pub category: String,
    /// Ordered instructions.
    pub steps: Vec<String>,
    /// Keyword tags describing what the exercise helps with.
    pub mental_health_targets: Vec<String>,
    /// 1 to 5, 5 being the most urgent recommendation.
    pub priority: u8,
}

impl Exercise {
    /// Whether this exercise can be shown as a recommendation: it needs a
    /// name, a description, at least one step and a priority in range.
    pub fn is_valid_recommendation(&self) -> bool {
        self.is_valid_catalog_entry() && !self.description.trim().is_empty()
    }

    /// Whether this exercise can be added to the catalog: name and steps
    /// present, priority in range.
    pub fn is_valid_catalog_entry(&self) -> bool {
        !self.name.trim().is_empty() && !self.steps.is_empty() && self.has_valid_priority()
    }

    pub fn has_valid_priority(&self) -> bool {
        (MIN_EXERCISE_PRIORITY..=MAX_EXERCISE_PRIORITY).contains(&self.priority)
    }

    /// Pulls an out-of-range priority back to the nearest bound.
    pub fn clamp_priority(&mut self) {
        self.priority = self
            .priority
            .clamp(MIN_EXERCISE_PRIORITY, MAX_EXERCISE_PRIORITY);
    }

    /// Lowercased name, the key used for catalog deduplication.
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Exercise {
        Exercise {
            id: "x-1".to_string(),
            name: "Box Breathing".to_string(),
            description: "Breathe in a square".to_string(),
            duration: "4 mins".to_string(),
            category: "Relaxation".to_string(),
            steps: vec!["Inhale 4".to_string(), "Hold 4".to_string()],
            mental_health_targets: vec!["anxiety".to_string()],
            priority: 3,
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(sample().is_valid_recommendation());
        assert!(sample().is_valid_catalog_entry());

        let no_steps = Exercise {
            steps: Vec::new(),
            ..sample()
        };
        assert!(!no_steps.is_valid_recommendation());
        assert!(!no_steps.is_valid_catalog_entry());

        let no_description = Exercise {
            description: "  ".to_string(),
            ..sample()
        };
        assert!(!no_description.is_valid_recommendation());
        assert!(no_description.is_valid_catalog_entry());

        let no_name = Exercise {
            name: String::new(),
            ..sample()
        };
        assert!(!no_name.is_valid_recommendation());
        assert!(!no_name.is_valid_catalog_entry());
    }

    #[test]
    fn test_priority_range() {
        for priority in [0, 6, u8::MAX] {
            let out_of_range = Exercise {
                priority,
                ..sample()
            };
            assert!(!out_of_range.is_valid_catalog_entry());
            assert!(!out_of_range.is_valid_recommendation());
        }

        let mut zero = Exercise {
            priority: 0,
            ..sample()
        };
        zero.clamp_priority();
        assert_eq!(zero.priority, 1);

        let mut high = Exercise {
            priority: 9,
            ..sample()
        };
        high.clamp_priority();
        assert_eq!(high.priority, 5);
        assert!(high.is_valid_catalog_entry());
    }

    #[test]
    fn test_camel_case_layout() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("mentalHealthTargets").is_some());
        assert!(json.get("mental_health_targets").is_none());

        let back: Exercise = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_name_key() {
        assert_eq!(sample().name_key(), "box breathing");
    }
}
