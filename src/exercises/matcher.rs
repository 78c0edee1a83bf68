//! Matching exercises to mood.
//!
//! Two paths produce recommendations:
//! - [`recommend`] ranks catalog exercises against the average mood of the history
//! - [`classify_analysis`] picks one literal exercise for a single chat turn

use super::catalog;
use super::Exercise;
use crate::constants::MAX_RECOMMENDATIONS;

/// Target keywords and the priority assigned to matches for a mood band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodTargets {
    pub keywords: &'static [&'static str],
    pub priority: u8,
}

const LOW_MOOD: MoodTargets = MoodTargets {
    keywords: &["depression", "negative thinking", "low mood"],
    priority: 5,
};

const MODERATE_MOOD: MoodTargets = MoodTargets {
    keywords: &["anxiety", "stress", "physical tension"],
    priority: 4,
};

const GOOD_MOOD: MoodTargets = MoodTargets {
    keywords: &["mindfulness", "gratitude", "positive thinking"],
    priority: 3,
};

/// Selects the target band for an average mood.
pub fn targets_for_mood(average_mood: f64) -> MoodTargets {
    if average_mood <= 2.0 {
        LOW_MOOD
    } else if average_mood <= 3.0 {
        MODERATE_MOOD
    } else {
        GOOD_MOOD
    }
}

fn matches_any(exercise: &Exercise, keywords: &[&str]) -> bool {
    exercise.mental_health_targets.iter().any(|target| {
        let target = target.to_lowercase();
        keywords.iter().any(|k| target.contains(k))
    })
}

/// Up to three catalog exercises matching the mood band of `average_mood`,
/// in catalog order, each with its priority rewritten to the band's priority.
///
/// # Examples
///
/// ```
/// use calmly::exercises::{default_catalog, recommend};
///
/// let picks = recommend(1.5, &default_catalog());
/// assert_eq!(picks.len(), 1);
/// assert_eq!(picks[0].name, "Gratitude Journal");
/// assert_eq!(picks[0].priority, 5);
///
/// assert!(recommend(4.0, &[]).is_empty());
/// ```
pub fn recommend(average_mood: f64, catalog: &[Exercise]) -> Vec<Exercise> {
    let targets = targets_for_mood(average_mood);
    catalog
        .iter()
        .filter(|exercise| matches_any(exercise, targets.keywords))
        .take(MAX_RECOMMENDATIONS)
        .map(|exercise| Exercise {
            priority: targets.priority,
            ..exercise.clone()
        })
        .collect()
}

/// Picks a single exercise for one chat turn's analysis.
///
/// Checked in order: anxiety/worry, depression/sadness, stress/overwhelm,
/// falling back to a breathing exercise. Every call mints a fresh id.
pub fn classify_analysis(analysis: &str) -> Exercise {
    let lowered = analysis.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    if mentions(&["anxiety", "worry"]) {
        catalog::grounding_technique()
    } else if mentions(&["depress", "sad"]) {
        catalog::gratitude_practice()
    } else if mentions(&["stress", "overwhelm"]) {
        catalog::muscle_relaxation()
    } else {
        catalog::breathing_recommendation()
    }
}
