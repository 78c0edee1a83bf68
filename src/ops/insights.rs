//! Summaries and recommendations derived from the mood history.

use crate::exercises::recommend;
use crate::mood::history::{self, MoodEntry, Trend};
use crate::mood::describe;
use crate::storage::BlobStorage;
use crate::store::ExerciseStore;
use serde::Serialize;
use tracing::{debug, info};

/// An overview of a mood history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    /// Mean mood rounded to one decimal place.
    pub average: f64,
    pub trend: Trend,
    /// Entry with the highest value, earliest date on ties.
    pub highest: MoodEntry,
    /// Entry with the lowest value, earliest date on ties.
    pub lowest: MoodEntry,
    /// Label for the rounded average, e.g. "Good".
    pub description: &'static str,
    /// A suggestion matching the average and trend.
    pub advice: &'static str,
}

/// Suggestion for an average mood and its trend.
pub fn mood_advice(average: f64, trend: Trend) -> &'static str {
    if average <= 2.0 {
        "Consider practicing gratitude exercises and reaching out for support."
    } else if average <= 3.0 {
        "Breathing exercises and physical activity could help improve your mood."
    } else if trend == Trend::Down {
        "Your mood is good but declining. Mindfulness practices can help maintain it."
    } else {
        "Continue with your current practices to maintain your positive mood."
    }
}

/// Summarizes `entries`, or `None` when there are none.
///
/// # Examples
///
/// ```
/// use calmly::mood::{MoodEntry, MoodScore, Trend};
/// use calmly::ops::summarize;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
/// let score = |v| MoodScore::new(v).unwrap();
/// let entries = vec![
///     MoodEntry::new(day(1), score(2)),
///     MoodEntry::new(day(2), score(3)),
///     MoodEntry::new(day(3), score(5)),
/// ];
///
/// let summary = summarize(&entries).unwrap();
/// assert_eq!(summary.average, 3.3);
/// assert_eq!(summary.trend, Trend::Up);
/// assert_eq!(summary.highest.date, day(3));
/// assert_eq!(summary.description, "Moderate");
/// assert!(summarize(&[]).is_none());
/// ```
pub fn summarize(entries: &[MoodEntry]) -> Option<MoodSummary> {
    let sorted = history::sorted_by_date(entries);
    let mean = history::average(&sorted)?;
    let (highest, lowest) = history::extrema(&sorted)?;

    let average = (mean * 10.0).round() / 10.0;
    let trend = history::trend(&sorted);

    Some(MoodSummary {
        average,
        trend,
        highest: highest.clone(),
        lowest: lowest.clone(),
        description: describe(average),
        advice: mood_advice(average, trend),
    })
}

/// Re-ranks the store's catalog against the average mood of `entries` and
/// makes the matches the current recommendations.
///
/// Returns how many exercises were recommended. Nothing changes when the
/// history is empty or no catalog exercise matches.
pub fn refresh_recommendations<S: BlobStorage>(
    store: &mut ExerciseStore<S>,
    entries: &[MoodEntry],
) -> usize {
    let Some(mean) = history::average(&history::sorted_by_date(entries)) else {
        debug!("No mood history, keeping current recommendations");
        return 0;
    };

    let picks = recommend(mean, store.all_exercises());
    if picks.is_empty() {
        debug!("No catalog exercise matches average mood {:.2}", mean);
        return 0;
    }

    let count = picks.len();
    info!("Recommending {} exercise(s) for average mood {:.2}", count, mean);
    store.set_recommended_exercises(picks);
    count
}
