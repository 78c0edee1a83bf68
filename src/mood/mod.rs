//! Mood scoring and daily mood history.
//!
//! - `scorer`: turns free-text analysis into a [`MoodScore`]
//! - `history`: pure operations over a sequence of [`MoodEntry`] values
//! - `tracker`: the persisted mood history store

pub mod history;
pub mod scorer;
pub mod tracker;

pub use history::{MoodEntry, Trend};
pub use scorer::{score, score_with, ScoreRule, DEFAULT_RULES};
pub use tracker::MoodTracker;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete mood rating from 1 (most negative) to 5 (most positive).
///
/// # Examples
///
/// ```
/// use calmly::mood::MoodScore;
///
/// assert_eq!(MoodScore::new(4).map(|s| s.value()), Some(4));
/// assert!(MoodScore::new(0).is_none());
/// assert!(MoodScore::new(6).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    /// Lowest valid score.
    pub const MIN: u8 = 1;
    /// Highest valid score.
    pub const MAX: u8 = 5;
    /// The score used when nothing in the analysis points either way.
    pub const NEUTRAL: MoodScore = MoodScore(3);

    /// Returns a score if `value` is within 1..=5.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(MoodScore(value))
    }

    /// The raw value.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MoodScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MoodScore::new(value).ok_or_else(|| {
            format!(
                "mood score {} outside {}..={}",
                value,
                MoodScore::MIN,
                MoodScore::MAX
            )
        })
    }
}

impl From<MoodScore> for u8 {
    fn from(score: MoodScore) -> Self {
        score.0
    }
}

impl fmt::Display for MoodScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable label for a (possibly averaged) mood value.
///
/// # Examples
///
/// ```
/// use calmly::mood::describe;
///
/// assert_eq!(describe(1.2), "Very Low");
/// assert_eq!(describe(3.0), "Moderate");
/// assert_eq!(describe(4.8), "Excellent");
/// ```
pub fn describe(value: f64) -> &'static str {
    if value <= 1.5 {
        "Very Low"
    } else if value <= 2.5 {
        "Low"
    } else if value <= 3.5 {
        "Moderate"
    } else if value <= 4.5 {
        "Good"
    } else {
        "Excellent"
    }
}
