//! Keyword-based mood scoring.
//!
//! The scorer walks an ordered rule table and returns the score of the first
//! rule with a pattern found (case-insensitively) in the text. Nothing matching
//! means neutral.
//!
//! Rule order is the tie-break for text matching several rules. Negative rules
//! come first, so "mild anxiety and excellent progress" scores 2. The
//! very-positive rule sits before the plain positive one because every
//! "very happy" also contains "happy".

use super::MoodScore;

/// One row of the rule table: any of `patterns` maps to `score`.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    /// Score returned when this rule matches.
    pub score: MoodScore,
    /// Lowercase substrings that trigger the rule.
    pub patterns: &'static [&'static str],
}

/// The default rule table, highest precedence first.
pub const DEFAULT_RULES: &[ScoreRule] = &[
    ScoreRule {
        score: MoodScore(1),
        patterns: &["severe depression", "suicidal", "extremely anxious"],
    },
    ScoreRule {
        score: MoodScore(2),
        patterns: &["depression", "anxiety", "stressed", "sad", "upset"],
    },
    ScoreRule {
        score: MoodScore(5),
        patterns: &["very happy", "excellent", "great mood", "joyful"],
    },
    ScoreRule {
        score: MoodScore(4),
        patterns: &["happy", "good mood", "positive", "content"],
    },
];

/// Scores `analysis` with [`DEFAULT_RULES`].
///
/// # Examples
///
/// ```
/// use calmly::mood::score;
///
/// assert_eq!(score("I feel very happy today").value(), 5);
/// assert_eq!(score("I am stressed and overwhelmed").value(), 2);
/// assert_eq!(score("just an ordinary day").value(), 3);
/// ```
pub fn score(analysis: &str) -> MoodScore {
    score_with(DEFAULT_RULES, analysis)
}

/// Scores `analysis` against a caller-supplied rule table.
pub fn score_with(rules: &[ScoreRule], analysis: &str) -> MoodScore {
    let lowered = analysis.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| lowered.contains(p)))
        .map(|rule| rule.score)
        .unwrap_or(MoodScore::NEUTRAL)
}
