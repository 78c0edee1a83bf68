//! Pure operations over mood history.
//!
//! Nothing in here touches storage or the clock; "today" is always passed in.

use super::MoodScore;
use crate::constants::{MOOD_HISTORY_LIMIT, SAMPLE_MOOD_MAX, SAMPLE_MOOD_MIN, TREND_THRESHOLD};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One day's mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Weekday abbreviation, "Sun" through "Sat".
    pub day: String,
    /// The day's mood score.
    pub value: MoodScore,
    /// Calendar date; unique within a history.
    pub date: NaiveDate,
}

impl MoodEntry {
    /// Creates an entry for `date`, deriving the weekday abbreviation.
    pub fn new(date: NaiveDate, value: MoodScore) -> Self {
        Self {
            day: weekday_abbrev(date.weekday()).to_string(),
            value,
            date,
        }
    }
}

/// Direction of mood across the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Three-letter weekday abbreviation.
pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Records `score` for `today`: overwrites today's entry if present, otherwise
/// inserts one and keeps only the most recent [`MOOD_HISTORY_LIMIT`] entries by
/// date. The result is sorted by date.
pub fn record(mut entries: Vec<MoodEntry>, score: MoodScore, today: NaiveDate) -> Vec<MoodEntry> {
    if let Some(existing) = entries.iter_mut().find(|e| e.date == today) {
        existing.value = score;
        return entries;
    }

    entries.push(MoodEntry::new(today, score));
    entries.sort_by_key(|e| e.date);
    if entries.len() > MOOD_HISTORY_LIMIT {
        let excess = entries.len() - MOOD_HISTORY_LIMIT;
        entries.drain(..excess);
    }
    entries
}

/// Synthesizes `days` consecutive entries ending at `today`, values in 3..=5.
pub fn generate_sample<R: Rng + ?Sized>(today: NaiveDate, days: i64, rng: &mut R) -> Vec<MoodEntry> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let value = MoodScore::new(rng.gen_range(SAMPLE_MOOD_MIN..=SAMPLE_MOOD_MAX))
                .unwrap_or(MoodScore::NEUTRAL);
            MoodEntry::new(date, value)
        })
        .collect()
}

/// Returns the entries ordered by date ascending.
pub fn sorted_by_date(entries: &[MoodEntry]) -> Vec<MoodEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.date);
    sorted
}

/// Collapses entries sharing a date, keeping the last one seen for each date.
/// Relative order of the survivors is preserved.
pub fn dedup_by_date(entries: Vec<MoodEntry>) -> Vec<MoodEntry> {
    let mut result: Vec<MoodEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(existing) = result.iter_mut().find(|e| e.date == entry.date) {
            *existing = entry;
        } else {
            result.push(entry);
        }
    }
    result
}

fn mean(entries: &[MoodEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: u32 = entries.iter().map(|e| u32::from(e.value.value())).sum();
    Some(f64::from(sum) / entries.len() as f64)
}

/// Mean mood value, `None` for an empty history.
pub fn average(entries: &[MoodEntry]) -> Option<f64> {
    mean(entries)
}

/// Compares the first half of the date-sorted history to the second half.
///
/// The first half holds `n / 2` entries (rounded down). Histories with fewer
/// than two entries are always stable.
pub fn trend(entries: &[MoodEntry]) -> Trend {
    let sorted = sorted_by_date(entries);
    let midpoint = sorted.len() / 2;
    let (first, second) = sorted.split_at(midpoint);

    match (mean(first), mean(second)) {
        (Some(first_avg), Some(second_avg)) => {
            if second_avg - first_avg > TREND_THRESHOLD {
                Trend::Up
            } else if first_avg - second_avg > TREND_THRESHOLD {
                Trend::Down
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    }
}

/// Highest and lowest entries; the earliest entry wins ties.
pub fn extrema(entries: &[MoodEntry]) -> Option<(&MoodEntry, &MoodEntry)> {
    let first = entries.first()?;
    let mut highest = first;
    let mut lowest = first;
    for entry in &entries[1..] {
        if entry.value > highest.value {
            highest = entry;
        }
        if entry.value < lowest.value {
            lowest = entry;
        }
    }
    Some((highest, lowest))
}
