//! The persisted mood history store.

use super::history::{self, MoodEntry};
use super::MoodScore;
use crate::constants::{MOOD_STORAGE_KEY, SAMPLE_MOOD_DAYS};
use crate::storage::{set_json, BlobStorage};
use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, info, warn};

/// Mood history persisted as a JSON array under [`MOOD_STORAGE_KEY`].
///
/// Storage failures never escape: unreadable or malformed data is replaced
/// with a freshly generated week of sample entries, and failed writes are
/// logged and otherwise ignored.
///
/// # Examples
///
/// ```
/// use calmly::mood::{MoodScore, MoodTracker};
/// use calmly::storage::MemoryStorage;
/// use chrono::NaiveDate;
///
/// let tracker = MoodTracker::new(MemoryStorage::new());
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
///
/// let history = tracker.update(MoodScore::new(2).unwrap(), today);
/// let todays = history.iter().find(|e| e.date == today).unwrap();
/// assert_eq!(todays.value.value(), 2);
/// ```
pub struct MoodTracker<S: BlobStorage> {
    storage: S,
}

impl<S: BlobStorage> MoodTracker<S> {
    /// Creates a tracker over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the persisted history, synthesizing and persisting sample data
    /// when there is none or it cannot be decoded.
    pub fn load(&self, today: NaiveDate) -> Vec<MoodEntry> {
        self.load_with_rng(today, &mut rand::thread_rng())
    }

    /// Same as [`load`](Self::load) with an explicit random source for sample data.
    pub fn load_with_rng<R: Rng + ?Sized>(&self, today: NaiveDate, rng: &mut R) -> Vec<MoodEntry> {
        if let Some(entries) = self.read() {
            return entries;
        }

        info!("No usable mood history, generating sample data");
        let sample = history::generate_sample(today, SAMPLE_MOOD_DAYS, rng);
        self.write(&sample);
        sample
    }

    /// Records `score` for `today` and returns the resulting history.
    pub fn update(&self, score: MoodScore, today: NaiveDate) -> Vec<MoodEntry> {
        let entries = self.load(today);
        let updated = history::record(entries, score, today);
        debug!("Recorded mood {} for {}", score, today);
        self.write(&updated);
        updated
    }

    /// Decoded history, or `None` if missing, empty, unreadable, or malformed.
    fn read(&self) -> Option<Vec<MoodEntry>> {
        let raw = match self.storage.get_item(MOOD_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read mood history: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<MoodEntry>>(&raw) {
            Ok(entries) if entries.is_empty() => None,
            Ok(entries) => {
                let count = entries.len();
                let entries = history::dedup_by_date(entries);
                if entries.len() != count {
                    warn!(
                        "Mood history held {} duplicate dates, keeping the latest",
                        count - entries.len()
                    );
                }
                Some(entries)
            }
            Err(e) => {
                warn!("Discarding malformed mood history: {}", e);
                None
            }
        }
    }

    fn write(&self, entries: &[MoodEntry]) {
        if let Err(e) = set_json(&self.storage, MOOD_STORAGE_KEY, entries) {
            warn!("Failed to persist mood history: {}", e);
        }
    }
}
