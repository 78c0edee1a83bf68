//! The exercise store: catalog, current recommendations, and completions.
//!
//! State changes go through [`state::reduce`]; [`ExerciseStore`] persists the
//! result after every change that actually altered something.

pub mod snapshot;
pub mod state;

pub use state::{reduce, Action, RecommendationState};

use crate::constants::EXERCISE_STORAGE_KEY;
use crate::errors::StorageError;
use crate::exercises::Exercise;
use crate::storage::BlobStorage;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Persisted exercise state over a [`BlobStorage`].
///
/// # Examples
///
/// ```
/// use calmly::storage::MemoryStorage;
/// use calmly::store::ExerciseStore;
///
/// let storage = MemoryStorage::new();
/// let mut store = ExerciseStore::open(&storage);
/// store.mark_exercise_completed("default-1");
///
/// let reopened = ExerciseStore::open(&storage);
/// assert!(reopened.is_completed("default-1"));
/// ```
pub struct ExerciseStore<S: BlobStorage> {
    storage: S,
    state: RecommendationState,
}

impl<S: BlobStorage> ExerciseStore<S> {
    /// Rehydrates the store from `storage`, falling back to defaults when the
    /// persisted blob is missing, unreadable, or from a newer version.
    pub fn open(storage: S) -> Self {
        let state = match storage.get_item(EXERCISE_STORAGE_KEY) {
            Ok(Some(raw)) => snapshot::decode(&raw),
            Ok(None) => {
                debug!("No exercise store yet, using defaults");
                RecommendationState::default()
            }
            Err(e) => {
                warn!("Failed to read exercise store: {}", e);
                RecommendationState::default()
            }
        };
        Self { storage, state }
    }

    /// The current state.
    pub fn state(&self) -> &RecommendationState {
        &self.state
    }

    /// Applies `action` and persists the outcome if anything changed.
    pub fn dispatch(&mut self, action: Action) {
        let next = reduce(self.state.clone(), action);
        if next != self.state {
            self.state = next;
            self.persist();
        }
    }

    /// Replaces the recommendations with the valid subset of `candidates`.
    ///
    /// Exercises whose name is new to the catalog are appended to it. When no
    /// candidate is valid nothing changes.
    pub fn set_recommended_exercises(&mut self, candidates: Vec<Exercise>) {
        self.dispatch(Action::SetRecommended(candidates));
    }

    /// Appends `exercise` to the catalog if it has a name and steps.
    pub fn add_exercise(&mut self, exercise: Exercise) {
        self.dispatch(Action::AddExercise(exercise));
    }

    /// Records `id` as completed. Unknown ids are ignored.
    pub fn mark_exercise_completed(&mut self, id: &str) {
        self.dispatch(Action::MarkCompleted(id.to_string()));
    }

    /// Restores the default catalog and clears recommendations and completions.
    pub fn reset_store(&mut self) {
        self.dispatch(Action::Reset);
    }

    pub fn all_exercises(&self) -> &[Exercise] {
        &self.state.all_exercises
    }

    pub fn recommended_exercises(&self) -> &[Exercise] {
        &self.state.recommended_exercises
    }

    pub fn completed_exercises(&self) -> &BTreeSet<String> {
        &self.state.completed_exercises
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.state
            .resolve_catalog_id(id)
            .is_some_and(|catalog_id| self.state.completed_exercises.contains(&catalog_id))
    }

    pub fn find_exercise(&self, id: &str) -> Option<&Exercise> {
        self.state.find_exercise(id)
    }

    fn persist(&self) {
        let result = snapshot::encode(&self.state)
            .map_err(|source| StorageError::Serialize {
                key: EXERCISE_STORAGE_KEY.to_string(),
                source,
            })
            .and_then(|encoded| self.storage.set_item(EXERCISE_STORAGE_KEY, &encoded));

        match result {
            Ok(()) => debug!("Persisted exercise store"),
            Err(e) => warn!("Failed to persist exercise store: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{classify_analysis, default_catalog};
    use crate::storage::MemoryStorage;

    #[test]
    fn test_open_empty_storage_uses_defaults() {
        let storage = MemoryStorage::new();
        let store = ExerciseStore::open(&storage);
        assert_eq!(store.all_exercises(), default_catalog().as_slice());
        assert!(store.recommended_exercises().is_empty());
        assert!(store.completed_exercises().is_empty());
        // Nothing is written until something changes
        assert!(storage.get_item(EXERCISE_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_state_survives_reopen() {
        let storage = MemoryStorage::new();
        let recommendation = classify_analysis("feeling sad");
        {
            let mut store = ExerciseStore::open(&storage);
            store.set_recommended_exercises(vec![recommendation.clone()]);
            store.mark_exercise_completed("default-2");
        }

        let store = ExerciseStore::open(&storage);
        assert_eq!(store.recommended_exercises(), &[recommendation.clone()]);
        assert_eq!(store.all_exercises().len(), 4);
        assert!(store.find_exercise(&recommendation.id).is_some());
        assert!(store.is_completed("default-2"));
        assert!(!store.is_completed("default-1"));
    }

    #[test]
    fn test_is_completed_through_recommendation_alias() {
        let storage = MemoryStorage::new();
        let mut store = ExerciseStore::open(&storage);
        let alias = Exercise {
            id: "rec-alias".to_string(),
            ..default_catalog()[0].clone()
        };
        store.set_recommended_exercises(vec![alias]);
        // Same name as default-1, so the catalog did not grow
        assert_eq!(store.all_exercises().len(), 3);

        store.mark_exercise_completed("rec-alias");
        assert!(store.is_completed("rec-alias"));
        assert!(store.is_completed("default-1"));
    }

    #[test]
    fn test_reset_persists_defaults() {
        let storage = MemoryStorage::new();
        let mut store = ExerciseStore::open(&storage);
        store.mark_exercise_completed("default-3");
        store.reset_store();

        let store = ExerciseStore::open(&storage);
        assert!(store.completed_exercises().is_empty());
        assert_eq!(store.state(), &RecommendationState::default());
    }

    #[test]
    fn test_newer_version_blob_is_ignored() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                EXERCISE_STORAGE_KEY,
                r#"{"state":{"allExercises":[],"completedExercises":[]},"version":9}"#,
            )
            .unwrap();
        let store = ExerciseStore::open(&storage);
        assert_eq!(store.all_exercises().len(), 3);
    }
}
