//! Recommendation state and its transitions.
//!
//! [`reduce`] is a pure function: it takes the current state and an
//! [`Action`] and returns the next state. Persistence happens elsewhere.

use crate::exercises::{default_catalog, Exercise};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Everything the exercise store knows.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationState {
    /// The catalog: defaults plus everything discovered since.
    pub all_exercises: Vec<Exercise>,
    /// The current recommendations.
    pub recommended_exercises: Vec<Exercise>,
    /// Catalog ids the user has completed.
    pub completed_exercises: BTreeSet<String>,
}

impl Default for RecommendationState {
    fn default() -> Self {
        Self {
            all_exercises: default_catalog(),
            recommended_exercises: Vec::new(),
            completed_exercises: BTreeSet::new(),
        }
    }
}

impl RecommendationState {
    /// Looks up a catalog exercise by id.
    pub fn find_exercise(&self, id: &str) -> Option<&Exercise> {
        self.all_exercises.iter().find(|e| e.id == id)
    }

    /// Maps `id` to the catalog id it stands for.
    ///
    /// Catalog ids map to themselves. A recommended exercise that never made it
    /// into the catalog (its name was already taken) maps to the catalog entry
    /// with the same name.
    pub fn resolve_catalog_id(&self, id: &str) -> Option<String> {
        if self.find_exercise(id).is_some() {
            return Some(id.to_string());
        }
        let recommended = self.recommended_exercises.iter().find(|e| e.id == id)?;
        let key = recommended.name_key();
        self.all_exercises
            .iter()
            .find(|e| e.name_key() == key)
            .map(|e| e.id.clone())
    }
}

/// A transition of the exercise store.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the recommendations and merge new names into the catalog.
    SetRecommended(Vec<Exercise>),
    /// Append an exercise to the catalog.
    AddExercise(Exercise),
    /// Record an exercise as completed.
    MarkCompleted(String),
    /// Back to the default catalog with nothing recommended or completed.
    Reset,
}

/// Applies `action` to `state`.
pub fn reduce(mut state: RecommendationState, action: Action) -> RecommendationState {
    match action {
        Action::SetRecommended(candidates) => {
            let offered = candidates.len();
            let valid: Vec<Exercise> = candidates
                .into_iter()
                .filter(Exercise::is_valid_recommendation)
                .collect();

            if valid.len() != offered {
                debug!("Dropped {} invalid recommendation(s)", offered - valid.len());
            }
            if valid.is_empty() {
                return state;
            }

            let mut known: HashSet<String> =
                state.all_exercises.iter().map(Exercise::name_key).collect();
            for exercise in &valid {
                if known.insert(exercise.name_key()) {
                    state.all_exercises.push(exercise.clone());
                }
            }
            state.recommended_exercises = valid;
            state
        }
        Action::AddExercise(exercise) => {
            if exercise.is_valid_catalog_entry() {
                state.all_exercises.push(exercise);
            }
            state
        }
        Action::MarkCompleted(id) => {
            match state.resolve_catalog_id(&id) {
                Some(catalog_id) => {
                    state.completed_exercises.insert(catalog_id);
                }
                None => debug!("Ignoring completion of unknown exercise {}", id),
            }
            state
        }
        Action::Reset => RecommendationState::default(),
    }
}
