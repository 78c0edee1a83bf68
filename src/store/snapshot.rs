//! On-disk layout of the exercise store.
//!
//! ```json
//! {"state": {"allExercises": [...], "recommendedExercises": [...],
//!            "completedExercises": ["default-1"]},
//!  "version": 0}
//! ```
//!
//! Decoding is field by field: one bad field falls back to its default
//! without discarding the others.

use super::state::RecommendationState;
use crate::constants::EXERCISE_STORE_VERSION;
use crate::exercises::{default_catalog, Exercise};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState<'a> {
    all_exercises: &'a [Exercise],
    recommended_exercises: &'a [Exercise],
    completed_exercises: &'a BTreeSet<String>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    state: PersistedState<'a>,
    version: u32,
}

/// Serializes `state` in the versioned envelope.
pub fn encode(state: &RecommendationState) -> serde_json::Result<String> {
    serde_json::to_string(&Envelope {
        state: PersistedState {
            all_exercises: &state.all_exercises,
            recommended_exercises: &state.recommended_exercises,
            completed_exercises: &state.completed_exercises,
        },
        version: EXERCISE_STORE_VERSION,
    })
}

/// Rebuilds a state from a persisted blob. Never fails.
///
/// Unparseable blobs and blobs written by a newer version yield the default
/// state. Completed ids that are not in the decoded catalog are dropped.
pub fn decode(raw: &str) -> RecommendationState {
    let root: Value = match serde_json::from_str(raw) {
        Ok(root) => root,
        Err(e) => {
            warn!("Discarding unparseable exercise store: {}", e);
            return RecommendationState::default();
        }
    };

    let version = root.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version > u64::from(EXERCISE_STORE_VERSION) {
        warn!(
            "Exercise store has version {}, newer than {}; starting fresh",
            version, EXERCISE_STORE_VERSION
        );
        return RecommendationState::default();
    }

    let Some(state) = root.get("state").filter(|s| s.is_object()) else {
        warn!("Exercise store has no state object; starting fresh");
        return RecommendationState::default();
    };

    let mut all_exercises =
        field::<Vec<Exercise>>(state, "allExercises").unwrap_or_else(default_catalog);
    let mut recommended_exercises =
        field::<Vec<Exercise>>(state, "recommendedExercises").unwrap_or_default();
    clamp_priorities(&mut all_exercises);
    clamp_priorities(&mut recommended_exercises);
    let completed_exercises = completed_ids(state.get("completedExercises"), &all_exercises);

    RecommendationState {
        all_exercises,
        recommended_exercises,
        completed_exercises,
    }
}

fn field<T: DeserializeOwned>(state: &Value, name: &str) -> Option<T> {
    let value = state.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Ignoring malformed {} in exercise store: {}", name, e);
            None
        }
    }
}

fn clamp_priorities(exercises: &mut [Exercise]) {
    for exercise in exercises.iter_mut().filter(|e| !e.has_valid_priority()) {
        warn!(
            "Exercise {} has priority {} out of range, clamping",
            exercise.id, exercise.priority
        );
        exercise.clamp_priority();
    }
}

fn completed_ids(value: Option<&Value>, catalog: &[Exercise]) -> BTreeSet<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return BTreeSet::new();
    };

    let mut ids = BTreeSet::new();
    for id in items.iter().filter_map(Value::as_str) {
        if catalog.iter().any(|e| e.id == id) {
            ids.insert(id.to_string());
        } else {
            warn!("Dropping completion of unknown exercise {}", id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::state::{reduce, Action};
    use serde_json::json;

    #[test]
    fn test_encode_layout() {
        let state = reduce(
            RecommendationState::default(),
            Action::MarkCompleted("default-2".to_string()),
        );
        let value: Value = serde_json::from_str(&encode(&state).unwrap()).unwrap();

        assert_eq!(value["version"], json!(0));
        assert_eq!(value["state"]["completedExercises"], json!(["default-2"]));
        assert_eq!(value["state"]["allExercises"].as_array().unwrap().len(), 3);
        assert_eq!(value["state"]["recommendedExercises"], json!([]));
        assert_eq!(
            value["state"]["allExercises"][0]["mentalHealthTargets"],
            json!(["anxiety", "stress"])
        );
    }

    #[test]
    fn test_decode_restores_encoded_state() {
        let state = reduce(
            RecommendationState::default(),
            Action::MarkCompleted("default-1".to_string()),
        );
        let state = reduce(state, Action::MarkCompleted("default-3".to_string()));
        assert_eq!(decode(&encode(&state).unwrap()), state);
    }

    #[test]
    fn test_decode_garbage_is_default() {
        for raw in ["", "nope", "[]", "{}", "{\"state\": 7}"] {
            assert_eq!(decode(raw), RecommendationState::default(), "raw: {}", raw);
        }
    }

    #[test]
    fn test_decode_newer_version_is_default() {
        let raw = json!({
            "state": {"allExercises": [], "recommendedExercises": [], "completedExercises": []},
            "version": 3
        });
        assert_eq!(decode(&raw.to_string()), RecommendationState::default());
    }

    #[test]
    fn test_decode_non_sequence_completed_is_empty() {
        let raw = json!({
            "state": {"completedExercises": {"default-1": true}},
            "version": 0
        });
        let state = decode(&raw.to_string());
        assert!(state.completed_exercises.is_empty());
        assert_eq!(state.all_exercises, default_catalog());
    }

    #[test]
    fn test_decode_clamps_out_of_range_priority() {
        let mut stored = default_catalog();
        stored[0].priority = 0;
        stored[1].priority = 42;
        let raw = json!({
            "state": {"allExercises": stored, "recommendedExercises": [stored[1]]},
            "version": 0
        });

        let state = decode(&raw.to_string());
        assert_eq!(state.all_exercises[0].priority, 1);
        assert_eq!(state.all_exercises[1].priority, 5);
        assert_eq!(state.all_exercises[2].priority, default_catalog()[2].priority);
        assert_eq!(state.recommended_exercises[0].priority, 5);
    }

    #[test]
    fn test_decode_bad_field_keeps_others() {
        let raw = json!({
            "state": {
                "allExercises": "broken",
                "recommendedExercises": [default_catalog()[1]],
                "completedExercises": ["default-1", 42, "ghost"]
            },
            "version": 0
        });
        let state = decode(&raw.to_string());
        assert_eq!(state.all_exercises, default_catalog());
        assert_eq!(state.recommended_exercises.len(), 1);
        assert_eq!(
            state.completed_exercises.iter().collect::<Vec<_>>(),
            vec!["default-1"]
        );
    }
}
