//! Shared test utilities
#![allow(dead_code)]

use std::collections::HashMap;

use tempfile::TempDir;

use juno_gateway::nlu::Prediction;
use juno_gateway::profiles::{HistoryStore, ProfileConfig, ProfileStore};
use juno_gateway::settings::SettingsStore;

/// Set up a profile named "pilot" in a temp directory and return handles
/// to its stores
#[must_use]
pub fn setup_profile() -> (TempDir, ProfileStore, SettingsStore, HistoryStore) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = ProfileStore::new(dir.path());
    store
        .create("pilot", &ProfileConfig::default())
        .expect("failed to create test profile");
    let settings = SettingsStore::open(store.clone(), "pilot").expect("failed to open settings");
    let history = store.history("pilot");
    (dir, store, settings, history)
}

/// Build a prediction with one scored intent and string entities
#[must_use]
pub fn prediction(intent: &str, score: f64, entities: &[(&str, &str)]) -> Prediction {
    let json = serde_json::json!({
        "topIntent": intent,
        "intents": { intent: { "score": score } },
        "entities": entities
            .iter()
            .map(|(name, value)| ((*name).to_string(), vec![(*value).to_string()]))
            .collect::<HashMap<String, Vec<String>>>(),
    });
    serde_json::from_value(json).expect("valid prediction json")
}
