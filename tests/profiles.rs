//! Profile lifecycle integration tests

use juno_gateway::profiles::{ProfileConfig, ProfileStore};
use juno_gateway::settings::SettingsStore;
use tempfile::TempDir;

mod common;

#[test]
fn role_profile_keeps_documented_defaults() {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path());

    let config = ProfileConfig {
        name: Some("Dr. Chronos".to_string()),
        role: Some("time_traveler".to_string()),
        prompt: Some("you are a time traveler from the year 3000".to_string()),
        ..ProfileConfig::default()
    };
    store.create("time_traveler", &config).unwrap();

    let settings = store.load("time_traveler").unwrap().unwrap();
    assert_eq!(settings.user.name, "Dr. Chronos");
    assert_eq!(settings.interaction.role.as_deref(), Some("time_traveler"));
    // Unspecified fields come from defaults.
    assert_eq!(settings.user.gender, "female");
    assert_eq!(settings.system.voice_name, "Ana");
    assert_eq!(settings.interaction.language, "english");
    assert_eq!(settings.interaction.personality, "friendly");
}

#[test]
fn settings_mutations_survive_a_fresh_handle() {
    let (_dir, store, settings, _history) = common::setup_profile();

    settings.set_language("French").unwrap();
    settings.rebind_voice().unwrap();
    settings.set_muted(true).unwrap();

    // A brand-new store over the same directory sees everything.
    let reopened = SettingsStore::open(store, "pilot").unwrap();
    assert_eq!(reopened.language().unwrap(), "french");
    assert_eq!(reopened.voice_name().unwrap(), "Denise");
    assert!(reopened.muted().unwrap());
}

#[test]
fn opening_a_missing_profile_fails() {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path());
    assert!(SettingsStore::open(store, "ghost").is_err());
}

#[test]
fn each_profile_has_isolated_history() {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path());
    store.create("one", &ProfileConfig::default()).unwrap();
    store.create("two", &ProfileConfig::default()).unwrap();

    store.history("one").append("hi", "hello", "Juno").unwrap();

    assert_eq!(store.history("one").load().unwrap().len(), 1);
    assert!(store.history("two").load().unwrap().is_empty());
}
