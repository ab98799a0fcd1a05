//! Profile storage
//!
//! A profile is a named assistant configuration bundle persisted as three
//! YAML files in a per-profile directory:
//!
//! ```text
//! <profiles_root>/<name>/
//!   settings.yaml              # user/system/interaction blocks
//!   conversation_history.yaml  # {conversation: [...]}
//!   logs.yaml                  # {log_sessions: [...]}
//! ```
//!
//! A missing `settings.yaml` means the profile does not exist.

pub mod history;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use history::{HistoryStore, Turn};

/// Settings file name inside a profile directory
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Conversation history file name inside a profile directory
pub const HISTORY_FILE: &str = "conversation_history.yaml";

/// Log sessions file name inside a profile directory
pub const LOGS_FILE: &str = "logs.yaml";

/// Persisted settings for one profile
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProfileSettings {
    /// Assistant identity
    pub user: UserSettings,

    /// Engine and startup configuration
    pub system: SystemSettings,

    /// Conversation behavior configuration
    pub interaction: InteractionSettings,

    /// Runtime state. Absent on creation; written once a session mutates it.
    #[serde(default, skip_serializing_if = "RuntimeState::is_default")]
    pub state: RuntimeState,
}

/// Assistant identity block
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserSettings {
    /// Display name spoken in responses
    pub name: String,

    /// Voice gender, "female" or "male"
    pub gender: String,
}

/// Engine configuration block
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SystemSettings {
    /// Play a sound on startup
    pub startup_sound: bool,

    /// Synthesis engine identifier
    pub voice_engine: String,

    /// Synthesis voice name
    pub voice_name: String,
}

/// Conversation behavior block
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InteractionSettings {
    /// Optional role label (e.g. "time_traveler")
    pub role: Option<String>,

    /// System prompt seeded into conversational fallbacks
    pub prompt: String,

    /// Personality descriptor folded into the prompt
    pub personality: String,

    /// Current spoken language
    pub language: String,
}

/// Session-mutable state persisted alongside the static blocks
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RuntimeState {
    /// Responses are printed but not synthesized while muted
    #[serde(default)]
    pub muted: bool,

    /// Voice override applied by persona/gender/language changes
    #[serde(default)]
    pub current_voice_name: Option<String>,

    /// Set when a handler observed the exit phrase; the verbalizer ends
    /// the session after the next utterance
    #[serde(default)]
    pub exit: bool,

    /// Set by one-shot translations; the verbalizer reverts language and
    /// voice after a single utterance
    #[serde(default)]
    pub reset_language: bool,
}

impl RuntimeState {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Caller overrides applied on top of defaults at profile creation.
/// Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileConfig {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub startup_sound: Option<bool>,
    pub voice_engine: Option<String>,
    pub voice_name: Option<String>,
    pub role: Option<String>,
    pub prompt: Option<String>,
    pub personality: Option<String>,
    pub language: Option<String>,
}

impl ProfileSettings {
    /// Documented defaults merged with caller overrides
    #[must_use]
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self {
            user: UserSettings {
                name: config.name.clone().unwrap_or_else(|| "Juno".to_string()),
                gender: config.gender.clone().unwrap_or_else(|| "female".to_string()),
            },
            system: SystemSettings {
                startup_sound: config.startup_sound.unwrap_or(false),
                voice_engine: config
                    .voice_engine
                    .clone()
                    .unwrap_or_else(|| "azure".to_string()),
                voice_name: config.voice_name.clone().unwrap_or_else(|| "Ana".to_string()),
            },
            interaction: InteractionSettings {
                role: config.role.clone(),
                prompt: config
                    .prompt
                    .clone()
                    .unwrap_or_else(|| "you are a virtual assistant".to_string()),
                personality: config
                    .personality
                    .clone()
                    .unwrap_or_else(|| "friendly".to_string()),
                language: config
                    .language
                    .clone()
                    .unwrap_or_else(|| "english".to_string()),
            },
            state: RuntimeState::default(),
        }
    }
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self::from_config(&ProfileConfig::default())
    }
}

/// Reads and writes profile directories under a single root
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first profile creation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory holding all profile directories
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a named profile
    #[must_use]
    pub fn profile_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether a profile exists (its settings file is present)
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.profile_dir(name).join(SETTINGS_FILE).is_file()
    }

    /// Create a profile directory with settings merged from defaults and
    /// `config`, plus empty history and log files.
    ///
    /// An existing profile with the same name is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be written.
    pub fn create(&self, name: &str, config: &ProfileConfig) -> Result<ProfileSettings> {
        let dir = self.profile_dir(name);
        fs::create_dir_all(&dir)?;

        let settings = ProfileSettings::from_config(config);
        write_yaml(&dir.join(SETTINGS_FILE), &settings)?;
        write_yaml(&dir.join(HISTORY_FILE), &history::HistoryFile::default())?;
        write_yaml(&dir.join(LOGS_FILE), &history::LogsFile::default())?;

        tracing::info!(profile = name, dir = %dir.display(), "created profile");
        Ok(settings)
    }

    /// Remove a profile by deleting its directory.
    /// Removing a nonexistent profile is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be deleted.
    pub fn remove(&self, name: &str) -> Result<()> {
        let dir = self.profile_dir(name);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::info!(profile = name, "removed profile");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a profile's settings. `None` if the settings file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self, name: &str) -> Result<Option<ProfileSettings>> {
        let path = self.profile_dir(name).join(SETTINGS_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(serde_yaml::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a profile's settings back in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not exist or cannot be written.
    pub fn save(&self, name: &str, settings: &ProfileSettings) -> Result<()> {
        let dir = self.profile_dir(name);
        if !dir.is_dir() {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        write_yaml(&dir.join(SETTINGS_FILE), settings)
    }

    /// List existing profile names, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if entry.path().join(SETTINGS_FILE).is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// History store for a named profile
    #[must_use]
    pub fn history(&self, name: &str) -> HistoryStore {
        HistoryStore::new(self.profile_dir(name))
    }
}

pub(crate) fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_yaml::to_string(value)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = ProfileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn create_writes_three_files() {
        let (_dir, store) = store();
        store.create("pilot", &ProfileConfig::default()).unwrap();

        let dir = store.profile_dir("pilot");
        assert!(dir.join(SETTINGS_FILE).is_file());
        assert!(dir.join(HISTORY_FILE).is_file());
        assert!(dir.join(LOGS_FILE).is_file());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let (_dir, store) = store();
        let config = ProfileConfig {
            name: Some("Dr. Chronos".to_string()),
            gender: Some("male".to_string()),
            ..ProfileConfig::default()
        };
        store.create("time_traveler", &config).unwrap();

        let settings = store.load("time_traveler").unwrap().unwrap();
        assert_eq!(settings.user.name, "Dr. Chronos");
        assert_eq!(settings.user.gender, "male");
        assert_eq!(settings.system.voice_engine, "azure");
        assert_eq!(settings.system.voice_name, "Ana");
        assert!(!settings.system.startup_sound);
        assert_eq!(settings.interaction.personality, "friendly");
        assert_eq!(settings.interaction.prompt, "you are a virtual assistant");
        assert_eq!(settings.interaction.language, "english");
        assert_eq!(settings.interaction.role, None);
    }

    #[test]
    fn missing_settings_file_means_absent_profile() {
        let (_dir, store) = store();
        assert!(store.load("ghost").unwrap().is_none());
        assert!(!store.exists("ghost"));
    }

    #[test]
    fn remove_nonexistent_is_noop() {
        let (_dir, store) = store();
        store.remove("ghost").unwrap();
    }

    #[test]
    fn remove_deletes_directory() {
        let (_dir, store) = store();
        store.create("pilot", &ProfileConfig::default()).unwrap();
        assert!(store.exists("pilot"));

        store.remove("pilot").unwrap();
        assert!(!store.exists("pilot"));
        assert!(store.load("pilot").unwrap().is_none());
    }

    #[test]
    fn list_returns_sorted_profiles() {
        let (_dir, store) = store();
        store.create("zeta", &ProfileConfig::default()).unwrap();
        store.create("alpha", &ProfileConfig::default()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn runtime_state_absent_on_creation() {
        let (_dir, store) = store();
        store.create("pilot", &ProfileConfig::default()).unwrap();

        let raw = std::fs::read_to_string(store.profile_dir("pilot").join(SETTINGS_FILE)).unwrap();
        assert!(!raw.contains("state"));
    }

    #[test]
    fn save_roundtrips_mutations() {
        let (_dir, store) = store();
        store.create("pilot", &ProfileConfig::default()).unwrap();

        let mut settings = store.load("pilot").unwrap().unwrap();
        settings.interaction.language = "french".to_string();
        settings.state.muted = true;
        store.save("pilot", &settings).unwrap();

        let reloaded = store.load("pilot").unwrap().unwrap();
        assert_eq!(reloaded.interaction.language, "french");
        assert!(reloaded.state.muted);
    }
}
