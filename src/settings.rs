//! Settings orchestration
//!
//! [`SettingsStore`] is an in-memory view over one profile's persisted
//! settings. Every component reads current mute/gender/language/voice state
//! through it, and handler mutations write through to `settings.yaml`
//! immediately. The handle is cheap to clone; all clones share state so the
//! dispatcher's handlers and the verbalizer observe each other's writes.

use std::sync::{Arc, Mutex};

use crate::profiles::{ProfileSettings, ProfileStore};
use crate::{voices, Error, Result};

struct Inner {
    store: ProfileStore,
    profile: String,
    settings: ProfileSettings,
}

/// Shared read/write view over one profile's settings
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<Mutex<Inner>>,
}

impl SettingsStore {
    /// Open the settings of an existing profile
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProfileNotFound`] if the profile does not exist.
    pub fn open(store: ProfileStore, profile: &str) -> Result<Self> {
        let settings = store
            .load(profile)?
            .ok_or_else(|| Error::ProfileNotFound(profile.to_string()))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                store,
                profile: profile.to_string(),
                settings,
            })),
        })
    }

    /// Re-read settings from disk, discarding the in-memory view
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is missing or unreadable.
    pub fn reload(&self) -> Result<()> {
        let mut inner = self.lock()?;
        inner.settings = inner
            .store
            .load(&inner.profile)?
            .ok_or_else(|| Error::ProfileNotFound(inner.profile.clone()))?;
        Ok(())
    }

    /// Name of the profile this store is scoped to
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn profile(&self) -> Result<String> {
        Ok(self.lock()?.profile.clone())
    }

    /// Full snapshot of the current settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn snapshot(&self) -> Result<ProfileSettings> {
        Ok(self.lock()?.settings.clone())
    }

    /// Active persona name
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn persona(&self) -> Result<String> {
        Ok(self.lock()?.settings.user.name.clone())
    }

    /// Current voice gender
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn gender(&self) -> Result<String> {
        Ok(self.lock()?.settings.user.gender.clone())
    }

    /// Current spoken language
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn language(&self) -> Result<String> {
        Ok(self.lock()?.settings.interaction.language.clone())
    }

    /// System prompt for conversational fallbacks
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn prompt(&self) -> Result<String> {
        let inner = self.lock()?;
        Ok(format!(
            "{}. Your personality is {}.",
            inner.settings.interaction.prompt, inner.settings.interaction.personality
        ))
    }

    /// Whether responses are muted
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn muted(&self) -> Result<bool> {
        Ok(self.lock()?.settings.state.muted)
    }

    /// Active synthesis voice: the session override when set, else the
    /// profile's configured voice
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn voice_name(&self) -> Result<String> {
        let inner = self.lock()?;
        Ok(inner
            .settings
            .state
            .current_voice_name
            .clone()
            .unwrap_or_else(|| inner.settings.system.voice_name.clone()))
    }

    /// Change the persona name
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn set_persona(&self, name: &str) -> Result<()> {
        self.mutate(|s| s.user.name = name.to_string())
    }

    /// Change the voice gender
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn set_gender(&self, gender: &str) -> Result<()> {
        self.mutate(|s| s.user.gender = gender.to_lowercase())
    }

    /// Change the spoken language
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn set_language(&self, language: &str) -> Result<()> {
        self.mutate(|s| s.interaction.language = language.to_lowercase())
    }

    /// Override the session's synthesis voice
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn set_voice(&self, voice_name: &str) -> Result<()> {
        self.mutate(|s| s.state.current_voice_name = Some(voice_name.to_string()))
    }

    /// Re-resolve the session voice from the current gender and language
    /// and persist it. Unknown combinations leave the voice unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn rebind_voice(&self) -> Result<()> {
        let (gender, language) = {
            let inner = self.lock()?;
            (
                inner.settings.user.gender.clone(),
                inner.settings.interaction.language.clone(),
            )
        };
        if let Some(voice) = voices::voice_name(&gender, &language) {
            self.set_voice(voice)?;
        }
        Ok(())
    }

    /// Mute or unmute responses
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn set_muted(&self, muted: bool) -> Result<()> {
        self.mutate(|s| s.state.muted = muted)
    }

    /// Mark that the session should end after the next utterance
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn mark_exit(&self) -> Result<()> {
        self.mutate(|s| s.state.exit = true)
    }

    /// Whether a handler requested session exit
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lock is poisoned.
    pub fn exit_pending(&self) -> Result<bool> {
        Ok(self.lock()?.settings.state.exit)
    }

    /// Mark that the language should revert after one utterance
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn mark_reset_language(&self) -> Result<()> {
        self.mutate(|s| s.state.reset_language = true)
    }

    /// Read and clear the one-shot reset flag
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn take_reset_language(&self) -> Result<bool> {
        let pending = self.lock()?.settings.state.reset_language;
        if pending {
            self.mutate(|s| s.state.reset_language = false)?;
        }
        Ok(pending)
    }

    fn mutate(&self, f: impl FnOnce(&mut ProfileSettings)) -> Result<()> {
        let mut inner = self.lock()?;
        f(&mut inner.settings);
        let Inner {
            store,
            profile,
            settings,
        } = &*inner;
        store.save(profile, settings)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Profile("settings lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ProfileConfig;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SettingsStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = ProfileStore::new(dir.path());
        store.create("pilot", &ProfileConfig::default()).unwrap();
        let settings = SettingsStore::open(store, "pilot").unwrap();
        (dir, settings)
    }

    #[test]
    fn open_missing_profile_fails() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        assert!(matches!(
            SettingsStore::open(store, "ghost"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn mutations_write_through_to_disk() {
        let (dir, settings) = open_store();
        settings.set_language("french").unwrap();
        settings.set_muted(true).unwrap();

        let store = ProfileStore::new(dir.path());
        let on_disk = store.load("pilot").unwrap().unwrap();
        assert_eq!(on_disk.interaction.language, "french");
        assert!(on_disk.state.muted);
    }

    #[test]
    fn clones_share_state() {
        let (_dir, settings) = open_store();
        let other = settings.clone();
        other.set_persona("Zog").unwrap();
        assert_eq!(settings.persona().unwrap(), "Zog");
    }

    #[test]
    fn voice_override_takes_precedence() {
        let (_dir, settings) = open_store();
        assert_eq!(settings.voice_name().unwrap(), "Ana");
        settings.set_voice("Denise").unwrap();
        assert_eq!(settings.voice_name().unwrap(), "Denise");
    }

    #[test]
    fn rebind_voice_follows_gender_and_language() {
        let (_dir, settings) = open_store();
        settings.set_gender("male").unwrap();
        settings.set_language("french").unwrap();
        settings.rebind_voice().unwrap();
        assert_eq!(settings.voice_name().unwrap(), "Henri");
    }

    #[test]
    fn take_reset_language_clears_flag() {
        let (_dir, settings) = open_store();
        assert!(!settings.take_reset_language().unwrap());
        settings.mark_reset_language().unwrap();
        assert!(settings.take_reset_language().unwrap());
        assert!(!settings.take_reset_language().unwrap());
    }

    #[test]
    fn reload_discards_memory_view() {
        let (dir, settings) = open_store();
        let store = ProfileStore::new(dir.path());
        let mut on_disk = store.load("pilot").unwrap().unwrap();
        on_disk.interaction.language = "german".to_string();
        store.save("pilot", &on_disk).unwrap();

        assert_eq!(settings.language().unwrap(), "english");
        settings.reload().unwrap();
        assert_eq!(settings.language().unwrap(), "german");
    }
}
