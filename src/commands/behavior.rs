//! Assistant behavior mutations
//!
//! Persona, gender, language, and voice switching plus mute/pause/timer
//! controls. Each operation is one settings mutation; changes that affect
//! the synthesis voice return a [`Action::VoiceChanged`] so the verbalizer
//! rebinds before speaking.

use rand::seq::SliceRandom;

use crate::response::{Action, CommandResponse};
use crate::settings::SettingsStore;
use crate::{voices, Result};

/// Mutates assistant behavior through the settings store
pub struct BotBehavior {
    settings: SettingsStore,
}

impl BotBehavior {
    /// Behavior handler over a profile's settings
    #[must_use]
    pub fn new(settings: SettingsStore) -> Self {
        Self { settings }
    }

    /// Rename the active persona
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn change_persona(&self, new_persona: &str) -> Result<CommandResponse> {
        self.settings.set_persona(new_persona)?;
        Ok(CommandResponse::plain(format!(
            "Persona successfully changed to {new_persona}."
        )))
    }

    /// Switch the voice gender
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn change_gender(&self, new_gender: &str) -> Result<CommandResponse> {
        let gender = new_gender.trim().to_lowercase();
        if gender != "male" && gender != "female" {
            return Ok(CommandResponse::plain(format!(
                "Sorry, {new_gender} is not a supported voice gender. Try male or female."
            )));
        }

        self.settings.set_gender(&gender)?;
        self.settings.rebind_voice()?;
        Ok(CommandResponse::Action(Action::VoiceChanged {
            text: format!("Ok, my voice is now {gender}."),
        }))
    }

    /// Switch the spoken language
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn change_language(&self, new_language: &str) -> Result<CommandResponse> {
        let language = new_language.trim().trim_end_matches('?').to_lowercase();
        if !voices::supported(&language) {
            return Ok(CommandResponse::plain(format!(
                "Sorry, {new_language} is not currently supported. Try asking again."
            )));
        }

        self.settings.set_language(&language)?;
        self.settings.rebind_voice()?;
        Ok(CommandResponse::Action(Action::VoiceChanged {
            text: format!("Ok, I am now speaking {language}."),
        }))
    }

    /// Switch to a named synthesis voice
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn change_voice(&self, new_voice: &str) -> Result<CommandResponse> {
        let Some(voice) = voices::all_voice_names()
            .into_iter()
            .find(|v| v.eq_ignore_ascii_case(new_voice.trim()))
        else {
            return Ok(CommandResponse::plain(format!(
                "Sorry, I don't have a voice named {new_voice}. Try asking again."
            )));
        };

        self.settings.set_voice(voice)?;
        Ok(CommandResponse::Action(Action::VoiceChanged {
            text: format!("Ok, I am now using the voice {voice}."),
        }))
    }

    /// Switch to a random voice from the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn randomize_voice(&self) -> Result<CommandResponse> {
        let names = voices::all_voice_names();
        let voice = names
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Ana");

        self.settings.set_voice(voice)?;
        Ok(CommandResponse::Action(Action::VoiceChanged {
            text: format!("Ok, I am now using the voice {voice}."),
        }))
    }

    /// Mute spoken responses
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn mute(&self) -> Result<CommandResponse> {
        if self.settings.muted()? {
            return Ok(CommandResponse::plain("I am already muted."));
        }
        self.settings.set_muted(true)?;
        Ok(CommandResponse::plain("I am now muted."))
    }

    /// Resume spoken responses
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be persisted.
    pub fn unmute(&self) -> Result<CommandResponse> {
        if !self.settings.muted()? {
            return Ok(CommandResponse::plain("I am already unmuted."));
        }
        self.settings.set_muted(false)?;
        Ok(CommandResponse::plain("I am now unmuted."))
    }

    /// Pause until the user resumes
    #[must_use]
    pub fn pause(&self) -> CommandResponse {
        CommandResponse::Action(Action::Pause {
            text: "I am now paused.".to_string(),
        })
    }

    /// Start a timer from the spoken duration slot
    #[must_use]
    pub fn start_timer(&self, user_time: &str) -> CommandResponse {
        let digits: String = user_time.chars().filter(char::is_ascii_digit).collect();
        match digits.parse::<u64>() {
            Ok(duration_secs) if duration_secs > 0 => {
                CommandResponse::Action(Action::StartTimer {
                    text: format!("Starting a timer for {duration_secs} seconds."),
                    duration_secs,
                })
            }
            _ => CommandResponse::plain(
                "Sorry, I didn't catch the timer duration. Try asking again.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{ProfileConfig, ProfileStore};
    use tempfile::TempDir;

    fn behavior() -> (TempDir, SettingsStore, BotBehavior) {
        let dir = TempDir::new().expect("tempdir");
        let store = ProfileStore::new(dir.path());
        store.create("pilot", &ProfileConfig::default()).unwrap();
        let settings = SettingsStore::open(store, "pilot").unwrap();
        let handler = BotBehavior::new(settings.clone());
        (dir, settings, handler)
    }

    #[test]
    fn change_gender_rebinds_voice() {
        let (_dir, settings, handler) = behavior();
        let response = handler.change_gender("Male").unwrap();
        assert!(matches!(
            response,
            CommandResponse::Action(Action::VoiceChanged { .. })
        ));
        assert_eq!(settings.gender().unwrap(), "male");
        assert_eq!(settings.voice_name().unwrap(), "Matthew");
    }

    #[test]
    fn change_gender_rejects_unknown() {
        let (_dir, settings, handler) = behavior();
        let response = handler.change_gender("robot").unwrap();
        assert!(matches!(response, CommandResponse::Plain(_)));
        assert_eq!(settings.gender().unwrap(), "female");
    }

    #[test]
    fn change_language_rejects_unsupported() {
        let (_dir, settings, handler) = behavior();
        let response = handler.change_language("klingon").unwrap();
        assert_eq!(
            response.text(),
            "Sorry, klingon is not currently supported. Try asking again."
        );
        assert_eq!(settings.language().unwrap(), "english");
    }

    #[test]
    fn change_language_updates_voice() {
        let (_dir, settings, handler) = behavior();
        handler.change_language("French").unwrap();
        assert_eq!(settings.language().unwrap(), "french");
        assert_eq!(settings.voice_name().unwrap(), "Denise");
    }

    #[test]
    fn mute_toggles_are_idempotent() {
        let (_dir, settings, handler) = behavior();
        assert_eq!(handler.mute().unwrap().text(), "I am now muted.");
        assert_eq!(handler.mute().unwrap().text(), "I am already muted.");
        assert!(settings.muted().unwrap());
        assert_eq!(handler.unmute().unwrap().text(), "I am now unmuted.");
        assert!(!settings.muted().unwrap());
    }

    #[test]
    fn timer_parses_spoken_duration() {
        let (_dir, _settings, handler) = behavior();
        let response = handler.start_timer("30 seconds");
        assert_eq!(
            response,
            CommandResponse::Action(Action::StartTimer {
                text: "Starting a timer for 30 seconds.".to_string(),
                duration_secs: 30,
            })
        );
    }

    #[test]
    fn timer_rejects_missing_duration() {
        let (_dir, _settings, handler) = behavior();
        assert!(matches!(
            handler.start_timer("a while"),
            CommandResponse::Plain(_)
        ));
    }
}
