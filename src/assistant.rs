//! Assistant orchestration
//!
//! Wires the classifier, dispatcher, and verbalizer over one profile:
//! utterance → prediction → handler response → conversation log + speech.
//! Profile creation and voice testing are direct calls on the assistant,
//! not a separate surface.

use crate::commands::{ChatClient, Translator, WeatherClient, WebSearcher};
use crate::config::Config;
use crate::dispatch::CommandDispatcher;
use crate::nlu::IntentClassifier;
use crate::profiles::{ProfileConfig, ProfileSettings, ProfileStore};
use crate::settings::SettingsStore;
use crate::voice::{
    AudioPlayback, CloudSpeaker, ConsoleWaiter, SessionControl, SilentSpeaker, Speaker,
    SpeechSynthesizer, SpeechVerbalizer, Waiter,
};
use crate::{voices, Error, Result};

/// A configured assistant session over one profile
pub struct Assistant {
    config: Config,
    store: ProfileStore,
    settings: SettingsStore,
    classifier: Option<IntentClassifier>,
    dispatcher: CommandDispatcher,
    verbalizer: SpeechVerbalizer,
}

impl Assistant {
    /// Build an assistant for the configured profile, creating the profile
    /// with defaults if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile store is unusable.
    pub fn new(config: Config) -> Result<Self> {
        let store = ProfileStore::new(&config.profiles_dir);
        if !store.exists(&config.profile) {
            store.create(&config.profile, &ProfileConfig::default())?;
        }
        let settings = SettingsStore::open(store.clone(), &config.profile)?;
        let history = store.history(&config.profile);

        let classifier = match (&config.api_keys.nlu_app_id, &config.api_keys.nlu_key) {
            (Some(app_id), Some(key)) => {
                Some(IntentClassifier::new(app_id.clone(), key.clone())?)
            }
            _ => None,
        };

        let chat = match &config.api_keys.openai {
            Some(key) => Some(ChatClient::new(key.clone())?),
            None => None,
        };
        let translator = match &config.api_keys.translator {
            Some(key) => Some(Translator::new(key.clone(), config.region.clone())?),
            None => None,
        };
        let weather = match &config.api_keys.weather {
            Some(key) => Some(WeatherClient::new(key.clone())?),
            None => None,
        };
        let searcher = WebSearcher::new(config.api_keys.search.clone());

        let dispatcher = CommandDispatcher::new(
            settings.clone(),
            history,
            chat,
            translator,
            weather,
            searcher,
        );

        let speaker = build_speaker(&config, &settings)?;
        let verbalizer =
            SpeechVerbalizer::new(settings.clone(), speaker, Box::new(ConsoleWaiter));

        Ok(Self {
            config,
            store,
            settings,
            classifier,
            dispatcher,
            verbalizer,
        })
    }

    /// Replace the verbalizer's waiter (tests)
    pub fn set_waiter(&mut self, waiter: Box<dyn Waiter>) {
        let speaker = build_speaker(&self.config, &self.settings)
            .unwrap_or_else(|_| Box::new(SilentSpeaker));
        self.verbalizer = SpeechVerbalizer::new(self.settings.clone(), speaker, waiter);
    }

    /// Process one utterance end to end: classify, dispatch, verbalize.
    ///
    /// Returns the spoken text and whether the session continues.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Classification`] if the NLU call fails (fatal for
    /// this turn only), or a profile error if settings cannot be accessed.
    pub async fn respond(&mut self, utterance: &str) -> Result<(String, SessionControl)> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| Error::Config("NLU credentials not configured".to_string()))?;

        let prediction = classifier.classify(utterance).await?;
        let response = self.dispatcher.dispatch(utterance, &prediction).await?;
        let text = response.text().to_string();
        let control = self.verbalizer.verbalize(response).await?;
        Ok((text, control))
    }

    /// Active profile name
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.config.profile
    }

    /// Create (or overwrite) a named profile
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be written.
    pub fn create_profile(
        &self,
        name: &str,
        config: &ProfileConfig,
    ) -> Result<ProfileSettings> {
        self.store.create(name, config)
    }

    /// Remove a named profile; nonexistent is a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be deleted.
    pub fn remove_profile(&self, name: &str) -> Result<()> {
        self.store.remove(name)
    }

    /// Load a profile's persisted settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be parsed.
    pub fn load_profile_data(&self, name: &str) -> Result<Option<ProfileSettings>> {
        self.store.load(name)
    }

    /// Existing profile names
    ///
    /// # Errors
    ///
    /// Returns an error if the profiles directory cannot be read.
    pub fn list_profiles(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    /// Voice names available in the catalog
    #[must_use]
    pub fn available_voices() -> Vec<&'static str> {
        voices::all_voice_names()
    }

    /// Speak a test sentence with a given voice, bypassing dispatch
    ///
    /// # Errors
    ///
    /// Returns an error if no synthesis key is configured or synthesis
    /// fails.
    pub async fn test_voice(&self, text: &str, voice: &str) -> Result<()> {
        let key = self
            .config
            .api_keys
            .speech
            .clone()
            .ok_or_else(|| Error::Config("synthesis key not configured".to_string()))?;
        let synthesizer =
            SpeechSynthesizer::new(key, self.config.region.clone(), voice.to_string())?;
        let mut speaker = CloudSpeaker::new(synthesizer, AudioPlayback::new()?);
        speaker.speak(text, voice).await
    }
}

/// Cloud speaker when a synthesis key and an output device are available,
/// print-only otherwise
fn build_speaker(config: &Config, settings: &SettingsStore) -> Result<Box<dyn Speaker>> {
    let Some(key) = config.api_keys.speech.clone() else {
        tracing::info!("no synthesis key configured; responses will be printed only");
        return Ok(Box::new(SilentSpeaker));
    };

    let synthesizer =
        SpeechSynthesizer::new(key, config.region.clone(), settings.voice_name()?)?;
    match AudioPlayback::new() {
        Ok(playback) => Ok(Box::new(CloudSpeaker::new(synthesizer, playback))),
        Err(e) => {
            tracing::warn!(error = %e, "audio output unavailable; responses will be printed only");
            Ok(Box::new(SilentSpeaker))
        }
    }
}
