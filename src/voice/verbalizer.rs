//! Speech verbalization
//!
//! Renders the dispatcher's response through the synthesis engine, applying
//! any pending voice, persona, or language change the handler signaled. This
//! is the only component with cross-call state (the one-shot reset and exit
//! flags, and the current voice binding) and the only place the session
//! deliberately waits: timer sleeps and pause-until-resume both go through
//! the [`Waiter`] trait so tests can simulate time and keypresses.

use std::time::Duration;

use async_trait::async_trait;

use crate::response::{Action, CommandResponse};
use crate::settings::SettingsStore;
use crate::voice::{AudioPlayback, SpeechSynthesizer};
use crate::{Result, EXIT_PHRASE};

/// Whether the session continues after a verbalized response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    /// Keep taking utterances
    Continue,
    /// The user asked to exit; the caller ends the process
    Exit,
}

/// Suspend points used by the verbalizer
#[async_trait]
pub trait Waiter: Send + Sync {
    /// Wait out a timer
    async fn sleep(&self, duration: Duration);

    /// Block until the user resumes a paused session
    async fn wait_for_resume(&self) -> Result<()>;
}

/// Real waits: tokio timer sleep, and a stdin read for resume
pub struct ConsoleWaiter;

#[async_trait]
impl Waiter for ConsoleWaiter {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn wait_for_resume(&self) -> Result<()> {
        let line = tokio::task::spawn_blocking(|| {
            println!("To resume, press enter.");
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await
        .map_err(|e| crate::Error::Audio(format!("resume wait failed: {e}")))??;
        drop(line);
        Ok(())
    }
}

/// Renders text responses as speech
#[async_trait]
pub trait Speaker: Send {
    /// Speak `text` with the named voice, returning once playback finishes
    async fn speak(&mut self, text: &str, voice: &str) -> Result<()>;
}

/// Synthesis-plus-playback speaker used outside tests
pub struct CloudSpeaker {
    synthesizer: SpeechSynthesizer,
    playback: AudioPlayback,
}

impl CloudSpeaker {
    /// Pair a synthesizer with the default output device
    #[must_use]
    pub fn new(synthesizer: SpeechSynthesizer, playback: AudioPlayback) -> Self {
        Self {
            synthesizer,
            playback,
        }
    }
}

#[async_trait]
impl Speaker for CloudSpeaker {
    async fn speak(&mut self, text: &str, voice: &str) -> Result<()> {
        if self.synthesizer.voice() != voice {
            self.synthesizer.set_voice(voice);
        }
        let audio = self.synthesizer.synthesize(text).await?;
        // Playback deliberately blocks the session until the utterance ends.
        self.playback.play_wav(&audio)
    }
}

/// Print-only speaker for sessions without a synthesis key or an audio
/// device; the verbalizer already prints every response
pub struct SilentSpeaker;

#[async_trait]
impl Speaker for SilentSpeaker {
    async fn speak(&mut self, _text: &str, _voice: &str) -> Result<()> {
        Ok(())
    }
}

/// Verbalizes command responses and tracks session-scoped voice state
pub struct SpeechVerbalizer {
    settings: SettingsStore,
    speaker: Box<dyn Speaker>,
    waiter: Box<dyn Waiter>,
    reset_language: bool,
    exit_status: bool,
}

impl SpeechVerbalizer {
    /// Verbalizer over one profile's settings
    #[must_use]
    pub fn new(settings: SettingsStore, speaker: Box<dyn Speaker>, waiter: Box<dyn Waiter>) -> Self {
        Self {
            settings,
            speaker,
            waiter,
            reset_language: false,
            exit_status: false,
        }
    }

    /// Render one response.
    ///
    /// Reloads settings, applies any action the handler embedded, speaks the
    /// resolved text (print-only while muted), and reports whether the
    /// session should end.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be read or written; synthesis
    /// failures degrade to print-only with a warning.
    pub async fn verbalize(&mut self, response: CommandResponse) -> Result<SessionControl> {
        self.settings.reload()?;
        let persona = self.settings.persona()?;
        let previous_language = self.settings.language()?;

        if self.settings.muted()? {
            println!("\n(muted) Response:");
            println!("{persona}: {}", response.text());
            return Ok(SessionControl::Continue);
        }

        let text = match response {
            CommandResponse::Plain(text) => text,
            CommandResponse::Action(action) => self.apply_action(action).await?,
        };

        println!("\nResponse:");
        println!("{persona}: {text}");
        self.speak(&text).await?;

        if self.settings.take_reset_language()? || self.reset_language {
            self.reset_language = false;
            self.settings.set_language(&previous_language)?;
            self.settings.rebind_voice()?;
            tracing::debug!(language = previous_language, "reverted one-shot language");
        }

        if self.exit_status || self.settings.exit_pending()? || text == EXIT_PHRASE {
            return Ok(SessionControl::Exit);
        }

        Ok(SessionControl::Continue)
    }

    /// Apply an action's side effects and resolve the text to speak
    async fn apply_action(&mut self, action: Action) -> Result<String> {
        match action {
            Action::Translation { text, original } => {
                if original == EXIT_PHRASE {
                    self.exit_status = true;
                }
                Ok(text)
            }
            Action::OneShotTranslation {
                text,
                original,
                new_language,
            } => {
                if original == EXIT_PHRASE {
                    self.exit_status = true;
                }
                self.reset_language = true;
                self.settings.set_language(&new_language)?;
                self.settings.rebind_voice()?;
                Ok(text)
            }
            Action::VoiceChanged { text } => Ok(text),
            Action::StartTimer {
                text,
                duration_secs,
            } => {
                self.speak_line(&text).await?;
                self.waiter.sleep(Duration::from_secs(duration_secs)).await;
                Ok("Time is up!".to_string())
            }
            Action::Pause { text } => {
                self.speak_line(&text).await?;
                self.waiter.wait_for_resume().await?;
                Ok("I am now resumed.".to_string())
            }
        }
    }

    async fn speak_line(&mut self, text: &str) -> Result<()> {
        let persona = self.settings.persona()?;
        println!("\nResponse:");
        println!("{persona}: {text}");
        self.speak(text).await
    }

    /// Speak with the currently bound voice; synthesis failure degrades to
    /// the printed response
    async fn speak(&mut self, text: &str) -> Result<()> {
        let voice = self.settings.voice_name()?;
        if let Err(e) = self.speaker.speak(text, &voice).await {
            tracing::warn!(kind = e.kind_name(), "speech synthesis failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{ProfileConfig, ProfileStore};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records spoken lines instead of synthesizing
    struct RecordingSpeaker {
        spoken: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl Speaker for RecordingSpeaker {
        async fn speak(&mut self, text: &str, voice: &str) -> Result<()> {
            self.spoken
                .lock()
                .unwrap()
                .push((text.to_string(), voice.to_string()));
            Ok(())
        }
    }

    /// Completes waits instantly and counts them
    struct InstantWaiter {
        sleeps: Arc<Mutex<Vec<Duration>>>,
        resumes: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl Waiter for InstantWaiter {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }

        async fn wait_for_resume(&self) -> Result<()> {
            *self.resumes.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct Harness {
        _dir: TempDir,
        settings: SettingsStore,
        verbalizer: SpeechVerbalizer,
        spoken: Arc<Mutex<Vec<(String, String)>>>,
        sleeps: Arc<Mutex<Vec<Duration>>>,
        resumes: Arc<Mutex<usize>>,
    }

    fn harness() -> Harness {
        let dir = TempDir::new().expect("tempdir");
        let store = ProfileStore::new(dir.path());
        store.create("pilot", &ProfileConfig::default()).unwrap();
        let settings = SettingsStore::open(store, "pilot").unwrap();

        let spoken = Arc::new(Mutex::new(Vec::new()));
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        let resumes = Arc::new(Mutex::new(0));

        let verbalizer = SpeechVerbalizer::new(
            settings.clone(),
            Box::new(RecordingSpeaker {
                spoken: Arc::clone(&spoken),
            }),
            Box::new(InstantWaiter {
                sleeps: Arc::clone(&sleeps),
                resumes: Arc::clone(&resumes),
            }),
        );

        Harness {
            _dir: dir,
            settings,
            verbalizer,
            spoken,
            sleeps,
            resumes,
        }
    }

    #[tokio::test]
    async fn plain_response_speaks_with_current_voice() {
        let mut h = harness();
        let control = h
            .verbalizer
            .verbalize(CommandResponse::plain("Hello there."))
            .await
            .unwrap();

        assert_eq!(control, SessionControl::Continue);
        let spoken = h.spoken.lock().unwrap();
        assert_eq!(spoken.as_slice(), &[("Hello there.".to_string(), "Ana".to_string())]);
    }

    #[tokio::test]
    async fn muted_prints_without_speaking() {
        let mut h = harness();
        h.settings.set_muted(true).unwrap();

        let control = h
            .verbalizer
            .verbalize(CommandResponse::plain("Hello there."))
            .await
            .unwrap();

        assert_eq!(control, SessionControl::Continue);
        assert!(h.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn exit_phrase_ends_session() {
        let mut h = harness();
        let control = h
            .verbalizer
            .verbalize(CommandResponse::plain(EXIT_PHRASE))
            .await
            .unwrap();
        assert_eq!(control, SessionControl::Exit);
    }

    #[tokio::test]
    async fn translated_exit_phrase_ends_session() {
        let mut h = harness();
        let control = h
            .verbalizer
            .verbalize(CommandResponse::Action(Action::Translation {
                text: "Au revoir!".to_string(),
                original: EXIT_PHRASE.to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(control, SessionControl::Exit);
    }

    #[tokio::test]
    async fn one_shot_translation_reverts_language_and_voice() {
        let mut h = harness();
        let control = h
            .verbalizer
            .verbalize(CommandResponse::Action(Action::OneShotTranslation {
                text: "Bonjour!".to_string(),
                original: "Hello!".to_string(),
                new_language: "french".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(control, SessionControl::Continue);
        // Spoken in the French voice, then reverted to English.
        let spoken = h.spoken.lock().unwrap();
        assert_eq!(spoken.as_slice(), &[("Bonjour!".to_string(), "Denise".to_string())]);
        assert_eq!(h.settings.language().unwrap(), "english");
        assert_eq!(h.settings.voice_name().unwrap(), "Ana");
    }

    #[tokio::test]
    async fn timer_sleeps_then_announces() {
        let mut h = harness();
        h.verbalizer
            .verbalize(CommandResponse::Action(Action::StartTimer {
                text: "Starting a timer for 30 seconds.".to_string(),
                duration_secs: 30,
            }))
            .await
            .unwrap();

        assert_eq!(h.sleeps.lock().unwrap().as_slice(), &[Duration::from_secs(30)]);
        let spoken = h.spoken.lock().unwrap();
        assert_eq!(spoken[0].0, "Starting a timer for 30 seconds.");
        assert_eq!(spoken[1].0, "Time is up!");
    }

    #[tokio::test]
    async fn pause_waits_for_resume() {
        let mut h = harness();
        h.verbalizer
            .verbalize(CommandResponse::Action(Action::Pause {
                text: "I am now paused.".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(*h.resumes.lock().unwrap(), 1);
        let spoken = h.spoken.lock().unwrap();
        assert_eq!(spoken[1].0, "I am now resumed.");
    }

    #[tokio::test]
    async fn persisted_exit_flag_ends_session() {
        let mut h = harness();
        h.settings.mark_exit().unwrap();
        let control = h
            .verbalizer
            .verbalize(CommandResponse::plain("anything"))
            .await
            .unwrap();
        assert_eq!(control, SessionControl::Exit);
    }
}
