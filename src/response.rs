//! Structured command responses
//!
//! A handler either returns plain text to speak, or a tagged action that the
//! verbalizer pattern-matches on to apply side effects (voice rebinding,
//! one-shot language switches, timers, pauses) before speaking.

/// Response produced by the dispatcher, consumed once by the verbalizer
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    /// Direct utterance to speak
    Plain(String),

    /// Utterance with an attached action the verbalizer must apply
    Action(Action),
}

/// Handler-specific behavior embedded in a response
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Speech was translated into the currently configured language
    Translation {
        /// Translated text to speak
        text: String,
        /// Text prior to translation, checked against the exit phrase
        original: String,
    },

    /// Single-utterance language override that reverts after one response
    OneShotTranslation {
        /// Translated text to speak
        text: String,
        /// Text prior to translation, checked against the exit phrase
        original: String,
        /// Language to speak this one response in
        new_language: String,
    },

    /// Persona/gender/language/voice was mutated; the synthesis voice
    /// must be rebound before speaking
    VoiceChanged {
        /// Confirmation text to speak
        text: String,
    },

    /// Announce the timer, sleep for the duration, then say "Time is up!"
    StartTimer {
        /// Announcement text to speak before the wait
        text: String,
        /// Timer duration in seconds
        duration_secs: u64,
    },

    /// Announce the pause, then block until the user resumes
    Pause {
        /// Announcement text to speak before the wait
        text: String,
    },
}

impl CommandResponse {
    /// Convenience constructor for plain text
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// The text the verbalizer will speak for this response, before any
    /// action side effects run
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Action(action) => match action {
                Action::Translation { text, .. }
                | Action::OneShotTranslation { text, .. }
                | Action::VoiceChanged { text }
                | Action::StartTimer { text, .. }
                | Action::Pause { text } => text,
            },
        }
    }
}

impl From<String> for CommandResponse {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

impl From<&str> for CommandResponse {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}
