//! Voice output module
//!
//! Speech synthesis is routed through the hosted synthesis endpoint;
//! playback goes to the default output device. The verbalizer ties both to
//! the session's settings and handles action side effects.

mod playback;
mod synthesis;
mod verbalizer;

pub use playback::AudioPlayback;
pub use synthesis::SpeechSynthesizer;
pub use verbalizer::{
    CloudSpeaker, ConsoleWaiter, SessionControl, SilentSpeaker, Speaker, SpeechVerbalizer, Waiter,
};
