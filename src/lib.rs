//! Juno Gateway - Voice assistant orchestration
//!
//! This library provides the core pipeline for the Juno assistant:
//! - Intent classification against a hosted NLU model
//! - Command dispatch to thin cloud-API handlers
//! - Speech verbalization with persona/voice switching
//! - Flat per-assistant profiles persisted as YAML on disk
//!
//! # Architecture
//!
//! ```text
//! utterance
//!    │
//! ┌──▼──────────────────┐
//! │  Intent Classifier  │  hosted NLU prediction endpoint
//! └──┬──────────────────┘
//!    │ (intent, entities, score)
//! ┌──▼──────────────────┐
//! │  Command Dispatcher │  threshold 0.70, fixed intent table,
//! └──┬──────────────────┘  conversational fallback below threshold
//!    │ response (plain text or tagged action)
//! ┌──▼──────────────────┐
//! │  Speech Verbalizer  │  synthesis + playback, voice rebinding,
//! └─────────────────────┘  timers/pauses, exit handling
//! ```

pub mod assistant;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod nlu;
pub mod profiles;
pub mod response;
pub mod settings;
pub mod voice;
pub mod voices;

/// Spoken phrase that ends the session, checked before and after
/// translation
pub const EXIT_PHRASE: &str = "Exiting. Goodbye!";

pub use assistant::Assistant;
pub use config::Config;
pub use dispatch::CommandDispatcher;
pub use error::{Error, Result};
pub use nlu::{IntentClassifier, Prediction};
pub use profiles::{ProfileConfig, ProfileSettings, ProfileStore};
pub use response::{Action, CommandResponse};
pub use settings::SettingsStore;
pub use voice::{SessionControl, SpeechVerbalizer};
