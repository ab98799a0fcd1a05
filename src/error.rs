//! Error types for Juno gateway

use thiserror::Error;

/// Result type alias for Juno operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Juno gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// NLU classification request failed with a non-success HTTP status.
    /// Fatal for the current turn; never retried.
    #[error("classification request failed with status {status}")]
    Classification {
        /// HTTP status code returned by the prediction endpoint
        status: u16,
    },

    /// External service call failure (translator, weather, search, chat).
    /// Handlers collapse this to a user-facing apology string.
    #[error("{service} error: {message}")]
    Api {
        /// Service that failed (e.g. "translator", "weather")
        service: &'static str,
        /// Failure detail
        message: String,
    },

    /// Profile storage error
    #[error("profile error: {0}")]
    Profile(String),

    /// Profile not found
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// Speech synthesis error
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Audio playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Short kind name, used when a handler logs a swallowed external-call
    /// failure without propagating it
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::Classification { .. } => "Classification",
            Self::Api { .. } => "Api",
            Self::Profile(_) => "Profile",
            Self::ProfileNotFound(_) => "ProfileNotFound",
            Self::Synthesis(_) => "Synthesis",
            Self::Audio(_) => "Audio",
            Self::Io(_) => "Io",
            Self::Http(_) => "Http",
            Self::Serialization(_) => "Serialization",
            Self::Yaml(_) => "Yaml",
            Self::Toml(_) => "Toml",
        }
    }
}
