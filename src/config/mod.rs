//! Configuration management for Juno gateway
//!
//! Precedence, lowest to highest: built-in defaults, the TOML config file,
//! environment variables. A missing API key disables the corresponding
//! handler at call time rather than failing startup.

pub mod file;

use std::path::PathBuf;

use crate::{Error, Result};

/// Default region for hosted speech/NLU/translation resources
const DEFAULT_REGION: &str = "eastus";

/// Juno gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Active profile name
    pub profile: String,

    /// Root directory holding profile directories
    pub profiles_dir: PathBuf,

    /// Region for hosted speech/NLU/translation resources
    pub region: String,

    /// API keys
    pub api_keys: ApiKeys,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// NLU application id
    pub nlu_app_id: Option<String>,

    /// NLU subscription key
    pub nlu_key: Option<String>,

    /// Translator subscription key
    pub translator: Option<String>,

    /// Weather API key
    pub weather: Option<String>,

    /// Completion/image API key
    pub openai: Option<String>,

    /// Web search API key
    pub search: Option<String>,

    /// Speech synthesis subscription key
    pub speech: Option<String>,
}

impl Config {
    /// Assemble configuration from the config file and environment.
    /// `profile` overrides both when given (the CLI flag).
    ///
    /// # Errors
    ///
    /// Returns an error if no platform config directory can be determined
    /// and no profiles directory was configured.
    pub fn load(profile: Option<&str>) -> Result<Self> {
        let file = file::load_config_file();

        let profiles_dir = match file.profiles_dir {
            Some(dir) => dir,
            None => default_profiles_dir()?,
        };

        let profile = profile
            .map(str::to_string)
            .or(file.profile)
            .unwrap_or_else(|| "juno".to_string());

        let region = env_var("JUNO_REGION")
            .or(file.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let api_keys = ApiKeys {
            nlu_app_id: env_var("JUNO_NLU_APP_ID").or(file.api_keys.nlu_app_id),
            nlu_key: env_var("JUNO_NLU_KEY").or(file.api_keys.nlu_key),
            translator: env_var("JUNO_TRANSLATOR_KEY").or(file.api_keys.translator),
            weather: env_var("JUNO_WEATHER_KEY").or(file.api_keys.weather),
            openai: env_var("OPENAI_API_KEY").or(file.api_keys.openai),
            search: env_var("JUNO_SEARCH_KEY").or(file.api_keys.search),
            speech: env_var("JUNO_SPEECH_KEY").or(file.api_keys.speech),
        };

        Ok(Self {
            profile,
            profiles_dir,
            region,
            api_keys,
        })
    }
}

/// Default profiles root: `~/.config/juno/profiles`
fn default_profiles_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.config_dir().join("juno").join("profiles"))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
