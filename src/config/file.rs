//! TOML configuration file loading
//!
//! Supports `~/.config/juno/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of
//! environment defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct JunoConfigFile {
    /// Active profile name
    #[serde(default)]
    pub profile: Option<String>,

    /// Region for hosted speech/NLU/translation resources
    #[serde(default)]
    pub region: Option<String>,

    /// Override for the profiles root directory
    #[serde(default)]
    pub profiles_dir: Option<PathBuf>,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub nlu_app_id: Option<String>,
    pub nlu_key: Option<String>,
    pub translator: Option<String>,
    pub weather: Option<String>,
    pub openai: Option<String>,
    pub search: Option<String>,
    pub speech: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `JunoConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file() -> JunoConfigFile {
    let Some(path) = config_file_path() else {
        return JunoConfigFile::default();
    };

    if !path.exists() {
        return JunoConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                JunoConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            JunoConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/juno/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("juno").join("config.toml"))
}
