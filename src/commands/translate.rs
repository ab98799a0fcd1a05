//! Speech translation
//!
//! Translates a handler response or user phrase into a target language via
//! the hosted translator endpoint. Language names are resolved against the
//! static catalog in [`voices`]; an unresolved name short-circuits with a
//! user-facing message and no network call.

use serde::{Deserialize, Serialize};

use crate::response::{Action, CommandResponse};
use crate::settings::SettingsStore;
use crate::{voices, Error, Result, EXIT_PHRASE};

/// Default translator endpoint
const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

#[derive(Serialize)]
struct TranslateBody<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TranslateResult {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

/// Translates text between catalog languages
pub struct Translator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    region: String,
}

impl Translator {
    /// Create a translator client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(api_key: String, region: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("translator API key required".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            region,
        })
    }

    /// Override the endpoint base URL (tests, sovereign clouds)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Translate `speech` from the spoken `current_language` into
    /// `new_language`.
    ///
    /// Marks the persisted exit flag when asked to translate the exit
    /// phrase, and the one-shot reset flag when `one_shot` is set, so the
    /// verbalizer can act on them after speaking.
    ///
    /// # Errors
    ///
    /// Returns an error only if a settings flag cannot be persisted; call
    /// failures are swallowed into an apology string.
    pub async fn translate(
        &self,
        speech: &str,
        current_language: &str,
        new_language: &str,
        one_shot: bool,
        settings: &SettingsStore,
    ) -> Result<CommandResponse> {
        if speech == EXIT_PHRASE {
            settings.mark_exit()?;
        }
        if one_shot {
            settings.mark_reset_language()?;
        }

        let (current_language, new_language) =
            clean_languages(current_language.to_string(), new_language.to_string());

        let Some(from_code) = voices::language_code(&current_language) else {
            return Ok(CommandResponse::plain(unsupported(&current_language)));
        };
        let Some(to_code) = voices::language_code(&new_language) else {
            return Ok(CommandResponse::plain(unsupported(&new_language)));
        };

        match self.request(from_code, to_code, speech).await {
            Ok(text) => Ok(CommandResponse::Action(if one_shot {
                Action::OneShotTranslation {
                    text,
                    original: speech.to_string(),
                    new_language,
                }
            } else {
                Action::Translation {
                    text,
                    original: speech.to_string(),
                }
            })),
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), "translation request failed");
                Ok(CommandResponse::plain(format!(
                    "Sorry, there was an error while trying to translate: {speech}. Try asking again."
                )))
            }
        }
    }

    /// One translation request; every failure mode surfaces as an error
    /// the caller can inspect
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response missing the translated text.
    pub async fn request(&self, from_code: &str, to_code: &str, text: &str) -> Result<String> {
        let url = format!("{}/translate", self.endpoint);

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", "3.0"), ("from", from_code), ("to", to_code)])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .header("X-ClientTraceId", uuid::Uuid::new_v4().to_string())
            .json(&[TranslateBody { text }])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                service: "translator",
                message: format!("status {status}: {body}"),
            });
        }

        let results: Vec<TranslateResult> = response.json().await?;
        results
            .first()
            .and_then(|r| r.translations.first())
            .map(|t| t.text.clone())
            .ok_or(Error::Api {
                service: "translator",
                message: "response contained no translation".to_string(),
            })
    }
}

/// Strip a single trailing question mark from the spoken language names.
/// Only one of the two is stripped per call, current language first; this
/// mirrors long-standing dictation behavior and is preserved as-is.
fn clean_languages(mut current: String, mut new: String) -> (String, String) {
    if current.ends_with('?') {
        current.pop();
    } else if new.ends_with('?') {
        new.pop();
    }
    (current, new)
}

fn unsupported(name: &str) -> String {
    format!("Sorry, {name} is not currently supported. Try asking again.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_question_mark_from_current_first() {
        let (current, new) = clean_languages("French?".to_string(), "German?".to_string());
        assert_eq!(current, "French");
        // Only one name is cleaned per call.
        assert_eq!(new, "German?");
    }

    #[test]
    fn strips_new_language_when_current_is_clean() {
        let (current, new) = clean_languages("French".to_string(), "German?".to_string());
        assert_eq!(current, "French");
        assert_eq!(new, "German");
    }

    #[test]
    fn clean_names_pass_through() {
        let (current, new) = clean_languages("French".to_string(), "German".to_string());
        assert_eq!(current, "French");
        assert_eq!(new, "German");
    }

    #[test]
    fn empty_api_key_rejected() {
        assert!(Translator::new(String::new(), "eastus".to_string()).is_err());
    }
}
