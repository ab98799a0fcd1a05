//! Intent classification
//!
//! Sends the raw utterance to a hosted NLU prediction endpoint and returns
//! the ranked intents with per-intent confidence scores and extracted entity
//! values. A non-success HTTP status is fatal for the current turn and is
//! never retried.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{Error, Result};

/// Default prediction endpoint base URL
const DEFAULT_ENDPOINT: &str = "https://eastus.api.cognitive.microsoft.com";

/// Response envelope from the prediction endpoint
#[derive(Debug, Deserialize)]
struct PredictionEnvelope {
    prediction: Prediction,
}

/// Per-intent confidence score
#[derive(Debug, Clone, Deserialize)]
pub struct IntentScore {
    /// Confidence in 0.0..=1.0
    pub score: f64,
}

/// Prediction payload for one utterance. Transient; produced per turn and
/// never persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Best-guess intent label
    pub top_intent: String,

    /// Confidence score per intent label
    #[serde(default)]
    pub intents: HashMap<String, IntentScore>,

    /// Ordered extracted values per entity name
    #[serde(default)]
    pub entities: HashMap<String, Vec<String>>,
}

impl Prediction {
    /// Confidence score of the top intent; 0.0 if the service omitted it
    #[must_use]
    pub fn top_score(&self) -> f64 {
        self.intents
            .get(&self.top_intent)
            .map_or(0.0, |intent| intent.score)
    }

    /// First extracted value for an entity name
    #[must_use]
    pub fn first_entity(&self, name: &str) -> Option<&str> {
        self.entities
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Classifies utterances against the hosted NLU model
pub struct IntentClassifier {
    client: reqwest::Client,
    endpoint: String,
    app_id: String,
    subscription_key: String,
}

impl IntentClassifier {
    /// Create a classifier for a hosted model
    ///
    /// # Errors
    ///
    /// Returns an error if the app id or subscription key is empty.
    pub fn new(app_id: String, subscription_key: String) -> Result<Self> {
        if app_id.is_empty() || subscription_key.is_empty() {
            return Err(Error::Config(
                "NLU app id and subscription key required".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_id,
            subscription_key,
        })
    }

    /// Override the endpoint base URL (tests, regional deployments)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Classify one utterance
    ///
    /// # Errors
    ///
    /// Returns [`Error::Classification`] on a non-success HTTP status, or a
    /// transport/parse error if the request itself fails.
    pub async fn classify(&self, utterance: &str) -> Result<Prediction> {
        let url = format!(
            "{}/nlu/prediction/v3.0/apps/{}/slots/production/predict",
            self.endpoint, self.app_id
        );

        tracing::debug!(utterance, "sending prediction request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("verbose", "true"),
                ("show-all-intents", "true"),
                ("log", "true"),
                ("subscription-key", &self.subscription_key),
                ("query", utterance),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "prediction request failed");
            return Err(Error::Classification {
                status: status.as_u16(),
            });
        }

        let envelope: PredictionEnvelope = response.json().await?;
        tracing::debug!(
            top_intent = %envelope.prediction.top_intent,
            score = envelope.prediction.top_score(),
            "received prediction"
        );
        Ok(envelope.prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(json: &str) -> Prediction {
        serde_json::from_str(json).expect("valid prediction json")
    }

    #[test]
    fn top_score_reads_top_intent_entry() {
        let p = prediction(
            r#"{
                "topIntent": "Get_Weather",
                "intents": {"Get_Weather": {"score": 0.91}, "Quit": {"score": 0.02}},
                "entities": {"weather_location": ["Seattle"]}
            }"#,
        );
        assert_eq!(p.top_intent, "Get_Weather");
        assert!((p.top_score() - 0.91).abs() < f64::EPSILON);
        assert_eq!(p.first_entity("weather_location"), Some("Seattle"));
    }

    #[test]
    fn missing_intent_entry_scores_zero() {
        let p = prediction(r#"{"topIntent": "Get_Weather"}"#);
        assert!(p.top_score().abs() < f64::EPSILON);
        assert_eq!(p.first_entity("weather_location"), None);
    }

    #[test]
    fn empty_credentials_rejected() {
        assert!(IntentClassifier::new(String::new(), "key".to_string()).is_err());
        assert!(IntentClassifier::new("app".to_string(), String::new()).is_err());
    }
}
