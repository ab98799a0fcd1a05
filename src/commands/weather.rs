//! Weather lookup

use serde::Deserialize;

use crate::response::CommandResponse;
use crate::{Error, Result};

/// Default current-conditions endpoint
const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org";

#[derive(Deserialize)]
struct WeatherEnvelope {
    main: WeatherMain,
}

#[derive(Deserialize)]
struct WeatherMain {
    temp: f64,
}

/// Looks up current conditions for a spoken location
pub struct WeatherClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a weather client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("weather API key required".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
        })
    }

    /// Override the endpoint base URL (tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Current temperature for a location, as a speakable sentence
    pub async fn get_weather(&self, location: &str) -> CommandResponse {
        match self.request(location).await {
            Ok(temp) => CommandResponse::plain(format!(
                "The temperature in {location} is {temp:.0} degrees Fahrenheit."
            )),
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), location, "weather request failed");
                CommandResponse::plain(format!(
                    "Sorry, I couldn't get the weather for {location}. Try asking again."
                ))
            }
        }
    }

    /// One current-conditions request
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// malformed response.
    pub async fn request(&self, location: &str) -> Result<f64> {
        let url = format!("{}/data/2.5/weather", self.endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("units", "imperial"),
                ("appid", &self.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                service: "weather",
                message: format!("status {status}: {body}"),
            });
        }

        let envelope: WeatherEnvelope = response.json().await?;
        Ok(envelope.main.temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_rejected() {
        assert!(WeatherClient::new(String::new()).is_err());
    }
}
