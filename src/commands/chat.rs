//! Conversational fallback and image creation
//!
//! When no intent clears the confidence threshold, the utterance goes to a
//! general-purpose completion endpoint seeded with the persona prompt and
//! the most recent conversation turns.

use serde::{Deserialize, Serialize};

use crate::profiles::Turn;
use crate::response::CommandResponse;
use crate::{Error, Result};

/// Default completion endpoint
const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default completion model
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: usize,
    size: &'static str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: String,
}

/// Client for the general completion and image endpoints
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Create a completion client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("completion API key required".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the endpoint base URL (tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the completion model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Answer an utterance conversationally, seeded with the persona prompt
    /// and recent history
    pub async fn ask(&self, utterance: &str, prompt: &str, history: &[Turn]) -> CommandResponse {
        match self.request(utterance, prompt, history).await {
            Ok(text) => CommandResponse::Plain(text),
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), "completion request failed");
                CommandResponse::plain(
                    "Sorry, I'm having trouble answering that right now. Try asking again.",
                )
            }
        }
    }

    /// Create an image from a spoken description
    pub async fn create_image(&self, description: &str) -> CommandResponse {
        match self.request_image(description).await {
            Ok(url) => CommandResponse::plain(format!(
                "I've created the image. You can view it here: {url}"
            )),
            Err(e) => {
                tracing::warn!(kind = e.kind_name(), "image request failed");
                CommandResponse::plain(format!(
                    "Sorry, I couldn't create an image of {description}. Try asking again."
                ))
            }
        }
    }

    /// One completion request
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// empty choice list.
    pub async fn request(
        &self,
        utterance: &str,
        prompt: &str,
        history: &[Turn],
    ) -> Result<String> {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: prompt.to_string(),
        }];
        for turn in history {
            messages.push(ChatMessage {
                role: "user",
                content: turn.speech.clone(),
            });
            messages.push(ChatMessage {
                role: "assistant",
                content: turn.response.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: utterance.to_string(),
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ChatRequest {
                model: &self.model,
                messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                service: "completion",
                message: format!("status {status}: {body}"),
            });
        }

        let result: ChatResponse = response.json().await?;
        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(Error::Api {
                service: "completion",
                message: "response contained no choices".to_string(),
            })
    }

    /// One image-generation request, returning the image URL
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// empty data list.
    pub async fn request_image(&self, description: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ImageRequest {
                prompt: description,
                n: 1,
                size: "1024x1024",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                service: "image",
                message: format!("status {status}: {body}"),
            });
        }

        let result: ImageResponse = response.json().await?;
        result
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or(Error::Api {
                service: "image",
                message: "response contained no images".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_rejected() {
        assert!(ChatClient::new(String::new()).is_err());
    }
}
