//! Speech synthesis
//!
//! Renders response text to audio through the hosted synthesis endpoint.
//! The voice binding is mutable so persona/gender/language changes can
//! rebind mid-session without rebuilding the client.

use crate::{Error, Result};

/// Output format requested from the synthesis endpoint
const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Synthesizes speech from text
pub struct SpeechSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    voice: String,
}

impl SpeechSynthesizer {
    /// Create a synthesizer bound to an initial voice
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: String, region: String, voice: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("synthesis API key required".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: format!("https://{region}.tts.speech.microsoft.com"),
            api_key,
            voice,
        })
    }

    /// Override the endpoint base URL (tests)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Currently bound voice name
    #[must_use]
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Rebind the synthesis voice
    pub fn set_voice(&mut self, voice: impl Into<String>) {
        self.voice = voice.into();
    }

    /// Synthesize text to WAV audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns a non-success status
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let body = format!(
            "<speak version='1.0' xml:lang='en-US'><voice name='{}'>{}</voice></speak>",
            self.voice,
            escape_xml(text)
        );

        let response = self
            .client
            .post(format!("{}/cognitiveservices/v1", self.endpoint))
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!(
                "synthesis error {status}: {body}"
            )));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

/// Escape the characters SSML treats specially
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_rebinding() {
        let mut synth =
            SpeechSynthesizer::new("key".to_string(), "eastus".to_string(), "Ana".to_string())
                .unwrap();
        assert_eq!(synth.voice(), "Ana");
        synth.set_voice("Denise");
        assert_eq!(synth.voice(), "Denise");
    }

    #[test]
    fn xml_escaping() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn empty_api_key_rejected() {
        assert!(
            SpeechSynthesizer::new(String::new(), "eastus".to_string(), "Ana".to_string())
                .is_err()
        );
    }
}
