//! Text-to-speech

use std::time::Duration;

use crate::config::SpeechConfig;
use crate::language::Language;
use crate::{Error, Result};

/// Request timeout for synthesis calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Synthesizes speech from text via an OpenAI-compatible endpoint
pub struct Synthesizer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
    rate: f64,
}

impl Synthesizer {
    /// Create a synthesizer from the speech engine config
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured or the HTTP client cannot
    /// be constructed.
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("speech API key required for synthesis".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key,
            model: config.tts_model.clone(),
            voice: config.tts_voice.clone(),
            rate: config.rate,
        })
    }

    /// Synthesize text to MP3 bytes
    ///
    /// The language code is a hint for voice selection; engines that pick
    /// the voice from the text alone ignore it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    pub async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f64,
            language: &'a str,
        }

        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.rate,
            language: language.code(),
        };

        tracing::debug!(chars = text.len(), language = %language, "starting synthesis");

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis API error");
            return Err(Error::Tts(format!("synthesis error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let config = SpeechConfig::default();
        assert!(Synthesizer::new(&config).is_err());
    }

    #[test]
    fn test_rate_comes_from_config() {
        let config = SpeechConfig {
            api_key: Some("sk-test".to_string()),
            ..SpeechConfig::default()
        };
        let synthesizer = Synthesizer::new(&config).unwrap();
        assert!((synthesizer.rate - 0.9).abs() < f64::EPSILON);
    }
}
