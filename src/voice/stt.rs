//! Speech-to-text
//!
//! Blocking client for an OpenAI-compatible transcription endpoint; it runs
//! on the recognition worker thread, never on the async runtime.

use std::time::Duration;

use crate::config::SpeechConfig;
use crate::language::Language;
use crate::{Error, Result};

/// Request timeout for transcription calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the transcription API
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes captured speech to text
pub struct Transcriber {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl Transcriber {
    /// Create a transcriber from the speech engine config
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured or the HTTP client cannot
    /// be constructed.
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("speech API key required for recognition".to_string()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key,
            model: config.stt_model.clone(),
        })
    }

    /// Transcribe WAV audio in the given language
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` on transport failure and `Error::Backend` on a
    /// non-success status, so callers can classify the failure.
    pub fn transcribe(&self, wav: &[u8], language: Language) -> Result<String> {
        tracing::debug!(
            audio_bytes = wav.len(),
            language = %language,
            "starting transcription"
        );

        let form = reqwest::blocking::multipart::Form::new()
            .part(
                "file",
                reqwest::blocking::multipart::Part::bytes(wav.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", language.code());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let result: TranscriptionResponse = response.json().map_err(|e| {
            tracing::error!(error = %e, "failed to parse transcription response");
            e
        })?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}
