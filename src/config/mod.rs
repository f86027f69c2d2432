//! Configuration management for tasktalk

pub mod file;

use std::path::PathBuf;

use url::Url;

use crate::language::Language;
use crate::{Error, Result};

/// Default backend base URL
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default speech API base URL (OpenAI-compatible)
const DEFAULT_SPEECH_URL: &str = "https://api.openai.com/v1";

/// tasktalk configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Task-assistant backend base URL
    pub backend_url: Url,

    /// Explicitly selected language, if any (flag, env or config file).
    /// `None` falls back to the persisted preference, then English.
    pub language: Option<Language>,

    /// Speech engine configuration
    pub speech: SpeechConfig,

    /// Path to data directory (preferences, cache)
    pub data_dir: PathBuf,
}

/// Speech engine configuration
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Enable voice input/output
    pub enabled: bool,

    /// Speech API base URL (OpenAI-compatible)
    pub url: String,

    /// Speech API key
    pub api_key: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// Utterance rate multiplier (0.25 to 4.0)
    pub rate: f64,

    /// Playback volume (0.0 to 1.0)
    pub volume: f64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_SPEECH_URL.to_string(),
            api_key: None,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "coral".to_string(),
            rate: 0.9,
            volume: 1.0,
        }
    }
}

impl SpeechConfig {
    /// True when the engine can actually be used for recognition/synthesis
    #[must_use]
    pub const fn configured(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }
}

impl Config {
    /// Load configuration with command-line overrides applied on top
    /// (flag > env > config file > default)
    ///
    /// # Errors
    ///
    /// Returns error if a configured URL cannot be parsed or the language
    /// code is unknown.
    pub fn load_with_options(
        backend_url: Option<&str>,
        language: Option<&str>,
        disable_voice: bool,
    ) -> Result<Self> {
        let fc = file::load_config_file();

        // Backend URL (flag > env > toml > default)
        let backend_raw = backend_url
            .map(str::to_string)
            .or_else(|| std::env::var("TASKTALK_BACKEND_URL").ok())
            .or(fc.backend.url)
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let backend_url = Url::parse(&backend_raw)
            .map_err(|e| Error::Config(format!("invalid backend URL {backend_raw:?}: {e}")))?;

        // Language (flag > env > toml; None defers to preferences)
        let language = language
            .map(str::to_string)
            .or_else(|| std::env::var("TASKTALK_LANGUAGE").ok())
            .or(fc.general.language)
            .map(|code| code.parse::<Language>())
            .transpose()?;

        // Speech engine (env > toml > default)
        let defaults = SpeechConfig::default();
        let enabled = if disable_voice {
            false
        } else {
            fc.speech.enabled.unwrap_or(true)
        };
        let speech = SpeechConfig {
            enabled,
            url: std::env::var("TASKTALK_SPEECH_URL")
                .ok()
                .or(fc.speech.url)
                .unwrap_or(defaults.url),
            api_key: std::env::var("OPENAI_API_KEY").ok().or(fc.speech.api_key),
            stt_model: std::env::var("TASKTALK_STT_MODEL")
                .ok()
                .or(fc.speech.stt_model)
                .unwrap_or(defaults.stt_model),
            tts_model: std::env::var("TASKTALK_TTS_MODEL")
                .ok()
                .or(fc.speech.tts_model)
                .unwrap_or(defaults.tts_model),
            tts_voice: std::env::var("TASKTALK_TTS_VOICE")
                .ok()
                .or(fc.speech.tts_voice)
                .unwrap_or(defaults.tts_voice),
            rate: fc.speech.rate.unwrap_or(defaults.rate),
            volume: fc.speech.volume.unwrap_or(defaults.volume),
        };

        if disable_voice {
            tracing::info!("voice explicitly disabled via --no-voice");
        }

        // Data directory (~/.local/share/tasktalk on Linux)
        let data_dir = directories::BaseDirs::new()
            .map_or_else(|| PathBuf::from("."), |d| d.data_dir().join("tasktalk"));
        std::fs::create_dir_all(&data_dir).ok();

        Ok(Self {
            backend_url,
            language,
            speech,
            data_dir,
        })
    }
}
