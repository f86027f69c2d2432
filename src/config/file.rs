//! TOML configuration file loading
//!
//! Supports `~/.config/tasktalk/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct TasktalkConfigFile {
    /// General settings
    #[serde(default)]
    pub general: GeneralFileConfig,

    /// Task-assistant backend
    #[serde(default)]
    pub backend: BackendFileConfig,

    /// Speech engine (STT/TTS)
    #[serde(default)]
    pub speech: SpeechFileConfig,
}

/// General settings
#[derive(Debug, Default, Deserialize)]
pub struct GeneralFileConfig {
    /// Two-letter language code (e.g. "en", "ur")
    pub language: Option<String>,
}

/// Task-assistant backend configuration
#[derive(Debug, Default, Deserialize)]
pub struct BackendFileConfig {
    /// Base URL of the backend (e.g. `http://localhost:8000`)
    pub url: Option<String>,
}

/// Speech engine configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// Speech API base URL (OpenAI-compatible)
    pub url: Option<String>,

    /// Speech API key
    pub api_key: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "coral")
    pub tts_voice: Option<String>,

    /// Utterance rate multiplier
    pub rate: Option<f64>,

    /// Playback volume (0.0 to 1.0)
    pub volume: Option<f64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `TasktalkConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> TasktalkConfigFile {
    let Some(path) = config_file_path() else {
        return TasktalkConfigFile::default();
    };

    if !path.exists() {
        return TasktalkConfigFile::default();
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
                TasktalkConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            TasktalkConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/tasktalk/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("tasktalk").join("config.toml"))
}
