//! Error types for tasktalk

use thiserror::Error;

/// Result type alias for tasktalk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tasktalk
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// An HTTP service returned a non-success status
    #[error("backend error ({status}): {body}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Response body text, possibly empty
        body: String,
    },

    /// Translation error
    #[error("translation error: {0}")]
    Translation(String),

    /// Unknown language code
    #[error("unknown language: {0}")]
    Language(String),

    /// Preference storage error
    #[error("preferences error: {0}")]
    Preferences(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
