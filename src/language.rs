//! Supported languages
//!
//! The backend stores task titles in English; the other languages are
//! available for speech recognition, chat replies and batch translation.
//! Codes are two-letter ISO 639-1, shared by the backend and the speech
//! engines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A language the assistant can listen, reply and translate in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Urdu
    Ur,
    /// Hindi
    Hi,
    /// Spanish
    Es,
    /// French
    Fr,
    /// Arabic
    Ar,
}

impl Language {
    /// All supported languages, in menu order
    pub const ALL: [Self; 6] = [Self::En, Self::Ur, Self::Hi, Self::Es, Self::Fr, Self::Ar];

    /// Two-letter code used in backend payloads
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ur => "ur",
            Self::Hi => "hi",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ur => "Urdu",
            Self::Hi => "Hindi",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::Ar => "Arabic",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "ur" | "urdu" => Ok(Self::Ur),
            "hi" | "hindi" => Ok(Self::Hi),
            "es" | "spanish" => Ok(Self::Es),
            "fr" | "french" => Ok(Self::Fr),
            "ar" | "arabic" => Ok(Self::Ar),
            other => Err(Error::Language(other.to_string())),
        }
    }
}
