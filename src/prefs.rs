//! Persisted user preferences
//!
//! A small JSON file in the data directory holding the settings the user can
//! change from inside the shell. Loading degrades to defaults on any error;
//! saving reports errors but callers treat them as non-fatal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::{Error, Result};

/// Mutable user preferences, survives restarts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Preferred language for chat, recognition and replies
    #[serde(default)]
    pub language: Option<Language>,
}

impl Preferences {
    /// Preference file path inside the data directory
    #[must_use]
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("preferences.json")
    }

    /// Load preferences, falling back to defaults on a missing or
    /// unreadable file
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse preferences, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read preferences"
                );
                Self::default()
            }
        }
    }

    /// Write preferences to the data directory
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be serialized or written.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = Self::path(data_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Preferences(format!("create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .map_err(|e| Error::Preferences(format!("write {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "saved preferences");
        Ok(())
    }
}
