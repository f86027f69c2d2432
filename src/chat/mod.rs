//! Chat/task client
//!
//! Holds the conversation transcript, the rendered task snapshot and the
//! send/refresh/translate pipeline. All task mutation is done by the backend;
//! per-task actions synthesize natural-language commands and route them
//! through the ordinary chat pipeline.

pub mod commands;
pub mod tasks;

mod client;

use chrono::{DateTime, Local};
use uuid::Uuid;

pub use client::ChatClient;
pub use tasks::{TaskList, TaskRow};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The local user
    User,
    /// The task assistant
    Assistant,
}

/// One transcript entry, ephemeral and append-only
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Message text
    pub text: String,

    /// Who sent it
    pub sender: Sender,

    /// Local wall-clock time the entry was appended
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    /// Create a user transcript entry
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            timestamp: Local::now(),
        }
    }

    /// Create an assistant transcript entry
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
            timestamp: Local::now(),
        }
    }
}

/// Where a chat request originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Typed by the user
    Typed,
    /// Produced by speech recognition
    Voice,
    /// Synthesized from a task action (complete/edit/delete)
    Action,
}

/// Per-request context carried through the send/response pipeline
///
/// Each request records its own origin; whether the reply is spoken is
/// decided from this value alone, so no state lingers past the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Request identifier, for log correlation
    pub id: Uuid,

    /// Input origin
    pub source: InputSource,
}

impl RequestContext {
    /// Context for a typed message
    #[must_use]
    pub fn typed() -> Self {
        Self {
            id: Uuid::new_v4(),
            source: InputSource::Typed,
        }
    }

    /// Context for a recognized-speech message
    #[must_use]
    pub fn voice() -> Self {
        Self {
            id: Uuid::new_v4(),
            source: InputSource::Voice,
        }
    }

    /// Context for a synthesized task-action command
    #[must_use]
    pub fn action() -> Self {
        Self {
            id: Uuid::new_v4(),
            source: InputSource::Action,
        }
    }

    /// Whether the input is echoed into the transcript as a user message
    #[must_use]
    pub const fn echo_input(&self) -> bool {
        !matches!(self.source, InputSource::Action)
    }

    /// Whether the reply should be read aloud
    #[must_use]
    pub const fn speak_reply(&self) -> bool {
        matches!(self.source, InputSource::Voice)
    }
}
