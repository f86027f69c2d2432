//! Task-assistant backend interface
//!
//! The backend owns all chat logic, todo persistence and translation; this
//! crate reaches it through three JSON endpoints. The `Backend` trait is the
//! seam that lets the chat client run against an in-memory double in tests.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpBackend;

use crate::language::Language;
use crate::Result;

/// A backend-managed todo item
///
/// The client never mutates tasks locally; the list shown is always a
/// snapshot of the last successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Backend-assigned identifier
    pub id: i64,

    /// Task title
    pub title: String,

    /// Completion flag
    #[serde(default)]
    pub completed: bool,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// User or synthesized command text
    pub message: String,

    /// Two-letter language code for the reply
    pub language: String,
}

impl ChatRequest {
    /// Create a chat request in the given language
    #[must_use]
    pub fn new(message: impl Into<String>, language: Language) -> Self {
        Self {
            message: message.into(),
            language: language.code().to_string(),
        }
    }
}

/// Reply from `POST /api/chat`
///
/// Unknown extra fields are ignored; `todos` is optional and its absence
/// means the task list is unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text
    pub response: String,

    /// Updated task list, when the command changed it
    #[serde(default)]
    pub todos: Option<Vec<Task>>,
}

/// Body of `POST /api/translate-batch`
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    /// Task titles to translate, in display order
    pub tasks: Vec<String>,

    /// Two-letter target language code
    pub target_language: String,
}

impl TranslateRequest {
    /// Create a batch translation request
    #[must_use]
    pub fn new(tasks: Vec<String>, target: Language) -> Self {
        Self {
            tasks,
            target_language: target.code().to_string(),
        }
    }
}

/// Reply from `POST /api/translate-batch`
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateReply {
    /// Translated titles, same order as the request
    pub translations: Vec<String>,

    /// Backend-reported translation count
    #[serde(default)]
    pub count: usize,
}

/// Trait for the task-assistant backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the current task list (`GET /api/todos`)
    async fn fetch_tasks(&self) -> Result<Vec<Task>>;

    /// Send a chat message (`POST /api/chat`)
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply>;

    /// Translate task titles in one batch (`POST /api/translate-batch`)
    async fn translate_batch(&self, request: TranslateRequest) -> Result<TranslateReply>;
}
