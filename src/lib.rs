//! tasktalk - voice-enabled chat client for an AI task assistant
//!
//! This library provides the core functionality for the tasktalk client:
//! - Voice I/O (single-utterance recognition, TTS playback)
//! - Chat and task pipeline against the assistant backend
//! - Batch translation of the rendered task list
//! - The interactive terminal shell
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      Shell                          │
//! │   stdin  │  todo poller  │  voice events  │  tty    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Chat client                        │
//! │   transcript  │  task snapshot  │  translations     │
//! └──────┬──────────────────────────────────┬───────────┘
//!        │                                  │
//! ┌──────▼───────────────┐   ┌──────────────▼───────────┐
//! │   Task backend       │   │   Voice adapter          │
//! │   todos/chat/        │   │   capture │ STT │ TTS    │
//! │   translate-batch    │   │   endpointer │ playback  │
//! └──────────────────────┘   └──────────────────────────┘
//! ```

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod language;
pub mod prefs;
pub mod shell;
pub mod view;
pub mod voice;

pub use backend::{Backend, ChatReply, ChatRequest, HttpBackend, Task, TranslateReply, TranslateRequest};
pub use chat::{ChatClient, ChatMessage, InputSource, RequestContext, Sender, TaskList, TaskRow};
pub use config::{Config, SpeechConfig};
pub use error::{Error, Result};
pub use language::Language;
pub use prefs::Preferences;
pub use shell::Shell;
pub use view::{TerminalView, View};
pub use voice::{
    RecognitionErrorKind, Speaker, VoiceAdapter, VoiceEvent, VoicePhase,
};
