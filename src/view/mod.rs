//! View-update interface
//!
//! The chat client pushes plain task/message data through this trait and
//! never renders anything itself, so the whole pipeline runs in tests
//! against a recording implementation.

mod terminal;

pub use terminal::TerminalView;

use crate::chat::{ChatMessage, TaskRow};

/// Receives rendering updates from the chat client
pub trait View {
    /// A transcript entry was appended
    fn message_added(&mut self, message: &ChatMessage);

    /// The task snapshot was replaced (count is `tasks.len()`)
    fn tasks_updated(&mut self, tasks: &[TaskRow]);

    /// Transient status text (voice and translation progress)
    fn status(&mut self, _text: &str) {}

    /// Prominent user-visible notice
    fn notice(&mut self, _text: &str) {}
}
