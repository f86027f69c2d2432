//! Terminal renderer

use super::View;
use crate::chat::{ChatMessage, Sender, TaskRow};

/// Renders transcript, tasks and statuses to stdout
///
/// Log output goes to stderr, so plain `println!` keeps the conversation
/// readable.
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    /// Create a terminal view
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl View for TerminalView {
    fn message_added(&mut self, message: &ChatMessage) {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Assistant => "assistant",
        };
        println!("[{}] {who}: {}", message.timestamp.format("%H:%M"), message.text);
    }

    fn tasks_updated(&mut self, tasks: &[TaskRow]) {
        if tasks.is_empty() {
            println!("-- no tasks --");
            return;
        }
        println!("-- {} task(s) --", tasks.len());
        for row in tasks {
            let mark = if row.completed { "x" } else { " " };
            println!("  [{mark}] {} (#{})", row.title(), row.id);
        }
    }

    fn status(&mut self, text: &str) {
        println!("  · {text}");
    }

    fn notice(&mut self, text: &str) {
        println!("!! {text}");
    }
}
