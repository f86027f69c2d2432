//! Shared test utilities

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tasktalk::{
    Backend, ChatMessage, ChatReply, ChatRequest, Error, Language, Result, Sender, Speaker, Task,
    TaskRow, TranslateReply, TranslateRequest, View,
};

/// Build a backend task
#[must_use]
pub fn task(id: i64, title: &str, completed: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed,
    }
}

/// Scripted in-memory backend
///
/// Records every request and answers from per-endpoint reply queues. A call
/// with no scripted reply panics, so an empty queue doubles as an assertion
/// that no request reaches the network.
#[derive(Default, Clone)]
pub struct FakeBackend {
    chat_requests: Arc<Mutex<Vec<ChatRequest>>>,
    chat_replies: Arc<Mutex<VecDeque<Result<ChatReply>>>>,
    translate_requests: Arc<Mutex<Vec<TranslateRequest>>>,
    translate_replies: Arc<Mutex<VecDeque<Result<TranslateReply>>>>,
    fetch_replies: Arc<Mutex<VecDeque<Result<Vec<Task>>>>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_chat_reply(&self, response: &str, todos: Option<Vec<Task>>) {
        self.chat_replies.lock().await.push_back(Ok(ChatReply {
            response: response.to_string(),
            todos,
        }));
    }

    pub async fn push_chat_error(&self, error: Error) {
        self.chat_replies.lock().await.push_back(Err(error));
    }

    pub async fn push_translations(&self, translations: &[&str]) {
        let translations: Vec<String> = translations.iter().map(ToString::to_string).collect();
        let count = translations.len();
        self.translate_replies.lock().await.push_back(Ok(TranslateReply {
            translations,
            count,
        }));
    }

    pub async fn push_translate_error(&self, error: Error) {
        self.translate_replies.lock().await.push_back(Err(error));
    }

    pub async fn push_fetch(&self, tasks: Vec<Task>) {
        self.fetch_replies.lock().await.push_back(Ok(tasks));
    }

    pub async fn push_fetch_error(&self, error: Error) {
        self.fetch_replies.lock().await.push_back(Err(error));
    }

    /// Chat requests received so far
    pub async fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().await.clone()
    }

    /// Translation requests received so far
    pub async fn translate_requests(&self) -> Vec<TranslateRequest> {
        self.translate_requests.lock().await.clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.fetch_replies
            .lock()
            .await
            .pop_front()
            .expect("unexpected todos fetch")
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        self.chat_requests.lock().await.push(request);
        self.chat_replies
            .lock()
            .await
            .pop_front()
            .expect("unexpected chat request")
    }

    async fn translate_batch(&self, request: TranslateRequest) -> Result<TranslateReply> {
        self.translate_requests.lock().await.push(request);
        self.translate_replies
            .lock()
            .await
            .pop_front()
            .expect("unexpected translation request")
    }
}

/// View that records every update it receives
#[derive(Default)]
pub struct RecordingView {
    pub messages: Vec<(Sender, String)>,
    pub task_updates: Vec<Vec<String>>,
    pub statuses: Vec<String>,
    pub notices: Vec<String>,
}

impl View for RecordingView {
    fn message_added(&mut self, message: &ChatMessage) {
        self.messages.push((message.sender, message.text.clone()));
    }

    fn tasks_updated(&mut self, tasks: &[TaskRow]) {
        self.task_updates
            .push(tasks.iter().map(|row| row.title().to_string()).collect());
    }

    fn status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn notice(&mut self, text: &str) {
        self.notices.push(text.to_string());
    }
}

/// Speaker that records what would have been read aloud
#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Vec<(String, Language)>,
}

impl Speaker for RecordingSpeaker {
    fn speak(&mut self, text: &str, language: Language) {
        self.spoken.push((text.to_string(), language));
    }

    fn cancel_speech(&mut self) {}
}
