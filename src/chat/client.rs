//! The send/refresh/translate pipeline

use crate::backend::{Backend, ChatRequest, Task, TranslateRequest};
use crate::chat::{ChatMessage, RequestContext, TaskList, commands};
use crate::language::Language;
use crate::view::View;
use crate::voice::Speaker;
use crate::Error;

/// Assistant reply shown when the backend answers with a failure status
const PROCESSING_ERROR: &str = "Sorry, there was an error processing your request.";

/// Assistant reply shown when the backend cannot be reached at all
const CONNECT_ERROR: &str = "Sorry, could not connect to the server. Please check your connection.";

/// Notice shown when batch translation fails for any reason
const TRANSLATION_FAILED: &str = "Translation failed. Please try again.";

/// Notice shown when the target language is already English
const ALREADY_ENGLISH: &str = "Already in English. Select another language to translate.";

/// Notice shown when there is nothing to translate
const NO_TASKS: &str = "No tasks to translate!";

/// The chat/task client
///
/// Owns the transcript and the rendered task snapshot, talks to the backend,
/// and pushes every visible change through the [`View`]. Whether a reply is
/// read aloud is carried per request in [`RequestContext`], never in client
/// state.
pub struct ChatClient<B: Backend, V: View> {
    backend: B,
    view: V,
    tasks: TaskList,
    transcript: Vec<ChatMessage>,
    language: Language,
}

impl<B: Backend, V: View> ChatClient<B, V> {
    /// Create a client with an empty transcript and task snapshot
    #[must_use]
    pub const fn new(backend: B, view: V, language: Language) -> Self {
        Self {
            backend,
            view,
            tasks: TaskList::new(),
            transcript: Vec::new(),
            language,
        }
    }

    /// Rendered task snapshot
    #[must_use]
    pub const fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Conversation transcript, oldest first
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Language used for replies, speech and translation
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Switch the reply language
    pub fn set_language(&mut self, language: Language) {
        tracing::debug!(language = %language, "language changed");
        self.language = language;
    }

    /// Direct access to the view, for shell-level status lines
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Send `text` to the assistant and render the outcome
    ///
    /// Whitespace-only input is dropped before any network activity. The
    /// input is echoed into the transcript unless the context says otherwise,
    /// and the reply is read aloud only when the context came from voice.
    /// Failures become assistant-styled transcript entries; nothing is
    /// propagated.
    pub async fn send_message(
        &mut self,
        text: &str,
        ctx: RequestContext,
        speaker: &mut dyn Speaker,
    ) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if ctx.echo_input() {
            self.append(ChatMessage::user(text));
        }

        tracing::debug!(id = %ctx.id, source = ?ctx.source, "sending chat message");
        let request = ChatRequest::new(text, self.language);
        match self.backend.chat(request).await {
            Ok(reply) => {
                self.append(ChatMessage::assistant(&reply.response));
                if let Some(todos) = reply.todos {
                    self.tasks.replace(todos);
                    self.view.tasks_updated(self.tasks.rows());
                }
                if ctx.speak_reply() {
                    speaker.speak(&reply.response, self.language);
                }
            }
            Err(Error::Backend { status, .. }) => {
                tracing::error!(id = %ctx.id, status, "chat request rejected");
                self.append(ChatMessage::assistant(PROCESSING_ERROR));
            }
            Err(e) => {
                tracing::error!(id = %ctx.id, error = %e, "chat request failed");
                self.append(ChatMessage::assistant(CONNECT_ERROR));
            }
        }
    }

    /// Fetch the task list and replace the snapshot
    ///
    /// Failures are logged and otherwise ignored; the previous snapshot
    /// stays on screen.
    pub async fn refresh_tasks(&mut self) {
        match self.backend.fetch_tasks().await {
            Ok(tasks) => self.apply_snapshot(tasks),
            Err(e) => tracing::debug!(error = %e, "task refresh failed"),
        }
    }

    /// Replace the snapshot with an already-fetched task list
    ///
    /// An unchanged fetch leaves the rows (and any translations) in place;
    /// any actual change replaces the snapshot wholesale.
    pub fn apply_snapshot(&mut self, tasks: Vec<Task>) {
        if self.tasks.same_tasks(&tasks) {
            return;
        }
        self.tasks.replace(tasks);
        self.view.tasks_updated(self.tasks.rows());
    }

    /// Translate every displayed title into `target`
    ///
    /// English is the source language, so an English target aborts before
    /// any network activity. Titles are submitted in untranslated form and
    /// replaced only when the reply carries exactly one translation per row.
    pub async fn translate_tasks(&mut self, target: Language) {
        if target == Language::En {
            self.view.notice(ALREADY_ENGLISH);
            return;
        }
        if self.tasks.is_empty() {
            self.view.notice(NO_TASKS);
            return;
        }

        self.view.status("Translating tasks...");
        let request = TranslateRequest::new(self.tasks.source_titles(), target);
        match self.backend.translate_batch(request).await {
            Ok(reply) => {
                tracing::debug!(count = reply.count, target = %target, "translations received");
                match self.tasks.apply_translations(reply.translations) {
                    Ok(()) => {
                        self.view.tasks_updated(self.tasks.rows());
                        self.view.status(&format!("Translated {} tasks", self.tasks.len()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "translation reply unusable");
                        self.view.notice(TRANSLATION_FAILED);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "translation request failed");
                self.view.notice(TRANSLATION_FAILED);
            }
        }
    }

    /// Ask the backend to mark the task titled `title` complete
    pub async fn complete_task(&mut self, title: &str, speaker: &mut dyn Speaker) {
        self.send_message(&commands::complete(title), RequestContext::action(), speaker)
            .await;
    }

    /// Ask the backend to rename a task
    ///
    /// Dropped without a network call when the new title is empty or
    /// unchanged.
    pub async fn rename_task(&mut self, title: &str, new_title: &str, speaker: &mut dyn Speaker) {
        let new_title = new_title.trim();
        if new_title.is_empty() || new_title == title {
            tracing::debug!("rename dropped, empty or unchanged title");
            return;
        }
        self.send_message(
            &commands::rename(title, new_title),
            RequestContext::action(),
            speaker,
        )
        .await;
    }

    /// Ask the backend to delete the task titled `title`
    ///
    /// Destructive, so the caller collects a confirmation first; a declined
    /// prompt drops the command without a network call.
    pub async fn delete_task(&mut self, title: &str, confirmed: bool, speaker: &mut dyn Speaker) {
        if !confirmed {
            tracing::debug!("delete declined");
            return;
        }
        self.send_message(&commands::delete(title), RequestContext::action(), speaker)
            .await;
    }

    /// Ask the backend to add a task described by `text`
    pub async fn add_task(&mut self, text: &str, speaker: &mut dyn Speaker) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.send_message(&commands::add(text), RequestContext::action(), speaker)
            .await;
    }

    /// Ask the backend to list every task
    pub async fn show_tasks(&mut self, speaker: &mut dyn Speaker) {
        self.send_message(commands::SHOW_TASKS, RequestContext::action(), speaker)
            .await;
    }

    /// Ask the backend to delete all completed tasks
    ///
    /// Destructive, so the caller collects a confirmation first; a declined
    /// prompt drops the command without a network call.
    pub async fn clear_completed(&mut self, confirmed: bool, speaker: &mut dyn Speaker) {
        if !confirmed {
            tracing::debug!("clear-completed declined");
            return;
        }
        self.send_message(commands::CLEAR_COMPLETED, RequestContext::action(), speaker)
            .await;
    }

    /// Read a summary of the task snapshot aloud
    pub fn read_tasks_aloud(&mut self, speaker: &mut dyn Speaker) {
        let summary = commands::spoken_summary(self.tasks.rows());
        speaker.speak(&summary, self.language);
    }

    fn append(&mut self, message: ChatMessage) {
        self.view.message_added(&message);
        self.transcript.push(message);
    }
}
