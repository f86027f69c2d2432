//! Interactive terminal shell
//!
//! Wires stdin, the todo poller and the voice event stream into one select
//! loop. Slash commands drive task actions and voice sessions; anything else
//! goes to the assistant as a typed chat message.

use std::time::Duration;

use dialoguer::{Confirm, Input};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use crate::backend::{Backend, HttpBackend, Task};
use crate::chat::{ChatClient, RequestContext};
use crate::config::Config;
use crate::language::Language;
use crate::prefs::Preferences;
use crate::view::{TerminalView, View};
use crate::voice::{RecognitionErrorKind, Speaker, VoiceAdapter, VoiceEvent};
use crate::Result;

/// How often the task list is re-fetched
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Pause between a recognized utterance and its automatic send
const AUTO_SEND_DELAY: Duration = Duration::from_secs(1);

/// A recognized utterance waiting for its automatic send
type PendingSend = Option<(String, Instant)>;

/// The interactive shell
pub struct Shell {
    client: ChatClient<HttpBackend, TerminalView>,
    voice: VoiceAdapter,
    voice_events: mpsc::UnboundedReceiver<VoiceEvent>,
    config: Config,
}

impl Shell {
    /// Create a shell from loaded configuration
    ///
    /// The language is resolved flag/env/file first, then the persisted
    /// preference, then English.
    ///
    /// # Errors
    ///
    /// Returns error if the backend client cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let backend = HttpBackend::new(config.backend_url.clone())?;
        let (voice, voice_events) = VoiceAdapter::with_subscriber(config.speech.clone());

        let prefs = Preferences::load(&config.data_dir);
        let language = config.language.or(prefs.language).unwrap_or_default();
        let client = ChatClient::new(backend, TerminalView::new(), language);

        Ok(Self {
            client,
            voice,
            voice_events,
            config,
        })
    }

    /// Run the shell until stdin closes, /exit or ctrl-c
    ///
    /// # Errors
    ///
    /// Returns error if the poller's backend client cannot be constructed.
    #[allow(clippy::too_many_lines)]
    pub async fn run(mut self) -> Result<()> {
        print_banner(self.client.language(), self.voice.recognition_supported());

        // First paint, then the poller takes over
        self.client.refresh_tasks().await;

        let (poll_tx, mut poll_rx) = mpsc::channel::<Vec<Task>>(4);
        let poll_backend = HttpBackend::new(self.config.backend_url.clone())?;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;
                match poll_backend.fetch_tasks().await {
                    Ok(tasks) => {
                        if poll_tx.send(tasks).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::debug!(error = %e, "todo poll failed"),
                }
            }
        });

        // Set up shutdown signal
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut pending: PendingSend = None;

        loop {
            let auto_send = async {
                match pending.as_ref() {
                    Some((_, at)) => sleep_until(*at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                () = auto_send => {
                    if let Some((text, _)) = pending.take() {
                        self.client
                            .send_message(&text, RequestContext::voice(), &mut self.voice)
                            .await;
                    }
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if !self.handle_line(line.trim()).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed");
                        break;
                    }
                },
                Some(tasks) = poll_rx.recv() => {
                    self.client.apply_snapshot(tasks);
                }
                Some(event) = self.voice_events.recv() => {
                    self.handle_voice_event(event, &mut pending);
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("shutdown requested");
                    break;
                }
            }
        }

        self.voice.stop_listening();
        self.voice.cancel_speech();
        tracing::info!("shell stopped");
        Ok(())
    }

    /// Dispatch one line of input; returns false to quit
    async fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }
        if !line.starts_with('/') {
            self.client
                .send_message(line, RequestContext::typed(), &mut self.voice)
                .await;
            return true;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/help" => print_help(),
            "/exit" | "/quit" => return false,
            "/listen" => {
                let language = self.client.language();
                self.voice.start_listening(language);
            }
            "/stop" => {
                self.voice.stop_listening();
                self.client.view_mut().status("Voice input cancelled");
            }
            "/language" => self.language_command(rest),
            "/translate" => self.translate_command(rest).await,
            "/tasks" => self.client.show_tasks(&mut self.voice).await,
            "/add" => {
                if rest.is_empty() {
                    self.client.view_mut().notice("Usage: /add <task text>");
                } else {
                    self.client.add_task(rest, &mut self.voice).await;
                }
            }
            "/done" => self.complete_command(rest).await,
            "/edit" => self.edit_command(rest).await,
            "/delete" => self.delete_command(rest).await,
            "/clear-completed" => self.clear_command().await,
            "/read" => self.client.read_tasks_aloud(&mut self.voice),
            "/settings" => self.print_settings(),
            _ => self
                .client
                .view_mut()
                .notice("Unknown command, try /help"),
        }
        true
    }

    /// Switch languages and persist the choice
    fn language_command(&mut self, rest: &str) {
        if rest.is_empty() {
            let known = Language::ALL
                .iter()
                .map(|l| format!("{} ({})", l.code(), l.name()))
                .collect::<Vec<_>>()
                .join(", ");
            self.client
                .view_mut()
                .notice(&format!("Languages: {known}"));
            return;
        }

        match rest.parse::<Language>() {
            Ok(language) => {
                self.client.set_language(language);
                let prefs = Preferences {
                    language: Some(language),
                };
                if let Err(e) = prefs.save(&self.config.data_dir) {
                    tracing::warn!(error = %e, "failed to save preferences");
                }
                self.client
                    .view_mut()
                    .status(&format!("Language set to {}", language.name()));
            }
            Err(e) => self.client.view_mut().notice(&e.to_string()),
        }
    }

    /// Translate task titles, to the current language unless overridden
    async fn translate_command(&mut self, rest: &str) {
        let target = if rest.is_empty() {
            self.client.language()
        } else {
            match rest.parse::<Language>() {
                Ok(language) => language,
                Err(e) => {
                    self.client.view_mut().notice(&e.to_string());
                    return;
                }
            }
        };
        self.client.translate_tasks(target).await;
    }

    /// Mark the selected task complete
    async fn complete_command(&mut self, selector: &str) {
        if selector.is_empty() {
            self.client
                .view_mut()
                .notice("Usage: /done <number or title>");
            return;
        }
        match self.resolve_task(selector) {
            Some(title) => self.client.complete_task(&title, &mut self.voice).await,
            None => self
                .client
                .view_mut()
                .notice(&format!("No task matching \"{selector}\"")),
        }
    }

    /// Rename the selected task, prompting when no new title is given
    async fn edit_command(&mut self, rest: &str) {
        if rest.is_empty() {
            self.client
                .view_mut()
                .notice("Usage: /edit <number> [new title]");
            return;
        }

        // "2 New title" edits inline; a bare selector prompts
        let (selector, inline) = match rest.split_once(char::is_whitespace) {
            Some((selector, text)) if selector.parse::<usize>().is_ok() => {
                (selector, Some(text.trim()))
            }
            _ => (rest, None),
        };

        let Some(title) = self.resolve_task(selector) else {
            self.client
                .view_mut()
                .notice(&format!("No task matching \"{selector}\""));
            return;
        };

        let new_title = match inline {
            Some(text) => text.to_string(),
            None => {
                let current = title.clone();
                let edited = tokio::task::spawn_blocking(move || -> Option<String> {
                    Input::new()
                        .with_prompt("New title")
                        .default(current)
                        .interact_text()
                        .ok()
                })
                .await
                .ok()
                .flatten();
                match edited {
                    Some(text) => text,
                    None => {
                        tracing::debug!("edit cancelled");
                        return;
                    }
                }
            }
        };

        self.client
            .rename_task(&title, &new_title, &mut self.voice)
            .await;
    }

    /// Delete the selected task after confirmation
    async fn delete_command(&mut self, selector: &str) {
        if selector.is_empty() {
            self.client
                .view_mut()
                .notice("Usage: /delete <number or title>");
            return;
        }
        let Some(title) = self.resolve_task(selector) else {
            self.client
                .view_mut()
                .notice(&format!("No task matching \"{selector}\""));
            return;
        };

        let confirmed = confirm(format!("Delete \"{title}\"?")).await;
        self.client
            .delete_task(&title, confirmed, &mut self.voice)
            .await;
    }

    /// Delete all completed tasks after confirmation
    async fn clear_command(&mut self) {
        let confirmed = confirm("Delete all completed tasks?").await;
        self.client.clear_completed(confirmed, &mut self.voice).await;
    }

    /// Resolve a 1-based row number or (partial) title to the task's
    /// untranslated title, which is what backend commands refer to
    fn resolve_task(&self, selector: &str) -> Option<String> {
        let tasks = self.client.tasks();
        if let Ok(index) = selector.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| tasks.rows().get(i))
                .map(|row| row.source_title().to_string());
        }
        tasks
            .find_by_title(selector)
            .map(|row| row.source_title().to_string())
    }

    /// Render a voice event as a status line; a recognized utterance also
    /// arms the delayed automatic send
    fn handle_voice_event(&mut self, event: VoiceEvent, pending: &mut PendingSend) {
        match event {
            VoiceEvent::Unsupported => self
                .client
                .view_mut()
                .status(RecognitionErrorKind::Unsupported.status_line()),
            VoiceEvent::Listening => self
                .client
                .view_mut()
                .status("Listening to your voice..."),
            VoiceEvent::Recognized(text) => {
                self.client
                    .view_mut()
                    .status(&format!("Heard: \"{text}\""));
                *pending = Some((text, Instant::now() + AUTO_SEND_DELAY));
            }
            VoiceEvent::Failed(kind) => self.client.view_mut().status(kind.status_line()),
            VoiceEvent::Ended => tracing::debug!("recognition session ended"),
            VoiceEvent::Speaking => self.client.view_mut().status("Speaking..."),
            VoiceEvent::Done => self.client.view_mut().status("Done speaking"),
            VoiceEvent::SpeechFailed(e) => {
                tracing::warn!(error = %e, "speech output failed");
                self.client.view_mut().status("Speech playback failed");
            }
        }
    }

    /// Show the resolved configuration
    fn print_settings(&self) {
        let speech = &self.config.speech;
        println!("backend:   {}", self.config.backend_url);
        println!("language:  {}", self.client.language().name());
        if speech.configured() {
            println!(
                "voice:     {} ({} / {} voice {}, rate {}, volume {})",
                speech.url, speech.stt_model, speech.tts_model, speech.tts_voice,
                speech.rate, speech.volume
            );
        } else {
            println!("voice:     unavailable (set OPENAI_API_KEY to enable)");
        }
        println!("data dir:  {}", self.config.data_dir.display());
        if let Some(path) = crate::config::file::config_file_path() {
            println!("config:    {}", path.display());
        }
    }
}

/// Ask a yes/no question on the blocking prompt thread; EOF counts as no
async fn confirm(prompt: impl Into<String>) -> bool {
    let prompt = prompt.into();
    tokio::task::spawn_blocking(move || {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    })
    .await
    .unwrap_or(false)
}

/// Startup banner
fn print_banner(language: Language, voice: bool) {
    println!("tasktalk - voice-enabled task assistant");
    println!(
        "language: {} | voice: {}",
        language.name(),
        if voice { "ready" } else { "unavailable" }
    );
    println!("Type a message and press Enter, or /help for commands.");
    println!();
}

/// Command reference
fn print_help() {
    println!("Commands:");
    println!("  /listen             start voice input");
    println!("  /stop               cancel voice input");
    println!("  /language [code]    switch language (en, ur, hi, es, fr, ar)");
    println!("  /translate [code]   translate task titles");
    println!("  /tasks              ask the assistant to list every task");
    println!("  /add <text>         add a task");
    println!("  /done <task>        mark a task complete (number or title)");
    println!("  /edit <task> [new]  rename a task");
    println!("  /delete <task>      delete a task");
    println!("  /clear-completed    delete all completed tasks");
    println!("  /read               read the task list aloud");
    println!("  /settings           show the resolved configuration");
    println!("  /exit               quit");
    println!();
    println!("Anything else is sent to the assistant as a chat message.");
}
