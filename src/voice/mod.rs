//! Voice I/O adapter
//!
//! Wraps capture, endpointing, transcription, synthesis and playback behind
//! three operations: `start_listening`, `stop_listening` and `speak`. The
//! recognition session is an explicit state machine (idle → listening →
//! idle) whose progress is reported as events to the single subscriber
//! handed out at construction.
//!
//! Audio streams are not `Send`, so each recognition session runs on its own
//! OS thread and posts events back; playback runs on blocking tasks with a
//! stop flag so a new utterance can cancel the previous one.

pub mod capture;
pub mod endpointer;
pub mod playback;
pub mod stt;
pub mod tts;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use endpointer::{Endpoint, EndpointerState, UtteranceDetector};
pub use playback::AudioPlayback;
pub use stt::Transcriber;
pub use tts::Synthesizer;

use crate::config::SpeechConfig;
use crate::language::Language;
use crate::Error;

/// How often the recognition worker drains the capture buffer
const CAPTURE_POLL: Duration = Duration::from_millis(100);

/// Recognition session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicePhase {
    /// No session active
    Idle,
    /// A single-utterance session is running
    Listening,
}

/// Why a recognition session failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// No recognition engine available
    Unsupported,
    /// Nothing was said, or the transcript came back empty
    NoSpeech,
    /// Microphone missing or unusable
    AudioCapture,
    /// The engine rejected our credentials
    PermissionDenied,
    /// Transport failure talking to the engine
    Network,
    /// Anything else
    Other,
}

impl RecognitionErrorKind {
    /// Classify an engine error
    fn from_error(error: &Error) -> Self {
        match error {
            Error::Backend {
                status: 401 | 403, ..
            } => Self::PermissionDenied,
            Error::Http(_) => Self::Network,
            Error::Audio(_) => Self::AudioCapture,
            _ => Self::Other,
        }
    }

    /// Status text shown to the user
    #[must_use]
    pub const fn status_line(self) -> &'static str {
        match self {
            Self::Unsupported => "Voice input not supported",
            Self::NoSpeech => "No speech detected. Please try again.",
            Self::AudioCapture => "Microphone not found or not allowed.",
            Self::PermissionDenied => "Microphone permission denied.",
            Self::Network => "Network error. Check your internet connection and try again.",
            Self::Other => "Speech recognition error.",
        }
    }
}

/// Status events delivered to the adapter's subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    /// Recognition is unavailable; the session never started
    Unsupported,
    /// Capture started
    Listening,
    /// An utterance was transcribed
    Recognized(String),
    /// The session failed
    Failed(RecognitionErrorKind),
    /// The session is over, successful or not
    Ended,
    /// Synthesis finished, playback started
    Speaking,
    /// Playback finished
    Done,
    /// Synthesis or playback failed
    SpeechFailed(String),
}

/// Reads text aloud
///
/// The seam between the chat client and the audio stack; tests substitute a
/// recording implementation.
pub trait Speaker {
    /// Cancel any in-progress utterance, then synthesize and play `text`
    fn speak(&mut self, text: &str, language: Language);

    /// Stop the current utterance, if any
    fn cancel_speech(&mut self);
}

/// The voice I/O adapter
pub struct VoiceAdapter {
    speech: SpeechConfig,
    events: mpsc::UnboundedSender<VoiceEvent>,
    phase: Arc<Mutex<VoicePhase>>,
    cancel_listen: Arc<AtomicBool>,
    stop_speech: Arc<AtomicBool>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl VoiceAdapter {
    /// Create an adapter and the receiving end of its event stream
    #[must_use]
    pub fn with_subscriber(speech: SpeechConfig) -> (Self, mpsc::UnboundedReceiver<VoiceEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let adapter = Self {
            speech,
            events,
            phase: Arc::new(Mutex::new(VoicePhase::Idle)),
            cancel_listen: Arc::new(AtomicBool::new(false)),
            stop_speech: Arc::new(AtomicBool::new(false)),
            worker: None,
        };
        (adapter, receiver)
    }

    /// Whether a recognition engine is available
    #[must_use]
    pub const fn recognition_supported(&self) -> bool {
        self.speech.configured()
    }

    /// Current recognition session state
    #[must_use]
    pub fn phase(&self) -> VoicePhase {
        self.phase.lock().map_or(VoicePhase::Idle, |p| *p)
    }

    /// Begin a single-utterance recognition session in `language`
    ///
    /// No-op (with an `Unsupported` event) when no engine is configured;
    /// no-op when a session is already running.
    pub fn start_listening(&mut self, language: Language) {
        if !self.recognition_supported() {
            tracing::debug!("recognition requested but no engine configured");
            self.emit(VoiceEvent::Unsupported);
            return;
        }
        if self.phase() == VoicePhase::Listening {
            tracing::debug!("recognition session already running");
            return;
        }

        // Reap the previous session's thread, if any
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        self.cancel_listen = Arc::new(AtomicBool::new(false));
        set_phase(&self.phase, VoicePhase::Listening);

        let speech = self.speech.clone();
        let events = self.events.clone();
        let phase = Arc::clone(&self.phase);
        let cancel = Arc::clone(&self.cancel_listen);

        self.worker = Some(std::thread::spawn(move || {
            recognition_worker(&speech, language, &events, &cancel);
            set_phase(&phase, VoicePhase::Idle);
        }));
    }

    /// Cancel an active recognition session
    ///
    /// The session still emits `Ended` as it shuts down.
    pub fn stop_listening(&mut self) {
        if self.phase() == VoicePhase::Listening {
            tracing::debug!("cancelling recognition session");
            self.cancel_listen.store(true, Ordering::Relaxed);
        }
    }

    fn emit(&self, event: VoiceEvent) {
        // The subscriber outlives the adapter in normal operation; a closed
        // channel just means shutdown is underway.
        let _ = self.events.send(event);
    }
}

impl Speaker for VoiceAdapter {
    fn speak(&mut self, text: &str, language: Language) {
        if !self.speech.configured() {
            tracing::debug!("speech requested but no engine configured");
            return;
        }

        self.cancel_speech();
        self.stop_speech = Arc::new(AtomicBool::new(false));

        let speech = self.speech.clone();
        let events = self.events.clone();
        let stop = Arc::clone(&self.stop_speech);
        let text = text.to_string();

        tokio::spawn(async move {
            let send = |event| {
                let _ = events.send(event);
            };

            let synthesizer = match Synthesizer::new(&speech) {
                Ok(s) => s,
                Err(e) => {
                    send(VoiceEvent::SpeechFailed(e.to_string()));
                    return;
                }
            };

            let mp3 = match synthesizer.synthesize(&text, language).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "synthesis failed");
                    send(VoiceEvent::SpeechFailed(e.to_string()));
                    return;
                }
            };

            send(VoiceEvent::Speaking);
            let volume = speech.volume;
            let played = tokio::task::spawn_blocking(move || {
                let playback = AudioPlayback::new(volume)?;
                playback.play_mp3(&mp3, &stop)
            })
            .await;

            match played {
                Ok(Ok(())) => send(VoiceEvent::Done),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "playback failed");
                    send(VoiceEvent::SpeechFailed(e.to_string()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "playback task failed");
                    send(VoiceEvent::SpeechFailed(e.to_string()));
                }
            }
        });
    }

    fn cancel_speech(&mut self) {
        self.stop_speech.store(true, Ordering::Relaxed);
    }
}

/// Update the shared phase cell
fn set_phase(phase: &Arc<Mutex<VoicePhase>>, value: VoicePhase) {
    if let Ok(mut guard) = phase.lock() {
        *guard = value;
    }
}

/// Drive one recognition session to completion
///
/// Runs on a dedicated thread: polls the capture buffer through the
/// endpointer, then transcribes the finished utterance with the blocking
/// STT client. Always emits `Ended` last.
fn recognition_worker(
    speech: &SpeechConfig,
    language: Language,
    events: &mpsc::UnboundedSender<VoiceEvent>,
    cancel: &AtomicBool,
) {
    let send = |event| {
        let _ = events.send(event);
    };

    let transcriber = match Transcriber::new(speech) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "transcriber unavailable");
            send(VoiceEvent::Failed(RecognitionErrorKind::from_error(&e)));
            send(VoiceEvent::Ended);
            return;
        }
    };

    let mut capture = match AudioCapture::new() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to open microphone");
            send(VoiceEvent::Failed(RecognitionErrorKind::AudioCapture));
            send(VoiceEvent::Ended);
            return;
        }
    };
    if let Err(e) = capture.start() {
        tracing::warn!(error = %e, "failed to start capture");
        send(VoiceEvent::Failed(RecognitionErrorKind::AudioCapture));
        send(VoiceEvent::Ended);
        return;
    }

    send(VoiceEvent::Listening);
    tracing::info!(language = %language, "listening");

    let mut detector = UtteranceDetector::new();
    let mut heard_audio = false;
    let utterance = loop {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!("recognition session cancelled");
            break None;
        }
        std::thread::sleep(CAPTURE_POLL);

        // The sample budgets cannot fire while the stream delivers nothing
        if detector.expired() {
            tracing::warn!(heard_audio, "recognition session hit its wall-clock deadline");
            let kind = if heard_audio {
                RecognitionErrorKind::NoSpeech
            } else {
                RecognitionErrorKind::AudioCapture
            };
            send(VoiceEvent::Failed(kind));
            break None;
        }

        let chunk = capture.take_samples();
        if chunk.is_empty() {
            continue;
        }
        heard_audio = true;
        match detector.feed(&chunk) {
            Endpoint::Pending => {}
            Endpoint::Complete => break Some(detector.take_utterance()),
            Endpoint::NoSpeech => {
                send(VoiceEvent::Failed(RecognitionErrorKind::NoSpeech));
                break None;
            }
        }
    };
    capture.stop();

    if let Some(samples) = utterance {
        match samples_to_wav(&samples, SAMPLE_RATE) {
            Ok(wav) => match transcriber.transcribe(&wav, language) {
                Ok(text) => {
                    let text = text.trim().to_string();
                    if text.is_empty() {
                        send(VoiceEvent::Failed(RecognitionErrorKind::NoSpeech));
                    } else {
                        send(VoiceEvent::Recognized(text));
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "transcription failed");
                    send(VoiceEvent::Failed(RecognitionErrorKind::from_error(&e)));
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "WAV encoding failed");
                send(VoiceEvent::Failed(RecognitionErrorKind::AudioCapture));
            }
        }
    }

    send(VoiceEvent::Ended);
}
