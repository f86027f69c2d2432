//! Utterance endpointing
//!
//! Decides when a single spoken utterance has finished, using RMS energy:
//! speech starts when a chunk crosses the energy threshold, and ends after
//! enough trailing silence. A session that never hears speech times out,
//! and a wall-clock deadline bounds a stream that stops delivering samples
//! altogether.

use std::time::{Duration, Instant};

/// Minimum audio energy to consider a chunk speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum voiced audio before an utterance counts (0.3 s at 16 kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that ends an utterance (0.5 s)
const TRAILING_SILENCE_SAMPLES: usize = 8000;

/// Session samples allowed before giving up waiting for speech (5 s)
const NO_SPEECH_TIMEOUT_SAMPLES: usize = 80_000;

/// Hard cap on utterance length (10 s)
const MAX_UTTERANCE_SAMPLES: usize = 160_000;

/// Wall-clock cap on a whole session; the sample budgets above cannot end
/// a session whose stream delivers nothing
const SESSION_DEADLINE: Duration = Duration::from_secs(20);

/// Endpointer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointerState {
    /// Waiting for speech to start
    Waiting,
    /// Speech detected, accumulating the utterance
    Speech,
}

/// Outcome of feeding one audio chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Still collecting audio
    Pending,
    /// Utterance finished
    Complete,
    /// No speech appeared within the timeout window
    NoSpeech,
}

/// Detects the end of a single utterance in a capture stream
pub struct UtteranceDetector {
    state: EndpointerState,
    utterance: Vec<f32>,
    speech_samples: usize,
    silence_samples: usize,
    session_samples: usize,
    deadline: Instant,
}

impl Default for UtteranceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceDetector {
    /// Create a detector at the start of a session
    #[must_use]
    pub fn new() -> Self {
        Self::with_deadline(SESSION_DEADLINE)
    }

    /// Create a detector whose session expires `limit` from now
    #[must_use]
    pub fn with_deadline(limit: Duration) -> Self {
        Self {
            state: EndpointerState::Waiting,
            utterance: Vec::new(),
            speech_samples: 0,
            silence_samples: 0,
            session_samples: 0,
            deadline: Instant::now() + limit,
        }
    }

    /// Whether the session has outrun its wall-clock deadline
    ///
    /// `feed` only runs when samples arrive, so the capture loop checks
    /// this on every poll to bound a stream that delivers none.
    #[must_use]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Feed captured samples, returning the session outcome so far
    pub fn feed(&mut self, samples: &[f32]) -> Endpoint {
        self.session_samples += samples.len();
        let energy = rms_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            EndpointerState::Waiting => {
                if is_speech {
                    self.state = EndpointerState::Speech;
                    self.utterance.clear();
                    self.utterance.extend_from_slice(samples);
                    self.speech_samples = samples.len();
                    self.silence_samples = 0;
                    tracing::trace!(energy, "speech started");
                } else if self.session_samples >= NO_SPEECH_TIMEOUT_SAMPLES {
                    tracing::debug!("no speech within timeout window");
                    return Endpoint::NoSpeech;
                }
            }
            EndpointerState::Speech => {
                self.utterance.extend_from_slice(samples);

                if is_speech {
                    self.speech_samples += samples.len();
                    self.silence_samples = 0;
                } else {
                    self.silence_samples += samples.len();
                }

                tracing::trace!(
                    utterance_len = self.utterance.len(),
                    silence = self.silence_samples,
                    energy,
                    "accumulating utterance"
                );

                if self.utterance.len() >= MAX_UTTERANCE_SAMPLES {
                    tracing::debug!(samples = self.utterance.len(), "utterance hit length cap");
                    return Endpoint::Complete;
                }

                if self.silence_samples > TRAILING_SILENCE_SAMPLES {
                    if self.speech_samples > MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.utterance.len(), "utterance complete");
                        return Endpoint::Complete;
                    }
                    // A blip too short to count; wait for real speech
                    self.state = EndpointerState::Waiting;
                    self.utterance.clear();
                    self.speech_samples = 0;
                    self.silence_samples = 0;
                    tracing::trace!("false start, waiting again");
                }
            }
        }

        Endpoint::Pending
    }

    /// Take the accumulated utterance, clearing it
    pub fn take_utterance(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.utterance)
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> EndpointerState {
        self.state
    }
}

/// RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loud(samples: usize) -> Vec<f32> {
        vec![0.5; samples]
    }

    fn quiet(samples: usize) -> Vec<f32> {
        vec![0.0; samples]
    }

    #[test]
    fn test_energy() {
        assert!(rms_energy(&quiet(100)) < 0.001);
        assert!(rms_energy(&loud(100)) > 0.4);
        assert!(rms_energy(&[]) < f32::EPSILON);
    }

    #[test]
    fn test_silence_times_out() {
        let mut detector = UtteranceDetector::new();
        let mut outcome = Endpoint::Pending;
        for _ in 0..50 {
            outcome = detector.feed(&quiet(1600));
            if outcome != Endpoint::Pending {
                break;
            }
        }
        assert_eq!(outcome, Endpoint::NoSpeech);
        assert_eq!(detector.state(), EndpointerState::Waiting);
    }

    #[test]
    fn test_speech_then_silence_completes() {
        let mut detector = UtteranceDetector::new();
        // 0.5 s of speech
        for _ in 0..5 {
            assert_eq!(detector.feed(&loud(1600)), Endpoint::Pending);
        }
        assert_eq!(detector.state(), EndpointerState::Speech);
        // 0.6 s of silence ends it
        let mut outcome = Endpoint::Pending;
        for _ in 0..6 {
            outcome = detector.feed(&quiet(1600));
            if outcome == Endpoint::Complete {
                break;
            }
        }
        assert_eq!(outcome, Endpoint::Complete);
        assert!(detector.take_utterance().len() > MIN_SPEECH_SAMPLES);
    }

    #[test]
    fn test_short_blip_is_not_an_utterance() {
        let mut detector = UtteranceDetector::new();
        // 0.1 s blip, under the minimum voiced length
        assert_eq!(detector.feed(&loud(1600)), Endpoint::Pending);
        // Trailing silence resets to waiting instead of completing
        for _ in 0..12 {
            assert_eq!(detector.feed(&quiet(1600)), Endpoint::Pending);
        }
        assert_eq!(detector.state(), EndpointerState::Waiting);
    }

    #[test]
    fn test_length_cap_completes() {
        let mut detector = UtteranceDetector::new();
        let mut outcome = Endpoint::Pending;
        for _ in 0..110 {
            outcome = detector.feed(&loud(1600));
            if outcome == Endpoint::Complete {
                break;
            }
        }
        assert_eq!(outcome, Endpoint::Complete);
        assert!(detector.take_utterance().len() >= MAX_UTTERANCE_SAMPLES);
    }

    #[test]
    fn test_wall_deadline_expires() {
        let fresh = UtteranceDetector::new();
        assert!(!fresh.expired());

        let mut detector = UtteranceDetector::with_deadline(Duration::ZERO);
        assert!(detector.expired());
        // Feeding samples does not push the deadline out
        detector.feed(&loud(1600));
        assert!(detector.expired());
    }
}
