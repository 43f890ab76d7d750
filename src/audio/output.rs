// Audio output handle - best-effort facade over the engine
//
// Sound never blocks the visual flow: if the backend cannot be created
// (no device, denied output) the handle degrades to a mute sink and every
// operation becomes a silent no-op. Failures are only visible through the
// optional diagnostic callback.

use crate::audio::engine::{AudioEngine, AudioError};
use crate::audio::event::{AudioCommand, CommandProducer, SoundEvent, create_command_channel};
use std::sync::Arc;

/// Command ring capacity
///
/// The densest burst is the crack (1 event) on top of ambient scheduling
/// (≤5 events per sixteenth) and the tick cascade; 256 gives seconds of
/// headroom at those rates.
const COMMAND_RINGBUFFER_CAPACITY: usize = 256;

/// What went wrong inside the best-effort audio path
#[derive(Debug, Clone)]
pub enum AudioDiagnostic {
    /// Backend creation failed; the widget runs silent
    BackendUnavailable(String),
    /// The command ring was full and the event was dropped
    CommandDropped,
}

/// Observability hook for swallowed audio failures (off by default)
pub type DiagnosticSink = Arc<dyn Fn(&AudioDiagnostic) + Send + Sync>;

/// Anything that accepts audio commands
///
/// The schedulers (ambient loop, spin, reveal) emit into this trait, which
/// keeps them testable against a plain `Vec<AudioCommand>` recorder.
pub trait EventSink {
    fn submit(&mut self, command: AudioCommand);

    fn play(&mut self, event: SoundEvent) {
        self.submit(AudioCommand::Play(event));
    }
}

/// Recorder sink: collects commands instead of playing them
impl EventSink for Vec<AudioCommand> {
    fn submit(&mut self, command: AudioCommand) {
        self.push(command);
    }
}

/// Owned handle on the audio backend
///
/// Created once by the widget and injected into every sound-producing
/// component; dropping it closes the stream. There is no global context.
pub struct AudioOutput {
    engine: Option<AudioEngine>,
    producer: Option<CommandProducer>,
    diagnostics: Option<DiagnosticSink>,
    /// Construction error, kept so a diagnostic hook attached afterwards
    /// still learns why the widget runs silent
    last_error: Option<AudioError>,
}

impl AudioOutput {
    /// Try to open the default output device; degrade to mute on failure
    pub fn new() -> Self {
        let (producer, consumer) = create_command_channel(COMMAND_RINGBUFFER_CAPACITY);
        match AudioEngine::new(consumer) {
            Ok(engine) => Self {
                engine: Some(engine),
                producer: Some(producer),
                diagnostics: None,
                last_error: None,
            },
            Err(err) => {
                log::warn!("Audio unavailable, running silent: {}", err);
                let mut muted = Self::muted();
                muted.last_error = Some(err);
                muted
            }
        }
    }

    /// A handle with no backend; every operation is a no-op
    pub fn muted() -> Self {
        Self {
            engine: None,
            producer: None,
            diagnostics: None,
            last_error: None,
        }
    }

    pub fn with_diagnostics(mut self, sink: DiagnosticSink) -> Self {
        if self.engine.is_none() {
            let message = self
                .last_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "muted".to_string());
            sink(&AudioDiagnostic::BackendUnavailable(message));
        }
        self.diagnostics = Some(sink);
        self
    }

    /// True when a real stream is running
    pub fn is_live(&self) -> bool {
        self.engine.is_some()
    }

    /// Current audio-clock time in seconds (0.0 while muted)
    pub fn now(&self) -> f64 {
        self.engine
            .as_ref()
            .map(|e| e.clock().seconds())
            .unwrap_or(0.0)
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.engine.as_ref().map(|e| e.sample_rate())
    }

    fn report(&self, diagnostic: AudioDiagnostic) {
        if let Some(sink) = &self.diagnostics {
            sink(&diagnostic);
        }
    }
}

impl EventSink for AudioOutput {
    fn submit(&mut self, command: AudioCommand) {
        let Some(producer) = self.producer.as_mut() else {
            // Muted: swallow silently, the visual flow must not notice
            return;
        };
        if ringbuf::traits::Producer::try_push(producer, command).is_err() {
            log::debug!("Audio command ring full, event dropped");
            self.report(AudioDiagnostic::CommandDropped);
        }
    }
}
