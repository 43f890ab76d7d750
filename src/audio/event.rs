// Sound events - the unit of work handed to the audio engine
//
// A SoundEvent describes one fire-and-forget synthesis job: where it sits on
// the audio clock, which bus it is mixed into, and one or more synthesis
// layers (source + filters + gain shape). Events are built on the control
// side, pushed through a lock-free channel, and consumed by the mixer; they
// are not retained after their envelope completes.

use crate::synth::envelope::EnvelopeParams;
use crate::synth::filter::FilterParams;
use crate::synth::oscillator::WaveformType;
use ringbuf::{HeapRb, traits::Split};

/// What a scheduled sound is, musically
///
/// Kinds double as cancellation handles (the whoosh is stopped by kind when
/// the wheel lands) and as identity in the schedulers' bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    Tick,
    Kick,
    Snare,
    Hat,
    Bass,
    Chord,
    Clack,
    FanfareNote,
    Crack,
    Whoosh,
}

/// Mixing bus for an event
///
/// The ambient loop gets its own bus so stopping the sequencer can silence
/// it instantly without touching spin/reveal sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    Ambient,
    Fx,
}

/// Signal source of one synthesis layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceSpec {
    /// Oscillator, optionally with an exponential glide to a target pitch
    Osc {
        waveform: WaveformType,
        freq: f32,
        glide_to: Option<f32>,
        glide_secs: f32,
    },
    /// White noise; looped sources run until stopped or their duration ends
    Noise { looped: bool },
    /// The shared pre-rendered 20 ms tick transient
    TickTransient,
}

impl SourceSpec {
    pub fn tone(waveform: WaveformType, freq: f32) -> Self {
        Self::Osc {
            waveform,
            freq,
            glide_to: None,
            glide_secs: 0.0,
        }
    }

    pub fn glide(waveform: WaveformType, freq: f32, to: f32, secs: f32) -> Self {
        Self::Osc {
            waveform,
            freq,
            glide_to: Some(to),
            glide_secs: secs,
        }
    }

    pub fn noise() -> Self {
        Self::Noise { looped: false }
    }

    pub fn looped_noise() -> Self {
        Self::Noise { looped: true }
    }
}

/// Gain trajectory of one layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GainShape {
    /// Linear attack then exponential decay to the floor
    OneShot(EnvelopeParams),
    /// Linear slide between two gains across the layer duration
    Ramp { from: f32, to: f32 },
}

/// One synthesis layer of an event
///
/// Compound sounds (snare = noise + tone, crack = four staggered layers)
/// are a single event with several layers, so schedulers deal in whole
/// sounds and never emit two events of the same kind at the same time.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub source: SourceSpec,
    /// Up to two stages in practice (e.g. band-pass into high-pass)
    pub filters: Vec<FilterParams>,
    pub gain: GainShape,
    /// Offset from the event start, seconds
    pub delay: f32,
    /// Hard stop, seconds from the layer start
    pub duration: f32,
}

impl Layer {
    pub fn new(source: SourceSpec, gain: GainShape, duration: f32) -> Self {
        Self {
            source,
            filters: Vec::new(),
            gain,
            delay: 0.0,
            duration,
        }
    }

    pub fn with_filter(mut self, filter: FilterParams) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// A scheduled unit of audio synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEvent {
    pub kind: SoundKind,
    /// Absolute start time in seconds on the audio clock
    pub start: f64,
    pub bus: Bus,
    /// Overall scale applied on top of the layer gains
    pub volume: f32,
    pub layers: Vec<Layer>,
}

impl SoundEvent {
    pub fn new(kind: SoundKind, start: f64, bus: Bus, volume: f32) -> Self {
        Self {
            kind,
            start,
            bus,
            volume,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Time at which the last layer goes quiet
    pub fn end_time(&self) -> f64 {
        let tail = self
            .layers
            .iter()
            .map(|l| l.delay + l.duration)
            .fold(0.0f32, f32::max);
        self.start + tail as f64
    }
}

/// Commands consumed by the audio callback
#[derive(Debug, Clone)]
pub enum AudioCommand {
    Play(SoundEvent),
    /// Cut every active and pending voice of this kind immediately
    StopKind(SoundKind),
    /// Retarget the ambient bus gain; `ramp_secs == 0` jumps instantly
    AmbientGain { target: f32, ramp_secs: f32 },
}

pub type CommandProducer = ringbuf::HeapProd<AudioCommand>;
pub type CommandConsumer = ringbuf::HeapCons<AudioCommand>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<AudioCommand>::new(capacity);
    rb.split()
}
