// Luxury Roulette - promotional prize-wheel engine

pub mod audio;
pub mod config;
pub mod particles;
pub mod reveal;
pub mod sequencer;
pub mod synth;
pub mod wheel;
pub mod widget;

// Re-export commonly used types for convenience
pub use audio::clock::AudioClock;
pub use audio::engine::Mixer;
pub use audio::event::{AudioCommand, SoundEvent, SoundKind};
pub use audio::output::{AudioDiagnostic, AudioOutput, DiagnosticSink, EventSink};
pub use config::{CampaignConfig, ConfigError};
pub use particles::ParticleField;
pub use reveal::{RevealFlow, RevealStage};
pub use sequencer::{AmbientPattern, AmbientSequencer, Tempo};
pub use wheel::{Segment, SpinOutcome, SpinPhase, SpinTimeline};
pub use widget::{WheelWidget, WidgetEvent};
