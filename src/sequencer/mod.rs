// Sequencer module - ambient loop timing and scheduling

pub mod ambient;
pub mod kit;
pub mod pattern;
pub mod timeline;

pub use ambient::AmbientSequencer;
pub use pattern::{AmbientPattern, Hit};
pub use timeline::{STEPS_PER_BAR, Tempo};
