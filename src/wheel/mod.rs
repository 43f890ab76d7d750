// Wheel module - segments, easing, tick cadence and the spin timeline

pub mod easing;
pub mod segment;
pub mod sfx;
pub mod spin;
pub mod ticks;

pub use segment::Segment;
pub use spin::{SpinOutcome, SpinPhase, SpinTimeline};
