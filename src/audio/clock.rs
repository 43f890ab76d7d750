// Audio clock - shared playback position for event scheduling

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared audio clock
///
/// The sample position is advanced by the audio callback and read (as
/// seconds) by the schedulers on the control side. Cloning is cheap; all
/// clones observe the same position.
#[derive(Clone)]
pub struct AudioClock {
    /// Current sample position (incremented by the audio callback)
    sample_position: Arc<AtomicU64>,
    /// Sample rate (for timestamp conversions)
    sample_rate: f64,
}

impl AudioClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_position: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate as f64,
        }
    }

    /// Get current sample position (called from the control thread)
    pub fn samples(&self) -> u64 {
        self.sample_position.load(Ordering::Relaxed)
    }

    /// Advance sample position (called from the audio callback)
    pub fn advance(&self, frames: usize) {
        self.sample_position
            .fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Current position in seconds - the time base every SoundEvent start
    /// is expressed in
    pub fn seconds(&self) -> f64 {
        self.samples() as f64 / self.sample_rate
    }

    /// Convert an absolute time in seconds to a sample position
    pub fn secs_to_samples(&self, secs: f64) -> u64 {
        if secs <= 0.0 {
            return 0;
        }
        (secs * self.sample_rate) as u64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }
}
