// Noise - Sources de bruit blanc
//
// Every noise-based sound in the widget (whoosh bed, snare body, hats,
// crack burst, tick transient) starts from plain white noise and gets its
// character from the filter chain and envelope.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Streaming white-noise source
///
/// Deterministic for a given seed, which keeps the audio callback free of
/// entropy syscalls. The mixer seeds each voice from its start position.
pub struct NoiseSource {
    rng: SmallRng,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Next sample in [-1, 1]
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Pre-rendered 20 ms tick transient: white noise with a (1-t)² fade
///
/// Generated once per mixer and shared by every tick voice; a spin fires
/// ~30 ticks and they all sound identical, so there is no point
/// re-synthesizing the burst each time.
pub fn tick_transient(sample_rate: f32, seed: u64) -> Vec<f32> {
    let len = (sample_rate * 0.02) as usize;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(len.max(1));

    for i in 0..len.max(1) {
        let t = 1.0 - i as f32 / len.max(1) as f32;
        samples.push(rng.gen_range(-1.0f32..=1.0) * t * t);
    }

    samples
}
