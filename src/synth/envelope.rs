// One-shot gain envelopes
//
// Every sound in the widget is fire-and-forget: a linear attack into an
// exponential decay, then the voice is released. Exponential ramps cannot
// reach zero, so decays land on a small floor instead (inaudible at -80dB).

/// Floor value for exponential decays (exponential ramps cannot target 0)
pub const ENVELOPE_FLOOR: f32 = 0.0001;

/// One-shot envelope parameters
///
/// `attack` and `decay` are both measured from the start of the event:
/// the gain rises linearly to `peak` over `attack` seconds, then decays
/// exponentially so that it reaches the floor at `decay` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    /// Attack time in seconds
    pub attack: f32,
    /// Time (from onset) at which the decay reaches the floor, in seconds
    pub decay: f32,
    /// Peak gain reached at the end of the attack
    pub peak: f32,
}

impl EnvelopeParams {
    pub fn new(attack: f32, decay: f32, peak: f32) -> Self {
        let attack = attack.max(0.0);
        Self {
            attack,
            // Decay must end after the attack or the shape degenerates
            decay: decay.max(attack + 0.001),
            peak: peak.max(ENVELOPE_FLOOR),
        }
    }
}

/// One-shot attack/decay envelope generator
pub struct OneShotEnvelope {
    params: EnvelopeParams,
    sample_rate: f32,
    position: f32, // in samples
}

impl OneShotEnvelope {
    pub fn new(params: EnvelopeParams, sample_rate: f32) -> Self {
        Self {
            params,
            sample_rate,
            position: 0.0,
        }
    }

    /// Process one sample and return the gain value
    pub fn process(&mut self) -> f32 {
        let t = self.position / self.sample_rate;
        self.position += 1.0;

        if t < self.params.attack {
            // Linear attack from the floor up to peak
            let progress = if self.params.attack > 0.0 {
                t / self.params.attack
            } else {
                1.0
            };
            ENVELOPE_FLOOR + (self.params.peak - ENVELOPE_FLOOR) * progress
        } else if t < self.params.decay {
            // Exponential decay: peak * ratio^progress reaches the floor
            // exactly at `decay`
            let span = self.params.decay - self.params.attack;
            let progress = (t - self.params.attack) / span;
            let ratio = ENVELOPE_FLOOR / self.params.peak;
            self.params.peak * ratio.powf(progress)
        } else {
            ENVELOPE_FLOOR
        }
    }

    /// True once the decay has reached the floor
    pub fn is_finished(&self) -> bool {
        self.position / self.sample_rate >= self.params.decay
    }
}

/// Linear gain ramp that holds its target value
///
/// Used by the spin whoosh, whose gain slides from 0.18 down to 0.10 across
/// the whole spin instead of following an attack/decay shape.
#[derive(Debug, Clone, Copy)]
pub struct GainRamp {
    from: f32,
    to: f32,
    duration_samples: f32,
    position: f32,
}

impl GainRamp {
    pub fn new(from: f32, to: f32, duration_secs: f32, sample_rate: f32) -> Self {
        Self {
            from,
            to,
            duration_samples: (duration_secs * sample_rate).max(1.0),
            position: 0.0,
        }
    }

    pub fn process(&mut self) -> f32 {
        let t = (self.position / self.duration_samples).min(1.0);
        self.position += 1.0;
        self.from + (self.to - self.from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    #[test]
    fn test_attack_reaches_peak() {
        // Clack shape: 5ms attack to 0.40, floor at 90ms
        let params = EnvelopeParams::new(0.005, 0.09, 0.40);
        let mut env = OneShotEnvelope::new(params, SAMPLE_RATE);

        let attack_samples = (0.005 * SAMPLE_RATE) as usize;
        let mut peak_seen = 0.0f32;
        for _ in 0..attack_samples + 2 {
            peak_seen = peak_seen.max(env.process());
        }
        assert!((peak_seen - 0.40).abs() < 0.01, "Peak: {}", peak_seen);
    }

    #[test]
    fn test_decay_lands_on_floor_not_zero() {
        let params = EnvelopeParams::new(0.002, 0.14, 1.0);
        let mut env = OneShotEnvelope::new(params, SAMPLE_RATE);

        let total = (0.15 * SAMPLE_RATE) as usize;
        let mut last = 0.0;
        for _ in 0..total {
            last = env.process();
        }

        // Exponential decay never reaches exact zero
        assert!(last > 0.0);
        assert!(last <= ENVELOPE_FLOOR * 1.01, "Final value: {}", last);
        assert!(env.is_finished());
    }

    #[test]
    fn test_decay_is_monotonic_after_attack() {
        let params = EnvelopeParams::new(0.001, 0.12, 0.9);
        let mut env = OneShotEnvelope::new(params, SAMPLE_RATE);

        // Burn the attack
        let attack_samples = (0.001 * SAMPLE_RATE) as usize + 1;
        for _ in 0..attack_samples {
            env.process();
        }

        let mut previous = f32::MAX;
        for _ in 0..(0.1 * SAMPLE_RATE) as usize {
            let v = env.process();
            assert!(v <= previous + 1e-6, "Decay not monotonic: {} -> {}", previous, v);
            previous = v;
        }
    }

    #[test]
    fn test_degenerate_decay_is_fixed_up() {
        // decay shorter than attack gets pushed past it
        let params = EnvelopeParams::new(0.05, 0.01, 1.0);
        assert!(params.decay > params.attack);
    }

    #[test]
    fn test_gain_ramp_whoosh_shape() {
        // Whoosh: 0.18 → 0.10 over 4 seconds
        let mut ramp = GainRamp::new(0.18, 0.10, 4.0, SAMPLE_RATE);

        let first = ramp.process();
        assert!((first - 0.18).abs() < 0.001);

        // Halfway through
        for _ in 0..(2.0 * SAMPLE_RATE) as usize - 1 {
            ramp.process();
        }
        let mid = ramp.process();
        assert!((mid - 0.14).abs() < 0.005, "Midpoint: {}", mid);

        // Past the end it holds the target
        for _ in 0..(3.0 * SAMPLE_RATE) as usize {
            ramp.process();
        }
        assert!((ramp.process() - 0.10).abs() < 0.001);
    }
}
