// Oscillateurs - Générateurs de formes d'onde

use std::f32::consts::PI;

pub trait Oscillator {
    fn next_sample(&mut self) -> f32;
    fn set_frequency(&mut self, freq: f32);
    fn reset(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveformType {
    Sine,
    Square,
    Saw,
    Triangle,
}

pub struct SimpleOscillator {
    waveform: WaveformType,
    phase: f32,
    phase_increment: f32,
    sample_rate: f32,
}

impl SimpleOscillator {
    pub fn new(waveform: WaveformType, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            phase_increment: 0.0,
            sample_rate,
        }
    }
}

impl Oscillator for SimpleOscillator {
    fn next_sample(&mut self) -> f32 {
        let sample = match self.waveform {
            WaveformType::Sine => (self.phase * 2.0 * PI).sin(),
            WaveformType::Square => {
                if self.phase < 0.5 { 1.0 } else { -1.0 }
            }
            WaveformType::Saw => (self.phase * 2.0) - 1.0,
            WaveformType::Triangle => {
                if self.phase < 0.5 {
                    (self.phase * 4.0) - 1.0
                } else {
                    3.0 - (self.phase * 4.0)
                }
            }
        };

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        sample
    }

    fn set_frequency(&mut self, freq: f32) {
        self.phase_increment = freq / self.sample_rate;
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Exponential pitch trajectory, sampled once per output sample
///
/// Models the frequency drops used by the percussive sounds (kick 140→50 Hz,
/// crack clicks 1200→200 Hz, shard ring 2400→900 Hz). Exponential ramps
/// require strictly positive endpoints, so both frequencies are clamped
/// away from zero.
#[derive(Debug, Clone, Copy)]
pub struct PitchRamp {
    start: f32,
    end: f32,
    duration_samples: f32,
    position: f32,
}

impl PitchRamp {
    /// Minimum frequency accepted by an exponential ramp
    const MIN_FREQ: f32 = 1.0;

    pub fn new(start_hz: f32, end_hz: f32, duration_secs: f32, sample_rate: f32) -> Self {
        Self {
            start: start_hz.max(Self::MIN_FREQ),
            end: end_hz.max(Self::MIN_FREQ),
            duration_samples: (duration_secs * sample_rate).max(1.0),
            position: 0.0,
        }
    }

    /// Constant frequency (no glide)
    pub fn flat(freq_hz: f32) -> Self {
        Self {
            start: freq_hz.max(Self::MIN_FREQ),
            end: freq_hz.max(Self::MIN_FREQ),
            duration_samples: 1.0,
            position: 0.0,
        }
    }

    /// Frequency for the current sample, then advance
    pub fn next_frequency(&mut self) -> f32 {
        let t = (self.position / self.duration_samples).min(1.0);
        self.position += 1.0;
        // f(t) = f0 * (f1/f0)^t - standard exponential interpolation
        self.start * (self.end / self.start).powf(t)
    }
}
