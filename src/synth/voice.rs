// Voice - Un événement sonore en cours de rendu
//
// A voice is the running instance of a SoundEvent: one renderer per layer
// (source → filters → gain), summed and scaled by the event volume. Voices
// are created when the mixer activates an event and dropped as soon as every
// layer has played out - no pooling, no reuse.

use crate::audio::event::{Bus, GainShape, Layer, SoundEvent, SoundKind, SourceSpec};
use crate::synth::envelope::{GainRamp, OneShotEnvelope};
use crate::synth::filter::StateVariableFilter;
use crate::synth::noise::NoiseSource;
use crate::synth::oscillator::{Oscillator, PitchRamp, SimpleOscillator};
use std::sync::Arc;

enum LayerSource {
    Osc {
        oscillator: SimpleOscillator,
        pitch: PitchRamp,
    },
    Noise(NoiseSource),
    TickTransient {
        buffer: Arc<Vec<f32>>,
        position: usize,
    },
}

enum LayerGain {
    Envelope(OneShotEnvelope),
    Ramp(GainRamp),
}

struct LayerVoice {
    source: LayerSource,
    filters: Vec<StateVariableFilter>,
    gain: LayerGain,
    delay_samples: u64,
    duration_samples: u64,
    position: u64,
}

impl LayerVoice {
    fn new(layer: &Layer, sample_rate: f32, tick_buffer: &Arc<Vec<f32>>, seed: u64) -> Self {
        let source = match layer.source {
            SourceSpec::Osc {
                waveform,
                freq,
                glide_to,
                glide_secs,
            } => {
                let pitch = match glide_to {
                    Some(target) => PitchRamp::new(freq, target, glide_secs, sample_rate),
                    None => PitchRamp::flat(freq),
                };
                LayerSource::Osc {
                    oscillator: SimpleOscillator::new(waveform, sample_rate),
                    pitch,
                }
            }
            SourceSpec::Noise { .. } => LayerSource::Noise(NoiseSource::new(seed)),
            SourceSpec::TickTransient => LayerSource::TickTransient {
                buffer: Arc::clone(tick_buffer),
                position: 0,
            },
        };

        let gain = match layer.gain {
            GainShape::OneShot(params) => LayerGain::Envelope(OneShotEnvelope::new(params, sample_rate)),
            GainShape::Ramp { from, to } => {
                LayerGain::Ramp(GainRamp::new(from, to, layer.duration, sample_rate))
            }
        };

        Self {
            source,
            filters: layer
                .filters
                .iter()
                .map(|p| StateVariableFilter::new(*p, sample_rate))
                .collect(),
            gain,
            delay_samples: (layer.delay * sample_rate) as u64,
            duration_samples: (layer.duration * sample_rate).max(1.0) as u64,
            position: 0,
        }
    }

    fn is_finished(&self) -> bool {
        self.position >= self.delay_samples + self.duration_samples
    }

    fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        if self.position < self.delay_samples {
            self.position += 1;
            return 0.0;
        }
        self.position += 1;

        let raw = match &mut self.source {
            LayerSource::Osc { oscillator, pitch } => {
                oscillator.set_frequency(pitch.next_frequency());
                oscillator.next_sample()
            }
            LayerSource::Noise(noise) => noise.next_sample(),
            LayerSource::TickTransient { buffer, position } => {
                let sample = buffer.get(*position).copied().unwrap_or(0.0);
                *position += 1;
                sample
            }
        };

        let mut filtered = raw;
        for filter in &mut self.filters {
            filtered = filter.process(filtered);
        }

        let gain = match &mut self.gain {
            LayerGain::Envelope(env) => env.process(),
            LayerGain::Ramp(ramp) => ramp.process(),
        };

        filtered * gain
    }
}

pub struct Voice {
    kind: SoundKind,
    bus: Bus,
    volume: f32,
    layers: Vec<LayerVoice>,
}

impl Voice {
    pub fn new(event: &SoundEvent, sample_rate: f32, tick_buffer: &Arc<Vec<f32>>, seed: u64) -> Self {
        Self {
            kind: event.kind,
            bus: event.bus,
            volume: event.volume,
            layers: event
                .layers
                .iter()
                .enumerate()
                .map(|(i, layer)| {
                    // Decorrelate noise layers within one event
                    LayerVoice::new(layer, sample_rate, tick_buffer, seed.wrapping_add(i as u64))
                })
                .collect(),
        }
    }

    pub fn kind(&self) -> SoundKind {
        self.kind
    }

    pub fn bus(&self) -> Bus {
        self.bus
    }

    pub fn is_finished(&self) -> bool {
        self.layers.iter().all(|l| l.is_finished())
    }

    pub fn next_sample(&mut self) -> f32 {
        let mut sum = 0.0;
        for layer in &mut self.layers {
            sum += layer.next_sample();
        }
        sum * self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::event::{GainShape, Layer, SoundEvent, SourceSpec};
    use crate::synth::envelope::EnvelopeParams;
    use crate::synth::noise::tick_transient;
    use crate::synth::oscillator::WaveformType;

    const SAMPLE_RATE: f32 = 44100.0;

    fn tick_buf() -> Arc<Vec<f32>> {
        Arc::new(tick_transient(SAMPLE_RATE, 0))
    }

    fn render(voice: &mut Voice, samples: usize) -> Vec<f32> {
        (0..samples).map(|_| voice.next_sample()).collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        let acc: f64 = samples.iter().map(|s| (*s as f64) * (*s as f64)).sum();
        (acc / samples.len() as f64).sqrt() as f32
    }

    #[test]
    fn test_clack_voice_renders_and_finishes() {
        // Square 220 Hz, 5ms attack, gone at 90ms
        let event = SoundEvent::new(SoundKind::Clack, 0.0, Bus::Fx, 0.40).with_layer(Layer::new(
            SourceSpec::tone(WaveformType::Square, 220.0),
            GainShape::OneShot(EnvelopeParams::new(0.005, 0.09, 1.0)),
            0.1,
        ));
        let mut voice = Voice::new(&event, SAMPLE_RATE, &tick_buf(), 1);

        let body = render(&mut voice, (0.05 * SAMPLE_RATE) as usize);
        assert!(rms(&body) > 0.01, "Clack should be audible: {}", rms(&body));
        assert!(!voice.is_finished());

        render(&mut voice, (0.06 * SAMPLE_RATE) as usize);
        assert!(voice.is_finished());
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn test_delayed_layer_is_silent_until_delay() {
        // Shard ring starts 70ms into the crack
        let event = SoundEvent::new(SoundKind::Crack, 0.0, Bus::Fx, 1.0).with_layer(
            Layer::new(
                SourceSpec::glide(WaveformType::Triangle, 2400.0, 900.0, 0.11),
                GainShape::OneShot(EnvelopeParams::new(0.0, 0.11, 0.28)),
                0.12,
            )
            .with_delay(0.07),
        );
        let mut voice = Voice::new(&event, SAMPLE_RATE, &tick_buf(), 2);

        let before = render(&mut voice, (0.06 * SAMPLE_RATE) as usize);
        assert!(rms(&before) == 0.0, "Silent during the delay");

        let after = render(&mut voice, (0.05 * SAMPLE_RATE) as usize);
        assert!(rms(&after) > 0.001, "Audible after the delay");
    }

    #[test]
    fn test_multi_layer_event_mixes_layers() {
        // Snare shape: noise body + 180 Hz triangle
        let event = SoundEvent::new(SoundKind::Snare, 0.0, Bus::Ambient, 1.0)
            .with_layer(Layer::new(
                SourceSpec::noise(),
                GainShape::OneShot(EnvelopeParams::new(0.001, 0.12, 0.9)),
                0.16,
            ))
            .with_layer(Layer::new(
                SourceSpec::tone(WaveformType::Triangle, 180.0),
                GainShape::OneShot(EnvelopeParams::new(0.002, 0.09, 0.4)),
                0.12,
            ));
        let mut voice = Voice::new(&event, SAMPLE_RATE, &tick_buf(), 3);

        let body = render(&mut voice, (0.08 * SAMPLE_RATE) as usize);
        assert!(rms(&body) > 0.01);

        render(&mut voice, (0.1 * SAMPLE_RATE) as usize);
        assert!(voice.is_finished());
    }

    #[test]
    fn test_whoosh_ramp_fades_down() {
        let event = SoundEvent::new(SoundKind::Whoosh, 0.0, Bus::Fx, 1.0).with_layer(
            Layer::new(
                SourceSpec::looped_noise(),
                GainShape::Ramp { from: 0.18, to: 0.10 },
                4.0,
            )
            .with_filter(crate::synth::filter::FilterParams::bandpass(950.0, 0.8)),
        );
        let mut voice = Voice::new(&event, SAMPLE_RATE, &tick_buf(), 4);

        let early = rms(&render(&mut voice, 8192));
        // Skip to the tail
        render(&mut voice, (3.5 * SAMPLE_RATE) as usize);
        let late = rms(&render(&mut voice, 8192));

        assert!(early > late, "Whoosh should fade: {} -> {}", early, late);
        assert!(!voice.is_finished());

        render(&mut voice, (0.6 * SAMPLE_RATE) as usize);
        assert!(voice.is_finished());
    }

    #[test]
    fn test_tick_transient_voice_is_short() {
        let event = SoundEvent::new(SoundKind::Tick, 0.0, Bus::Fx, 0.22).with_layer(Layer::new(
            SourceSpec::TickTransient,
            GainShape::Ramp { from: 1.0, to: 1.0 },
            0.03,
        ));
        let mut voice = Voice::new(&event, SAMPLE_RATE, &tick_buf(), 5);

        let body = render(&mut voice, (0.02 * SAMPLE_RATE) as usize);
        assert!(rms(&body) > 0.001);

        render(&mut voice, (0.02 * SAMPLE_RATE) as usize);
        assert!(voice.is_finished());
    }
}
