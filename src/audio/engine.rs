// Moteur audio - Mixer + callback CPAL temps-réel
//
// Le moteur supporte automatiquement plusieurs formats de sample (F32, I16,
// U16) : le mixage interne se fait en f32, la conversion vers le format du
// device se fait au moment de l'écriture via `FromSample<f32>`.
//
// The mixer itself is format- and device-agnostic, so the whole scheduling
// and synthesis path can be exercised headless in tests; only `AudioEngine`
// touches CPAL.

use crate::audio::clock::AudioClock;
use crate::audio::dsp_utils::{flush_denormals_to_zero, soft_clip};
use crate::audio::event::{AudioCommand, Bus, CommandConsumer, SoundEvent};
use crate::synth::noise::tick_transient;
use crate::synth::voice::Voice;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Audio device configuration error: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),

    #[error("Stream creation error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Stream start error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Scratch block size for the callback's mono mix
const RENDER_BLOCK: usize = 1024;

/// Mixes scheduled sound events into a mono stream
///
/// Two buses: the ambient loop goes through its own gain (ramped in on
/// sequencer start, cut to zero on stop), everything else is mixed dry.
/// Events wait in `pending` until the clock reaches their start sample,
/// then become voices; finished voices are dropped at block boundaries.
pub struct Mixer {
    sample_rate: f32,
    clock: AudioClock,
    pending: Vec<(u64, SoundEvent)>,
    voices: Vec<Voice>,
    tick_buffer: Arc<Vec<f32>>,
    ambient_gain: f32,
    ambient_target: f32,
    ambient_step: f32,
}

impl Mixer {
    pub fn new(sample_rate: f32, clock: AudioClock) -> Self {
        Self {
            sample_rate,
            clock,
            pending: Vec::with_capacity(64),
            voices: Vec::with_capacity(32),
            tick_buffer: Arc::new(tick_transient(sample_rate, 0x7fff_ffff)),
            ambient_gain: 0.0,
            ambient_target: 0.0,
            ambient_step: 0.0,
        }
    }

    pub fn handle_command(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Play(event) => {
                let start_sample = self.clock.secs_to_samples(event.start);
                self.pending.push((start_sample, event));
            }
            AudioCommand::StopKind(kind) => {
                self.pending.retain(|(_, e)| e.kind != kind);
                self.voices.retain(|v| v.kind() != kind);
            }
            AudioCommand::AmbientGain { target, ramp_secs } => {
                self.ambient_target = target;
                if ramp_secs <= 0.0 {
                    self.ambient_gain = target;
                    self.ambient_step = 0.0;
                } else {
                    self.ambient_step =
                        (target - self.ambient_gain) / (ramp_secs * self.sample_rate);
                }
            }
        }
    }

    /// Number of voices currently sounding
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Render one mono block and advance the clock
    pub fn render(&mut self, output: &mut [f32]) {
        let base = self.clock.samples();

        for (i, out) in output.iter_mut().enumerate() {
            let current = base + i as u64;
            self.activate_due(current);

            // Ambient gain ramp (linear, per-sample)
            if self.ambient_step != 0.0 {
                self.ambient_gain += self.ambient_step;
                let done = (self.ambient_step > 0.0 && self.ambient_gain >= self.ambient_target)
                    || (self.ambient_step < 0.0 && self.ambient_gain <= self.ambient_target);
                if done {
                    self.ambient_gain = self.ambient_target;
                    self.ambient_step = 0.0;
                }
            }

            let mut ambient = 0.0f32;
            let mut fx = 0.0f32;
            for voice in &mut self.voices {
                let sample = voice.next_sample();
                match voice.bus() {
                    Bus::Ambient => ambient += sample,
                    Bus::Fx => fx += sample,
                }
            }

            let mixed = flush_denormals_to_zero(ambient * self.ambient_gain + fx);
            *out = soft_clip(mixed);
        }

        self.voices.retain(|v| !v.is_finished());
        self.clock.advance(output.len());
    }

    fn activate_due(&mut self, current_sample: u64) {
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 <= current_sample {
                let (start_sample, event) = self.pending.swap_remove(i);
                self.voices.push(Voice::new(
                    &event,
                    self.sample_rate,
                    &self.tick_buffer,
                    // Seed noise from the schedule position
                    start_sample ^ 0x9e37_79b9_7f4a_7c15,
                ));
            } else {
                i += 1;
            }
        }
    }
}

/// CPAL-backed audio engine
///
/// Owns the output stream; commands arrive through the lock-free ring
/// buffer, the shared clock reports playback time back to the schedulers.
/// Dropping the engine closes the stream and stops all sound.
pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    sample_rate: f32,
    clock: AudioClock,
}

impl AudioEngine {
    pub fn new(command_rx: CommandConsumer) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let clock = AudioClock::new(sample_rate);
        let mixer = Mixer::new(sample_rate, clock.clone());

        let stream = match sample_format {
            SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config, channels, mixer, command_rx)
            }
            SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, channels, mixer, command_rx)
            }
            SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config, channels, mixer, command_rx)
            }
            other => return Err(AudioError::UnsupportedFormat(other)),
        }?;

        stream.play()?;

        log::info!("Audio engine started: {} Hz, {} canaux", sample_rate, channels);

        Ok(Self {
            _device: device,
            _stream: stream,
            sample_rate,
            clock,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn clock(&self) -> AudioClock {
        self.clock.clone()
    }

    /// Build an output stream with automatic format conversion
    ///
    /// Generic over the device sample type; the mixer renders f32 mono into
    /// a pre-allocated scratch block which is then written to every channel.
    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut mixer: Mixer,
        mut command_rx: CommandConsumer,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let mut scratch = vec![0.0f32; RENDER_BLOCK];

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Drain control commands first so same-block events land
                while let Some(cmd) = ringbuf::traits::Consumer::try_pop(&mut command_rx) {
                    mixer.handle_command(cmd);
                }

                for chunk in data.chunks_mut(channels * RENDER_BLOCK) {
                    let frames = chunk.len() / channels;
                    mixer.render(&mut scratch[..frames]);

                    for (frame, &sample) in chunk.chunks_mut(channels).zip(scratch.iter()) {
                        // mono → all channels
                        for channel_sample in frame.iter_mut() {
                            *channel_sample = Sample::from_sample::<f32>(sample);
                        }
                    }
                }
            },
            move |err| {
                // Runs outside the audio callback; audio stays best-effort
                log::warn!("Audio stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::event::{GainShape, Layer, SoundKind, SourceSpec};
    use crate::synth::envelope::EnvelopeParams;
    use crate::synth::filter::FilterParams;
    use crate::synth::oscillator::WaveformType;

    const SAMPLE_RATE: f32 = 48000.0;

    fn test_mixer() -> Mixer {
        Mixer::new(SAMPLE_RATE, AudioClock::new(SAMPLE_RATE))
    }

    fn render_secs(mixer: &mut Mixer, secs: f32) -> Vec<f32> {
        let total = (secs * SAMPLE_RATE) as usize;
        let mut out = vec![0.0f32; total];
        for chunk in out.chunks_mut(512) {
            mixer.render(chunk);
        }
        out
    }

    fn rms(samples: &[f32]) -> f32 {
        let acc: f64 = samples.iter().map(|s| (*s as f64) * (*s as f64)).sum();
        (acc / samples.len().max(1) as f64).sqrt() as f32
    }

    fn clack_at(start: f64) -> SoundEvent {
        SoundEvent::new(SoundKind::Clack, start, Bus::Fx, 0.40).with_layer(Layer::new(
            SourceSpec::tone(WaveformType::Square, 220.0),
            GainShape::OneShot(EnvelopeParams::new(0.005, 0.09, 1.0)),
            0.1,
        ))
    }

    fn ambient_kick_at(start: f64) -> SoundEvent {
        SoundEvent::new(SoundKind::Kick, start, Bus::Ambient, 1.0).with_layer(Layer::new(
            SourceSpec::glide(WaveformType::Sine, 140.0, 50.0, 0.12),
            GainShape::OneShot(EnvelopeParams::new(0.002, 0.14, 1.0)),
            0.18,
        ))
    }

    #[test]
    fn test_silence_before_start_sound_after() {
        let mut mixer = test_mixer();
        mixer.handle_command(AudioCommand::Play(clack_at(0.5)));

        let before = render_secs(&mut mixer, 0.45);
        assert_eq!(rms(&before), 0.0, "Nothing before the scheduled start");

        let after = render_secs(&mut mixer, 0.1);
        assert!(rms(&after) > 0.001, "Audible after the start: {}", rms(&after));
    }

    #[test]
    fn test_past_start_plays_immediately() {
        let mut mixer = test_mixer();
        render_secs(&mut mixer, 0.2);

        // Scheduled "in the past" relative to the clock
        mixer.handle_command(AudioCommand::Play(clack_at(0.05)));
        let out = render_secs(&mut mixer, 0.05);
        assert!(rms(&out) > 0.001);
    }

    #[test]
    fn test_ambient_bus_is_gated_by_ambient_gain() {
        let mut mixer = test_mixer();

        // Gain still at its initial 0.0: the kick must not be heard
        mixer.handle_command(AudioCommand::Play(ambient_kick_at(0.0)));
        let muted = render_secs(&mut mixer, 0.2);
        assert_eq!(rms(&muted), 0.0);

        // Open the bus and play another one
        mixer.handle_command(AudioCommand::AmbientGain { target: 1.0, ramp_secs: 0.0 });
        mixer.handle_command(AudioCommand::Play(ambient_kick_at(0.25)));
        let open = render_secs(&mut mixer, 0.2);
        assert!(rms(&open) > 0.001);
    }

    #[test]
    fn test_ambient_gain_cut_is_immediate() {
        let mut mixer = test_mixer();
        mixer.handle_command(AudioCommand::AmbientGain { target: 1.0, ramp_secs: 0.0 });
        mixer.handle_command(AudioCommand::Play(ambient_kick_at(0.0)));
        render_secs(&mut mixer, 0.02);

        // Stop: gain to zero with no fade, mid-voice
        mixer.handle_command(AudioCommand::AmbientGain { target: 0.0, ramp_secs: 0.0 });
        let after = render_secs(&mut mixer, 0.05);
        assert_eq!(rms(&after), 0.0);
    }

    #[test]
    fn test_stop_kind_cancels_active_and_pending() {
        let mut mixer = test_mixer();

        let whoosh = SoundEvent::new(SoundKind::Whoosh, 0.0, Bus::Fx, 1.0).with_layer(
            Layer::new(
                SourceSpec::looped_noise(),
                GainShape::Ramp { from: 0.18, to: 0.10 },
                4.0,
            )
            .with_filter(FilterParams::bandpass(950.0, 0.8)),
        );
        mixer.handle_command(AudioCommand::Play(whoosh));
        // A tick still pending in the future
        let pending_tick = SoundEvent::new(SoundKind::Whoosh, 2.0, Bus::Fx, 1.0).with_layer(
            Layer::new(SourceSpec::noise(), GainShape::Ramp { from: 1.0, to: 1.0 }, 0.5),
        );
        mixer.handle_command(AudioCommand::Play(pending_tick));

        let running = render_secs(&mut mixer, 0.1);
        assert!(rms(&running) > 0.0001);
        assert_eq!(mixer.active_voices(), 1);

        mixer.handle_command(AudioCommand::StopKind(SoundKind::Whoosh));
        assert_eq!(mixer.active_voices(), 0);

        let after = render_secs(&mut mixer, 2.5);
        assert_eq!(rms(&after), 0.0, "Pending voices of the kind are gone too");
    }

    #[test]
    fn test_finished_voices_are_released() {
        let mut mixer = test_mixer();
        mixer.handle_command(AudioCommand::Play(clack_at(0.0)));

        render_secs(&mut mixer, 0.05);
        assert_eq!(mixer.active_voices(), 1);

        render_secs(&mut mixer, 0.2);
        assert_eq!(mixer.active_voices(), 0, "Voice released after its decay");
    }

    #[test]
    fn test_output_stays_in_range_under_load() {
        let mut mixer = test_mixer();
        mixer.handle_command(AudioCommand::AmbientGain { target: 1.0, ramp_secs: 0.0 });
        // Pile up events
        for i in 0..20 {
            mixer.handle_command(AudioCommand::Play(ambient_kick_at(i as f64 * 0.01)));
            mixer.handle_command(AudioCommand::Play(clack_at(i as f64 * 0.01)));
        }

        let out = render_secs(&mut mixer, 0.5);
        for s in out {
            assert!((-1.0..=1.0).contains(&s), "Sample out of range: {}", s);
        }
    }
}
