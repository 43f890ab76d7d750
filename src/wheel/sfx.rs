// Spin sound recipes - tick, whoosh, clack and the winner fanfare

use crate::audio::event::{Bus, GainShape, Layer, SoundEvent, SoundKind, SourceSpec};
use crate::synth::envelope::EnvelopeParams;
use crate::synth::filter::FilterParams;
use crate::synth::oscillator::WaveformType;

/// Ascending fanfare motif, Hz (A4 C5 E5 C5 E5 A5)
const FANFARE_NOTES: [f32; 6] = [440.0, 523.25, 659.25, 523.25, 659.25, 880.0];

/// Gap between fanfare notes, seconds
const FANFARE_STEP: f64 = 0.12;

/// One wheel tick: the shared noise transient, brightened
///
/// High-pass keeps the click out of the ambient bass range, the peaking
/// stage adds the 3 kHz snap.
pub fn tick(at: f64, volume: f32) -> SoundEvent {
    SoundEvent::new(SoundKind::Tick, at, Bus::Fx, volume).with_layer(
        Layer::new(
            SourceSpec::TickTransient,
            GainShape::Ramp { from: 1.0, to: 1.0 },
            0.03,
        )
        .with_filter(FilterParams::highpass(1200.0))
        .with_filter(FilterParams::peaking(3000.0, 1.2, 6.0)),
    )
}

/// The spin's air bed: looped band-passed noise fading across the spin
pub fn whoosh(at: f64, duration_secs: f64, volume: f32) -> SoundEvent {
    SoundEvent::new(SoundKind::Whoosh, at, Bus::Fx, 1.0).with_layer(
        Layer::new(
            SourceSpec::looped_noise(),
            GainShape::Ramp {
                from: volume,
                to: 0.10,
            },
            duration_secs as f32,
        )
        .with_filter(FilterParams::bandpass(950.0, 0.8)),
    )
}

/// Landing clack: a short percussive square hit
pub fn clack(at: f64, volume: f32) -> SoundEvent {
    SoundEvent::new(SoundKind::Clack, at, Bus::Fx, volume).with_layer(Layer::new(
        SourceSpec::tone(WaveformType::Square, 220.0),
        GainShape::OneShot(EnvelopeParams::new(0.005, 0.09, 1.0)),
        0.1,
    ))
}

/// Winner fanfare: six ascending notes alternating triangle and square
pub fn fanfare(at: f64) -> Vec<SoundEvent> {
    FANFARE_NOTES
        .iter()
        .enumerate()
        .map(|(i, &freq)| {
            let waveform = if i % 2 == 1 {
                WaveformType::Square
            } else {
                WaveformType::Triangle
            };
            SoundEvent::new(
                SoundKind::FanfareNote,
                at + i as f64 * FANFARE_STEP,
                Bus::Fx,
                0.8,
            )
            .with_layer(Layer::new(
                SourceSpec::tone(waveform, freq),
                GainShape::OneShot(EnvelopeParams::new(0.02, 0.2, 1.0)),
                0.22,
            ))
        })
        .collect()
}
