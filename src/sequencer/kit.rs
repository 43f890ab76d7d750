// Kit - Synthesis recipes for the ambient drum machine
//
// Each builder turns a pattern hit into one SoundEvent on the ambient bus:
// sine-drop kick, noise+tone snare, high-passed hats, low-passed saw bass
// and a soft triad stab.

use crate::audio::event::{Bus, GainShape, Layer, SoundEvent, SoundKind, SourceSpec};
use crate::sequencer::pattern::Hit;
use crate::synth::envelope::EnvelopeParams;
use crate::synth::filter::FilterParams;
use crate::synth::oscillator::WaveformType;

/// Kick: sine dropping 140→50 Hz with a fast attack
pub fn kick(at: f64) -> SoundEvent {
    SoundEvent::new(SoundKind::Kick, at, Bus::Ambient, 1.0).with_layer(Layer::new(
        SourceSpec::glide(WaveformType::Sine, 140.0, 50.0, 0.12),
        GainShape::OneShot(EnvelopeParams::new(0.002, 0.14, 1.0)),
        0.18,
    ))
}

/// Snare: band-passed noise body plus a 180 Hz triangle knock
pub fn snare(at: f64) -> SoundEvent {
    SoundEvent::new(SoundKind::Snare, at, Bus::Ambient, 1.0)
        .with_layer(
            Layer::new(
                SourceSpec::noise(),
                GainShape::OneShot(EnvelopeParams::new(0.001, 0.12, 0.9)),
                0.16,
            )
            .with_filter(FilterParams::bandpass(2000.0, 0.8))
            .with_filter(FilterParams::highpass(1000.0)),
        )
        .with_layer(Layer::new(
            SourceSpec::tone(WaveformType::Triangle, 180.0),
            GainShape::OneShot(EnvelopeParams::new(0.002, 0.09, 0.4)),
            0.12,
        ))
}

/// Hat: high-passed noise; the open variant rings out longer and louder
pub fn hat(at: f64, open: bool) -> SoundEvent {
    let (decay, peak, duration) = if open { (0.15, 0.5, 0.2) } else { (0.05, 0.35, 0.08) };
    SoundEvent::new(SoundKind::Hat, at, Bus::Ambient, 1.0).with_layer(
        Layer::new(
            SourceSpec::noise(),
            GainShape::OneShot(EnvelopeParams::new(0.001, decay, peak)),
            duration,
        )
        .with_filter(FilterParams::highpass(6000.0)),
    )
}

/// Bass: low-passed saw under the chord root
pub fn bass(at: f64, freq: f32) -> SoundEvent {
    SoundEvent::new(SoundKind::Bass, at, Bus::Ambient, 1.0).with_layer(
        Layer::new(
            SourceSpec::tone(WaveformType::Saw, freq),
            GainShape::OneShot(EnvelopeParams::new(0.005, 0.18, 0.6)),
            0.22,
        )
        .with_filter(FilterParams::lowpass(400.0)),
    )
}

/// Chord stab: three low-passed partials, alternating triangle and square
pub fn chord(at: f64, triad: [f32; 3]) -> SoundEvent {
    let mut event = SoundEvent::new(SoundKind::Chord, at, Bus::Ambient, 0.8);
    for (i, freq) in triad.into_iter().enumerate() {
        let waveform = if i % 2 == 1 {
            WaveformType::Square
        } else {
            WaveformType::Triangle
        };
        event = event.with_layer(
            Layer::new(
                SourceSpec::tone(waveform, freq),
                GainShape::OneShot(EnvelopeParams::new(0.004, 0.25, 0.7)),
                0.28,
            )
            .with_filter(FilterParams::lowpass(1500.0)),
        );
    }
    event
}

/// Map a pattern hit to its sound at the given time
pub fn event_for(hit: Hit, at: f64) -> SoundEvent {
    match hit {
        Hit::Kick => kick(at),
        Hit::Snare => snare(at),
        Hit::Hat { open } => hat(at, open),
        Hit::Bass { freq } => bass(at, freq),
        Hit::Chord { triad } => chord(at, triad),
    }
}
