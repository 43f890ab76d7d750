// Reveal flow - the staged modal after a winning spin
//
// Intro (prize teaser) → EggChoice (three eggs, first pick locks the rest)
// → Revealed (fixed prize + redeem action). Whichever egg is chosen, the
// same configured prize comes out; the choice only drives the staging. The
// crack plays immediately, the Revealed stage lands after a fixed delay
// that stands in for the shell-breaking animation.

use crate::audio::event::{Bus, GainShape, Layer, SoundEvent, SoundKind, SourceSpec};
use crate::audio::output::EventSink;
use crate::synth::envelope::EnvelopeParams;
use crate::synth::filter::FilterParams;
use crate::synth::oscillator::WaveformType;

/// Number of selectable eggs
pub const EGG_COUNT: usize = 3;

/// Delay between the egg pick and the Revealed stage, seconds
pub const REVEAL_DELAY_SECS: f64 = 1.0;

/// Stage of the reveal modal; transitions are forward-only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStage {
    Intro,
    EggChoice,
    Revealed,
}

/// The staged reveal state machine
pub struct RevealFlow {
    open: bool,
    stage: RevealStage,
    selected_egg: Option<usize>,
    reveal_at: Option<f64>,
    prize_name: String,
    offer_url: String,
    crack_volume: f32,
}

impl RevealFlow {
    pub fn new(prize_name: &str, offer_url: &str) -> Self {
        Self {
            open: false,
            stage: RevealStage::Intro,
            selected_egg: None,
            reveal_at: None,
            prize_name: prize_name.to_string(),
            offer_url: offer_url.to_string(),
            crack_volume: 0.95,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn stage(&self) -> RevealStage {
        self.stage
    }

    pub fn selected_egg(&self) -> Option<usize> {
        self.selected_egg
    }

    pub fn prize_name(&self) -> &str {
        &self.prize_name
    }

    /// Open the modal at the Intro stage
    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
        }
    }

    /// Close and reset; the only way back to Intro
    pub fn close(&mut self) {
        self.open = false;
        self.stage = RevealStage::Intro;
        self.selected_egg = None;
        self.reveal_at = None;
    }

    /// Intro → EggChoice (the "continue" action)
    pub fn advance(&mut self) -> bool {
        if self.open && self.stage == RevealStage::Intro {
            self.stage = RevealStage::EggChoice;
            true
        } else {
            false
        }
    }

    /// Pick an egg: plays the crack and schedules the reveal
    ///
    /// The first selection locks the others; later picks are ignored.
    pub fn choose_egg(&mut self, index: usize, now: f64, sink: &mut impl EventSink) -> bool {
        if !self.open || self.stage != RevealStage::EggChoice {
            return false;
        }
        if self.selected_egg.is_some() || index >= EGG_COUNT {
            return false;
        }

        self.selected_egg = Some(index);
        self.reveal_at = Some(now + REVEAL_DELAY_SECS);
        sink.play(crack(now, self.crack_volume));
        true
    }

    /// Pump the delay; true on the EggChoice → Revealed transition
    pub fn update(&mut self, now: f64) -> bool {
        if let Some(at) = self.reveal_at {
            if now >= at && self.stage == RevealStage::EggChoice {
                self.stage = RevealStage::Revealed;
                self.reveal_at = None;
                return true;
            }
        }
        false
    }

    /// Terminal action: the offer URL to navigate to, once Revealed
    pub fn redeem(&self) -> Option<&str> {
        if self.open && self.stage == RevealStage::Revealed {
            Some(&self.offer_url)
        } else {
            None
        }
    }
}

/// The egg crack: four staggered layers inside ~220 ms
///
/// Two descending clicks 35 ms apart, a filtered noise burst for the shell,
/// a short metallic shard ring and a low thump for the impact.
pub fn crack(at: f64, volume: f32) -> SoundEvent {
    let mut event = SoundEvent::new(SoundKind::Crack, at, Bus::Fx, volume);

    // Descending clicks
    for i in 0..2 {
        event = event.with_layer(
            Layer::new(
                SourceSpec::glide(
                    WaveformType::Square,
                    1200.0 - i as f32 * 250.0,
                    200.0,
                    0.06,
                ),
                GainShape::OneShot(EnvelopeParams::new(0.0, 0.07, 0.7)),
                0.08,
            )
            .with_delay(i as f32 * 0.035),
        );
    }

    // Shell burst
    event = event.with_layer(
        Layer::new(
            SourceSpec::noise(),
            GainShape::OneShot(EnvelopeParams::new(0.012, 0.18, 1.0)),
            0.22,
        )
        .with_filter(FilterParams::bandpass(3000.0, 1.0))
        .with_filter(FilterParams::highpass(700.0))
        .with_delay(0.015),
    );

    // Shard ring
    event = event.with_layer(
        Layer::new(
            SourceSpec::glide(WaveformType::Triangle, 2400.0, 900.0, 0.11),
            GainShape::OneShot(EnvelopeParams::new(0.0, 0.11, 0.28)),
            0.12,
        )
        .with_delay(0.07),
    );

    // Impact thump
    event.with_layer(
        Layer::new(
            SourceSpec::glide(WaveformType::Sine, 140.0, 70.0, 0.09),
            GainShape::OneShot(EnvelopeParams::new(0.0, 0.12, 0.25)),
            0.12,
        )
        .with_delay(0.02),
    )
}
