// Widget controller - wires the wheel, audio, reveal and particles together
//
// The widget owns the audio output handle and injects it into every
// sound-producing component; there is no global audio state. A single
// `update` pump drives all schedules (look-ahead sequencer, tick cascade,
// reveal delay, particle cadences), so tearing the widget down is one drop:
// schedules die with it and the stream closes with the handle.

use crate::audio::output::AudioOutput;
use crate::config::CampaignConfig;
use crate::particles::ParticleField;
use crate::reveal::RevealFlow;
use crate::sequencer::{AmbientPattern, AmbientSequencer, Tempo};
use crate::wheel::{SpinOutcome, SpinPhase, SpinTimeline};
use std::time::Instant;

/// Default viewport for the particle field, pixels
const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);

/// Everything the embedding surface reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The spin finished; the reveal modal has been opened
    SpinLanded(SpinOutcome),
    /// The egg-crack delay elapsed; the prize is on display
    PrizeRevealed,
    /// Terminal action: navigate to this URL
    Redirect(String),
}

/// Top-level controller of the promotional widget
pub struct WheelWidget {
    config: CampaignConfig,
    audio: AudioOutput,
    ambient: AmbientSequencer,
    spin: SpinTimeline,
    reveal: RevealFlow,
    particles: ParticleField,
    started: Instant,
}

impl WheelWidget {
    /// Default campaign on the default audio device (muted on failure)
    pub fn new() -> Self {
        Self::with_audio(CampaignConfig::default(), AudioOutput::new())
    }

    pub fn with_config(config: CampaignConfig) -> Self {
        Self::with_audio(config, AudioOutput::new())
    }

    /// Explicit audio handle, e.g. `AudioOutput::muted()` in tests
    pub fn with_audio(config: CampaignConfig, audio: AudioOutput) -> Self {
        config.validate().expect("Invalid campaign configuration");

        let ambient = AmbientSequencer::new(
            Tempo::new(config.bpm),
            AmbientPattern::new(config.chord_change_bars),
            config.ambient_level,
        );
        let spin = SpinTimeline::new(
            config.segments.clone(),
            config.spin_duration_secs(),
            config.full_turns,
            config.tick_volume,
            config.whoosh_volume,
            config.clack_volume,
        );
        let reveal = RevealFlow::new(&config.winning_segment().name, &config.offer_url);
        let particles = ParticleField::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1);

        Self {
            config,
            audio,
            ambient,
            spin,
            reveal,
            particles,
            started: Instant::now(),
        }
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// The clock every schedule runs on: the audio clock when live (keeps
    /// sounds sample-aligned with the choreography), wall time otherwise.
    fn clock_now(&self) -> f64 {
        if self.audio.is_live() {
            self.audio.now()
        } else {
            self.started.elapsed().as_secs_f64()
        }
    }

    /// Pump every schedule; call at least every ~25 ms
    pub fn update(&mut self) -> Vec<WidgetEvent> {
        let now = self.clock_now();
        self.update_at(now)
    }

    /// Pump with an explicit clock value (simulations and tests)
    pub fn update_at(&mut self, now: f64) -> Vec<WidgetEvent> {
        let mut events = Vec::new();

        // The ambient loop starts as soon as the backend allows it; while
        // the platform keeps audio closed this retries on every pump, which
        // is what a first-gesture unlock needs.
        if self.audio.is_live() && !self.ambient.is_started() {
            self.ambient.start(now, &mut self.audio);
        }
        self.ambient.tick(now, &mut self.audio);

        if let Some(outcome) = self.spin.update(now, &mut self.audio) {
            self.reveal.open();
            events.push(WidgetEvent::SpinLanded(outcome));
        }

        if self.reveal.update(now) {
            events.push(WidgetEvent::PrizeRevealed);
        }

        self.particles.update(now);

        events
    }

    /// Trigger a spin; returns false while one is already running
    pub fn spin(&mut self) -> bool {
        let now = self.clock_now();
        self.spin.spin(now, &mut self.audio)
    }

    pub fn spin_phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    /// Current wheel angle for the rendering surface, degrees
    pub fn rotation(&self) -> f32 {
        self.spin.rotation(self.clock_now())
    }

    /// Rotation at an explicit clock value (simulations and tests)
    pub fn rotation_at(&self, now: f64) -> f32 {
        self.spin.rotation(now)
    }

    pub fn reveal(&self) -> &RevealFlow {
        &self.reveal
    }

    /// Open the reveal modal manually (it also opens itself on a landing)
    pub fn open_reveal(&mut self) {
        self.reveal.open();
    }

    /// Reveal "continue" action (Intro → EggChoice)
    pub fn advance_reveal(&mut self) -> bool {
        self.reveal.advance()
    }

    /// Pick an egg (crack sound + delayed reveal)
    pub fn choose_egg(&mut self, index: usize) -> bool {
        let now = self.clock_now();
        self.reveal.choose_egg(index, now, &mut self.audio)
    }

    /// Terminal action: the redirect the surface must perform
    pub fn redeem(&self) -> Option<WidgetEvent> {
        self.reveal
            .redeem()
            .map(|url| WidgetEvent::Redirect(url.to_string()))
    }

    pub fn close_reveal(&mut self) {
        self.reveal.close();
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn audio_is_live(&self) -> bool {
        self.audio.is_live()
    }

    pub fn ambient_is_running(&self) -> bool {
        self.ambient.is_started()
    }
}

impl Default for WheelWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WheelWidget {
    fn drop(&mut self) {
        // Silence the loop before the stream handle goes away
        self.ambient.stop(&mut self.audio);
    }
}
