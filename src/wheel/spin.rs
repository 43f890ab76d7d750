// Spin timeline - Idle → Spinning → Landed, single-shot per invocation
//
// The outcome is decided before the animation starts: the target rotation
// is computed so the configured winning segment ends under the pointer,
// whatever the intermediate motion looks like. The tick cascade and the
// whoosh are choreography on top of a foregone conclusion.

use crate::audio::event::{AudioCommand, SoundKind};
use crate::audio::output::EventSink;
use crate::wheel::easing::{CubicBezier, spin_ease};
use crate::wheel::segment::{Segment, center_angle, landed_index};
use crate::wheel::sfx;
use crate::wheel::ticks::TickSchedule;

/// Phase of the spin state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
    Landed,
}

/// Result reported exactly once when a spin lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinOutcome {
    pub segment: usize,
    pub is_winner: bool,
}

/// Transient state of one spin
struct SpinSession {
    started_at: f64,
    start_rotation: f32,
    target_rotation: f32,
    ticks: TickSchedule,
}

/// Orchestrates one wheel rotation with its sound choreography
pub struct SpinTimeline {
    segments: Vec<Segment>,
    winning_index: usize,
    duration: f64,
    full_turns: u32,
    tick_volume: f32,
    whoosh_volume: f32,
    clack_volume: f32,
    easing: CubicBezier,

    phase: SpinPhase,
    /// Rotation committed at rest (degrees, grows across sessions)
    rotation: f32,
    session: Option<SpinSession>,
}

impl SpinTimeline {
    pub fn new(
        segments: Vec<Segment>,
        duration_secs: f64,
        full_turns: u32,
        tick_volume: f32,
        whoosh_volume: f32,
        clack_volume: f32,
    ) -> Self {
        assert!(!segments.is_empty(), "Wheel needs at least one segment");
        let winning_index = segments
            .iter()
            .position(|s| s.is_winner)
            .expect("Exactly one segment must be flagged as winner");

        Self {
            segments,
            winning_index,
            duration: duration_secs,
            full_turns,
            tick_volume,
            whoosh_volume,
            clack_volume,
            easing: spin_ease(),
            phase: SpinPhase::Idle,
            rotation: 0.0,
            session: None,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn winning_index(&self) -> usize {
        self.winning_index
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment currently under the pointer, for the committed rotation
    pub fn landed_segment(&self) -> usize {
        landed_index(self.rotation, self.segments.len())
    }

    /// Start a spin; a second trigger while spinning is a no-op
    ///
    /// Returns whether a new session actually started.
    pub fn spin(&mut self, now: f64, sink: &mut impl EventSink) -> bool {
        if self.phase == SpinPhase::Spinning {
            return false;
        }

        let start_rotation = self.rotation;
        let target_rotation = self.resolve_target(start_rotation);

        sink.play(sfx::whoosh(now, self.duration, self.whoosh_volume));

        self.session = Some(SpinSession {
            started_at: now,
            start_rotation,
            target_rotation,
            ticks: TickSchedule::new(self.duration, self.tick_volume),
        });
        self.phase = SpinPhase::Spinning;
        true
    }

    /// Pump the timeline; returns the outcome on the landing transition
    pub fn update(&mut self, now: f64, sink: &mut impl EventSink) -> Option<SpinOutcome> {
        if self.phase != SpinPhase::Spinning {
            return None;
        }
        let Some(session) = self.session.as_mut() else {
            return None;
        };

        let elapsed = now - session.started_at;
        if let Some(tick) = session.ticks.poll(elapsed) {
            sink.play(sfx::tick(now, tick.volume));
        }

        if elapsed < self.duration {
            return None;
        }

        // Landing: freeze the rotation on the target, cut the spin bed,
        // clack, and fanfare only for the winning outcome.
        self.rotation = session.target_rotation;
        self.session = None;
        self.phase = SpinPhase::Landed;

        sink.submit(AudioCommand::StopKind(SoundKind::Whoosh));
        sink.play(sfx::clack(now, self.clack_volume));

        let segment = self.landed_segment();
        let is_winner = self.segments[segment].is_winner;
        if is_winner {
            for note in sfx::fanfare(now) {
                sink.play(note);
            }
        }

        Some(SpinOutcome { segment, is_winner })
    }

    /// Eased rotation angle at `now`, for the rendering surface
    pub fn rotation(&self, now: f64) -> f32 {
        match (&self.session, self.phase) {
            (Some(session), SpinPhase::Spinning) => {
                let progress = ((now - session.started_at) / self.duration).clamp(0.0, 1.0);
                let eased = self.easing.evaluate(progress as f32);
                session.start_rotation
                    + (session.target_rotation - session.start_rotation) * eased
            }
            _ => self.rotation,
        }
    }

    /// Target angle: full turns plus the offset that parks the winner's
    /// center under the pointer
    fn resolve_target(&self, from: f32) -> f32 {
        let aligned = -center_angle(self.winning_index, self.segments.len());
        let base = from + 360.0 * self.full_turns as f32;
        base + (aligned - base).rem_euclid(360.0)
    }
}
