// Ambient sequencer - look-ahead scheduling of the background loop
//
// A coarse poll (the widget pumps `tick` roughly every 25 ms of wall time)
// scans forward and schedules every musical event whose start falls inside
// a fixed look-ahead window on the audio clock, then advances the step
// cursor. Musical timing stays sample-accurate on the audio clock while the
// poll itself can jitter freely - the standard look-ahead discipline.

use crate::audio::event::AudioCommand;
use crate::audio::output::EventSink;
use crate::sequencer::kit;
use crate::sequencer::pattern::AmbientPattern;
use crate::sequencer::timeline::{STEPS_PER_BAR, Tempo};

/// Look-ahead window on the audio clock, seconds
const LOOKAHEAD_SECS: f64 = 0.12;

/// Offset of the first scheduled step after start, seconds
const START_DELAY_SECS: f64 = 0.05;

/// Fade-in time of the ambient bus on start, seconds
const START_RAMP_SECS: f32 = 1.0;

/// Recommended poll cadence for `tick`, milliseconds
pub const POLL_INTERVAL_MS: u64 = 25;

/// Continuous background-music scheduler
///
/// Start is idempotent; stop cuts the ambient bus instantly and stops
/// scheduling (already-scheduled events die with the bus gain, matching
/// the no-fade-out contract).
pub struct AmbientSequencer {
    started: bool,
    step: usize,
    bar: u32,
    /// Next un-scheduled step time on the audio clock (the watermark)
    next_time: f64,
    sixteenth: f64,
    pattern: AmbientPattern,
    /// Target gain of the ambient bus
    level: f32,
}

impl AmbientSequencer {
    pub fn new(tempo: Tempo, pattern: AmbientPattern, level: f32) -> Self {
        Self {
            started: false,
            step: 0,
            bar: 0,
            next_time: 0.0,
            sixteenth: tempo.sixteenth_duration_seconds(),
            pattern,
            level,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start the loop; calling again while started is a no-op
    pub fn start(&mut self, audio_now: f64, sink: &mut impl EventSink) {
        if self.started {
            return;
        }
        self.started = true;
        self.step = 0;
        self.bar = 0;
        self.next_time = audio_now + START_DELAY_SECS;

        sink.submit(AudioCommand::AmbientGain {
            target: self.level,
            ramp_secs: START_RAMP_SECS,
        });
    }

    /// Silence the ambient bus immediately and stop scheduling
    pub fn stop(&mut self, sink: &mut impl EventSink) {
        if !self.started {
            return;
        }
        self.started = false;
        sink.submit(AudioCommand::AmbientGain {
            target: 0.0,
            ramp_secs: 0.0,
        });
    }

    /// Schedule every step that falls inside the look-ahead window
    pub fn tick(&mut self, audio_now: f64, sink: &mut impl EventSink) {
        if !self.started {
            return;
        }

        while self.next_time < audio_now + LOOKAHEAD_SECS {
            for hit in self.pattern.hits(self.step, self.bar) {
                sink.play(kit::event_for(hit, self.next_time));
            }

            self.step = (self.step + 1) % STEPS_PER_BAR;
            if self.step == 0 {
                self.bar += 1;
            }
            self.next_time += self.sixteenth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::event::{AudioCommand, SoundKind};

    fn sequencer() -> AmbientSequencer {
        AmbientSequencer::new(Tempo::default(), AmbientPattern::default(), 0.08)
    }

    fn played(commands: &[AudioCommand]) -> Vec<(SoundKind, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                AudioCommand::Play(e) => Some((e.kind, e.start)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_ramps_ambient_gain() {
        let mut seq = sequencer();
        let mut sink: Vec<AudioCommand> = Vec::new();

        seq.start(0.0, &mut sink);
        assert!(seq.is_started());
        assert!(matches!(
            sink[0],
            AudioCommand::AmbientGain { target, ramp_secs } if target == 0.08 && ramp_secs == 1.0
        ));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut seq = sequencer();
        let mut sink: Vec<AudioCommand> = Vec::new();

        seq.start(0.0, &mut sink);
        seq.tick(0.0, &mut sink);
        let after_first = sink.len();

        // A second start must not reset the cursor or re-emit anything
        seq.start(0.0, &mut sink);
        assert_eq!(sink.len(), after_first);

        seq.tick(0.0, &mut sink);
        assert_eq!(sink.len(), after_first, "Watermark already past the window");
    }

    #[test]
    fn test_events_land_inside_lookahead_window() {
        let mut seq = sequencer();
        let mut sink: Vec<AudioCommand> = Vec::new();

        seq.start(0.0, &mut sink);
        seq.tick(0.0, &mut sink);

        let events = played(&sink);
        assert!(!events.is_empty());
        for (kind, start) in &events {
            assert!(
                *start >= 0.05 && *start < 0.12 + 1e-9,
                "{:?} scheduled at {} outside the window",
                kind,
                start
            );
        }
    }

    #[test]
    fn test_no_duplicate_kind_at_same_time() {
        let mut seq = sequencer();
        let mut sink: Vec<AudioCommand> = Vec::new();

        seq.start(0.0, &mut sink);
        // Simulate 4 seconds of 25ms polling
        for i in 0..160 {
            seq.tick(i as f64 * 0.025, &mut sink);
        }

        let events = played(&sink);
        assert!(events.len() > 50, "Four seconds of groove: {}", events.len());

        for (i, a) in events.iter().enumerate() {
            for b in events.iter().skip(i + 1) {
                assert!(
                    !(a.0 == b.0 && (a.1 - b.1).abs() < 1e-9),
                    "Duplicate {:?} at {}",
                    a.0,
                    a.1
                );
            }
        }
    }

    #[test]
    fn test_poll_jitter_does_not_skip_steps() {
        let mut seq = sequencer();
        let mut sink: Vec<AudioCommand> = Vec::new();

        seq.start(0.0, &mut sink);
        // Irregular polling, including a long 300ms stall
        for now in [0.0, 0.025, 0.3, 0.35, 0.6, 1.0, 1.9, 2.0] {
            seq.tick(now, &mut sink);
        }

        // Kicks land every 4 sixteenths regardless of poll cadence
        let mut kicks: Vec<f64> = played(&sink)
            .into_iter()
            .filter(|(k, _)| *k == SoundKind::Kick)
            .map(|(_, t)| t)
            .collect();
        kicks.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let sixteenth = Tempo::default().sixteenth_duration_seconds();
        for pair in kicks.windows(2) {
            assert!(
                (pair[1] - pair[0] - 4.0 * sixteenth).abs() < 1e-9,
                "Kick spacing broken: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_stop_cuts_gain_and_scheduling() {
        let mut seq = sequencer();
        let mut sink: Vec<AudioCommand> = Vec::new();

        seq.start(0.0, &mut sink);
        seq.tick(0.0, &mut sink);
        seq.stop(&mut sink);

        assert!(!seq.is_started());
        assert!(matches!(
            sink.last(),
            Some(AudioCommand::AmbientGain { target, ramp_secs }) if *target == 0.0 && *ramp_secs == 0.0
        ));

        // Nothing further after stop
        let before = sink.len();
        seq.tick(1.0, &mut sink);
        assert_eq!(sink.len(), before);
    }

    #[test]
    fn test_chord_changes_every_bar() {
        let mut seq = sequencer();
        let mut sink: Vec<AudioCommand> = Vec::new();

        seq.start(0.0, &mut sink);
        // Two bars at 126 BPM ≈ 3.81s; poll well past that
        for i in 0..200 {
            seq.tick(i as f64 * 0.025, &mut sink);
        }

        let chords: Vec<_> = sink
            .iter()
            .filter_map(|c| match c {
                AudioCommand::Play(e) if e.kind == SoundKind::Chord => Some(e.clone()),
                _ => None,
            })
            .collect();
        assert!(chords.len() >= 2);

        // Consecutive bars carry different voicings (progression advances)
        assert_ne!(chords[0].layers, chords[1].layers);
    }
}
