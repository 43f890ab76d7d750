// Pattern - The fixed 16-step ambient groove
//
// One bar of four-on-the-floor: kick on every beat, snare on 4 and 12,
// hats on every sixteenth (open on the off-beat), bass root under each
// beat and a chord stab on the downbeat. The chord progression cycles
// every `chord_change_bars` bars.

use crate::sequencer::timeline::STEPS_PER_BAR;

/// One musical hit produced by the pattern at a given step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Kick,
    Snare,
    Hat { open: bool },
    Bass { freq: f32 },
    Chord { triad: [f32; 3] },
}

/// The fixed ambient pattern
///
/// Triads are spelled in Hz rather than note names because the synth layer
/// only ever deals in frequencies.
#[derive(Debug, Clone)]
pub struct AmbientPattern {
    chords: [[f32; 3]; 4],
    chord_change_bars: u32,
}

impl AmbientPattern {
    pub fn new(chord_change_bars: u32) -> Self {
        assert!(chord_change_bars > 0, "Chord change interval must be >= 1 bar");
        Self {
            // A - F - G - Em voicings around the A3 octave
            chords: [
                [220.00, 277.18, 329.63],
                [174.61, 220.00, 261.63],
                [196.00, 246.94, 293.66],
                [164.81, 196.00, 246.94],
            ],
            chord_change_bars,
        }
    }

    /// Chord in effect during the given bar
    pub fn chord_for_bar(&self, bar: u32) -> [f32; 3] {
        let index = (bar / self.chord_change_bars) as usize % self.chords.len();
        self.chords[index]
    }

    /// Hits to schedule at `step` of `bar`
    ///
    /// At most one hit of each kind per step, so the scheduler can never
    /// emit duplicate events at the same time.
    pub fn hits(&self, step: usize, bar: u32) -> Vec<Hit> {
        assert!(step < STEPS_PER_BAR, "Step out of range: {}", step);

        let chord = self.chord_for_bar(bar);
        let is_beat = step % 4 == 0;
        let mut hits = Vec::with_capacity(5);

        if is_beat {
            hits.push(Hit::Kick);
        }
        if step == 4 || step == 12 {
            hits.push(Hit::Snare);
        }
        // Hats run on every sixteenth, opening on the off-beat
        hits.push(Hit::Hat { open: step % 4 == 2 });

        if is_beat {
            // Root an octave below the chord voicing
            hits.push(Hit::Bass { freq: chord[0] / 2.0 });
        }
        if step == 0 {
            hits.push(Hit::Chord { triad: chord });
        }

        hits
    }
}

impl Default for AmbientPattern {
    fn default() -> Self {
        Self::new(1)
    }
}
