// Tick schedule - the decelerating click cadence of a spin
//
// An explicit pumped schedule instead of a self-rescheduling timer chain:
// the owner polls with the session's elapsed time and receives at most one
// due tick per poll. Cancellation is simply dropping the schedule.
//
// Cadence is tied to the elapsed fraction of the total duration, not to the
// eased rotation speed; the two stay close enough that the illusion holds.

/// Initial interval between ticks, seconds
const INITIAL_INTERVAL: f64 = 0.06;

/// Geometric growth applied after every tick
const INTERVAL_GROWTH: f64 = 1.06;

/// No ticks inside this window before the landing, seconds
const QUIET_TAIL: f64 = 0.12;

/// Fraction of the base volume faded out across the spin
const VOLUME_FADE: f32 = 0.35;

/// A due tick with its faded volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub volume: f32,
}

/// Decelerating tick schedule for one spin session
#[derive(Debug, Clone)]
pub struct TickSchedule {
    total: f64,
    interval: f64,
    next_at: f64,
    base_volume: f32,
}

impl TickSchedule {
    pub fn new(total_secs: f64, base_volume: f32) -> Self {
        Self {
            total: total_secs,
            interval: INITIAL_INTERVAL,
            next_at: 0.0,
            base_volume,
        }
    }

    /// Current interval (monotonically non-decreasing across a session)
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Return the due tick at `elapsed` seconds into the session, if any
    ///
    /// Ticking is suppressed in the final quiet window so the landing clack
    /// reads cleanly on its own.
    pub fn poll(&mut self, elapsed: f64) -> Option<Tick> {
        if elapsed < self.next_at {
            return None;
        }
        if elapsed > self.total - QUIET_TAIL {
            return None;
        }

        let fade = 1.0 - VOLUME_FADE * (elapsed / self.total) as f32;
        let tick = Tick {
            volume: self.base_volume * fade,
        };

        self.interval *= INTERVAL_GROWTH;
        self.next_at = elapsed + self.interval;

        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pump the schedule on a fine grid and collect (time, tick) pairs
    fn run(total: f64, dt: f64) -> Vec<(f64, Tick)> {
        let mut schedule = TickSchedule::new(total, 0.22);
        let mut ticks = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < total {
            if let Some(tick) = schedule.poll(elapsed) {
                ticks.push((elapsed, tick));
            }
            elapsed += dt;
        }
        ticks
    }

    #[test]
    fn test_first_tick_fires_immediately() {
        let mut schedule = TickSchedule::new(4.0, 0.22);
        let tick = schedule.poll(0.0).expect("First tick is due at once");
        assert!((tick.volume - 0.22).abs() < 1e-6);
    }

    #[test]
    fn test_intervals_never_shrink() {
        let ticks = run(4.0, 0.001);
        assert!(ticks.len() > 20, "A 4s spin produces a cascade: {}", ticks.len());

        let mut previous_gap = 0.0;
        for pair in ticks.windows(2) {
            let gap = pair[1].0 - pair[0].0;
            assert!(
                gap >= previous_gap - 0.0011,
                "Cadence sped up: {} after {}",
                gap,
                previous_gap
            );
            previous_gap = gap;
        }
    }

    #[test]
    fn test_quiet_tail_before_landing() {
        let total = 4.0;
        let ticks = run(total, 0.001);

        for (at, _) in &ticks {
            assert!(
                *at <= total - 0.12 + 1e-9,
                "Tick at {} inside the quiet tail",
                at
            );
        }
    }

    #[test]
    fn test_volume_fades_monotonically() {
        let ticks = run(4.0, 0.001);

        let mut previous = f32::MAX;
        for (_, tick) in &ticks {
            assert!(tick.volume <= previous, "Volume rose: {}", tick.volume);
            previous = tick.volume;
        }

        // The fade bottoms out at 65% of base before the tail cut
        let last = ticks.last().unwrap().1.volume;
        assert!(last > 0.22 * 0.6);
        assert!(last < 0.22);
    }

    #[test]
    fn test_one_tick_per_poll_at_most() {
        let mut schedule = TickSchedule::new(4.0, 0.22);

        // A stalled owner polling late gets a single tick, not a burst
        assert!(schedule.poll(1.0).is_some());
        assert!(schedule.poll(1.0).is_none());
    }

    #[test]
    fn test_coarse_polling_still_slows_down() {
        // Pumped at a realistic 16ms frame cadence
        let ticks = run(4.0, 0.016);
        let first_gap = ticks[1].0 - ticks[0].0;
        let last_gap = ticks[ticks.len() - 1].0 - ticks[ticks.len() - 2].0;
        assert!(
            last_gap > first_gap * 2.0,
            "Cadence should decelerate: {} -> {}",
            first_gap,
            last_gap
        );
    }
}
