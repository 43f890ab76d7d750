// Particles - falling decorative ornaments
//
// Purely cosmetic: money glyphs spawn above the viewport on a fixed
// cadence, fall with individual speeds on a fixed advance tick and are
// removed once past the bottom. The live set is additionally capped
// (oldest evicted) so a stalled rendering surface cannot grow it without
// bound.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A new ornament every 500 ms
pub const SPAWN_INTERVAL_SECS: f64 = 0.5;

/// Positions advance every 50 ms
pub const ADVANCE_INTERVAL_SECS: f64 = 0.05;

/// Spawn height above the viewport and removal slack below it, pixels
const SPAWN_MARGIN: f32 = 50.0;

/// Degrees of rotation added per advance tick
const SPIN_PER_TICK: f32 = 2.0;

/// Hard bound on the live set
const DEFAULT_MAX_LIVE: usize = 256;

/// Glyphs the field cycles through
pub const ORNAMENT_GLYPHS: [char; 4] = ['💰', '💸', '🪙', '💵'];

/// One falling ornament
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ornament {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    /// Fall speed in pixels per advance tick
    pub speed: f32,
    pub glyph: char,
}

/// The falling-ornament field
pub struct ParticleField {
    viewport_w: f32,
    viewport_h: f32,
    live: VecDeque<Ornament>,
    max_live: usize,
    next_spawn: f64,
    next_advance: f64,
    next_id: u64,
    rng: SmallRng,
}

impl ParticleField {
    pub fn new(viewport_w: f32, viewport_h: f32) -> Self {
        Self::with_seed(viewport_w, viewport_h, rand::thread_rng().r#gen())
    }

    /// Deterministic field for simulations
    pub fn with_seed(viewport_w: f32, viewport_h: f32, seed: u64) -> Self {
        Self {
            viewport_w,
            viewport_h,
            live: VecDeque::new(),
            max_live: DEFAULT_MAX_LIVE,
            next_spawn: SPAWN_INTERVAL_SECS,
            next_advance: ADVANCE_INTERVAL_SECS,
            next_id: 1,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_capacity(mut self, max_live: usize) -> Self {
        self.max_live = max_live.max(1);
        self
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn ornaments(&self) -> impl Iterator<Item = &Ornament> {
        self.live.iter()
    }

    /// Pump both cadences up to `now`
    pub fn update(&mut self, now: f64) {
        while now >= self.next_spawn {
            self.spawn();
            self.next_spawn += SPAWN_INTERVAL_SECS;
        }
        while now >= self.next_advance {
            self.advance();
            self.next_advance += ADVANCE_INTERVAL_SECS;
        }
    }

    fn spawn(&mut self) {
        let ornament = Ornament {
            id: self.next_id,
            x: self.rng.gen_range(0.0..self.viewport_w),
            y: -SPAWN_MARGIN,
            rotation: self.rng.gen_range(0.0..360.0),
            speed: 2.0 + self.rng.gen_range(0.0..3.0),
            glyph: ORNAMENT_GLYPHS[self.rng.gen_range(0..ORNAMENT_GLYPHS.len())],
        };
        self.next_id += 1;

        self.live.push_back(ornament);
        // Cap: evict the oldest rather than grow without bound
        while self.live.len() > self.max_live {
            self.live.pop_front();
        }
    }

    fn advance(&mut self) {
        let floor = self.viewport_h + SPAWN_MARGIN;
        for ornament in self.live.iter_mut() {
            ornament.y += ornament.speed;
            ornament.rotation += SPIN_PER_TICK;
        }
        self.live.retain(|o| o.y < floor);
    }
}
