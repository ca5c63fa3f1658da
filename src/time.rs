//! Fixed-timestep clock.
//!
//! The host reports wall-clock milliseconds at whatever rate it runs;
//! [`GameTime`] turns that into whole ticks so every delay in the game is a
//! deterministic tick countdown.

/// Logic rate of the game clock.
pub const TICKS_PER_SEC: u32 = 10;

/// Milliseconds covered by one tick.
pub const MS_PER_TICK: u32 = 1000 / TICKS_PER_SEC;

/// Largest wall-clock gap honoured in one update. Longer gaps (a
/// backgrounded tab, a suspended laptop) are clamped.
const MAX_FRAME_MS: f64 = 500.0;

/// Convert a delay in milliseconds to ticks, rounding up so that a non-zero
/// delay never collapses to zero ticks.
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms.div_ceil(MS_PER_TICK)
}

pub struct GameTime {
    /// Milliseconds not yet consumed as ticks
    carry_ms: f64,
    /// Total ticks handed out since creation
    pub total_ticks: u64,
    /// Timestamp of the previous update, None before the first frame
    last_ms: Option<f64>,
}

impl GameTime {
    pub fn new() -> Self {
        Self {
            carry_ms: 0.0,
            total_ticks: 0,
            last_ms: None,
        }
    }

    /// Feed a wall-clock timestamp (ms) and get back how many ticks elapsed.
    /// The first call only records the timestamp.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_ms.replace(now_ms) {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.carry_ms += delta;
        let ticks = (self.carry_ms / MS_PER_TICK as f64) as u32;
        self.carry_ms -= ticks as f64 * MS_PER_TICK as f64;
        self.total_ticks += ticks as u64;
        ticks
    }
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new()
    }
}
