//! Fixed-step accumulator.
//!
//! Converts variable frame deltas into a whole number of fixed ticks.

/// Default tick rate.
pub const DEFAULT_TICK_HZ: f32 = 60.0;

/// Ticks run in one frame at most. Excess time is dropped.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct FixedTicker {
    tick: f32,
    accumulator: f32,
    max_ticks_per_frame: u32,
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(1.0 / DEFAULT_TICK_HZ)
    }
}

impl FixedTicker {
    pub fn new(tick: f32) -> Self {
        debug_assert!(tick > 0.0);
        Self {
            tick,
            accumulator: 0.0,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
        }
    }

    #[must_use]
    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    pub fn tick(&self) -> f32 {
        self.tick
    }

    /// Time carried over towards the next tick.
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Accumulate `frame_dt` and return how many ticks are due.
    ///
    /// When more than `max_ticks_per_frame` are due the backlog is discarded
    /// so a long stall cannot snowball into ever longer frames.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let mut ticks = 0;
        while self.accumulator >= self.tick {
            if ticks == self.max_ticks_per_frame {
                tracing::debug!(
                    dropped = self.accumulator,
                    "Tick backlog exceeded per-frame cap"
                );
                self.accumulator %= self.tick;
                break;
            }
            self.accumulator -= self.tick;
            ticks += 1;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_ticks_and_carry() {
        let mut ticker = FixedTicker::new(0.01);
        assert_eq!(ticker.advance(0.025), 2);
        assert!((ticker.pending() - 0.005).abs() < 1e-6);
        assert_eq!(ticker.advance(0.006), 1);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut ticker = FixedTicker::new(0.1);
        assert_eq!(ticker.advance(0.04), 0);
        assert_eq!(ticker.advance(0.04), 0);
        assert_eq!(ticker.advance(0.04), 1);
    }

    #[test]
    fn test_backlog_capped() {
        let mut ticker = FixedTicker::new(0.01).with_max_ticks_per_frame(4);
        assert_eq!(ticker.advance(1.0), 4);
        assert!(ticker.pending() < 0.01);
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut ticker = FixedTicker::default();
        assert_eq!(ticker.advance(f32::NAN), 0);
        assert_eq!(ticker.advance(-1.0), 0);
        assert!(ticker.pending().abs() < f32::EPSILON);
    }

    #[test]
    fn test_reset_discards_pending() {
        let mut ticker = FixedTicker::new(0.1);
        ticker.advance(0.05);
        ticker.reset();
        assert_eq!(ticker.advance(0.06), 0);
    }
}
