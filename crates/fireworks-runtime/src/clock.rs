//! Simulation clock: wall-clock driven or stepped by hand

use std::time::Instant;

/// Longest frame delta accepted from the wall clock (seconds)
const MAX_FRAME_DELTA: f64 = 0.25;

/// Tracks simulated time in seconds since `start`
pub struct SimClock {
    /// Simulated time the clock started at
    pub start: f64,
    /// Total elapsed simulated time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::starting_at(0.0)
    }
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: f64) -> Self {
        Self {
            start,
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }

    /// Advance from the wall clock. Call once per frame.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return self.now();
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Clamp so a stalled frame doesn't age every particle out at once
        self.delta_time = elapsed.min(MAX_FRAME_DELTA);
        self.total_time += self.delta_time;
        self.now()
    }

    /// Advance by a fixed `dt` (headless runs, tests). Negative steps are ignored.
    pub fn step(&mut self, dt: f64) -> f64 {
        self.delta_time = dt.max(0.0);
        self.total_time += self.delta_time;
        self.now()
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.start + self.total_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = SimClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = SimClock::starting_at(5.0);
        assert_eq!(clock.tick(), 5.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_tick_is_monotonic_and_clamped() {
        let mut clock = SimClock::new();
        clock.tick();
        let a = clock.tick();
        let b = clock.tick();
        assert!(b >= a);
        assert!(clock.delta_time <= MAX_FRAME_DELTA);
    }

    #[test]
    fn test_manual_steps() {
        let mut clock = SimClock::starting_at(1.0);
        clock.step(0.5);
        clock.step(0.25);
        assert!((clock.now() - 1.75).abs() < 1e-12);
        clock.step(-3.0);
        assert!((clock.now() - 1.75).abs() < 1e-12);
    }
}
