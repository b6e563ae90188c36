//! Fixed-step trigger driven by host frame time.

use log::warn;

/// Accumulates elapsed time and fires once the configured interval is reached.
///
/// Firing resets the accumulator to zero; time beyond the interval is dropped,
/// so a long frame triggers at most one step.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    interval: f32,
    elapsed: f32,
}

impl SimulationClock {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Add `dt` seconds. Returns `true` when a step is due.
    ///
    /// Non-finite or negative `dt` is ignored and leaves the accumulator unchanged.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt < 0.0 {
            warn!("Ignoring invalid frame time {dt}");
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn interval(&self) -> f32 {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_threshold() {
        let mut clock = SimulationClock::new(0.5);
        assert!(!clock.advance(0.25));
        assert!(clock.advance(0.25));
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_excess_time_is_discarded() {
        let mut clock = SimulationClock::new(0.5);
        assert!(clock.advance(1.75));
        assert_eq!(clock.elapsed(), 0.0);
        // Not carried over: still needs a full interval
        assert!(!clock.advance(0.4));
        assert!(clock.advance(0.1));
    }

    #[test]
    fn test_one_tick_per_crossing() {
        let mut clock = SimulationClock::new(0.5);
        let ticks = (0..100).filter(|_| clock.advance(0.125)).count();
        assert_eq!(ticks, 25);
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut clock = SimulationClock::new(0.5);
        assert!(!clock.advance(0.25));
        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -1.0] {
            assert!(!clock.advance(dt));
            assert_eq!(clock.elapsed(), 0.25);
        }
        assert!(clock.advance(0.25));
        let ticks = (0..100).filter(|_| clock.advance(1.0)).count();
        assert_eq!(ticks, 100);
    }

    #[test]
    fn test_reset() {
        let mut clock = SimulationClock::new(1.0);
        clock.advance(0.9);
        clock.reset();
        assert!(!clock.advance(0.5));
        assert_eq!(clock.interval(), 1.0);
    }
}
