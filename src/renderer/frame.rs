//! Frame timing
//!
//! Fixed-rate tick scheduling and measured ticks-per-second for the
//! diagnostic overlay.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Tick controller for the update/draw loop
pub struct FrameClock {
    /// Duration of one tick
    tick_duration: Duration,

    /// When the next tick is due
    next_tick: Instant,

    /// Tick timestamps within the last second
    history: VecDeque<Instant>,
}

impl FrameClock {
    /// Create a new frame clock; the first tick is due immediately
    pub fn new(target_tps: u32, now: Instant) -> Self {
        let target_tps = target_tps.max(1);
        Self {
            tick_duration: Duration::from_nanos(1_000_000_000 / target_tps as u64),
            next_tick: now,
            history: VecDeque::with_capacity(target_tps as usize * 2),
        }
    }

    /// When the next tick is due
    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Whether a tick is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// Record a tick at `now` and schedule the following one
    ///
    /// If the loop fell more than one tick behind, the schedule restarts
    /// from `now` instead of bursting to catch up.
    pub fn record_tick(&mut self, now: Instant) {
        self.history.push_back(now);
        let window_start = now.checked_sub(Duration::from_secs(1));
        while let (Some(front), Some(start)) = (self.history.front(), window_start) {
            if *front > start {
                break;
            }
            self.history.pop_front();
        }

        self.next_tick += self.tick_duration;
        if self.next_tick + self.tick_duration < now {
            self.next_tick = now + self.tick_duration;
        }
    }

    /// Ticks observed during the last second
    pub fn actual_tps(&self) -> f64 {
        self.history.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_due_immediately() {
        let now = Instant::now();
        let clock = FrameClock::new(60, now);
        assert!(clock.is_due(now));
        assert_eq!(clock.actual_tps(), 0.0);
    }

    #[test]
    fn test_schedule_advances_by_tick() {
        let start = Instant::now();
        let mut clock = FrameClock::new(50, start);
        clock.record_tick(start);

        assert_eq!(clock.next_tick(), start + Duration::from_millis(20));
        assert!(!clock.is_due(start + Duration::from_millis(10)));
        assert!(clock.is_due(start + Duration::from_millis(20)));
    }

    #[test]
    fn test_actual_tps_counts_last_second() {
        let start = Instant::now();
        let mut clock = FrameClock::new(10, start);
        for i in 0..25 {
            clock.record_tick(start + Duration::from_millis(100 * i));
        }
        // Ticks at 1.5s..=2.4s remain in the window ending at 2.4s
        assert_eq!(clock.actual_tps(), 10.0);
    }

    #[test]
    fn test_falling_behind_resets_schedule() {
        let start = Instant::now();
        let mut clock = FrameClock::new(60, start);
        let late = start + Duration::from_secs(2);
        clock.record_tick(late);
        assert!(clock.next_tick() > late);
    }
}
