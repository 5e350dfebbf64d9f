//! Fixed-interval tasks driven by an external clock.
//!
//! The browser only gives us one heartbeat timer. Each recurring job (polling,
//! rotating) owns a `Schedule` and asks it on every heartbeat whether it is due,
//! which keeps the timing rules testable with plain numbers.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    interval_ms: u64,
    next_due: Option<u64>,
}

impl Schedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis().max(1) as u64,
            next_due: None,
        }
    }

    /// Starts the task. With `immediate` the first run is due right away,
    /// otherwise one interval from `now`.
    pub fn start(&mut self, now: u64, immediate: bool) {
        self.next_due = Some(if immediate { now } else { now + self.interval_ms });
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Returns true at most once per call when the task is due, and schedules
    /// the next run one interval after `now`. Missed intervals are not replayed.
    pub fn due(&mut self, now: u64) -> bool {
        match self.next_due {
            Some(at) if now >= at => {
                self.next_due = Some(now + self.interval_ms);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_schedule_never_fires() {
        let mut schedule = Schedule::new(Duration::from_secs(2));
        assert!(!schedule.due(0));
        assert!(!schedule.due(1_000_000));
    }

    #[test]
    fn immediate_start_fires_then_waits_an_interval() {
        let mut schedule = Schedule::new(Duration::from_secs(2));
        schedule.start(1_000, true);
        assert!(schedule.due(1_000));
        assert!(!schedule.due(2_999));
        assert!(schedule.due(3_000));
        assert!(!schedule.due(3_500));
    }

    #[test]
    fn delayed_start_and_stop() {
        let mut schedule = Schedule::new(Duration::from_millis(500));
        schedule.start(0, false);
        assert!(!schedule.due(499));
        assert!(schedule.due(500));
        schedule.stop();
        assert_eq!(schedule.next_due, None);
        assert!(!schedule.due(10_000));
    }

    #[test]
    fn a_long_stall_fires_once() {
        let mut schedule = Schedule::new(Duration::from_secs(1));
        schedule.start(0, true);
        assert!(schedule.due(0));
        assert!(schedule.due(60_000));
        assert!(!schedule.due(60_500));
    }
}
