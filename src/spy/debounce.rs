//! Debouncer: cancel-and-restart deferred call
//!
//! Scheduling cancels any pending call and arms a new deadline. The owner
//! polls with the current time; a due deadline fires exactly once and clears
//! the pending handle. Only the trailing call inside a burst ever fires.

/// A single debounced slot on a millisecond clock
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: f64,
    deadline: Option<f64>,
    scheduled: u64,
    fired: u64,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay: delay_ms.max(0.0),
            deadline: None,
            scheduled: 0,
            fired: 0,
        }
    }

    /// Arm (or re-arm) the deadline at `now + delay`
    pub fn schedule(&mut self, now: f64) {
        self.deadline = Some(now + self.delay);
        self.scheduled += 1;
    }

    /// Drop the pending call without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true when a pending call is due. The slot is disarmed.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.fired += 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Number of schedule calls, including ones later superseded
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }

    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut d = Debouncer::new(100.0);
        d.schedule(0.0);
        assert!(!d.poll(99.0));
        assert!(d.poll(100.0));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_fires_once() {
        let mut d = Debouncer::new(10.0);
        d.schedule(0.0);
        assert!(d.poll(50.0));
        assert!(!d.poll(60.0));
        assert_eq!(d.fired_count(), 1);
    }

    #[test]
    fn test_reschedule_restarts_window() {
        let mut d = Debouncer::new(100.0);
        d.schedule(0.0);
        d.schedule(80.0);
        // Original deadline passed, but it was superseded
        assert!(!d.poll(120.0));
        assert!(d.poll(180.0));
        assert_eq!(d.scheduled_count(), 2);
        assert_eq!(d.fired_count(), 1);
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut d = Debouncer::new(5.0);
        d.schedule(0.0);
        d.cancel();
        assert!(!d.poll(1000.0));
        assert_eq!(d.fired_count(), 0);
    }

    #[test]
    fn test_zero_delay_fires_same_instant() {
        let mut d = Debouncer::new(0.0);
        d.schedule(42.0);
        assert!(d.poll(42.0));
    }

    #[test]
    fn test_negative_delay_clamped() {
        let d = Debouncer::new(-10.0);
        assert_eq!(d.delay(), 0.0);
    }
}
