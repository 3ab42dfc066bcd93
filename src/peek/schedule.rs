//! Cancellable scheduled tasks driven by the event loop's clock.
//!
//! Nothing here spawns a thread or a timer: the loop calls `fire(now)` every
//! frame, and a stopped task never fires. This keeps timer lifetimes tied
//! to whoever owns the value.

use std::time::{Duration, Instant};

/// A repeating task with a fixed period.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    /// A stopped interval.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Start (or restart) the interval; the first tick is one period from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns `true` at most once per call when a tick is due. Missed ticks
    /// are skipped rather than replayed in a burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.period;
        while next <= now {
            next += self.period;
        }
        self.next_due = Some(next);
        true
    }
}

/// A one-shot task that is pushed back every time it is triggered.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)arm the task to fire `delay` after `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once when the deadline has passed, then disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn stopped_interval_never_fires() {
        let t0 = Instant::now();
        let mut iv = Interval::new(ms(100));
        assert!(!iv.is_running());
        assert!(!iv.fire(t0 + ms(1000)));
    }

    #[test]
    fn interval_fires_once_per_period() {
        let t0 = Instant::now();
        let mut iv = Interval::new(ms(3000));
        iv.start(t0);
        assert!(!iv.fire(t0 + ms(2999)));
        assert!(iv.fire(t0 + ms(3000)));
        assert!(!iv.fire(t0 + ms(3001)));
        assert!(iv.fire(t0 + ms(6000)));
    }

    #[test]
    fn interval_skips_missed_ticks() {
        let t0 = Instant::now();
        let mut iv = Interval::new(ms(100));
        iv.start(t0);
        // Loop stalled for 10 periods: one fire, not ten.
        assert!(iv.fire(t0 + ms(1050)));
        assert!(!iv.fire(t0 + ms(1090)));
        assert!(iv.fire(t0 + ms(1100)));
    }

    #[test]
    fn interval_stop_cancels_pending_tick() {
        let t0 = Instant::now();
        let mut iv = Interval::new(ms(100));
        iv.start(t0);
        iv.stop();
        assert!(!iv.fire(t0 + ms(500)));
    }

    #[test]
    fn debounce_coalesces_triggers() {
        let t0 = Instant::now();
        let mut d = Debounce::new(ms(150));
        d.trigger(t0);
        d.trigger(t0 + ms(100));
        assert!(!d.fire(t0 + ms(200)));
        assert!(d.fire(t0 + ms(250)));
        assert!(!d.is_pending());
        assert!(!d.fire(t0 + ms(400)));
    }

    #[test]
    fn debounce_cancel_disarms() {
        let t0 = Instant::now();
        let mut d = Debounce::new(ms(150));
        d.trigger(t0);
        d.cancel();
        assert!(!d.fire(t0 + ms(1000)));
    }
}
