//! Fixed-interval rate limiting for pointer-move handling.
//!
//! [`Trailing`] adds a trailing edge: the last move dropped by the interval
//! is handed back when the gesture ends.

use std::time::{Duration, Instant};

/// Default spacing between handled pointer moves.
pub const DEFAULT_POINTER_INTERVAL: Duration = Duration::from_millis(4);

/// Admits at most one call per `interval`; calls in between are dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true when a call at `now` should be handled, and records it.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forgets the last admitted call so the next one always passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::new(DEFAULT_POINTER_INTERVAL)
    }
}

/// A [`Throttle`] that keeps the latest dropped value, so a gesture can
/// still end where the pointer really was.
#[derive(Debug, Clone)]
pub struct Trailing<T> {
    throttle: Throttle,
    pending: Option<T>,
}

impl<T> Trailing<T> {
    pub fn new(throttle: Throttle) -> Self {
        Trailing {
            throttle,
            pending: None,
        }
    }

    /// Returns `value` when admitted at `now`; otherwise holds it as pending,
    /// replacing any older pending value.
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        if self.throttle.ready(now) {
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Takes the value dropped since the last admitted one, if any.
    pub fn take_pending(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn reset(&mut self) {
        self.throttle.reset();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_one_call_per_interval() {
        let mut throttle = Throttle::new(Duration::from_millis(4));
        let t0 = Instant::now();
        assert!(throttle.ready(t0));
        assert!(!throttle.ready(t0 + Duration::from_millis(1)));
        assert!(!throttle.ready(t0 + Duration::from_millis(3)));
        assert!(throttle.ready(t0 + Duration::from_millis(4)));
        assert!(!throttle.ready(t0 + Duration::from_millis(5)));
    }

    #[test]
    fn test_reset_admits_next_call() {
        let mut throttle = Throttle::default();
        let t0 = Instant::now();
        assert!(throttle.ready(t0));
        throttle.reset();
        assert!(throttle.ready(t0));
    }

    #[test]
    fn test_trailing_keeps_latest_dropped_value() {
        let mut moves = Trailing::new(Throttle::new(Duration::from_millis(4)));
        let t0 = Instant::now();
        assert_eq!(moves.offer(1, t0), Some(1));
        assert_eq!(moves.offer(2, t0 + Duration::from_millis(1)), None);
        assert_eq!(moves.offer(3, t0 + Duration::from_millis(2)), None);
        assert_eq!(moves.take_pending(), Some(3));
        assert_eq!(moves.take_pending(), None);
    }

    #[test]
    fn test_trailing_admitted_value_clears_pending() {
        let mut moves = Trailing::new(Throttle::new(Duration::from_millis(4)));
        let t0 = Instant::now();
        moves.offer(1, t0);
        moves.offer(2, t0 + Duration::from_millis(1));
        assert_eq!(moves.offer(3, t0 + Duration::from_millis(5)), Some(3));
        assert_eq!(moves.take_pending(), None);

        moves.offer(4, t0 + Duration::from_millis(6));
        moves.reset();
        assert_eq!(moves.take_pending(), None);
    }

    #[test]
    fn test_zero_interval_admits_everything() {
        let mut throttle = Throttle::new(Duration::ZERO);
        let t0 = Instant::now();
        assert!(throttle.ready(t0));
        assert!(throttle.ready(t0));
    }
}
