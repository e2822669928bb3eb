use std::cell::Cell;
use std::time::Instant;

/// Milliseconds since an arbitrary monotonic origin.
pub type Timestamp = f64;

/// Source of monotonic timestamps
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by `Instant`; the origin is captured at construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Virtual clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, t: Timestamp) {
        self.now.set(t);
    }

    pub fn advance(&self, ms: f64) -> Timestamp {
        let t = self.now.get() + ms;
        self.now.set(t);
        t
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_advances_only_on_request() {
        let clock = ManualClock::new(100.0);
        assert_eq!(clock.now(), 100.0);
        assert_eq!(clock.advance(250.5), 350.5);
        assert_eq!(clock.now(), 350.5);
        clock.set(10.0);
        assert_eq!(clock.now(), 10.0);
    }
}
