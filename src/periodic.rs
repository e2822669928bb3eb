use std::cell::Cell;
use std::rc::Rc;

use crate::clock::Timestamp;

/// Capability handed out by every `start()`. Cancelling it stops the task it
/// came from; a restarted task gets a fresh token and ignores stale ones.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// A single recurring deadline, polled cooperatively from the event loop
#[derive(Debug, Default)]
pub struct Periodic {
    next_at: Option<Timestamp>,
    period_ms: f64,
    token: CancelToken,
}

impl Periodic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the task to first fire at `now + period_ms`.
    pub fn start(&mut self, now: Timestamp, period_ms: f64) -> CancelToken {
        self.token.cancel();
        self.token = CancelToken::new();
        self.period_ms = period_ms;
        self.next_at = Some(now + period_ms);
        self.token.clone()
    }

    pub fn stop(&mut self) {
        self.token.cancel();
        self.next_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_at.is_some() && !self.token.is_cancelled()
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Scheduled fire time if it has been reached. Does not rearm.
    pub fn due(&mut self, now: Timestamp) -> Option<Timestamp> {
        if self.token.is_cancelled() {
            self.next_at = None;
            return None;
        }
        match self.next_at {
            Some(at) if now >= at => Some(at),
            _ => None,
        }
    }

    pub fn rearm_at(&mut self, at: Timestamp) {
        if self.is_armed() {
            self.next_at = Some(at);
        }
    }

    /// Next fire one period after the previous scheduled fire (fixed cadence).
    pub fn rearm_fixed(&mut self) {
        if let (true, Some(at)) = (self.is_armed(), self.next_at) {
            self.next_at = Some(at + self.period_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cancel_is_idempotent_and_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn not_due_before_first_period() {
        let mut p = Periodic::new();
        p.start(0.0, 1000.0);
        assert_eq!(p.due(999.0), None);
        assert_eq!(p.due(1000.0), Some(1000.0));
    }

    #[test]
    fn fixed_rearm_keeps_cadence() {
        let mut p = Periodic::new();
        p.start(0.0, 1000.0);
        assert_eq!(p.due(1250.0), Some(1000.0));
        p.rearm_fixed();
        assert_eq!(p.due(1250.0), None);
        assert_eq!(p.due(2000.0), Some(2000.0));
    }

    #[test]
    fn cancelled_token_disarms() {
        let mut p = Periodic::new();
        let token = p.start(0.0, 100.0);
        token.cancel();
        assert!(!p.is_armed());
        assert_eq!(p.due(500.0), None);
    }

    #[test]
    fn restart_ignores_stale_token() {
        let mut p = Periodic::new();
        let stale = p.start(0.0, 100.0);
        let fresh = p.start(0.0, 100.0);
        assert!(stale.is_cancelled());
        assert!(!fresh.is_cancelled());
        stale.cancel();
        assert!(p.is_armed());
        assert_eq!(p.due(100.0), Some(100.0));
    }

    #[test]
    fn never_started_is_idle() {
        let mut p = Periodic::new();
        assert!(!p.is_armed());
        assert_eq!(p.due(1e9), None);
        p.stop();
        assert!(!p.is_armed());
    }
}
