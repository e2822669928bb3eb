use crate::clock::Timestamp;
use crate::periodic::{CancelToken, Periodic};

const SECOND_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A second went by; `remaining` is still above zero
    Tick { remaining: u32 },
    /// Remaining time hit zero. Emitted once per `start()`.
    Expired,
}

/// Counts whole seconds down from a fixed duration
#[derive(Debug, Default)]
pub struct SessionTimer {
    periodic: Periodic,
    remaining: u32,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Timestamp, duration_secs: u32) -> CancelToken {
        self.remaining = duration_secs;
        self.periodic.start(now, SECOND_MS)
    }

    pub fn stop(&mut self) {
        self.periodic.stop();
    }

    pub fn is_active(&self) -> bool {
        self.periodic.is_armed()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Handles at most one elapsed second; call until `None` to catch up.
    pub fn poll(&mut self, now: Timestamp) -> Option<TimerEvent> {
        self.periodic.due(now)?;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            // stopping here is what makes a second Expired impossible
            self.periodic.stop();
            return Some(TimerEvent::Expired);
        }
        self.periodic.rearm_fixed();
        Some(TimerEvent::Tick {
            remaining: self.remaining,
        })
    }
}
