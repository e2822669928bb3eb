use std::cell::Cell;
use std::rc::Rc;

use crate::clock::Timestamp;
use crate::periodic::{CancelToken, Periodic};
use crate::tempo::Tempo;

/// Absolute time of the next expected beat.
///
/// One writer (the scheduler), any number of readers. Readers always see the
/// value written by the latest tick, never a copy captured earlier.
#[derive(Debug, Clone, Default)]
pub struct DeadlineCell(Rc<Cell<Timestamp>>);

impl DeadlineCell {
    pub fn new(at: Timestamp) -> Self {
        Self(Rc::new(Cell::new(at)))
    }

    pub fn get(&self) -> Timestamp {
        self.0.get()
    }

    fn set(&self, at: Timestamp) {
        self.0.set(at);
    }
}

/// One emitted beat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    /// Sequence number within the current run, starting at 1
    pub index: u32,
    pub fired_at: Timestamp,
    pub next_deadline: Timestamp,
}

#[derive(Debug, Default)]
pub struct BeatScheduler {
    periodic: Periodic,
    deadline: DeadlineCell,
    beats: u32,
}

impl BeatScheduler {
    pub fn new(deadline: DeadlineCell) -> Self {
        Self {
            periodic: Periodic::new(),
            deadline,
            beats: 0,
        }
    }

    pub fn deadline(&self) -> DeadlineCell {
        self.deadline.clone()
    }

    pub fn start(&mut self, now: Timestamp, tempo: Tempo) -> CancelToken {
        let interval = tempo.beat_interval_ms();
        self.beats = 0;
        self.deadline.set(now + interval);
        self.periodic.start(now, interval)
    }

    pub fn stop(&mut self) {
        self.periodic.stop();
    }

    pub fn is_active(&self) -> bool {
        self.periodic.is_armed()
    }

    /// Fires at most one beat. The next deadline is measured from the poll
    /// time, so a late poll delays the grid instead of accumulating error.
    pub fn poll(&mut self, now: Timestamp) -> Option<Beat> {
        self.periodic.due(now)?;
        let next_deadline = now + self.periodic.period_ms();
        self.deadline.set(next_deadline);
        self.periodic.rearm_at(next_deadline);
        self.beats += 1;
        Some(Beat {
            index: self.beats,
            fired_at: now,
            next_deadline,
        })
    }
}
