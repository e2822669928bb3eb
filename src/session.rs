use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::judge::{JudgmentKind, Verdict};
use crate::scheduler::DeadlineCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum GameState {
    Idle,
    Countdown,
    Playing,
    Finished,
}

/// "Perfect!" / "Miss!" banner, shown until `until`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub kind: JudgmentKind,
    pub until: Timestamp,
}

impl Feedback {
    pub fn text(&self) -> &'static str {
        match self.kind {
            JudgmentKind::Hit => "Perfect!",
            JudgmentKind::Miss => "Miss!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u32,
    pub misses: u32,
    /// Beats the scheduler fired during the round
    pub beats: u32,
    pub expected_beats: f64,
    pub accuracy: u32,
    pub verdict: Verdict,
    /// Mean distance from the beat over every judged input
    pub mean_deviation_ms: Option<f64>,
    pub deviation_std_dev_ms: Option<f64>,
}

/// Mutable round state. Only the game writes it, except `next_beat_deadline`
/// which belongs to the beat scheduler.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: GameState,
    pub countdown: u32,
    pub remaining: u32,
    pub score: u32,
    pub misses: u32,
    pub beats: u32,
    pub deviations: Vec<f64>,
    pub next_beat_deadline: DeadlineCell,
    // Transient presentation values
    pub feedback: Option<Feedback>,
    pub compressing_until: Option<Timestamp>,
    pub beat_pulse_until: Option<Timestamp>,
    pub summary: Option<RoundSummary>,
}

impl Session {
    pub fn new(countdown: u32, duration_secs: u32) -> Self {
        Self {
            state: GameState::Idle,
            countdown,
            remaining: duration_secs,
            score: 0,
            misses: 0,
            beats: 0,
            deviations: Vec::new(),
            next_beat_deadline: DeadlineCell::default(),
            feedback: None,
            compressing_until: None,
            beat_pulse_until: None,
            summary: None,
        }
    }

    /// Drops transient values whose display time has run out.
    pub fn expire_transients(&mut self, now: Timestamp) {
        if self.feedback.is_some_and(|f| f.until <= now) {
            self.feedback = None;
        }
        if self.compressing_until.is_some_and(|t| t <= now) {
            self.compressing_until = None;
        }
        if self.beat_pulse_until.is_some_and(|t| t <= now) {
            self.beat_pulse_until = None;
        }
    }
}

/// Read-only view handed to the presentation layer after every mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: GameState,
    pub countdown: u32,
    pub remaining: u32,
    pub score: u32,
    pub misses: u32,
    pub beats: u32,
    pub next_beat_deadline: Timestamp,
    pub feedback: Option<JudgmentKind>,
    pub compressing: bool,
    pub beat_pulse: bool,
    pub meter_percent: f64,
    pub summary: Option<RoundSummary>,
}

impl Snapshot {
    pub fn feedback_text(&self) -> Option<&'static str> {
        self.feedback.map(|kind| Feedback { kind, until: 0.0 }.text())
    }
}
