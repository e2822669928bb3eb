use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::tempo::Tempo;

/// Rounds above this accuracy (exclusive) earn the congratulatory verdict.
pub const GREAT_JOB_THRESHOLD: u32 = 70;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum JudgmentKind {
    Hit,
    Miss,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub kind: JudgmentKind,
    /// Absolute distance to the beat deadline in ms
    pub deviation_ms: f64,
}

impl Judgment {
    pub fn is_hit(&self) -> bool {
        self.kind == JudgmentKind::Hit
    }
}

/// Binary hit window, symmetric around the deadline and inclusive at the edge.
pub fn judge(now: Timestamp, deadline: Timestamp, tolerance_ms: f64) -> Judgment {
    let deviation_ms = (now - deadline).abs();
    let kind = if deviation_ms <= tolerance_ms {
        JudgmentKind::Hit
    } else {
        JudgmentKind::Miss
    };
    Judgment { kind, deviation_ms }
}

/// Approximate beats in a round. May be off by one against the beats actually
/// scheduled, since the first beat lands one interval after play begins.
pub fn expected_beats(duration_secs: u32, tempo: Tempo) -> f64 {
    tempo.beats_in(duration_secs)
}

pub fn accuracy(score: u32, expected_beats: f64) -> u32 {
    if expected_beats <= 0.0 {
        return 0;
    }
    ((score as f64 / expected_beats) * 100.0).round() as u32
}

/// Fill level of the in-game progress meter, capped at 100.
pub fn meter_percent(score: u32, expected_beats: f64) -> f64 {
    if expected_beats <= 0.0 {
        return 0.0;
    }
    ((score as f64 / expected_beats) * 100.0).min(100.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    GreatJob,
    TryAgain,
}

impl Verdict {
    pub fn for_accuracy(accuracy: u32) -> Self {
        if accuracy > GREAT_JOB_THRESHOLD {
            Verdict::GreatJob
        } else {
            Verdict::TryAgain
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::GreatJob => "Great Job! You kept the heart beating!",
            Verdict::TryAgain => "Try Again! Keep up the rhythm!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn boundary_is_inclusive() {
        let j = judge(1150.0, 1000.0, 150.0);
        assert_matches!(j.kind, JudgmentKind::Hit);
        assert_eq!(j.deviation_ms, 150.0);
    }

    #[test]
    fn just_outside_is_a_miss() {
        let j = judge(1151.0, 1000.0, 150.0);
        assert_matches!(j.kind, JudgmentKind::Miss);
        assert_eq!(j.deviation_ms, 151.0);
    }

    #[test]
    fn early_inputs_are_judged_symmetrically() {
        assert!(judge(850.0, 1000.0, 150.0).is_hit());
        assert!(!judge(849.0, 1000.0, 150.0).is_hit());
        assert_eq!(judge(900.0, 1000.0, 150.0).deviation_ms, 100.0);
    }

    #[test]
    fn judge_is_pure() {
        let samples = [(0.0, 0.0, 0.0), (10.0, 500.0, 150.0), (545.0, 545.45, 1.0)];
        for &(now, deadline, tol) in &samples {
            let first = judge(now, deadline, tol);
            for _ in 0..3 {
                assert_eq!(judge(now, deadline, tol), first);
            }
            assert_eq!(first.is_hit(), (now - deadline).abs() <= tol);
        }
    }

    #[test]
    fn zero_tolerance_needs_exact_timing() {
        assert!(judge(1000.0, 1000.0, 0.0).is_hit());
        assert!(!judge(1000.5, 1000.0, 0.0).is_hit());
    }

    #[test]
    fn default_round_accuracy() {
        let tempo = Tempo::new(110.0).unwrap();
        let expected = expected_beats(15, tempo);
        assert!((expected - 27.5).abs() < 1e-9);
        assert_eq!(accuracy(20, expected), 73);
        assert_eq!(accuracy(0, expected), 0);
    }

    #[test]
    fn accuracy_can_exceed_one_hundred() {
        // expected beats is an approximation, a perfect round may land above it
        assert_eq!(accuracy(28, 27.5), 102);
    }

    #[test]
    fn meter_is_capped() {
        assert_eq!(meter_percent(28, 27.5), 100.0);
        assert!((meter_percent(11, 27.5) - 40.0).abs() < 1e-9);
        assert_eq!(meter_percent(3, 0.0), 0.0);
    }

    #[test]
    fn verdict_threshold_is_exclusive() {
        assert_eq!(Verdict::for_accuracy(71), Verdict::GreatJob);
        assert_eq!(Verdict::for_accuracy(70), Verdict::TryAgain);
        assert_eq!(Verdict::for_accuracy(0), Verdict::TryAgain);
    }

    #[test]
    fn judgment_kind_display() {
        assert_eq!(JudgmentKind::Hit.to_string(), "Hit");
        assert_eq!(JudgmentKind::Miss.to_string(), "Miss");
    }
}
