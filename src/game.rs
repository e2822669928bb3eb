use log::{debug, trace};

use crate::clock::Timestamp;
use crate::config::{ConfigError, GameConfig};
use crate::judge::{self, Judgment, Verdict};
use crate::periodic::{CancelToken, Periodic};
use crate::scheduler::BeatScheduler;
use crate::session::{Feedback, GameState, RoundSummary, Session, Snapshot};
use crate::session_timer::{SessionTimer, TimerEvent};
use crate::tempo::Tempo;
use crate::tone::{ToneSink, COUNTDOWN_TONE, GO_TONE, HIT_TONE, MISS_TONE};
use crate::util::{mean, std_dev};

pub const FEEDBACK_MS: f64 = 500.0;
pub const COMPRESS_MS: f64 = 200.0;
pub const BEAT_PULSE_MS: f64 = 100.0;
const COUNTDOWN_STEP_MS: f64 = 1000.0;

/// Owns the session and sequences countdown, play and finish.
///
/// Time never comes from inside: every entry point takes `now`, which lets the
/// event loop feed a real clock and tests feed a virtual one.
pub struct Game {
    config: GameConfig,
    tempo: Tempo,
    session: Session,
    countdown: Periodic,
    scheduler: BeatScheduler,
    timer: SessionTimer,
    tokens: Vec<CancelToken>,
    tones: Box<dyn ToneSink>,
}

impl Game {
    pub fn new(config: GameConfig, tones: Box<dyn ToneSink>) -> Result<Self, ConfigError> {
        config.validate()?;
        let tempo = config.tempo()?;
        let session = Session::new(config.countdown_secs, config.duration_secs);
        let scheduler = BeatScheduler::new(session.next_beat_deadline.clone());
        Ok(Self {
            config,
            tempo,
            session,
            countdown: Periodic::new(),
            scheduler,
            timer: SessionTimer::new(),
            tokens: Vec::new(),
            tones,
        })
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn expected_beats(&self) -> f64 {
        judge::expected_beats(self.config.duration_secs, self.tempo)
    }

    /// Beat scheduler and session timer activity, in that order.
    pub fn timers_active(&self) -> (bool, bool) {
        (self.scheduler.is_active(), self.timer.is_active())
    }

    /// Idle or Finished → Countdown. Ignored in any other state.
    pub fn start(&mut self, now: Timestamp) {
        match self.session.state {
            GameState::Idle | GameState::Finished => {}
            state => {
                trace!("start ignored in {}", state);
                return;
            }
        }
        self.cancel_all();
        self.reset_session();
        self.session.state = GameState::Countdown;
        self.tokens.push(self.countdown.start(now, COUNTDOWN_STEP_MS));
        self.tones.play(COUNTDOWN_TONE);
        debug!("countdown from {}", self.session.countdown);
    }

    /// Judges one physical input. `None` when not playing.
    pub fn hit(&mut self, now: Timestamp) -> Option<Judgment> {
        if self.session.state != GameState::Playing {
            trace!("input ignored in {}", self.session.state);
            return None;
        }

        let deadline = self.session.next_beat_deadline.get();
        let judgment = judge::judge(now, deadline, self.config.tolerance_ms);
        if judgment.is_hit() {
            self.session.score += 1;
            self.tones.play(HIT_TONE);
        } else {
            self.session.misses += 1;
            self.tones.play(MISS_TONE);
        }
        self.session.feedback = Some(Feedback {
            kind: judgment.kind,
            until: now + FEEDBACK_MS,
        });
        self.session.compressing_until = Some(now + COMPRESS_MS);
        self.session.deviations.push(judgment.deviation_ms);
        trace!(
            "{} ({:.1} ms off), score {}",
            judgment.kind,
            judgment.deviation_ms,
            self.session.score
        );
        Some(judgment)
    }

    /// Runs every task that has come due by `now`.
    pub fn advance(&mut self, now: Timestamp) {
        match self.session.state {
            GameState::Countdown => self.advance_countdown(now),
            GameState::Playing => self.advance_playing(now),
            GameState::Idle | GameState::Finished => {}
        }
        self.session.expire_transients(now);
    }

    /// Leaves the game for the menu from any state.
    pub fn back(&mut self) {
        self.cancel_all();
        self.reset_session();
        debug!("back to idle");
    }

    pub fn snapshot(&self) -> Snapshot {
        let s = &self.session;
        Snapshot {
            state: s.state,
            countdown: s.countdown,
            remaining: s.remaining,
            score: s.score,
            misses: s.misses,
            beats: s.beats,
            next_beat_deadline: s.next_beat_deadline.get(),
            feedback: s.feedback.map(|f| f.kind),
            compressing: s.compressing_until.is_some(),
            beat_pulse: s.beat_pulse_until.is_some(),
            meter_percent: judge::meter_percent(s.score, self.expected_beats()),
            summary: s.summary,
        }
    }

    fn advance_countdown(&mut self, now: Timestamp) {
        while self.countdown.due(now).is_some() {
            self.countdown.rearm_fixed();
            self.session.countdown = self.session.countdown.saturating_sub(1);
            if self.session.countdown > 0 {
                self.tones.play(COUNTDOWN_TONE);
            } else {
                self.tones.play(GO_TONE);
                self.begin_play(now);
                return;
            }
        }
    }

    fn begin_play(&mut self, now: Timestamp) {
        self.cancel_all();
        self.session.state = GameState::Playing;
        let beat = self.scheduler.start(now, self.tempo);
        let timer = self.timer.start(now, self.config.duration_secs);
        self.tokens.push(beat);
        self.tokens.push(timer);
        debug!(
            "playing at {} bpm for {}s",
            self.tempo.bpm(),
            self.config.duration_secs
        );
    }

    fn advance_playing(&mut self, now: Timestamp) {
        while let Some(beat) = self.scheduler.poll(now) {
            self.session.beats = beat.index;
            self.session.beat_pulse_until = Some(beat.fired_at + BEAT_PULSE_MS);
        }
        while let Some(event) = self.timer.poll(now) {
            match event {
                TimerEvent::Tick { remaining } => self.session.remaining = remaining,
                TimerEvent::Expired => {
                    self.finish();
                    return;
                }
            }
        }
    }

    fn finish(&mut self) {
        // nothing may tick against this session once it is over
        self.cancel_all();
        self.session.remaining = 0;
        self.session.state = GameState::Finished;

        let expected_beats = self.expected_beats();
        let accuracy = judge::accuracy(self.session.score, expected_beats);
        self.session.summary = Some(RoundSummary {
            score: self.session.score,
            misses: self.session.misses,
            beats: self.session.beats,
            expected_beats,
            accuracy,
            verdict: Verdict::for_accuracy(accuracy),
            mean_deviation_ms: mean(&self.session.deviations),
            deviation_std_dev_ms: std_dev(&self.session.deviations),
        });
        debug!(
            "round over: score {} of ~{:.1}, accuracy {}%",
            self.session.score, expected_beats, accuracy
        );
    }

    fn cancel_all(&mut self) {
        for token in self.tokens.drain(..) {
            token.cancel();
        }
        self.countdown.stop();
        self.scheduler.stop();
        self.timer.stop();
    }

    fn reset_session(&mut self) {
        self.session = Session::new(self.config.countdown_secs, self.config.duration_secs);
        self.scheduler = BeatScheduler::new(self.session.next_beat_deadline.clone());
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
