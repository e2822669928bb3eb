use thump::clock::Timestamp;
use thump::config::GameConfig;
use thump::game::Game;
use thump::scheduler::{BeatScheduler, DeadlineCell};
use thump::session::GameState;
use thump::session_timer::{SessionTimer, TimerEvent};
use thump::tempo::Tempo;
use thump::tone::SilentTones;

fn assert_timers_match_state(game: &Game) {
    let playing = game.state() == GameState::Playing;
    assert_eq!(
        game.timers_active(),
        (playing, playing),
        "timers out of step with {:?}",
        game.state()
    );
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Start,
    Hit,
    Back,
    Wait(f64),
}

// Walks a long scripted sequence touching every transition and checks the
// scheduler/timer invariant after each step.
#[test]
fn timers_run_only_while_playing() {
    use Action::*;
    let config = GameConfig {
        bpm: 90.0,
        duration_secs: 2,
        countdown_secs: 2,
        ..GameConfig::default()
    };
    let mut game = Game::new(config, Box::new(SilentTones)).unwrap();
    let script = [
        Hit, Start, Hit, Start, Wait(1000.0), Back, Wait(5000.0), Start, Wait(2000.0), Hit,
        Wait(700.0), Start, Hit, Wait(1300.0), Hit, Start, Wait(500.0), Wait(1500.0),
        Wait(2500.0), Back, Back, Start, Wait(9000.0), Hit, Wait(2000.0), Start,
    ];

    let mut now: Timestamp = 0.0;
    assert_timers_match_state(&game);
    for action in script {
        match action {
            Start => game.start(now),
            Hit => {
                game.hit(now);
            }
            Back => game.back(),
            Wait(ms) => {
                // advance in frame-sized steps like the real loop
                let end = now + ms;
                while now < end {
                    now = (now + 16.0).min(end);
                    game.advance(now);
                    assert_timers_match_state(&game);
                }
            }
        }
        assert_timers_match_state(&game);
    }
}

#[test]
fn score_is_frozen_once_finished() {
    let config = GameConfig {
        bpm: 120.0,
        duration_secs: 2,
        countdown_secs: 1,
        tolerance_ms: 1000.0,
    };
    let mut game = Game::new(config, Box::new(SilentTones)).unwrap();
    game.start(0.0);
    game.advance(1000.0);
    assert_eq!(game.state(), GameState::Playing);

    game.hit(1200.0);
    game.advance(3000.0);
    assert_eq!(game.state(), GameState::Finished);
    let frozen = game.snapshot();

    for t in (3000..20_000).step_by(250) {
        let now = t as f64;
        game.advance(now);
        assert_eq!(game.hit(now), None);
    }
    let later = game.snapshot();
    assert_eq!(frozen.score, later.score);
    assert_eq!(frozen.next_beat_deadline, later.next_beat_deadline);
    assert_eq!(frozen.summary, later.summary);
}

#[test]
fn scheduler_deadlines_reset_from_each_tick() {
    let tempo = Tempo::new(110.0).unwrap();
    let interval = tempo.beat_interval_ms();
    let cell = DeadlineCell::new(0.0);
    let mut sched = BeatScheduler::new(cell.clone());
    sched.start(0.0, tempo);

    let mut now = 0.0;
    let mut jitter = 3.0;
    for _ in 0..50 {
        now = cell.get() + jitter;
        jitter = (jitter * 7.0) % 40.0;
        let beat = sched.poll(now).expect("beat due after its deadline");
        assert_eq!(beat.next_deadline, now + interval);
        assert_eq!(cell.get(), now + interval);
    }
    // accumulated lateness pushes the grid well past t0 + N * I
    assert!(now > 50.0 * interval);
}

#[test]
fn stop_twice_has_no_extra_effect() {
    let mut timer = SessionTimer::new();
    timer.start(0.0, 3);
    assert_eq!(timer.poll(1000.0), Some(TimerEvent::Tick { remaining: 2 }));
    timer.stop();
    let remaining = timer.remaining();
    timer.stop();
    assert_eq!(timer.remaining(), remaining);
    assert_eq!(timer.poll(10_000.0), None);

    let cell = DeadlineCell::new(0.0);
    let mut sched = BeatScheduler::new(cell.clone());
    sched.start(0.0, Tempo::new(60.0).unwrap());
    sched.stop();
    let deadline = cell.get();
    sched.stop();
    assert_eq!(sched.poll(10_000.0), None);
    assert_eq!(cell.get(), deadline);
}
