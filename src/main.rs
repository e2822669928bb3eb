mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::{Path, PathBuf},
};
use thump::{
    clock::{Clock, MonotonicClock, Timestamp},
    config::{
        ConfigError, GameConfig, DEFAULT_BPM, DEFAULT_COUNTDOWN_SECS, DEFAULT_DURATION_SECS,
        DEFAULT_TOLERANCE_MS,
    },
    game::Game,
    lessons::Lesson,
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    session::GameState,
    tone::{self, ToneSink},
};

/// learn cpr and keep the compression beat
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal CPR trainer: step through the basics, then press space in time with the heart to practice compression rhythm."
)]
pub struct Cli {
    /// compression tempo in beats per minute
    #[clap(short = 'b', long, default_value_t = DEFAULT_BPM)]
    bpm: f64,

    /// length of a round in seconds
    #[clap(short = 'd', long, default_value_t = DEFAULT_DURATION_SECS)]
    duration: u32,

    /// hit window either side of the beat, in milliseconds
    #[clap(short = 't', long, default_value_t = DEFAULT_TOLERANCE_MS)]
    tolerance: f64,

    /// seconds of countdown before a round
    #[clap(short = 'c', long, default_value_t = DEFAULT_COUNTDOWN_SECS)]
    countdown: u32,

    /// disable audio cues
    #[clap(long)]
    mute: bool,

    /// write logs to this file (the terminal belongs to the ui)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// print the effective game configuration as json and exit
    #[clap(long)]
    print_config: bool,
}

impl Cli {
    fn to_game_config(&self) -> GameConfig {
        GameConfig {
            bpm: self.bpm,
            duration_secs: self.duration,
            tolerance_ms: self.tolerance,
            countdown_secs: self.countdown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Learn,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub view: View,
    pub lesson: Lesson,
    pub game: Game,
}

impl App {
    pub fn new(config: GameConfig, tones: Box<dyn ToneSink>) -> Result<Self, ConfigError> {
        Ok(Self {
            view: View::Home,
            lesson: Lesson::new(),
            game: Game::new(config, tones)?,
        })
    }

    fn navigate(&mut self, view: View) {
        if self.view == View::Game && view != View::Game {
            self.game.back();
        }
        if view == View::Learn {
            self.lesson = Lesson::new();
        }
        self.view = view;
    }

    pub fn on_tick(&mut self, now: Timestamp) {
        self.game.advance(now);
    }

    pub fn on_click(&mut self, now: Timestamp) {
        if self.view == View::Game {
            self.game.hit(now);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Timestamp) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        if key.code == KeyCode::Char('q') {
            return Control::Quit;
        }

        match self.view {
            View::Home => match key.code {
                KeyCode::Char('1') | KeyCode::Char('l') => self.navigate(View::Learn),
                KeyCode::Char('2') | KeyCode::Char('p') | KeyCode::Enter => {
                    self.navigate(View::Game)
                }
                KeyCode::Esc => return Control::Quit,
                _ => {}
            },
            View::Learn => match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.lesson.prev(),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.lesson.next(),
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                    self.navigate(View::Home)
                }
                _ => {}
            },
            View::Game => match (self.game.state(), key.code) {
                (GameState::Playing, KeyCode::Char(' ')) => {
                    self.game.hit(now);
                }
                (GameState::Idle, KeyCode::Enter | KeyCode::Char('s')) => self.game.start(now),
                (GameState::Finished, KeyCode::Enter | KeyCode::Char('r')) => {
                    self.game.start(now)
                }
                (_, KeyCode::Esc | KeyCode::Char('b')) => self.navigate(View::Home),
                _ => {}
            },
        }
        Control::Continue
    }
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    // a logger may already be installed when running under a test harness
    let _ = builder.try_init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = cli.to_game_config();

    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.as_deref())?;

    let mut app = App::new(config, tone::default_sink(cli.mute))?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner, &MonotonicClock::new());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    clock: &C,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        let now = clock.now();
        // due timers run before the event so input never lands on a round that already ended
        app.on_tick(now);

        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Click => app.on_click(now),
            AppEvent::Key(key) => {
                if app.on_key(key, now) == Control::Quit {
                    break;
                }
            }
        }

        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    let screen = ui::screen::current_screen(&app.view);
    screen.render(app, f);
}
