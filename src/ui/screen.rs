use ratatui::Frame;

use crate::{
    ui::{GameView, HomeView, LearnView},
    App, View,
};

/// A UI Screen boundary: responsible for rendering one view
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Title menu
pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, _app: &mut App, f: &mut Frame) {
        f.render_widget(HomeView, f.area());
    }
}

/// Instruction cards
pub struct LearnScreen;

impl Screen for LearnScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(
            LearnView {
                lesson: &app.lesson,
            },
            f.area(),
        );
    }
}

/// Rhythm game, drawn from a fresh snapshot every frame
pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(
            GameView {
                snapshot: app.game.snapshot(),
            },
            f.area(),
        );
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: &View) -> Box<dyn Screen> {
    match view {
        View::Home => Box::new(HomeScreen),
        View::Learn => Box::new(LearnScreen),
        View::Game => Box::new(GameScreen),
    }
}
