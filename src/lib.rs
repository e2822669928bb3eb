// Timing core and event plumbing, shared by the TUI binary and the
// headless tests. Nothing here depends on terminal rendering.
pub mod clock;
pub mod config;
pub mod game;
pub mod judge;
pub mod lessons;
pub mod periodic;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod session_timer;
pub mod tempo;
pub mod tone;
pub mod util;
