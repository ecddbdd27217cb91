//! Ratatui front-end: three screens on a navigation stack, driven by a
//! crossterm event loop.

mod app;
mod forms;
mod helpers;
mod navigation;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
