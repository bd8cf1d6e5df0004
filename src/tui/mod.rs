//! Carbook Terminal User Interface (TUI)
//!
//! A main menu leading to the VIN decoder and the car manager. Network work
//! runs in background tasks; the screens only react to the results.

pub mod app;
pub mod events;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::{App, Screen, Services};
pub use events::AppEvent;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

use crate::config::Config;

/// Take over the terminal and run the app until the user quits
pub async fn run_tui(config: &Config, start: Screen) -> Result<()> {
    info!("Starting TUI interface");

    let services = Services::from_config(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(services, start);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
