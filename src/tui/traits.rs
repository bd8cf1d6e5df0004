//! Core traits for the carbook TUI architecture
//!
//! Screens never talk to the network themselves. Key handling returns a
//! [`ScreenAction`]; anything that needs I/O comes back as a [`Request`] which
//! the app runs in the background and answers with an `AppEvent`.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::models::{CarSearch, NewCar};
use crate::tui::app::Screen;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Navigate to a different screen
    NavigateTo(Screen),
    /// Quit the application
    Quit,
    /// Set status message
    SetStatus(String),
    /// Start a background request
    Request(Request),
    /// No action taken
    None,
}

/// Outbound work a screen asks the app to perform.
///
/// Each carries the mount generation of the screen that asked, so answers
/// for a screen that has since been remounted can be dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    DecodeVin {
        origin: Screen,
        generation: u64,
        vin: String,
    },
    LoadOwners {
        generation: u64,
    },
    InsertCar {
        generation: u64,
        car: NewCar,
    },
    SearchCars {
        generation: u64,
        search: CarSearch,
    },
}

/// Core trait for all TUI screens
pub trait ScreenHandler {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action
    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction;

    /// Name shown in the status bar
    fn title(&self) -> &'static str;

    /// Screen-specific lines for the help popup
    fn help_text(&self) -> &'static str;

    /// Whether the screen wants Esc for itself (closing a dropdown, say)
    fn captures_escape(&self) -> bool {
        false
    }

    /// Called once when the screen is mounted
    fn on_enter(&mut self) -> ScreenAction {
        ScreenAction::None
    }
}
