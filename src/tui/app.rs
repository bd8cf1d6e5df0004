//! Main TUI application state and logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::events::AppEvent;
use super::screens::{DecoderScreen, MainMenuScreen, ManagerScreen};
use super::traits::{Request, ScreenAction, ScreenHandler};
use super::ui::centered_rect;
use crate::config::Config;
use crate::database::{CarStore, DatabaseError, SupabaseClient};
use crate::models::{CarRecord, CarSearch, NewCar, Owner};
use crate::vpic::{VinLookup, VpicClient};

/// How long the loop waits for a key before checking for finished requests
const TICK: Duration = Duration::from_millis(100);

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Screen {
    MainMenu,
    Decoder,
    Manager,
}

/// Backends the screens' requests are run against
#[derive(Clone)]
pub struct Services {
    pub vin_lookup: Arc<dyn VinLookup>,
    pub store: Arc<dyn CarStore>,
}

impl Services {
    /// Build the real HTTP clients.
    ///
    /// Missing database credentials do not stop the decoder from working; the
    /// manager's requests then fail with the configuration error instead.
    pub fn from_config(config: &Config) -> Result<Self> {
        let vin_lookup = Arc::new(VpicClient::new(config)?);
        let store: Arc<dyn CarStore> = match SupabaseClient::new(config) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("Database unavailable: {}", e);
                Arc::new(UnconfiguredStore(e.to_string()))
            }
        };

        Ok(Self { vin_lookup, store })
    }
}

/// Store used when no database is configured
struct UnconfiguredStore(String);

impl UnconfiguredStore {
    fn error(&self) -> DatabaseError {
        DatabaseError::NotConfigured(self.0.clone())
    }
}

#[async_trait]
impl CarStore for UnconfiguredStore {
    async fn list_owners(&self) -> Result<Vec<Owner>, DatabaseError> {
        Err(self.error())
    }

    async fn insert_car(&self, _car: &NewCar) -> Result<(), DatabaseError> {
        Err(self.error())
    }

    async fn search_cars(&self, _search: &CarSearch) -> Result<Vec<CarRecord>, DatabaseError> {
        Err(self.error())
    }
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    pub services: Services,

    // Screen states
    pub main_menu: MainMenuScreen,
    pub decoder: DecoderScreen,
    pub manager: ManagerScreen,

    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    next_generation: u64,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status_message: Option<String>,
}

impl App {
    /// Create a new TUI application showing `start`
    pub fn new(services: Services, start: Screen) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            current_screen: Screen::MainMenu,
            services,
            main_menu: MainMenuScreen::new(),
            decoder: DecoderScreen::new(0),
            manager: ManagerScreen::new(0),
            events_tx,
            events_rx,
            next_generation: 1,
            should_quit: false,
            show_help_popup: false,
            status_message: None,
        };
        if start != Screen::MainMenu {
            app.navigate_to_screen(start);
        }
        app
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            terminal.draw(|f| self.draw(f))?;

            if crossterm::event::poll(TICK)? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_app_event(event);
            }

            if self.should_quit {
                break;
            }
        }

        info!("Application loop completed");
        Ok(())
    }

    fn current_mut(&mut self) -> &mut dyn ScreenHandler {
        match self.current_screen {
            Screen::MainMenu => &mut self.main_menu,
            Screen::Decoder => &mut self.decoder,
            Screen::Manager => &mut self.manager,
        }
    }

    fn current(&self) -> &dyn ScreenHandler {
        match self.current_screen {
            Screen::MainMenu => &self.main_menu,
            Screen::Decoder => &self.decoder,
            Screen::Manager => &self.manager,
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global shortcuts
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if key.code == KeyCode::F(1) {
            self.show_help_popup = !self.show_help_popup;
            return;
        }

        if self.show_help_popup {
            if key.code == KeyCode::Esc {
                self.show_help_popup = false;
            }
            return;
        }

        if key.code == KeyCode::Esc && !self.current().captures_escape() {
            if self.current_screen != Screen::MainMenu {
                self.navigate_to_screen(Screen::MainMenu);
            }
            return;
        }

        let action = self.current_mut().handle_key_event(key);
        self.apply_action(action);
    }

    pub fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.set_status(message),
            ScreenAction::Request(request) => {
                self.clear_messages();
                self.dispatch(request);
            }
            ScreenAction::None => {}
        }
    }

    /// Run a request in the background; its answer arrives as an [`AppEvent`]
    fn dispatch(&self, request: Request) {
        debug!("Dispatching {:?}", request);
        let services = self.services.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let event = match request {
                Request::DecodeVin { origin, generation, vin } => AppEvent::VinDecoded {
                    origin,
                    generation,
                    result: services.vin_lookup.decode(&vin).await,
                },
                Request::LoadOwners { generation } => AppEvent::OwnersLoaded {
                    generation,
                    result: services.store.list_owners().await,
                },
                Request::InsertCar { generation, car } => AppEvent::CarInserted {
                    generation,
                    result: services.store.insert_car(&car).await,
                },
                Request::SearchCars { generation, search } => AppEvent::CarsFound {
                    generation,
                    result: services.store.search_cars(&search).await,
                },
            };

            if tx.send(event).is_err() {
                debug!("UI closed before request finished");
            }
        });
    }

    /// Route a finished request to the screen that asked for it
    pub fn handle_app_event(&mut self, event: AppEvent) {
        let (target, action) = match event {
            AppEvent::VinDecoded {
                origin: Screen::Manager,
                generation,
                result,
            } => (Screen::Manager, self.manager.apply_decode(generation, result)),
            AppEvent::VinDecoded { generation, result, .. } => {
                (Screen::Decoder, self.decoder.apply_decode(generation, result))
            }
            AppEvent::OwnersLoaded { generation, result } => {
                (Screen::Manager, self.manager.apply_owners(generation, result))
            }
            AppEvent::CarInserted { generation, result } => {
                (Screen::Manager, self.manager.apply_insert(generation, result))
            }
            AppEvent::CarsFound { generation, result } => {
                (Screen::Manager, self.manager.apply_search(generation, result))
            }
        };

        if target == self.current_screen {
            self.apply_action(action);
        }
    }

    /// Wait for the next finished request
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Navigate to a screen, mounting it afresh
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        self.clear_messages();
        let generation = self.next_generation;
        self.next_generation += 1;

        match screen {
            Screen::MainMenu => {}
            Screen::Decoder => self.decoder = DecoderScreen::new(generation),
            Screen::Manager => self.manager = ManagerScreen::new(generation),
        }
        debug!("Mounted {:?} (generation {})", screen, generation);

        self.current_screen = screen;
        let action = self.current_mut().on_enter();
        self.apply_action(action);
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Clear the status message
    pub fn clear_messages(&mut self) {
        self.status_message = None;
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.current_mut().draw(f, chunks[0]);
        self.draw_status_bar(f, chunks[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    /// Draw status bar with current screen info and shortcuts.
    ///
    /// Failures are shown inline by the screen that ran the action, so the
    /// bar only carries completion notices.
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let (status_text, style) = match &self.status_message {
            Some(msg) => (format!("Status: {}", msg), Style::default().fg(Color::Green)),
            None => (
                format!(
                    "Carbook - {} | ESC: Back | Ctrl+C: Quit | F1: Help",
                    self.current().title()
                ),
                Style::default().fg(Color::Gray),
            ),
        };

        let status_bar = Paragraph::new(status_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 70, area);
        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    fn context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            ESC - Go back\n\
            Ctrl+C - Quit application\n\
            F1 - Toggle this help\n\n";

        format!("{}{}", global_help, self.current().help_text())
    }
}
