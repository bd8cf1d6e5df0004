//! Car/owner manager screen
//!
//! Two modes share one screen: adding a car (with optional VIN pre-fill and
//! an owner picker fed by the owner directory) and finding cars with their
//! owners.

pub mod add;
pub mod find;
pub mod owners;

pub use add::{AddCarForm, AddField};
pub use find::{FindCarForm, FindField};
pub use owners::OwnerDirectory;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};
use tracing::{debug, info, warn};

use crate::database::DatabaseError;
use crate::models::{CarRecord, Owner};
use crate::tui::{
    app::Screen,
    traits::{Request, ScreenAction, ScreenHandler},
    ui::Styles,
};
use crate::vpic::{DecodedVehicle, VinError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerMode {
    Add,
    Find,
}

/// Manager screen state. Lives for one mount of the screen.
pub struct ManagerScreen {
    pub generation: u64,
    pub mode: ManagerMode,
    pub add: AddCarForm,
    pub find: FindCarForm,
    /// Inline error from the most recent failed action
    pub error: Option<String>,
}

impl ManagerScreen {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            mode: ManagerMode::Add,
            add: AddCarForm::new(),
            find: FindCarForm::new(),
            error: None,
        }
    }

    fn is_current(&self, generation: u64, what: &str) -> bool {
        if generation != self.generation {
            debug!("Dropping {} for stale manager mount {}", what, generation);
            return false;
        }
        true
    }

    fn handle_add_key(&mut self, key: KeyEvent) -> ScreenAction {
        if self.add.owners.show_dropdown {
            self.add.owners.handle_dropdown_key(&key);
            return ScreenAction::None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.add.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.add.focus_previous(),
            KeyCode::Enter => {
                return match self.add.focused_field() {
                    AddField::Vin => self.start_prefill(),
                    AddField::Owner => {
                        self.add.owners.open_dropdown();
                        ScreenAction::None
                    }
                    _ => self.start_save(),
                };
            }
            _ => {
                if let Some(input) = self.add.focused_input() {
                    input.handle_edit_key(&key);
                }
            }
        }
        ScreenAction::None
    }

    fn handle_find_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Tab => self.find.focus_next(),
            KeyCode::BackTab => self.find.focus_previous(),
            KeyCode::PageDown | KeyCode::Down => self.find.scroll_down(),
            KeyCode::PageUp | KeyCode::Up => self.find.scroll_up(),
            KeyCode::Enter => return self.start_search(),
            _ => {
                self.find.focused_input().handle_edit_key(&key);
            }
        }
        ScreenAction::None
    }

    fn start_prefill(&mut self) -> ScreenAction {
        match self.add.begin_decode() {
            Ok(Some(vin)) => {
                self.error = None;
                ScreenAction::Request(Request::DecodeVin {
                    origin: Screen::Manager,
                    generation: self.generation,
                    vin,
                })
            }
            Ok(None) => ScreenAction::None,
            Err(e) => {
                self.error = Some(e.to_string());
                ScreenAction::None
            }
        }
    }

    fn start_save(&mut self) -> ScreenAction {
        match self.add.begin_save() {
            Ok(Some(car)) => {
                self.error = None;
                ScreenAction::Request(Request::InsertCar {
                    generation: self.generation,
                    car,
                })
            }
            Ok(None) => ScreenAction::None,
            Err(e) => {
                self.error = Some(e.to_string());
                ScreenAction::None
            }
        }
    }

    fn start_search(&mut self) -> ScreenAction {
        match self.find.begin_search() {
            Ok(Some(search)) => {
                self.error = None;
                ScreenAction::Request(Request::SearchCars {
                    generation: self.generation,
                    search,
                })
            }
            Ok(None) => ScreenAction::None,
            Err(e) => {
                self.error = Some(e.to_string());
                ScreenAction::None
            }
        }
    }

    pub fn apply_owners(&mut self, generation: u64, result: Result<Vec<Owner>, DatabaseError>) -> ScreenAction {
        if self.is_current(generation, "owner directory") {
            self.add.owners.apply_load(result);
        }
        ScreenAction::None
    }

    pub fn apply_decode(&mut self, generation: u64, result: Result<DecodedVehicle, VinError>) -> ScreenAction {
        if !self.is_current(generation, "VIN pre-fill") {
            return ScreenAction::None;
        }

        self.add.is_decoding = false;
        match result {
            Ok(vehicle) => {
                self.add.apply_decoded(&vehicle);
                ScreenAction::None
            }
            Err(e) => {
                warn!("VIN pre-fill failed: {}", e.cause());
                self.error = Some(e.to_string());
                ScreenAction::None
            }
        }
    }

    pub fn apply_insert(&mut self, generation: u64, result: Result<(), DatabaseError>) -> ScreenAction {
        if !self.is_current(generation, "insert result") {
            return ScreenAction::None;
        }

        self.add.is_saving = false;
        match result {
            Ok(()) => {
                info!("Car added");
                self.add.reset_fields();
                ScreenAction::SetStatus("Car added".to_string())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                ScreenAction::None
            }
        }
    }

    pub fn apply_search(&mut self, generation: u64, result: Result<Vec<CarRecord>, DatabaseError>) -> ScreenAction {
        if !self.is_current(generation, "search result") {
            return ScreenAction::None;
        }

        self.find.is_searching = false;
        match result {
            Ok(cars) => {
                let count = cars.len();
                self.find.apply_results(cars);
                ScreenAction::SetStatus(format!("Found {} car(s)", count))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                ScreenAction::None
            }
        }
    }
}

impl ScreenHandler for ManagerScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let selected = match self.mode {
            ManagerMode::Add => 0,
            ManagerMode::Find => 1,
        };
        let tabs = Tabs::new(vec![Line::from("F2 Add"), Line::from("F3 Find")])
            .block(Block::default().title("Car Manager").borders(Borders::ALL))
            .select(selected)
            .style(Styles::inactive())
            .highlight_style(Styles::selected());
        f.render_widget(tabs, chunks[0]);

        let error = self.error.as_deref();
        match self.mode {
            ManagerMode::Add => self.add.draw(f, chunks[1], error),
            ManagerMode::Find => self.find.draw(f, chunks[1], error),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::F(2) => {
                self.mode = ManagerMode::Add;
                ScreenAction::None
            }
            KeyCode::F(3) => {
                self.add.owners.show_dropdown = false;
                self.mode = ManagerMode::Find;
                ScreenAction::None
            }
            _ => match self.mode {
                ManagerMode::Add => self.handle_add_key(key),
                ManagerMode::Find => self.handle_find_key(key),
            },
        }
    }

    fn title(&self) -> &'static str {
        match self.mode {
            ManagerMode::Add => "Car Manager - Add",
            ManagerMode::Find => "Car Manager - Find",
        }
    }

    fn help_text(&self) -> &'static str {
        match self.mode {
            ManagerMode::Add => {
                "Add Car:\n\
                F2/F3 - Switch Add/Find\n\
                Tab/↓ - Next field\n\
                Shift+Tab/↑ - Previous field\n\
                Enter on VIN - Fill year/make/model from VIN\n\
                Enter on Owner - Choose owner\n\
                Enter elsewhere - Add to database"
            }
            ManagerMode::Find => {
                "Find Cars:\n\
                F2/F3 - Switch Add/Find\n\
                Tab/Shift+Tab - Switch filter\n\
                Enter - Search (empty filters match all)\n\
                ↑/↓ PgUp/PgDn - Scroll results"
            }
        }
    }

    fn captures_escape(&self) -> bool {
        self.add.owners.show_dropdown
    }

    fn on_enter(&mut self) -> ScreenAction {
        self.add.owners.is_loading = true;
        ScreenAction::Request(Request::LoadOwners {
            generation: self.generation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CarSearch, RecordId};
    use crossterm::event::KeyModifiers;

    const VIN: &str = "YT9NN1U17MA007500";

    fn press(screen: &mut ManagerScreen, code: KeyCode) -> ScreenAction {
        screen.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(screen: &mut ManagerScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    fn focus_add(screen: &mut ManagerScreen, field: AddField) {
        while screen.add.focused_field() != field {
            press(screen, KeyCode::Tab);
        }
    }

    fn owner(id: i64) -> Owner {
        Owner {
            id: RecordId::Number(id),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            address: None,
            city: None,
            state: None,
        }
    }

    #[test]
    fn test_mount_requests_owner_directory() {
        let mut screen = ManagerScreen::new(9);
        assert_eq!(
            screen.on_enter(),
            ScreenAction::Request(Request::LoadOwners { generation: 9 })
        );
        assert!(screen.add.owners.is_loading);
    }

    #[test]
    fn test_add_with_missing_fields_issues_no_insert() {
        let mut screen = ManagerScreen::new(1);
        type_text(&mut screen, "2021");
        let action = press(&mut screen, KeyCode::Enter);

        assert_eq!(action, ScreenAction::None);
        assert_eq!(screen.error.as_deref(), Some("All fields are required"));
        assert!(!screen.add.is_saving);
    }

    #[test]
    fn test_full_add_flow() {
        let mut screen = ManagerScreen::new(1);
        screen.apply_owners(1, Ok(vec![owner(5)]));

        type_text(&mut screen, "2021");
        focus_add(&mut screen, AddField::Make);
        type_text(&mut screen, "Honda");
        focus_add(&mut screen, AddField::Model);
        type_text(&mut screen, "Civic");
        focus_add(&mut screen, AddField::Vin);
        type_text(&mut screen, VIN);
        focus_add(&mut screen, AddField::Owner);
        press(&mut screen, KeyCode::Enter);
        assert!(screen.captures_escape());
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.add.owners.selected, Some(RecordId::Number(5)));

        focus_add(&mut screen, AddField::Year);
        let action = press(&mut screen, KeyCode::Enter);
        let car = match action {
            ScreenAction::Request(Request::InsertCar { generation: 1, car }) => car,
            other => panic!("expected insert, got {:?}", other),
        };
        assert_eq!(car.vin, VIN);
        assert_eq!(car.owner_id, RecordId::Number(5));
        assert!(screen.add.is_saving);

        let action = screen.apply_insert(1, Ok(()));
        assert_eq!(action, ScreenAction::SetStatus("Car added".to_string()));
        assert!(!screen.add.is_saving);
        assert!(screen.add.year_input.is_empty());
        assert!(screen.add.make_input.is_empty());
        assert!(screen.add.model_input.is_empty());
        assert!(screen.add.vin_input.is_empty());
        assert!(screen.add.owners.selected.is_none());
    }

    #[test]
    fn test_insert_failure_keeps_fields_and_shows_message() {
        let mut screen = ManagerScreen::new(1);
        screen.add.make_input.set_value("Honda");
        screen.add.is_saving = true;

        screen.apply_insert(
            1,
            Err(DatabaseError::Api {
                status: 409,
                message: "duplicate key value".to_string(),
            }),
        );

        assert_eq!(screen.error.as_deref(), Some("duplicate key value"));
        assert_eq!(screen.add.make_input.value, "Honda");
        assert!(!screen.add.is_saving);
    }

    #[test]
    fn test_prefill_from_vin() {
        let mut screen = ManagerScreen::new(3);
        focus_add(&mut screen, AddField::Vin);
        type_text(&mut screen, VIN);

        let action = press(&mut screen, KeyCode::Enter);
        assert_eq!(
            action,
            ScreenAction::Request(Request::DecodeVin {
                origin: Screen::Manager,
                generation: 3,
                vin: VIN.to_string(),
            })
        );

        screen.apply_decode(
            3,
            Ok(DecodedVehicle {
                model_year: Some("2021".to_string()),
                make: Some("Honda".to_string()),
                model: Some("Civic".to_string()),
                ..Default::default()
            }),
        );
        assert_eq!(screen.add.year_input.value, "2021");
        assert_eq!(screen.add.make_input.value, "Honda");
        assert_eq!(screen.add.model_input.value, "Civic");
        assert!(!screen.add.is_decoding);
    }

    #[test]
    fn test_find_mode_search() {
        let mut screen = ManagerScreen::new(2);
        press(&mut screen, KeyCode::F(3));
        assert_eq!(screen.mode, ManagerMode::Find);

        type_text(&mut screen, "Honda");
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "2015");

        let action = press(&mut screen, KeyCode::Enter);
        assert_eq!(
            action,
            ScreenAction::Request(Request::SearchCars {
                generation: 2,
                search: CarSearch {
                    make: Some("Honda".to_string()),
                    model: None,
                    year: Some(2015),
                },
            })
        );

        let action = screen.apply_search(2, Ok(vec![]));
        assert_eq!(action, ScreenAction::SetStatus("Found 0 car(s)".to_string()));
        assert!(screen.find.has_searched);
        assert!(!screen.find.is_searching);
    }

    #[test]
    fn test_search_failure_shows_service_message() {
        let mut screen = ManagerScreen::new(2);
        screen.find.is_searching = true;
        screen.apply_search(
            2,
            Err(DatabaseError::Api {
                status: 400,
                message: "column cars.year does not exist".to_string(),
            }),
        );
        assert_eq!(screen.error.as_deref(), Some("column cars.year does not exist"));
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let mut screen = ManagerScreen::new(5);
        screen.add.is_saving = true;
        screen.apply_insert(4, Ok(()));
        assert!(screen.add.is_saving);

        screen.apply_owners(4, Ok(vec![owner(1)]));
        assert!(screen.add.owners.owners.is_empty());
    }
}
