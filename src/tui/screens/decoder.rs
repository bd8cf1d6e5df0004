//! Standalone VIN decoder screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, warn};

use crate::models::{validate_vin, VIN_LENGTH};
use crate::tui::{
    app::Screen,
    traits::{Request, ScreenAction, ScreenHandler},
    ui::{InputField, Styles},
};
use crate::vpic::{DecodedVehicle, VinError};

/// Decoder screen state. Lives for one mount of the screen.
pub struct DecoderScreen {
    pub generation: u64,
    pub vin_input: InputField,
    pub is_decoding: bool,
    /// Attributes from the most recent successful decode
    pub vehicle: Option<DecodedVehicle>,
    pub error: Option<String>,
}

impl DecoderScreen {
    pub fn new(generation: u64) -> Self {
        let mut vin_input = InputField::new("VIN")
            .with_placeholder("17-character VIN, e.g. YT9NN1U17MA007500")
            .with_max_len(VIN_LENGTH)
            .uppercase();
        vin_input.set_focus(true);

        Self {
            generation,
            vin_input,
            is_decoding: false,
            vehicle: None,
            error: None,
        }
    }

    /// Validate and start a decode. Ignored while one is already in flight.
    fn start_decode(&mut self) -> ScreenAction {
        if self.is_decoding {
            return ScreenAction::None;
        }

        let vin = self.vin_input.value.clone();
        if let Err(e) = validate_vin(&vin) {
            self.error = Some(e.to_string());
            return ScreenAction::None;
        }

        self.is_decoding = true;
        self.error = None;
        ScreenAction::Request(Request::DecodeVin {
            origin: Screen::Decoder,
            generation: self.generation,
            vin,
        })
    }

    /// Apply a finished decode for this mount
    pub fn apply_decode(&mut self, generation: u64, result: Result<DecodedVehicle, VinError>) -> ScreenAction {
        if generation != self.generation {
            debug!("Dropping decode result for stale decoder mount {}", generation);
            return ScreenAction::None;
        }

        self.is_decoding = false;
        match result {
            Ok(vehicle) => {
                self.vehicle = Some(vehicle);
                ScreenAction::SetStatus("VIN decoded".to_string())
            }
            Err(e) => {
                warn!("VIN decode failed: {}", e.cause());
                self.error = Some(e.to_string());
                ScreenAction::None
            }
        }
    }

    fn draw_attributes(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Vehicle Attributes")
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let lines: Vec<Line> = match &self.vehicle {
            Some(vehicle) => vehicle
                .attributes()
                .into_iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{:<18}", label), Styles::title()),
                        Span::raw(value.unwrap_or("").to_string()),
                    ])
                })
                .collect(),
            None => vec![Line::from(Span::styled(
                "Enter a VIN and press Enter to decode it",
                Styles::inactive(),
            ))],
        };

        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl ScreenHandler for DecoderScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // VIN
                Constraint::Length(1), // Button state
                Constraint::Length(1), // Error
                Constraint::Min(0),    // Attributes
            ])
            .split(area);

        self.vin_input.render(f, chunks[0]);

        let button = if self.is_decoding {
            Paragraph::new("Searching...").style(Styles::busy())
        } else {
            Paragraph::new("[Enter] Decode").style(Styles::info())
        };
        f.render_widget(button, chunks[1]);

        if let Some(error) = &self.error {
            f.render_widget(Paragraph::new(error.as_str()).style(Styles::error()), chunks[2]);
        }

        self.draw_attributes(f, chunks[3]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter => self.start_decode(),
            _ => {
                self.vin_input.handle_edit_key(&key);
                ScreenAction::None
            }
        }
    }

    fn title(&self) -> &'static str {
        "VIN Decoder"
    }

    fn help_text(&self) -> &'static str {
        "VIN Decoder:\n\
        Type a 17-character VIN\n\
        Enter - Decode VIN\n\
        ←/→ Home/End - Move cursor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    const VIN: &str = "YT9NN1U17MA007500";

    fn press(screen: &mut DecoderScreen, code: KeyCode) -> ScreenAction {
        screen.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_vin(screen: &mut DecoderScreen, vin: &str) {
        for c in vin.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_short_vin_is_rejected_without_request() {
        let mut screen = DecoderScreen::new(1);
        type_vin(&mut screen, "ABC");

        assert_eq!(press(&mut screen, KeyCode::Enter), ScreenAction::None);
        assert_eq!(screen.error.as_deref(), Some("VIN must be 17 characters"));
        assert!(!screen.is_decoding);
    }

    #[test]
    fn test_valid_vin_requests_decode_once_while_busy() {
        let mut screen = DecoderScreen::new(4);
        type_vin(&mut screen, &VIN.to_lowercase());

        let action = press(&mut screen, KeyCode::Enter);
        assert_eq!(
            action,
            ScreenAction::Request(Request::DecodeVin {
                origin: Screen::Decoder,
                generation: 4,
                vin: VIN.to_string(),
            })
        );
        assert!(screen.is_decoding);

        // Busy: a second press does nothing
        assert_eq!(press(&mut screen, KeyCode::Enter), ScreenAction::None);
    }

    #[test]
    fn test_new_decode_replaces_previous_attributes() {
        let mut screen = DecoderScreen::new(1);
        screen.vehicle = Some(DecodedVehicle {
            trim: Some("EX".to_string()),
            ..Default::default()
        });
        screen.is_decoding = true;

        let fresh = DecodedVehicle {
            model_year: Some("2021".to_string()),
            make: Some("Honda".to_string()),
            model: Some("Civic".to_string()),
            ..Default::default()
        };
        screen.apply_decode(1, Ok(fresh.clone()));

        assert_eq!(screen.vehicle, Some(fresh));
        assert!(!screen.is_decoding);
    }

    #[test]
    fn test_failed_decode_shows_generic_message() {
        let mut screen = DecoderScreen::new(1);
        screen.is_decoding = true;
        screen.apply_decode(1, Err(VinError::NoResults));

        assert_eq!(screen.error.as_deref(), Some("Failed to decode VIN"));
        assert!(!screen.is_decoding);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut screen = DecoderScreen::new(2);
        assert_eq!(
            screen.apply_decode(1, Ok(DecodedVehicle::default())),
            ScreenAction::None
        );
        assert!(screen.vehicle.is_none());
    }
}
