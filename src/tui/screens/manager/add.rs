//! Add-car form

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{validate_vin, NewCar, ValidationError, VIN_LENGTH};
use crate::tui::ui::{InputField, Styles};
use crate::vpic::DecodedVehicle;

use super::owners::{OwnerDirectory, NO_OWNER_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Year,
    Make,
    Model,
    Vin,
    Owner,
}

impl AddField {
    pub const ALL: [AddField; 5] = [
        AddField::Year,
        AddField::Make,
        AddField::Model,
        AddField::Vin,
        AddField::Owner,
    ];
}

/// Add form state
#[derive(Debug)]
pub struct AddCarForm {
    pub focus: usize,
    pub year_input: InputField,
    pub make_input: InputField,
    pub model_input: InputField,
    pub vin_input: InputField,
    pub owners: OwnerDirectory,
    pub is_decoding: bool,
    pub is_saving: bool,
}

impl AddCarForm {
    pub fn new() -> Self {
        let mut form = Self {
            focus: 0,
            year_input: InputField::new("Year").with_placeholder("2021"),
            make_input: InputField::new("Make").with_placeholder("Honda"),
            model_input: InputField::new("Model").with_placeholder("Civic"),
            vin_input: InputField::new("VIN")
                .with_placeholder("17 characters")
                .with_max_len(VIN_LENGTH)
                .uppercase(),
            owners: OwnerDirectory::new(),
            is_decoding: false,
            is_saving: false,
        };
        form.update_field_focus();
        form
    }

    pub fn focused_field(&self) -> AddField {
        AddField::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % AddField::ALL.len();
        self.update_field_focus();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + AddField::ALL.len() - 1) % AddField::ALL.len();
        self.update_field_focus();
    }

    fn update_field_focus(&mut self) {
        let focused = self.focused_field();
        self.year_input.set_focus(focused == AddField::Year);
        self.make_input.set_focus(focused == AddField::Make);
        self.model_input.set_focus(focused == AddField::Model);
        self.vin_input.set_focus(focused == AddField::Vin);
    }

    /// Text input for the focused field; the owner picker has none
    pub fn focused_input(&mut self) -> Option<&mut InputField> {
        match self.focused_field() {
            AddField::Year => Some(&mut self.year_input),
            AddField::Make => Some(&mut self.make_input),
            AddField::Model => Some(&mut self.model_input),
            AddField::Vin => Some(&mut self.vin_input),
            AddField::Owner => None,
        }
    }

    /// VIN to decode, or `Ok(None)` while a pre-fill decode is in flight
    pub fn begin_decode(&mut self) -> Result<Option<String>, ValidationError> {
        if self.is_decoding {
            return Ok(None);
        }
        validate_vin(&self.vin_input.value)?;
        self.is_decoding = true;
        Ok(Some(self.vin_input.value.clone()))
    }

    /// Overwrite year/make/model with a fresh decode; absent values clear the field
    pub fn apply_decoded(&mut self, vehicle: &DecodedVehicle) {
        self.year_input.set_value(vehicle.model_year.as_deref().unwrap_or(""));
        self.make_input.set_value(vehicle.make.as_deref().unwrap_or(""));
        self.model_input.set_value(vehicle.model.as_deref().unwrap_or(""));
    }

    /// Validated insert payload, or `Ok(None)` while a save is in flight
    pub fn begin_save(&mut self) -> Result<Option<NewCar>, ValidationError> {
        if self.is_saving {
            return Ok(None);
        }
        let car = NewCar::from_form(
            &self.year_input.value,
            &self.make_input.value,
            &self.model_input.value,
            &self.vin_input.value,
            self.owners.selected.as_ref(),
        )?;
        self.is_saving = true;
        Ok(Some(car))
    }

    /// Empty all five fields after a successful insert
    pub fn reset_fields(&mut self) {
        self.year_input.clear();
        self.make_input.clear();
        self.model_input.clear();
        self.vin_input.clear();
        self.owners.clear_selection();
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, error: Option<&str>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Year / Make
                Constraint::Length(3), // Model
                Constraint::Length(3), // VIN + lookup
                Constraint::Length(3), // Owner
                Constraint::Length(1), // Error
                Constraint::Length(1), // Save
                Constraint::Min(0),
            ])
            .split(area);

        let year_make = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        self.year_input.render(f, year_make[0]);
        self.make_input.render(f, year_make[1]);
        self.model_input.render(f, rows[1]);

        let vin_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(16)])
            .split(rows[2]);
        self.vin_input.render(f, vin_row[0]);
        let lookup = if self.is_decoding {
            Paragraph::new("Searching...").style(Styles::busy())
        } else {
            Paragraph::new("Enter: Search").style(Styles::info())
        };
        f.render_widget(lookup.block(Block::default().borders(Borders::ALL)), vin_row[1]);

        let owner_focused = self.focused_field() == AddField::Owner;
        let owner_label = self.owners.selected_label();
        let owner_style = if owner_label == NO_OWNER_LABEL {
            Styles::inactive()
        } else {
            Styles::default()
        };
        let owner_title = if self.owners.is_loading { "Owner (loading...)" } else { "Owner" };
        let owner = Paragraph::new(owner_label).style(owner_style).block(
            Block::default()
                .title(owner_title)
                .borders(Borders::ALL)
                .border_style(if owner_focused {
                    Styles::active_border()
                } else {
                    Styles::inactive_border()
                }),
        );
        f.render_widget(owner, rows[3]);

        if let Some(error) = error {
            f.render_widget(Paragraph::new(error).style(Styles::error()), rows[4]);
        }

        let save = if self.is_saving {
            Paragraph::new("Saving...").style(Styles::busy())
        } else {
            Paragraph::new("Enter: Add to Database").style(Styles::success())
        };
        f.render_widget(save, rows[5]);

        if self.owners.show_dropdown {
            self.owners.draw_dropdown(f, area);
        }
    }
}

impl Default for AddCarForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;

    const VIN: &str = "YT9NN1U17MA007500";

    fn filled_form() -> AddCarForm {
        let mut form = AddCarForm::new();
        form.year_input.set_value("2021");
        form.make_input.set_value("Honda");
        form.model_input.set_value("Civic");
        form.vin_input.set_value(VIN);
        form.owners.selected = Some(RecordId::Number(3));
        form
    }

    #[test]
    fn test_focus_cycles_through_all_fields() {
        let mut form = AddCarForm::new();
        assert_eq!(form.focused_field(), AddField::Year);
        form.focus_previous();
        assert_eq!(form.focused_field(), AddField::Owner);
        assert!(form.focused_input().is_none());
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focused_field(), AddField::Make);
        assert!(form.make_input.is_focused);
        assert!(!form.year_input.is_focused);
    }

    #[test]
    fn test_save_requires_every_field() {
        let mut form = filled_form();
        form.owners.selected = None;
        assert_eq!(form.begin_save(), Err(ValidationError::RequiredFields));
        assert!(!form.is_saving);

        let mut form = filled_form();
        form.model_input.clear();
        assert_eq!(form.begin_save(), Err(ValidationError::RequiredFields));
    }

    #[test]
    fn test_save_is_not_retriggered_while_busy() {
        let mut form = filled_form();
        let car = form.begin_save().unwrap().unwrap();
        assert_eq!(car.year, 2021);
        assert_eq!(car.owner_id, RecordId::Number(3));
        assert!(form.is_saving);
        assert_eq!(form.begin_save(), Ok(None));
    }

    #[test]
    fn test_reset_clears_five_fields() {
        let mut form = filled_form();
        form.reset_fields();
        assert!(form.year_input.is_empty());
        assert!(form.make_input.is_empty());
        assert!(form.model_input.is_empty());
        assert!(form.vin_input.is_empty());
        assert!(form.owners.selected.is_none());
    }

    #[test]
    fn test_prefill_overwrites_without_merging() {
        let mut form = filled_form();
        form.apply_decoded(&DecodedVehicle {
            model_year: Some("2019".to_string()),
            make: Some("Toyota".to_string()),
            model: None,
            ..Default::default()
        });
        assert_eq!(form.year_input.value, "2019");
        assert_eq!(form.make_input.value, "Toyota");
        assert_eq!(form.model_input.value, "");
        assert_eq!(form.vin_input.value, VIN);
    }

    #[test]
    fn test_decode_requires_full_vin() {
        let mut form = AddCarForm::new();
        form.vin_input.set_value("YT9NN");
        assert_eq!(form.begin_decode(), Err(ValidationError::VinLength(5)));
        assert!(!form.is_decoding);

        form.vin_input.set_value(VIN);
        assert_eq!(form.begin_decode(), Ok(Some(VIN.to_string())));
        assert_eq!(form.begin_decode(), Ok(None));
    }
}
