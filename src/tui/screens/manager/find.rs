//! Find-car form and result list

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{CarRecord, CarSearch, ValidationError};
use crate::tui::ui::{truncate_to_width, InputField, Styles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindField {
    Make,
    Model,
    Year,
}

impl FindField {
    pub const ALL: [FindField; 3] = [FindField::Make, FindField::Model, FindField::Year];
}

/// Find form state
#[derive(Debug)]
pub struct FindCarForm {
    pub focus: usize,
    pub make_input: InputField,
    pub model_input: InputField,
    pub year_input: InputField,
    pub is_searching: bool,
    /// Rows from the most recent successful search
    pub results: Vec<CarRecord>,
    /// Whether any search has completed this mount
    pub has_searched: bool,
    /// First result shown
    pub scroll_offset: usize,
}

impl FindCarForm {
    pub fn new() -> Self {
        let mut form = Self {
            focus: 0,
            make_input: InputField::new("Make").with_placeholder("any"),
            model_input: InputField::new("Model").with_placeholder("any"),
            year_input: InputField::new("Year").with_placeholder("any"),
            is_searching: false,
            results: Vec::new(),
            has_searched: false,
            scroll_offset: 0,
        };
        form.update_field_focus();
        form
    }

    pub fn focused_field(&self) -> FindField {
        FindField::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FindField::ALL.len();
        self.update_field_focus();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + FindField::ALL.len() - 1) % FindField::ALL.len();
        self.update_field_focus();
    }

    fn update_field_focus(&mut self) {
        let focused = self.focused_field();
        self.make_input.set_focus(focused == FindField::Make);
        self.model_input.set_focus(focused == FindField::Model);
        self.year_input.set_focus(focused == FindField::Year);
    }

    pub fn focused_input(&mut self) -> &mut InputField {
        match self.focused_field() {
            FindField::Make => &mut self.make_input,
            FindField::Model => &mut self.model_input,
            FindField::Year => &mut self.year_input,
        }
    }

    /// Filters to search with, or `Ok(None)` while a search is in flight
    pub fn begin_search(&mut self) -> Result<Option<CarSearch>, ValidationError> {
        if self.is_searching {
            return Ok(None);
        }
        let search = CarSearch::from_filters(
            &self.make_input.value,
            &self.model_input.value,
            &self.year_input.value,
        )?;
        self.is_searching = true;
        Ok(Some(search))
    }

    /// Replace the result list
    pub fn apply_results(&mut self, results: Vec<CarRecord>) {
        self.results = results;
        self.has_searched = true;
        self.scroll_offset = 0;
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < self.results.len() {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, error: Option<&str>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Filters
                Constraint::Length(1), // Search state
                Constraint::Length(1), // Error
                Constraint::Min(0),    // Results
            ])
            .split(area);

        let filters = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
            ])
            .split(rows[0]);
        self.make_input.render(f, filters[0]);
        self.model_input.render(f, filters[1]);
        self.year_input.render(f, filters[2]);

        let button = if self.is_searching {
            Paragraph::new("Searching...").style(Styles::busy())
        } else {
            Paragraph::new("Enter: Search   PgUp/PgDn: Scroll results").style(Styles::info())
        };
        f.render_widget(button, rows[1]);

        if let Some(error) = error {
            f.render_widget(Paragraph::new(error).style(Styles::error()), rows[2]);
        }

        self.draw_results(f, rows[3]);
    }

    fn draw_results(&self, f: &mut Frame, area: Rect) {
        let title = if self.has_searched {
            format!("Results ({})", self.results.len())
        } else {
            "Results".to_string()
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        if self.results.is_empty() {
            let text = if self.has_searched { "No cars found" } else { "Leave filters empty to list every car" };
            let empty = Paragraph::new(Span::styled(text, Styles::inactive())).block(block);
            f.render_widget(empty, area);
            return;
        }

        let width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .results
            .iter()
            .skip(self.scroll_offset)
            .map(|car| ListItem::new(result_lines(car, width)))
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }
}

impl Default for FindCarForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines rendered for one result row
fn result_lines(car: &CarRecord, width: usize) -> Vec<Line<'static>> {
    let line = |label: &str, value: &str, style| {
        Line::from(Span::styled(
            truncate_to_width(&format!("{}{}", label, value), width),
            style,
        ))
    };

    let mut lines = vec![
        line("", &car.headline(), Styles::title()),
        line("", car.vin.as_deref().unwrap_or(""), Styles::inactive()),
        line("Owner: ", &car.owner_name(), Styles::default()),
        line("Address: ", car.owner_field(|o| &o.address), Styles::default()),
        line("City: ", car.owner_field(|o| &o.city), Styles::default()),
        line("State: ", car.owner_field(|o| &o.state), Styles::default()),
    ];
    if let Some(added) = car.added_on() {
        lines.push(line("Added: ", &added, Styles::inactive()));
    }
    lines.push(Line::from(""));
    lines
}
