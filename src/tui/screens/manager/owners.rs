//! Owner directory and the owner picker dropdown

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};
use tracing::{info, warn};

use crate::database::DatabaseError;
use crate::models::{Owner, RecordId};
use crate::tui::ui::{centered_rect, SelectableList, Styles};

/// Label shown while no owner is chosen
pub const NO_OWNER_LABEL: &str = "Select owner";

/// Owners available for selection plus the current choice
#[derive(Debug)]
pub struct OwnerDirectory {
    /// Loaded owners; the list cursor drives the dropdown
    pub owners: SelectableList<Owner>,
    /// Chosen owner, if any
    pub selected: Option<RecordId>,
    pub is_loading: bool,
    pub show_dropdown: bool,
}

impl OwnerDirectory {
    pub fn new() -> Self {
        Self {
            owners: SelectableList::new(Vec::new()),
            selected: None,
            is_loading: false,
            show_dropdown: false,
        }
    }

    /// Store the result of the directory load.
    ///
    /// Failure leaves the list empty and is only logged; the user sees an
    /// empty picker.
    pub fn apply_load(&mut self, result: Result<Vec<Owner>, DatabaseError>) {
        self.is_loading = false;
        match result {
            Ok(owners) => {
                info!("Owner directory loaded with {} entries", owners.len());
                self.owners = SelectableList::new(owners);
            }
            Err(e) => {
                warn!("Owner directory load failed: {}", e);
            }
        }
    }

    pub fn selected_owner(&self) -> Option<&Owner> {
        let id = self.selected.as_ref()?;
        self.owners.items.iter().find(|o| &o.id == id)
    }

    /// Text for the picker field
    pub fn selected_label(&self) -> String {
        match (&self.selected, self.selected_owner()) {
            (None, _) => NO_OWNER_LABEL.to_string(),
            (Some(_), Some(owner)) => owner.display_name(),
            (Some(id), None) => id.to_string(),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn open_dropdown(&mut self) {
        self.show_dropdown = true;
        if let Some(index) = self
            .selected
            .as_ref()
            .and_then(|id| self.owners.items.iter().position(|o| &o.id == id))
        {
            self.owners.select(Some(index));
        }
    }

    /// Keys while the dropdown is open
    pub fn handle_dropdown_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Up => self.owners.previous(),
            KeyCode::Down => self.owners.next(),
            KeyCode::Enter => {
                if let Some(owner) = self.owners.selected() {
                    self.selected = Some(owner.id.clone());
                }
                self.show_dropdown = false;
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.selected = None;
                self.show_dropdown = false;
            }
            KeyCode::Esc => self.show_dropdown = false,
            _ => {}
        }
    }

    pub fn draw_dropdown(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 60, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .title("Owner (Enter: choose, Del: none, Esc: close)")
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        if self.owners.is_empty() {
            let text = if self.is_loading { "Loading owners..." } else { "No owners" };
            let list = List::new(vec![ListItem::new(Span::styled(text, Styles::inactive()))]).block(block);
            f.render_widget(list, popup);
            return;
        }

        let items: Vec<ListItem> = self
            .owners
            .items
            .iter()
            .map(|owner| {
                let marker = if Some(&owner.id) == self.selected.as_ref() { "● " } else { "  " };
                ListItem::new(Line::from(format!("{}{}", marker, owner.display_name())))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Styles::selected());

        f.render_stateful_widget(list, popup, &mut self.owners.state);
    }
}

impl Default for OwnerDirectory {
    fn default() -> Self {
        Self::new()
    }
}
