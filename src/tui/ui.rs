//! Common UI components and utilities for the carbook TUI

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn busy() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn info() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_border() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default().fg(Color::Gray)
    }
}

/// Selectable list widget with state
#[derive(Debug)]
pub struct SelectableList<T> {
    pub items: Vec<T>,
    pub state: ListState,
}

impl<T> SelectableList<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self { items, state }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Single-line text input with a cursor.
///
/// The cursor is a character index, so multi-byte input never splits a char.
#[derive(Debug, Clone)]
pub struct InputField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub is_focused: bool,
    pub cursor_position: usize,
    /// Maximum number of characters accepted
    pub max_len: Option<usize>,
    /// Uppercase letters as they are typed
    pub uppercase: bool,
}

impl InputField {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            is_focused: false,
            cursor_position: 0,
            max_len: None,
            uppercase: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    /// Replace the whole value, cursor at the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert at the cursor. Input that would push the value past `max_len`
    /// is dropped whole, including multi-char uppercase expansions like `ß`.
    pub fn insert_char(&mut self, c: char) {
        let text: String = if self.uppercase {
            c.to_uppercase().collect()
        } else {
            c.to_string()
        };
        let added = text.chars().count();
        if self.max_len.is_some_and(|max| self.char_len() + added > max) {
            return;
        }
        let offset = self.byte_offset(self.cursor_position);
        self.value.insert_str(offset, &text);
        self.cursor_position += added;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let offset = self.byte_offset(self.cursor_position);
            self.value.remove(offset);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_len() {
            let offset = self.byte_offset(self.cursor_position);
            self.value.remove(offset);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_len() {
            self.cursor_position += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Apply an editing key. Returns false when the key is not an edit.
    pub fn handle_edit_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.char_len(),
            _ => return false,
        }
        true
    }

    /// Render the input field as a widget
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let display_text = if showing_placeholder {
            &self.placeholder
        } else {
            &self.value
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let block = Block::default()
            .title(self.label.as_str())
            .borders(Borders::ALL)
            .border_style(border_style);

        let input_style = if showing_placeholder {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(display_text.to_string())
            .style(input_style)
            .block(block);

        f.render_widget(paragraph, area);

        if self.is_focused {
            let before_cursor: String = self.value.chars().take(self.cursor_position).collect();
            let cursor_x = area.x + 1 + before_cursor.width() as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// Center a rectangle within another rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate to a display width, marking the cut with an ellipsis
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_vin_style_input_uppercases_and_caps_length() {
        let mut field = InputField::new("VIN").with_max_len(17).uppercase();
        for c in "yt9nn1u17ma007500extra".chars() {
            field.handle_edit_key(&key(KeyCode::Char(c)));
        }
        assert_eq!(field.value, "YT9NN1U17MA007500");
    }

    #[test]
    fn test_uppercase_expansion_respects_max_len() {
        let mut field = InputField::new("VIN").with_max_len(17).uppercase();
        field.set_value("YT9NN1U17MA00750");
        field.handle_edit_key(&key(KeyCode::Char('ß')));
        assert_eq!(field.value, "YT9NN1U17MA00750");
        assert_eq!(field.value.chars().count(), 16);

        field.handle_edit_key(&key(KeyCode::Char('x')));
        assert_eq!(field.value, "YT9NN1U17MA00750X");

        let mut field = InputField::new("VIN").with_max_len(17).uppercase();
        field.handle_edit_key(&key(KeyCode::Char('ß')));
        assert_eq!(field.value, "SS");
        assert_eq!(field.cursor_position, 2);
    }

    #[test]
    fn test_cursor_editing() {
        let mut field = InputField::new("Make");
        field.set_value("Hnda");
        field.handle_edit_key(&key(KeyCode::Home));
        field.handle_edit_key(&key(KeyCode::Right));
        field.handle_edit_key(&key(KeyCode::Char('o')));
        assert_eq!(field.value, "Honda");

        field.handle_edit_key(&key(KeyCode::End));
        field.handle_edit_key(&key(KeyCode::Backspace));
        assert_eq!(field.value, "Hond");

        field.handle_edit_key(&key(KeyCode::Home));
        field.handle_edit_key(&key(KeyCode::Delete));
        assert_eq!(field.value, "ond");

        assert!(!field.handle_edit_key(&key(KeyCode::Enter)));
        assert!(!field.handle_edit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_multibyte_input() {
        let mut field = InputField::new("City");
        field.set_value("Zürich");
        field.handle_edit_key(&key(KeyCode::Backspace));
        field.handle_edit_key(&key(KeyCode::Left));
        field.handle_edit_key(&key(KeyCode::Left));
        field.handle_edit_key(&key(KeyCode::Left));
        field.handle_edit_key(&key(KeyCode::Backspace));
        assert_eq!(field.value, "Zric");
    }

    #[test]
    fn test_selectable_list_wraps() {
        let mut list = SelectableList::new(vec!["a", "b", "c"]);
        list.previous();
        assert_eq!(list.selected(), Some(&"c"));
        list.next();
        assert_eq!(list.selected(), Some(&"a"));

        let mut empty: SelectableList<&str> = SelectableList::new(vec![]);
        empty.next();
        assert!(empty.selected().is_none());
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Civic", 10), "Civic");
        assert_eq!(truncate_to_width("Accord Hybrid Touring", 8), "Accord …");
    }
}
