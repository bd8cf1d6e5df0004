//! Main menu screen for the carbook TUI

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::tui::{
    app::Screen,
    traits::{ScreenAction, ScreenHandler},
    ui::{SelectableList, Styles},
};

/// Main menu options
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub title: String,
    pub description: String,
    pub shortcut: char,
    pub screen: Screen,
}

impl MenuOption {
    pub fn new(title: &str, description: &str, shortcut: char, screen: Screen) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            shortcut,
            screen,
        }
    }
}

/// Main menu screen state
pub struct MainMenuScreen {
    pub menu: SelectableList<MenuOption>,
}

impl MainMenuScreen {
    pub fn new() -> Self {
        let options = vec![
            MenuOption::new(
                "Car Manager",
                "Add cars with their owner, or find cars by make, model and year",
                'M',
                Screen::Manager,
            ),
            MenuOption::new(
                "VIN Decoder",
                "Look up vehicle attributes for a 17-character VIN",
                'V',
                Screen::Decoder,
            ),
        ];

        Self {
            menu: SelectableList::new(options),
        }
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new("Carbook")
            .style(Styles::title())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_menu(&mut self, f: &mut Frame, area: Rect) {
        let selected = self.menu.state.selected();
        let items: Vec<ListItem> = self
            .menu
            .items
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == selected {
                    Styles::selected()
                } else {
                    Style::default()
                };

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", option.shortcut), Styles::info()),
                        Span::styled(option.title.clone(), style.add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", option.description),
                        if Some(i) == selected { style } else { Styles::inactive() },
                    )),
                ])
            })
            .collect();

        let menu = List::new(items)
            .block(
                Block::default()
                    .title("Main Menu")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(menu, area, &mut self.menu.state);
    }

    fn draw_instructions(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let instructions = vec![
            Line::from(vec![
                Span::styled("Navigation: ", Styles::info()),
                Span::raw("↑/↓ to move, "),
                Span::styled("Enter", bold),
                Span::raw(" to select"),
            ]),
            Line::from(vec![
                Span::styled("Shortcuts: ", Styles::info()),
                Span::styled("M/V", bold),
                Span::raw(" for direct access, "),
                Span::styled("q", bold),
                Span::raw(" to quit"),
            ]),
            Line::from(vec![
                Span::styled("Global: ", Styles::info()),
                Span::styled("F1", bold),
                Span::raw(" for help, "),
                Span::styled("Ctrl+C", bold),
                Span::raw(" to quit from anywhere"),
            ]),
        ];

        let paragraph = Paragraph::new(instructions).block(
            Block::default()
                .title("Instructions")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(paragraph, area);
    }
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenHandler for MainMenuScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Menu
                Constraint::Length(5), // Instructions
            ])
            .split(area);

        self.draw_title(f, chunks[0]);
        self.draw_menu(f, chunks[1]);
        self.draw_instructions(f, chunks[2]);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up => self.menu.previous(),
            KeyCode::Down => self.menu.next(),
            KeyCode::Enter => {
                if let Some(option) = self.menu.selected() {
                    return ScreenAction::NavigateTo(option.screen);
                }
            }
            KeyCode::Char('q') => return ScreenAction::Quit,
            KeyCode::Char(c) => {
                let upper = c.to_ascii_uppercase();
                if let Some(option) = self.menu.items.iter().find(|o| o.shortcut == upper) {
                    return ScreenAction::NavigateTo(option.screen);
                }
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn title(&self) -> &'static str {
        "Main Menu"
    }

    fn help_text(&self) -> &'static str {
        "Main Menu:\n\
        ↑/↓ - Navigate menu\n\
        Enter - Select option\n\
        M - Car Manager\n\
        V - VIN Decoder\n\
        q - Quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(screen: &mut MainMenuScreen, code: KeyCode) -> ScreenAction {
        screen.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_shortcuts_are_case_insensitive() {
        let mut menu = MainMenuScreen::new();
        assert_eq!(press(&mut menu, KeyCode::Char('v')), ScreenAction::NavigateTo(Screen::Decoder));
        assert_eq!(press(&mut menu, KeyCode::Char('M')), ScreenAction::NavigateTo(Screen::Manager));
        assert_eq!(press(&mut menu, KeyCode::Char('x')), ScreenAction::None);
    }

    #[test]
    fn test_enter_opens_highlighted_option() {
        let mut menu = MainMenuScreen::new();
        press(&mut menu, KeyCode::Down);
        assert_eq!(press(&mut menu, KeyCode::Enter), ScreenAction::NavigateTo(Screen::Decoder));
        press(&mut menu, KeyCode::Down);
        assert_eq!(press(&mut menu, KeyCode::Enter), ScreenAction::NavigateTo(Screen::Manager));
    }

    #[test]
    fn test_q_quits() {
        let mut menu = MainMenuScreen::new();
        assert_eq!(press(&mut menu, KeyCode::Char('q')), ScreenAction::Quit);
    }
}
