//! Admin action menu component
//!
//! Lists the admin actions offered on the active tab with their endpoint and
//! the number of records each would target.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::admin_action::ActionKind;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// One offered action and how many records it would hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub kind: ActionKind,
    pub target_count: usize,
    /// Why the action can't run, if it can't
    pub blocked: Option<String>,
}

/// Admin action menu
#[derive(Default)]
pub struct ActionMenu {
    pub entries: Vec<MenuEntry>,
    pub selected_index: usize,
}

impl ActionMenu {
    pub fn set_entries(&mut self, entries: Vec<MenuEntry>) {
        self.entries = entries;
        self.selected_index = 0;
    }

    pub fn get_selected(&self) -> Option<&MenuEntry> {
        self.entries.get(self.selected_index)
    }

    fn run(entry: &MenuEntry) -> Option<Action> {
        if entry.blocked.is_some() {
            return None;
        }
        Some(Action::RunAdminAction(entry.kind))
    }
}

fn target_label(entry: &MenuEntry) -> String {
    let noun = match entry.kind {
        ActionKind::RefreshTokens => "selected token",
        ActionKind::ReapGhostSessions => "ghost session",
        ActionKind::AutoFlagHighRisk => "unflagged high-risk session",
        ActionKind::TerminateSessions => "selected session",
        ActionKind::RevalidateSchema => "selected column",
    };
    let plural = if entry.target_count == 1 { "" } else { "s" };
    format!("{} {}{}", entry.target_count, noun, plural)
}

impl Component for ActionMenu {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => Some(Action::CloseModal),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.entries.len() {
                    self.selected_index += 1;
                }
                Some(Action::ModalDown)
            }
            KeyCode::Enter => self.get_selected().and_then(Self::run),
            KeyCode::Char(c) => self
                .entries
                .iter()
                .find(|e| e.kind.shortcut() == c)
                .and_then(Self::run),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = (self.entries.len() as u16 * 4 + 6).max(8);
        let popup_area = centered_popup(area, 64, height);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![];

        if self.entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "No admin actions on this tab",
                Style::default().fg(Color::DarkGray),
            )));
        }

        for (i, entry) in self.entries.iter().enumerate() {
            let is_selected = i == self.selected_index;
            let marker = if is_selected { "▶ " } else { "  " };
            let name_style = if entry.blocked.is_some() {
                Style::default().fg(Color::DarkGray)
            } else if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("[{}] ", entry.kind.shortcut()),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(entry.kind.label(), name_style),
                Span::styled(
                    format!("  {}", target_label(entry)),
                    Style::default().fg(Color::Green),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("      {}", entry.kind.description()),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("      {}", entry.kind.endpoint()),
                Style::default().fg(Color::DarkGray),
            )));
            if let Some(reason) = &entry.blocked {
                lines.push(Line::from(Span::styled(
                    format!("      ✗ {}", reason),
                    Style::default().fg(Color::Red),
                )));
            } else {
                lines.push(Line::from(""));
            }
        }

        lines.push(Line::from(vec![
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Run  "),
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Close"),
        ]));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Admin Actions ")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(paragraph, popup_area);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn menu() -> ActionMenu {
        let mut menu = ActionMenu::default();
        menu.set_entries(vec![
            MenuEntry {
                kind: ActionKind::TerminateSessions,
                target_count: 2,
                blocked: Some("termination disabled".to_string()),
            },
            MenuEntry {
                kind: ActionKind::ReapGhostSessions,
                target_count: 5,
                blocked: None,
            },
        ]);
        menu
    }

    #[test]
    fn test_shortcut_runs_action() {
        let mut menu = menu();
        assert_eq!(
            menu.handle_key_event(key(KeyCode::Char('g'))).unwrap(),
            Some(Action::RunAdminAction(ActionKind::ReapGhostSessions))
        );
    }

    #[test]
    fn test_blocked_entry_does_not_run() {
        let mut menu = menu();
        assert_eq!(menu.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
        assert_eq!(menu.handle_key_event(key(KeyCode::Char('t'))).unwrap(), None);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut menu = menu();
        menu.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        menu.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(menu.selected_index, 1);
        assert_eq!(
            menu.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::RunAdminAction(ActionKind::ReapGhostSessions))
        );
    }

    #[test]
    fn test_target_label_pluralizes() {
        let entry = MenuEntry {
            kind: ActionKind::RefreshTokens,
            target_count: 1,
            blocked: None,
        };
        assert_eq!(target_label(&entry), "1 selected token");
    }
}
