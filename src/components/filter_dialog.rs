//! Filter picker dialog component
//!
//! Lists every filter dimension of the active table with its distinct values.
//! Picking a value sets an equality filter; picking "all" clears that dimension.

use crate::action::Action;
use crate::component::Component;
use crate::model::view::FILTER_ALL;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::collections::BTreeMap;

/// One pickable row in the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEntry {
    /// Dimension header (not selectable)
    Header(&'static str),
    /// A value of a dimension; `FILTER_ALL` clears it
    Value {
        field: &'static str,
        value: String,
    },
}

/// Filter picker dialog
pub struct FilterDialog {
    pub entries: Vec<FilterEntry>,
    /// Index into `entries`, always on a `Value` row when any exist
    pub selected_index: usize,
    pub list_state: ListState,
    /// Filters active when the dialog was opened
    pub active: BTreeMap<String, String>,
    /// Table name shown in the title
    pub table: String,
}

impl Default for FilterDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterDialog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            selected_index: 0,
            list_state: ListState::default(),
            active: BTreeMap::new(),
            table: String::new(),
        }
    }

    /// Rebuild entries from `(dimension, values)` pairs
    pub fn set_options(
        &mut self,
        table: &str,
        options: Vec<(&'static str, Vec<String>)>,
        active: &BTreeMap<String, String>,
    ) {
        self.table = table.to_string();
        self.active = active.clone();
        self.entries.clear();

        for (field, values) in options {
            self.entries.push(FilterEntry::Header(field));
            self.entries.push(FilterEntry::Value {
                field,
                value: FILTER_ALL.to_string(),
            });
            for value in values {
                self.entries.push(FilterEntry::Value { field, value });
            }
        }

        // Start on the first active filter, else the first value row
        let first_active = self.entries.iter().position(|e| match e {
            FilterEntry::Value { field, value } => self.active.get(*field) == Some(value),
            FilterEntry::Header(_) => false,
        });
        self.selected_index = first_active
            .or_else(|| self.entries.iter().position(|e| matches!(e, FilterEntry::Value { .. })))
            .unwrap_or(0);
        self.list_state.select(Some(self.selected_index));
    }

    /// Selected (field, value), if any
    pub fn get_selected(&self) -> Option<(&'static str, &str)> {
        match self.entries.get(self.selected_index)? {
            FilterEntry::Value { field, value } => Some((*field, value.as_str())),
            FilterEntry::Header(_) => None,
        }
    }

    fn is_active(&self, field: &str, value: &str) -> bool {
        match self.active.get(field) {
            Some(current) => current == value,
            None => value == FILTER_ALL,
        }
    }

    fn select_next(&mut self) {
        let next = self
            .entries
            .iter()
            .enumerate()
            .skip(self.selected_index + 1)
            .find(|(_, e)| matches!(e, FilterEntry::Value { .. }))
            .map(|(i, _)| i);
        if let Some(i) = next {
            self.selected_index = i;
            self.list_state.select(Some(i));
        }
    }

    fn select_prev(&mut self) {
        let prev = self.entries[..self.selected_index.min(self.entries.len())]
            .iter()
            .rposition(|e| matches!(e, FilterEntry::Value { .. }));
        if let Some(i) = prev {
            self.selected_index = i;
            self.list_state.select(Some(i));
        }
    }
}

impl Component for FilterDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => self
                .get_selected()
                .map(|(field, value)| Action::SetFilter(field.to_string(), value.to_string())),
            KeyCode::Char('c') => Some(Action::ClearFilters),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Some(Action::ModalDown)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 50u16.min(area.width.saturating_sub(4));
        let content_height = if self.entries.is_empty() { 4 } else { self.entries.len() as u16 + 2 };
        let popup_height = (content_height + 6).min(area.height.saturating_sub(4)).max(12);

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Active filters
                Constraint::Min(3),    // Value list
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        // Header
        let header_text = if self.active.is_empty() {
            "No filter active".to_string()
        } else {
            self.active
                .iter()
                .map(|(f, v)| format!("{}={}", f, v))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let header = Paragraph::new(Line::from(Span::styled(
            header_text,
            Style::default().fg(Color::Cyan),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Filter {} ", self.table))
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(header, main_chunks[0]);

        if self.entries.is_empty() {
            let empty_message = Paragraph::new(Line::from(Span::styled(
                "Nothing to filter on this tab",
                Style::default().fg(Color::Yellow),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(empty_message, main_chunks[1]);
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .map(|entry| match entry {
                    FilterEntry::Header(field) => ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("── {} ", field),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled("──────────", Style::default().fg(Color::DarkGray)),
                    ])),
                    FilterEntry::Value { field, value } => {
                        let is_current = self.is_active(field, value);
                        ListItem::new(Line::from(vec![
                            Span::styled(
                                if is_current { "● " } else { "  " },
                                Style::default().fg(Color::Green),
                            ),
                            Span::styled(
                                value.clone(),
                                if is_current {
                                    Style::default()
                                        .fg(Color::Cyan)
                                        .add_modifier(Modifier::BOLD)
                                } else if value == FILTER_ALL {
                                    Style::default().fg(Color::DarkGray)
                                } else {
                                    Style::default().fg(Color::White)
                                },
                            ),
                        ]))
                    }
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");

            frame.render_stateful_widget(list, main_chunks[1], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Apply  "),
            Span::styled(
                " c ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Clear all  "),
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Close"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, main_chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn dialog() -> FilterDialog {
        let mut dialog = FilterDialog::new();
        let mut active = BTreeMap::new();
        active.insert("riskLevel".to_string(), "High".to_string());
        dialog.set_options(
            "Sessions",
            vec![
                ("sessionType", vec!["active".to_string(), "ghost".to_string()]),
                ("riskLevel", vec!["Low".to_string(), "High".to_string()]),
            ],
            &active,
        );
        dialog
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_opens_on_active_filter() {
        let dialog = dialog();
        assert_eq!(dialog.get_selected(), Some(("riskLevel", "High")));
    }

    #[test]
    fn test_navigation_skips_headers() {
        let mut dialog = dialog();
        dialog.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(dialog.get_selected(), Some(("riskLevel", "Low")));
        dialog.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(dialog.get_selected(), Some(("riskLevel", "all")));
        dialog.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(dialog.get_selected(), Some(("sessionType", "ghost")));
    }

    #[test]
    fn test_enter_emits_set_filter() {
        let mut dialog = dialog();
        let action = dialog.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::SetFilter("riskLevel".to_string(), "High".to_string()))
        );
    }

    #[test]
    fn test_empty_options() {
        let mut dialog = FilterDialog::new();
        dialog.set_options("Settings", Vec::new(), &BTreeMap::new());
        assert_eq!(dialog.get_selected(), None);
        assert_eq!(dialog.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
    }
}
