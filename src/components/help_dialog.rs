//! Help dialog component
//!
//! Lists the keyboard shortcuts, with the section for the current screen first.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const KEY_COLUMN: usize = 14;

const TABLE_SECTIONS: &[Section] = &[
    (
        "Navigation",
        &[
            ("j / ↓", "Move to next row"),
            ("k / ↑", "Move to previous row"),
            ("g / G", "Jump to first / last row"),
            ("PgUp/PgDn", "Move ten rows"),
            ("Tab", "Next tab (Sessions/Tokens/Schema/Settings)"),
            ("Shift+Tab", "Previous tab"),
        ],
    ),
    (
        "Search, Filter & Sort",
        &[
            ("/", "Search the active table"),
            ("Esc / Enter", "Leave search mode"),
            ("f", "Pick a field filter"),
            ("c", "Clear search and filters"),
            ("s", "Sort by next column"),
            ("S", "Flip sort direction"),
        ],
    ),
    (
        "Multi-Select",
        &[
            ("Space", "Toggle row selection"),
            ("Ctrl+a", "Select all visible rows"),
            ("Esc", "Clear selection"),
            ("e", "Export selected rows"),
        ],
    ),
    (
        "Admin Actions",
        &[
            ("x / Enter", "Open the action menu"),
            ("o", "Show action progress"),
            ("h", "Open action history"),
            ("r", "Refresh health metrics"),
        ],
    ),
];

const SETTINGS_SECTION: Section = (
    "Settings Tab",
    &[
        ("j / k", "Move between fields"),
        ("[ / ]", "Jump to previous / next section"),
        ("Space", "Flip a toggle"),
        ("+ / - / ← →", "Step a number or choice"),
        ("Enter", "Type a new value"),
        ("w", "Save settings"),
        ("R", "Reset to defaults"),
        ("H", "Open action history"),
    ],
);

const GENERAL_SECTION: Section = (
    "General",
    &[
        ("?", "Show this help"),
        ("q", "Quit / Close dialog"),
        ("Ctrl+c", "Quit immediately"),
    ],
);

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
    /// Opened from the settings tab
    pub on_settings: bool,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = area.inner(Margin {
            vertical: 3,
            horizontal: 6,
        });

        let content = build_help_content(self.on_settings);
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        self.scroll_offset = self.scroll_offset.min(total.saturating_sub(visible_height));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(Clear, dialog_area);
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn push_section(lines: &mut Vec<Line<'static>>, section: &Section, current: bool) {
    let (title, shortcuts) = *section;
    let heading = if current {
        format!("  {} (this screen) ", title)
    } else {
        format!("  {} ", title)
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        heading,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(title.width() + 2)),
        Style::default().fg(Color::DarkGray),
    )));

    for (key, description) in shortcuts {
        let padding = " ".repeat(KEY_COLUMN.saturating_sub(key.width()));
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}{}", key, padding),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(*description, Style::default().fg(Color::White)),
        ]));
    }
}

/// Help lines, leading with the section for the screen it was opened from
fn build_help_content(on_settings: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if on_settings {
        push_section(&mut lines, &SETTINGS_SECTION, true);
        for section in TABLE_SECTIONS {
            push_section(&mut lines, section, false);
        }
    } else {
        for (i, section) in TABLE_SECTIONS.iter().enumerate() {
            push_section(&mut lines, section, i == 0);
        }
        push_section(&mut lines, &SETTINGS_SECTION, false);
    }
    push_section(&mut lines, &GENERAL_SECTION, false);

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_help_lists_every_section() {
        let text = text(&build_help_content(false));
        assert!(text.iter().any(|l| l.contains("Reset to defaults")));
        assert!(text.iter().any(|l| l.contains("Open the action menu")));
        assert!(text.iter().any(|l| l.contains("Quit immediately")));
    }

    #[test]
    fn test_settings_section_leads_on_settings_tab() {
        let text = text(&build_help_content(true));
        assert_eq!(text[1], "  Settings Tab (this screen) ");
    }

    #[test]
    fn test_descriptions_start_in_one_column() {
        let text = text(&build_help_content(false));
        let column = |description: &str| {
            let line = text.iter().find(|l| l.ends_with(description)).unwrap();
            line[..line.len() - description.len()].width()
        };
        assert_eq!(column("Step a number or choice"), column("Search the active table"));
        assert_eq!(column("Step a number or choice"), KEY_COLUMN + 2);
    }
}
