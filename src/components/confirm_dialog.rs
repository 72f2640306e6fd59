//! Yes/no confirmation dialog component
//!
//! Used for quitting and for resetting the settings to defaults.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// What the dialog is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmKind {
    #[default]
    Quit,
    ResetSettings,
}

/// Confirmation dialog
#[derive(Default)]
pub struct ConfirmDialog {
    pub kind: ConfirmKind,
    /// Extra warning line, e.g. unsaved settings
    pub note: Option<String>,
}

impl ConfirmDialog {
    pub fn ask(&mut self, kind: ConfirmKind, note: Option<String>) {
        self.kind = kind;
        self.note = note;
    }

    fn texts(&self) -> (&'static str, &'static str, &'static str, Color) {
        match self.kind {
            ConfirmKind::Quit => (" Quit? ", "Are you sure you want to quit?", "Yes, quit  ", Color::Yellow),
            ConfirmKind::ResetSettings => (
                " Reset settings? ",
                "Replace every setting with its default?",
                "Yes, reset  ",
                Color::Red,
            ),
        }
    }
}

impl Component for ConfirmDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmModal),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let (title, question, yes_label, color) = self.texts();
        let height = if self.note.is_some() { 9 } else { 7 };
        let popup_area = centered_popup(area, 48, height);

        frame.render_widget(Clear, popup_area);

        let mut content = vec![
            Line::from(""),
            Line::from(Span::styled(
                question,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(note) = &self.note {
            content.push(Line::from(Span::styled(
                note.clone(),
                Style::default().fg(Color::Magenta),
            )));
        }
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(
                " y ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(yes_label),
            Span::styled(
                " n/Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("No, cancel"),
        ]));

        let paragraph = Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(title)
                    .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_yes_confirms_and_no_cancels() {
        let mut dialog = ConfirmDialog::default();
        dialog.ask(ConfirmKind::ResetSettings, None);
        let yes = KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(dialog.handle_key_event(yes).unwrap(), Some(Action::ConfirmModal));
        assert_eq!(dialog.handle_key_event(esc).unwrap(), Some(Action::CloseModal));
    }
}
