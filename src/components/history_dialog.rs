//! History dialog component
//!
//! Displays the persisted admin action history with details for the
//! selected entry.

use crate::action::Action;
use crate::component::Component;
use crate::model::{ActionHistoryEntry, ActionStatus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Action history dialog
#[derive(Default)]
pub struct HistoryDialog {
    pub selected_index: usize,
    pub detail_scroll: usize,
}

impl Component for HistoryDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up => Some(Action::ModalUp),
            KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('q') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ModalUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                    self.detail_scroll = 0;
                }
            }
            Action::ModalDown => {
                self.selected_index += 1;
                self.detail_scroll = 0;
            }
            Action::ScrollUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            Action::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(10);
            }
            Action::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(10);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // This needs history data, so we use draw_with_history
        Ok(())
    }
}

fn status_style(status: ActionStatus) -> Style {
    match status {
        ActionStatus::Succeeded => Style::default().fg(Color::Green),
        ActionStatus::Failed => Style::default().fg(Color::Red),
        ActionStatus::Pending => Style::default().fg(Color::Yellow),
    }
}

impl HistoryDialog {
    pub fn draw_with_history(
        &self,
        frame: &mut Frame,
        area: Rect,
        history: &[ActionHistoryEntry],
    ) -> Result<()> {
        let margin = 2;
        let overlay_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );
        frame.render_widget(Clear, overlay_area);

        if history.is_empty() {
            let paragraph = Paragraph::new(
                "No admin actions recorded yet. Run one from the action menu (x) to see it here.",
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Action History ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            );
            frame.render_widget(paragraph, overlay_area);
            return Ok(());
        }

        // Clamp selected index
        let selected_idx = self.selected_index.min(history.len().saturating_sub(1));

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay_area);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[0]);

        // Render list
        let items: Vec<ListItem> = history
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let style = if i == selected_idx {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", entry.status_icon()), status_style(entry.status)),
                    Span::styled(
                        format!("{} ", entry.formatted_time()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(entry.kind.label(), style),
                ]))
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" History ({}) ", history.len()))
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(list, content_chunks[0]);

        // Render detail
        if let Some(entry) = history.get(selected_idx) {
            let detail_lines = render_history_detail(entry);
            let total = detail_lines.len();
            let visible_height = content_chunks[1].height.saturating_sub(2) as usize;
            let scroll = self.detail_scroll.min(total.saturating_sub(visible_height));

            let detail = Paragraph::new(detail_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Details ")
                        .title_style(
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                )
                .scroll((scroll as u16, 0));
            frame.render_widget(detail, content_chunks[1]);

            if total > visible_height {
                let mut scrollbar_state =
                    ScrollbarState::new(total.saturating_sub(visible_height)).position(scroll);
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    content_chunks[1].inner(ratatui::layout::Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    &mut scrollbar_state,
                );
            }
        }

        // Help bar
        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " Esc/h ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Close  "),
            Span::styled(
                " ↑/↓ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Select  "),
            Span::styled(
                " j/k ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Scroll"),
        ]))
        .alignment(ratatui::layout::Alignment::Left)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, main_chunks[1]);

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper functions
// ─────────────────────────────────────────────────────────────────────────────

fn label(text: &'static str) -> Span<'static> {
    Span::styled(
        text,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_history_detail(entry: &ActionHistoryEntry) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            label("Time: "),
            Span::raw(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]),
        Line::from(vec![label("Duration: "), Span::raw(entry.formatted_duration())]),
        Line::from(vec![
            label("Status: "),
            Span::styled(
                format!("{} {:?}", entry.status_icon(), entry.status),
                status_style(entry.status),
            ),
        ]),
        Line::from(vec![label("Endpoint: "), Span::raw(entry.endpoint.clone())]),
        Line::from(""),
        Line::from(label("Result: ")),
        Line::from(Span::styled(entry.summary.clone(), status_style(entry.status))),
        Line::from(""),
        Line::from(Span::styled(
            "─".repeat(40),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            label("Targets: "),
            Span::raw(entry.target_ids.len().to_string()),
        ]),
    ];

    for id in &entry.target_ids {
        lines.push(Line::from(Span::styled(
            format!("  {}", id),
            Style::default().fg(Color::Gray),
        )));
    }

    lines
}
