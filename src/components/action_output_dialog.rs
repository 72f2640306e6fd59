//! Action output dialog component
//!
//! Shows admin actions started this session: pending ones with a running
//! clock, finished ones with their outcome.

use crate::action::Action;
use crate::component::Component;
use crate::model::admin_action::{ActionRun, ActionStatus};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Action output dialog
#[derive(Default)]
pub struct ActionOutputDialog {
    pub scroll_offset: usize,
}

impl Component for ActionOutputDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('o') => Some(Action::CloseModal),
            KeyCode::Char('h') => Some(Action::OpenHistory),
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_with_runs which needs the run list
        Ok(())
    }
}

impl ActionOutputDialog {
    /// Draw the dialog with the given runs, newest first
    pub fn draw_with_runs(&mut self, frame: &mut Frame, area: Rect, runs: &[ActionRun]) -> Result<()> {
        let margin = 3;
        let overlay_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );
        frame.render_widget(Clear, overlay_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay_area);

        let content_area = chunks[0];
        let pending = runs
            .iter()
            .filter(|r| r.status == ActionStatus::Pending)
            .count();
        let (title, border_color) = if pending > 0 {
            (format!(" Admin Actions [⏳ {} running] ", pending), Color::Yellow)
        } else if runs.first().is_some_and(|r| r.status == ActionStatus::Failed) {
            (" Admin Actions [✗ last failed] ".to_string(), Color::Red)
        } else {
            (" Admin Actions ".to_string(), Color::Green)
        };

        let content_lines = render_runs(runs);
        let total = content_lines.len();
        let visible_height = content_area.height.saturating_sub(2) as usize;
        let scroll = self.scroll_offset.min(total.saturating_sub(visible_height));
        self.scroll_offset = scroll;

        let paragraph = Paragraph::new(content_lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(title)
                    .title_style(
                        Style::default()
                            .fg(border_color)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .scroll((scroll as u16, 0));
        frame.render_widget(paragraph, content_area);

        // Scrollbar
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                content_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        let close_label = if pending > 0 {
            "Back (runs in bg)"
        } else {
            "Close"
        };
        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " Esc/q ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{}  ", close_label)),
            Span::styled(
                " h ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("History  "),
            Span::styled(
                " j/k ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Scroll"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper functions
// ─────────────────────────────────────────────────────────────────────────────

/// Get status indicator text and color
fn get_status_indicator(status: ActionStatus) -> (&'static str, Color) {
    match status {
        ActionStatus::Pending => ("⏳ PENDING", Color::Yellow),
        ActionStatus::Succeeded => ("✓ DONE", Color::Green),
        ActionStatus::Failed => ("✗ FAILED", Color::Red),
    }
}

fn render_runs(runs: &[ActionRun]) -> Vec<Line<'static>> {
    if runs.is_empty() {
        return vec![Line::from(Span::styled(
            "No admin actions started yet. Press x on a table to open the action menu.",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let now = Local::now();
    let mut lines = Vec::new();
    for run in runs {
        let (status_text, color) = get_status_indicator(run.status);
        let elapsed = match &run.report {
            Some(report) => format!("{} ms", report.elapsed_ms),
            None => format!("{}s", (now - run.started_at).num_seconds().max(0)),
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<10} ", status_text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("#{} ", run.request.ticket),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                run.request.kind.label(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} target(s)  ", run.request.target_ids.len()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(elapsed, Style::default().fg(Color::DarkGray)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", run.request.kind.endpoint()),
            Style::default().fg(Color::DarkGray),
        )));

        if let Some(report) = &run.report {
            lines.push(Line::from(Span::styled(
                format!("    {}", report.summary()),
                Style::default().fg(color),
            )));
        }
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::admin_action::{ActionError, ActionKind, ActionReport, ActionRequest};

    fn run(ticket: u64) -> ActionRun {
        ActionRun::new(ActionRequest {
            ticket,
            kind: ActionKind::RefreshTokens,
            target_ids: vec!["tok-0001".to_string()],
        })
    }

    #[test]
    fn test_render_runs_empty_state() {
        assert_eq!(render_runs(&[]).len(), 1);
    }

    #[test]
    fn test_render_runs_includes_outcome() {
        let pending = run(2);
        let mut failed = run(1);
        failed.complete(ActionReport {
            request: failed.request.clone(),
            outcome: Err(ActionError::Unavailable),
            elapsed_ms: 40,
        });

        let lines = render_runs(&[pending, failed]);
        // pending: header, endpoint, spacer; failed: header, endpoint, summary, spacer
        assert_eq!(lines.len(), 7);
        let summary: String = lines[5].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(summary.contains("service unavailable"));
    }
}
