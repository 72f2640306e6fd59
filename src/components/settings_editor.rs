//! Settings editor component
//!
//! Lists every editable settings field grouped by namespace. Toggles flip in
//! place, numbers and choices step with +/-, and Enter opens a validated text
//! input. All edits reach the store as path-scoped patches.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::settings_fields::{FieldKind, SettingField, TextFormat, SETTING_FIELDS};
use crate::model::settings_store::{value_at, SettingsStore};
use crate::model::DashboardSettings;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Width the field labels are padded to
const LABEL_WIDTH: usize = 28;

/// Display list item for the grouped field list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayItem {
    /// Namespace header (not selectable)
    Header(&'static str),
    /// Index into `SETTING_FIELDS`
    Field(usize),
}

fn build_display_list() -> Vec<DisplayItem> {
    let mut items = Vec::with_capacity(SETTING_FIELDS.len() + 12);
    let mut current = "";
    for (i, field) in SETTING_FIELDS.iter().enumerate() {
        if field.namespace() != current {
            current = field.namespace();
            items.push(DisplayItem::Header(current));
        }
        items.push(DisplayItem::Field(i));
    }
    items
}

fn pad_label(label: &str) -> String {
    let width = label.width();
    format!("{}{}", label, " ".repeat(LABEL_WIDTH.saturating_sub(width)))
}

/// Human description of how a field is edited
pub fn describe_kind(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Toggle => "on/off (Space)".to_string(),
        FieldKind::Number { min, max, step, integer } => {
            let noun = if *integer { "whole number" } else { "number" };
            format!("{} {}..={} step {} (+/-, Enter)", noun, min, max, step)
        }
        FieldKind::Choice(options) => format!("one of: {}", options.join(", ")),
        FieldKind::MultiChoice(options) => {
            format!("comma-separated from: {}", options.join(", "))
        }
        FieldKind::Text(TextFormat::Time) => "time HH:MM".to_string(),
        FieldKind::Text(TextFormat::Url) => "https:// URL (empty to unset)".to_string(),
        FieldKind::Text(TextFormat::Delimiter) => "single ASCII character".to_string(),
    }
}

/// Settings editor list
pub struct SettingsEditor {
    /// Index into `SETTING_FIELDS`
    pub selected: usize,
    pub list_state: ListState,
}

impl Default for SettingsEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsEditor {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
        }
    }

    pub fn focused_field(&self) -> Option<&'static SettingField> {
        SETTING_FIELDS.get(self.selected)
    }

    pub fn next(&mut self) {
        if !SETTING_FIELDS.is_empty() {
            self.selected = (self.selected + 1) % SETTING_FIELDS.len();
        }
    }

    pub fn previous(&mut self) {
        if !SETTING_FIELDS.is_empty() {
            self.selected = (self.selected + SETTING_FIELDS.len() - 1) % SETTING_FIELDS.len();
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = SETTING_FIELDS.len().saturating_sub(1);
    }

    /// Jump to the first field of the next (or previous) namespace
    pub fn jump_namespace(&mut self, forward: bool) {
        let Some(current) = self.focused_field().map(|f| f.namespace()) else {
            return;
        };
        let target = if forward {
            SETTING_FIELDS
                .iter()
                .enumerate()
                .skip(self.selected)
                .find(|(_, f)| f.namespace() != current)
                .map(|(i, _)| i)
        } else {
            let start = SETTING_FIELDS[..self.selected]
                .iter()
                .rposition(|f| f.namespace() != current);
            start.map(|end| {
                let ns = SETTING_FIELDS[end].namespace();
                SETTING_FIELDS[..=end]
                    .iter()
                    .rposition(|f| f.namespace() != ns)
                    .map_or(0, |i| i + 1)
            })
        };
        if let Some(i) = target {
            self.selected = i;
        }
    }

    /// Draw the field list and, when given, the field detail panel
    pub fn draw_with_store(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        detail: Option<Rect>,
        store: &SettingsStore,
    ) -> Result<()> {
        let document = store.document();
        let display = build_display_list();

        let items: Vec<ListItem> = display
            .iter()
            .map(|item| match item {
                DisplayItem::Header(namespace) => ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("── {} ", namespace),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("──────────────────────", Style::default().fg(Color::DarkGray)),
                ])),
                DisplayItem::Field(i) => {
                    let field = &SETTING_FIELDS[*i];
                    let value = field.display(document);
                    let value_style = match value_at(document, field.path) {
                        Some(serde_json::Value::Bool(true)) => Style::default().fg(Color::Green),
                        Some(serde_json::Value::Bool(false)) => Style::default().fg(Color::Red),
                        _ => Style::default().fg(Color::Yellow),
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("  {}", pad_label(field.label)),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(value, value_style),
                    ]))
                }
            })
            .collect();

        let display_index = display
            .iter()
            .position(|item| *item == DisplayItem::Field(self.selected));
        self.list_state.select(display_index);

        let title = if store.is_dirty() {
            " Settings ● unsaved (w to save) "
        } else {
            " Settings "
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(if store.is_dirty() {
                        Color::Magenta
                    } else {
                        Color::DarkGray
                    })),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut self.list_state);

        if let (Some(detail), Some(field)) = (detail, self.focused_field()) {
            render_field_detail(frame, detail, field, store);
        }
        Ok(())
    }
}

fn render_field_detail(frame: &mut Frame, area: Rect, field: &SettingField, store: &SettingsStore) {
    let defaults = DashboardSettings::default_document();
    let settings = store.settings();

    let mut lines = vec![
        Line::from(Span::styled(
            field.label,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(field.path, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Value:   ", Style::default().fg(Color::Cyan)),
            Span::raw(field.display(store.document())),
        ]),
        Line::from(vec![
            Span::styled("Default: ", Style::default().fg(Color::Cyan)),
            Span::raw(field.display(&defaults)),
        ]),
        Line::from(vec![
            Span::styled("Edit:    ", Style::default().fg(Color::Cyan)),
            Span::raw(describe_kind(&field.kind)),
        ]),
    ];

    if settings.permissions.require_mfa_for_changes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "MFA is required for settings changes; saving records a confirmation.",
            Style::default().fg(Color::Magenta),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Field ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

/// Draw the text input popup for a settings field
pub fn draw_edit_dialog(
    frame: &mut Frame,
    area: Rect,
    field: &SettingField,
    buffer: &str,
    error: Option<&str>,
) {
    let popup_area = centered_popup(area, 60, 9);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(
            describe_kind(&field.kind),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(buffer.to_string(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
    ];

    match error {
        Some(message) => lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(vec![
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Apply  "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ])),
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Edit {} ", field.label))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(paragraph, popup_area);
}

impl Component for SettingsEditor {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::PageDown | KeyCode::Char(']') => Some(Action::PageDown),
            KeyCode::PageUp | KeyCode::Char('[') => Some(Action::PageUp),
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),

            KeyCode::Char(' ') => Some(Action::ToggleSetting),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') | KeyCode::Right => {
                Some(Action::StepSetting(1))
            }
            KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left => Some(Action::StepSetting(-1)),
            KeyCode::Enter => Some(Action::EditSetting),
            KeyCode::Char('w') => Some(Action::SaveSettings),
            KeyCode::Char('R') => Some(Action::OpenResetDialog),

            KeyCode::Char('H') => Some(Action::OpenHistory),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => self.next(),
            Action::PrevItem => self.previous(),
            Action::FirstItem => self.select_first(),
            Action::LastItem => self.select_last(),
            Action::PageDown => self.jump_namespace(true),
            Action::PageUp => self.jump_namespace(false),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_with_store which needs the settings
        Ok(())
    }
}
