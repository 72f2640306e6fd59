//! Home component - Main application screen
//!
//! Displays health cards, tabs, the record table of the active tab, the
//! detail panel and the status/help bars. Owns the per-table view, selection
//! and cursor state.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, SettingsEditor};
use crate::model::dataset::{DataSource, Dataset, HealthSnapshot};
use crate::model::records::RiskLevel;
use crate::model::settings::{DashboardSettings, HealthLevel};
use crate::model::settings_store::SettingsStore;
use crate::model::ui::Tab;
use crate::model::view::{apply, distinct_values, FieldValue, Record};
use crate::model::{SelectionSet, ViewState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: isize = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// Table Pane
// ═══════════════════════════════════════════════════════════════════════════════

/// View, selection and cursor for one record table
#[derive(Debug, Default)]
pub struct TablePane {
    pub view: ViewState,
    pub selection: SelectionSet,
    pub state: TableState,
}

impl TablePane {
    /// Records passing the current search and filters, in view order
    pub fn visible<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        apply(records, &self.view)
    }

    /// Record under the cursor
    pub fn focused<'a, R: Record>(&self, records: &'a [R]) -> Option<&'a R> {
        let index = self.state.selected()?;
        self.visible(records).get(index).copied()
    }

    pub fn next<R: Record>(&mut self, records: &[R]) {
        let len = self.visible(records).len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous<R: Record>(&mut self, records: &[R]) {
        let len = self.visible(records).len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn select_first<R: Record>(&mut self, records: &[R]) {
        let len = self.visible(records).len();
        self.state.select(if len == 0 { None } else { Some(0) });
    }

    pub fn select_last<R: Record>(&mut self, records: &[R]) {
        let len = self.visible(records).len();
        self.state.select(len.checked_sub(1));
    }

    /// Move the cursor by `delta` rows without wrapping
    pub fn jump<R: Record>(&mut self, records: &[R], delta: isize) {
        let len = self.visible(records).len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let current = self.state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.state.select(Some(next as usize));
    }

    /// Keep the cursor inside the visible rows after the data changed
    pub fn clamp<R: Record>(&mut self, records: &[R]) {
        let len = self.visible(records).len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    /// Toggle the focused record. Returns its new selected state.
    pub fn toggle_focused<R: Record>(&mut self, records: &[R]) -> Option<bool> {
        let id = self.focused(records)?.id().to_string();
        Some(self.selection.toggle(&id))
    }

    /// Select every visible record, returning how many are visible
    pub fn select_all_visible<R: Record>(&mut self, records: &[R]) -> usize {
        let visible = self.visible(records);
        self.selection.select_all(visible.iter().map(|r| r.id()));
        visible.len()
    }

    pub fn cycle_sort<R: Record>(&mut self) {
        let keys: Vec<&str> = R::columns().iter().map(|c| c.key).collect();
        self.view.cycle_sort(&keys);
    }

    /// Short description of the active filters and search
    pub fn view_summary(&self) -> String {
        let mut parts: Vec<String> = self
            .view
            .filters
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        if !self.view.search.is_empty() {
            parts.push(format!("/{}", self.view.search));
        }
        parts.join(" ")
    }
}

/// Distinct filter values for each filter dimension of `R`
pub fn filter_options<R: Record>(records: &[R]) -> Vec<(&'static str, Vec<String>)> {
    R::filter_dimensions()
        .iter()
        .map(|dim| (*dim, distinct_values(records, dim)))
        .collect()
}

/// Run `$body` with the active table pane and its records; no-op on the settings tab
macro_rules! with_active_table {
    ($home:expr, $data:expr, |$pane:ident, $records:ident| $body:expr) => {
        match $home.active_tab {
            Tab::Sessions => {
                let $pane = &mut $home.sessions;
                let $records = &$data.sessions[..];
                $body
            }
            Tab::Tokens => {
                let $pane = &mut $home.tokens;
                let $records = &$data.tokens[..];
                $body
            }
            Tab::Schema => {
                let $pane = &mut $home.schema;
                let $records = &$data.schema[..];
                $body
            }
            Tab::Settings => Default::default(),
        }
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Home component for the main application view
/// Owns navigation state and handles table interactions
#[derive(Debug, Default)]
pub struct HomeComponent {
    /// Current active tab
    pub active_tab: Tab,

    /// Whether search mode is active
    pub search_mode: bool,

    pub sessions: TablePane,
    pub tokens: TablePane,
    pub schema: TablePane,
}

impl HomeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put every cursor on its first row
    pub fn reset_cursors(&mut self, data: &Dataset) {
        self.sessions.select_first(&data.sessions);
        self.tokens.select_first(&data.tokens);
        self.schema.select_first(&data.schema);
    }

    /// Pane of the active tab, if it shows a table
    pub fn active_pane(&self) -> Option<&TablePane> {
        match self.active_tab {
            Tab::Sessions => Some(&self.sessions),
            Tab::Tokens => Some(&self.tokens),
            Tab::Schema => Some(&self.schema),
            Tab::Settings => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn next(&mut self, data: &Dataset) {
        with_active_table!(self, data, |pane, records| pane.next(records))
    }

    pub fn previous(&mut self, data: &Dataset) {
        with_active_table!(self, data, |pane, records| pane.previous(records))
    }

    pub fn select_first(&mut self, data: &Dataset) {
        with_active_table!(self, data, |pane, records| pane.select_first(records))
    }

    pub fn select_last(&mut self, data: &Dataset) {
        with_active_table!(self, data, |pane, records| pane.select_last(records))
    }

    pub fn page(&mut self, data: &Dataset, down: bool) {
        let delta = if down { PAGE_SIZE } else { -PAGE_SIZE };
        with_active_table!(self, data, |pane, records| pane.jump(records, delta))
    }

    pub fn next_tab(&mut self, data: &Dataset) {
        self.active_tab = self.active_tab.next();
        self.search_mode = false;
        with_active_table!(self, data, |pane, records| pane.clamp(records))
    }

    pub fn previous_tab(&mut self, data: &Dataset) {
        self.active_tab = self.active_tab.previous();
        self.search_mode = false;
        with_active_table!(self, data, |pane, records| pane.clamp(records))
    }

    /// Re-clamp all cursors after records were added or removed
    pub fn clamp_all(&mut self, data: &Dataset) {
        self.sessions.clamp(&data.sessions);
        self.tokens.clamp(&data.tokens);
        self.schema.clamp(&data.schema);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search, filter and sort
    // ─────────────────────────────────────────────────────────────────────────

    pub fn enter_search_mode(&mut self) {
        if self.active_tab.is_table() {
            self.search_mode = true;
        }
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }

    pub fn search_input(&mut self, c: char, data: &Dataset) {
        with_active_table!(self, data, |pane, records| {
            pane.view.search.push(c);
            pane.select_first(records);
        })
    }

    pub fn search_backspace(&mut self, data: &Dataset) {
        with_active_table!(self, data, |pane, records| {
            pane.view.search.pop();
            pane.select_first(records);
        })
    }

    pub fn set_filter(&mut self, field: &str, value: &str, data: &Dataset) {
        with_active_table!(self, data, |pane, records| {
            pane.view.set_filter(field, value);
            pane.select_first(records);
        })
    }

    pub fn clear_filters(&mut self, data: &Dataset) {
        with_active_table!(self, data, |pane, records| {
            pane.view.filters.clear();
            pane.view.search.clear();
            pane.select_first(records);
        })
    }

    pub fn cycle_sort(&mut self, data: &Dataset) {
        match self.active_tab {
            Tab::Sessions => self.sessions.cycle_sort::<crate::model::Session>(),
            Tab::Tokens => self.tokens.cycle_sort::<crate::model::TokenRefresh>(),
            Tab::Schema => self.schema.cycle_sort::<crate::model::SchemaRow>(),
            Tab::Settings => {}
        }
        self.select_first(data);
    }

    pub fn toggle_sort_direction(&mut self) {
        match self.active_tab {
            Tab::Sessions => self.sessions.view.toggle_direction(),
            Tab::Tokens => self.tokens.view.toggle_direction(),
            Tab::Schema => self.schema.view.toggle_direction(),
            Tab::Settings => {}
        }
    }

    /// Filter dimensions and their values for the active table
    pub fn filter_options(&self, data: &Dataset) -> Vec<(&'static str, Vec<String>)> {
        match self.active_tab {
            Tab::Sessions => filter_options(&data.sessions),
            Tab::Tokens => filter_options(&data.tokens),
            Tab::Schema => filter_options(&data.schema),
            Tab::Settings => Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_selection(&mut self, data: &Dataset) -> Option<bool> {
        with_active_table!(self, data, |pane, records| pane.toggle_focused(records))
    }

    pub fn select_all_visible(&mut self, data: &Dataset) -> usize {
        with_active_table!(self, data, |pane, records| pane.select_all_visible(records))
    }

    pub fn clear_selection(&mut self) {
        match self.active_tab {
            Tab::Sessions => self.sessions.selection.clear(),
            Tab::Tokens => self.tokens.selection.clear(),
            Tab::Schema => self.schema.selection.clear(),
            Tab::Settings => {}
        }
    }

    /// Drop removed sessions from the session selection
    pub fn forget_sessions(&mut self, ids: &[String]) {
        for id in ids {
            self.sessions.selection.deselect(id);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let has_selection = self
            .active_pane()
            .is_some_and(|pane| !pane.selection.is_empty());

        let action = match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }

            // Search, filter and sort
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Char('f') => Some(Action::OpenFilterPicker),
            KeyCode::Char('c') => Some(Action::ClearFilters),
            KeyCode::Char('s') => Some(Action::CycleSort),
            KeyCode::Char('S') => Some(Action::ToggleSortDirection),

            // Selection
            KeyCode::Char(' ') => Some(Action::ToggleSelection),
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::SelectAllVisible)
            }
            KeyCode::Esc if has_selection => Some(Action::ClearSelection),

            // Admin
            KeyCode::Char('x') | KeyCode::Enter => Some(Action::OpenActionMenu),
            KeyCode::Char('e') => Some(Action::ExportSelection),
            KeyCode::Char('r') => Some(Action::RefreshHealth),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('h') => Some(Action::OpenHistory),
            KeyCode::Char('o') => Some(Action::OpenActionOutput),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        // Updates are handled by App which has access to the dataset
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub dataset: &'a Dataset,
    pub health: &'a HealthSnapshot,
    pub store: &'a SettingsStore,
    pub source: &'a DataSource,
    pub pending_runs: usize,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

/// Terminal color for a theme accent name
pub fn accent_color(name: &str) -> Color {
    match name {
        "green" => Color::Green,
        "magenta" => Color::Magenta,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        _ => Color::Cyan,
    }
}

/// Foreground for plain text under the theme mode
pub fn text_color(settings: &DashboardSettings) -> Color {
    if settings.theme.mode == "light" {
        Color::Black
    } else {
        Color::White
    }
}

fn level_color(level: HealthLevel) -> Color {
    match level {
        HealthLevel::Ok => Color::Green,
        HealthLevel::Warning => Color::Yellow,
        HealthLevel::Critical => Color::Red,
    }
}

fn level_icon(level: HealthLevel) -> &'static str {
    match level {
        HealthLevel::Ok => "●",
        HealthLevel::Warning => "▲",
        HealthLevel::Critical => "✗",
    }
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    settings_editor: &mut SettingsEditor,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let settings = ctx.store.settings();
    let detail_percent = settings
        .layout
        .show_detail_panel
        .then_some(settings.layout.detail_width_percent);
    let layout = calculate_main_layout(area, settings.layout.show_health_header, detail_percent);

    if let Some(health_area) = layout.health {
        render_health_cards(frame, health_area, ctx);
    }
    render_tabs(frame, layout.tabs, home, settings);

    match home.active_tab {
        Tab::Sessions => {
            render_table(frame, layout.body, &mut home.sessions, &ctx.dataset.sessions, settings);
            if let Some(detail) = layout.detail {
                render_detail(frame, detail, home.sessions.focused(&ctx.dataset.sessions), &home.sessions.selection);
            }
        }
        Tab::Tokens => {
            render_table(frame, layout.body, &mut home.tokens, &ctx.dataset.tokens, settings);
            if let Some(detail) = layout.detail {
                render_detail(frame, detail, home.tokens.focused(&ctx.dataset.tokens), &home.tokens.selection);
            }
        }
        Tab::Schema => {
            render_table(frame, layout.body, &mut home.schema, &ctx.dataset.schema, settings);
            if let Some(detail) = layout.detail {
                render_detail(frame, detail, home.schema.focused(&ctx.dataset.schema), &home.schema.selection);
            }
        }
        Tab::Settings => {
            settings_editor.draw_with_store(frame, layout.body, layout.detail, ctx.store)?;
        }
    }

    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help, home);

    Ok(())
}

fn render_health_cards(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let settings = ctx.store.settings();
    let cards: Vec<_> = ctx
        .health
        .cards(&settings.thresholds)
        .into_iter()
        .filter(|(id, ..)| settings.cards.visible.iter().any(|v| v == id))
        .collect();

    if cards.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            " No health cards visible (cards.visible is empty)",
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL).title(" Health "));
        frame.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);

    for ((id, label, value, level), chunk) in cards.into_iter().zip(chunks.iter()) {
        let color = level_color(level);
        let collapsed = settings.cards.collapsed.iter().any(|c| c == id);

        let lines = if collapsed {
            vec![Line::from(vec![
                Span::styled(format!("{} ", level_icon(level)), Style::default().fg(color)),
                Span::styled(value, Style::default().fg(color)),
            ])]
        } else {
            vec![
                Line::from(Span::styled(
                    value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled(format!("{} ", level_icon(level)), Style::default().fg(color)),
                    Span::styled(
                        format!("{:?}", level).to_lowercase(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ]
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", label)),
        );
        frame.render_widget(paragraph, *chunk);
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, home: &HomeComponent, settings: &DashboardSettings) {
    let all_tabs = Tab::all();
    let titles: Vec<&str> = all_tabs.iter().map(|t| t.name()).collect();
    let selected = all_tabs
        .iter()
        .position(|t| *t == home.active_tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(accent_color(&settings.theme.accent))
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn is_high_risk<R: Record>(record: &R) -> bool {
    matches!(
        record.field("riskLevel"),
        Some(FieldValue::Ranked { rank, .. }) if rank == RiskLevel::High as u8
    )
}

fn render_table<R: Record>(
    frame: &mut Frame,
    area: Rect,
    pane: &mut TablePane,
    records: &[R],
    settings: &DashboardSettings,
) {
    let visible = pane.visible(records);
    let limit = usize::try_from(settings.performance.max_rows).unwrap_or(usize::MAX);
    let shown = visible.len().min(limit);
    let accent = accent_color(&settings.theme.accent);

    // Title with counts, selection and view summary
    let mut title = format!(" {} ({}/{}) ", R::KIND, visible.len(), records.len());
    if !pane.selection.is_empty() {
        let in_view = pane
            .selection
            .visible_count(visible.iter().map(|r| r.id()));
        title = format!("{}[{}✓ {} in view] ", title, pane.selection.len(), in_view);
    }
    let summary = pane.view_summary();
    if !summary.is_empty() {
        title = format!("{}[{}] ", title, summary);
    }
    if shown < visible.len() {
        title = format!("{}showing {} of {} ", title, shown, visible.len());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray));

    if visible.is_empty() {
        let message = if records.is_empty() {
            format!("No {} loaded", R::KIND.to_lowercase())
        } else {
            "Nothing matches the current search and filters (c to clear)".to_string()
        };
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Header with sort indicator
    let sort = pane.view.sort.as_ref();
    let header_cells = std::iter::once(Cell::from("")).chain(R::columns().iter().map(|col| {
        match sort {
            Some(spec) if spec.field == col.key => Cell::from(format!(
                "{} {}",
                col.title,
                spec.direction.arrow()
            ))
            .style(Style::default().fg(accent)),
            _ => Cell::from(col.title),
        }
    }));
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let text = text_color(settings);
    let rows: Vec<Row> = visible
        .iter()
        .take(shown)
        .map(|record| {
            let is_selected = pane.selection.contains(record.id());
            let marker = if is_selected { "●" } else { " " };
            let cells = std::iter::once(
                Cell::from(marker).style(Style::default().fg(Color::Green)),
            )
            .chain(R::columns().iter().map(|col| {
                let value = record
                    .field(col.key)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "—".to_string());
                Cell::from(value)
            }));

            let style = if settings.theme.highlight_risk && is_high_risk(*record) {
                Style::default().fg(Color::Red)
            } else if is_selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(text)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(1))
        .chain(R::columns().iter().map(|c| Constraint::Length(c.width)))
        .collect();

    let spacing = if settings.layout.density == "compact" { 1 } else { 2 };

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(spacing)
        .highlight_style(
            Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    if pane.state.selected().is_some_and(|i| i >= shown) {
        pane.state.select(Some(shown - 1));
    }
    frame.render_stateful_widget(table, area, &mut pane.state);
}

fn render_detail<R: Record>(
    frame: &mut Frame,
    area: Rect,
    record: Option<&R>,
    selection: &SelectionSet,
) {
    let mut lines = vec![];

    if let Some(record) = record {
        let selected = selection.contains(record.id());
        lines.push(Line::from(vec![
            Span::styled(
                if selected { "● " } else { "  " },
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                record.id().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));

        for col in R::columns() {
            let value = record
                .field(col.key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "—".to_string());
            lines.push(Line::from(vec![
                Span::styled(format!("{:<14}", col.title), Style::default().fg(Color::DarkGray)),
                Span::styled(value, Style::default().fg(Color::Cyan)),
            ]));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "No record selected",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Detail ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let settings = ctx.store.settings();
    let mut spans = vec![Span::styled(
        format!(" {} ", ctx.source),
        Style::default()
            .fg(Color::Black)
            .bg(accent_color(&settings.theme.accent))
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));

    if ctx.pending_runs > 0 {
        spans.push(Span::styled(
            format!(" ⏳ {} running ", ctx.pending_runs),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if ctx.store.is_dirty() {
        spans.push(Span::styled(
            "● unsaved settings ",
            Style::default().fg(Color::Magenta),
        ));
    }

    // Error message if present
    if let Some(error) = ctx.error {
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    }

    // Status message if present
    if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

fn key_span(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn render_help_bar(frame: &mut Frame, area: Rect, home: &HomeComponent) {
    let selected = home.active_pane().map_or(0, |pane| pane.selection.len());

    let help_spans = if home.search_mode {
        let query = home
            .active_pane()
            .map(|pane| pane.view.search.clone())
            .unwrap_or_default();
        vec![
            key_span("Esc/Enter", Color::Yellow),
            Span::raw("Done  "),
            Span::styled(format!("Search: {}", query), Style::default().fg(Color::Cyan)),
        ]
    } else if home.active_tab == Tab::Settings {
        vec![
            key_span("Space", Color::Green),
            Span::raw("Toggle "),
            key_span("+/-", Color::Green),
            Span::raw("Step "),
            key_span("Enter", Color::Green),
            Span::raw("Edit "),
            key_span("w", Color::Cyan),
            Span::raw("Save "),
            key_span("R", Color::Red),
            Span::raw("Reset "),
            key_span("Tab", Color::Blue),
            Span::raw("Switch "),
            key_span("?", Color::Magenta),
            Span::raw("Help"),
        ]
    } else if selected > 0 {
        // Selection mode help
        vec![
            key_span("Space", Color::Green),
            Span::raw("Toggle  "),
            key_span("Esc", Color::Yellow),
            Span::raw("Clear  "),
            key_span("x", Color::Green),
            Span::raw("Actions  "),
            key_span("e", Color::Cyan),
            Span::raw("Export  "),
            Span::styled(format!("{} selected", selected), Style::default().fg(Color::Cyan)),
        ]
    } else {
        vec![
            key_span("q", Color::Yellow),
            Span::raw("Quit "),
            key_span("/", Color::Cyan),
            Span::raw("Search "),
            key_span("f", Color::Cyan),
            Span::raw("Filter "),
            key_span("s/S", Color::Cyan),
            Span::raw("Sort "),
            key_span("Space", Color::Green),
            Span::raw("Select "),
            key_span("x", Color::Green),
            Span::raw("Actions "),
            key_span("h", Color::Magenta),
            Span::raw("History "),
            key_span("Tab", Color::Blue),
            Span::raw("Switch "),
            key_span("?", Color::Magenta),
            Span::raw("Help"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(help_spans))
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}
