//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App coordinates between components, the settings store and the action
//! invoker; record filtering and settings merging live in the model layer.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_edit_dialog, draw_home_screen, ActionMenu, ActionOutputDialog, ConfirmDialog,
    ConfirmKind, FilterDialog, HelpDialog, HistoryDialog, HomeComponent, HomeRenderContext,
    MenuEntry, SettingsEditor,
};
use crate::config::Config;
use crate::model::admin_action::ActionKind;
use crate::model::dataset::{DataSource, Dataset, HealthSnapshot};
use crate::model::domain::DomainState;
use crate::model::history::{ActionHistory, ActionHistoryEntry};
use crate::model::modal::{Modal, ModalStack};
use crate::model::settings_fields::{FieldKind, SETTING_FIELDS};
use crate::model::settings_store::SettingsStore;
use crate::model::ui::Tab;
use crate::model::Record;
use crate::services::{self, ActionInvoker, MockActionInvoker};
use anyhow::Result;
use chrono::{Local, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::time::{Duration, Instant};

fn record_ids<R: Record>(records: Vec<&R>) -> Vec<String> {
    records.into_iter().map(|r| r.id().to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Runtime configuration (paths, mock backend tuning)
    pub config: Config,

    /// Live dashboard settings
    pub store: SettingsStore,

    /// Domain state (business data)
    pub domain: DomainState,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Executes admin actions in the background
    pub invoker: Box<dyn ActionInvoker>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub settings_editor: SettingsEditor,
    pub filter_dialog: FilterDialog,
    pub action_menu: ActionMenu,
    pub action_output_dialog: ActionOutputDialog,
    pub confirm_dialog: ConfirmDialog,
    pub history_dialog: HistoryDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App from the runtime config
    pub fn new(config: Config) -> App {
        let (dataset, source, load_error) =
            services::load_or_mock(config.dataset_file().as_deref(), config.mock_dataset_size);
        let store = SettingsStore::new(services::load_settings(&config.settings_file()));
        let invoker = Box::new(MockActionInvoker::new(
            config.mock_latency_ms,
            config.mock_failure_rate,
        ));

        let mut app = Self::with_parts(config, store, dataset, source, invoker);
        app.domain.history = ActionHistory::load(&app.config.history_file());
        app.error = load_error;
        app
    }

    /// Assemble an App from already-loaded parts
    pub fn with_parts(
        config: Config,
        store: SettingsStore,
        dataset: Dataset,
        source: DataSource,
        invoker: Box<dyn ActionInvoker>,
    ) -> App {
        let health = HealthSnapshot::mock(&mut rand::rng());
        let mut app = App {
            config,
            store,
            domain: DomainState::new(dataset, source, health),
            modals: ModalStack::new(),
            invoker,
            should_quit: false,
            error: None,
            status_message: None,
            home: HomeComponent::new(),
            settings_editor: SettingsEditor::new(),
            filter_dialog: FilterDialog::new(),
            action_menu: ActionMenu::default(),
            action_output_dialog: ActionOutputDialog::default(),
            confirm_dialog: ConfirmDialog::default(),
            history_dialog: HistoryDialog::default(),
            help_dialog: HelpDialog::default(),
        };
        app.home.reset_cursors(&app.domain.dataset);
        app
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Admin actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Record ids an action would target right now
    fn action_targets(&self, kind: ActionKind) -> Vec<String> {
        let data = &self.domain.dataset;
        match kind {
            ActionKind::TerminateSessions => {
                record_ids(self.home.sessions.selection.resolve(&data.sessions))
            }
            ActionKind::RefreshTokens => record_ids(self.home.tokens.selection.resolve(&data.tokens)),
            ActionKind::RevalidateSchema => {
                record_ids(self.home.schema.selection.resolve(&data.schema))
            }
            ActionKind::ReapGhostSessions => data.ghost_session_ids(),
            ActionKind::AutoFlagHighRisk => data.unflagged_high_risk_ids(),
        }
    }

    fn termination_blocked(&self, kind: ActionKind) -> bool {
        kind == ActionKind::TerminateSessions
            && !self.store.settings().permissions.allow_session_termination
    }

    fn menu_entries(&self) -> Vec<MenuEntry> {
        self.home
            .active_tab
            .actions()
            .iter()
            .map(|&kind| {
                let target_count = self.action_targets(kind).len();
                let blocked = if self.termination_blocked(kind) {
                    Some("Session termination is disabled in settings".to_string())
                } else if kind.uses_selection() && target_count == 0 {
                    Some("Select rows first (Space or Ctrl+a)".to_string())
                } else {
                    None
                };
                MenuEntry {
                    kind,
                    target_count,
                    blocked,
                }
            })
            .collect()
    }

    fn run_admin_action(&mut self, kind: ActionKind) {
        if self.termination_blocked(kind) {
            self.error = Some("Session termination is disabled in settings".to_string());
            return;
        }

        let targets = self.action_targets(kind);
        let request = self.invoker.invoke(kind, targets);
        self.domain.start_run(request);
        if kind.uses_selection() {
            self.home.clear_selection();
        }

        if matches!(self.modals.top(), Some(Modal::ActionMenu)) {
            self.modals.pop();
        }
        if !self.modals.contains(&Modal::ActionOutput) {
            self.action_output_dialog.scroll_offset = 0;
            self.modals.push(Modal::ActionOutput);
        }
    }

    /// Collect finished actions and apply them
    fn poll_actions(&mut self) {
        let reports = self.invoker.poll();
        if reports.is_empty() {
            return;
        }

        for report in &reports {
            let changed = self.domain.complete_run(report);
            if matches!(
                report.request.kind,
                ActionKind::TerminateSessions | ActionKind::ReapGhostSessions
            ) {
                self.home.forget_sessions(report.applied_ids());
            }
            tracing::debug!(ticket = report.request.ticket, changed, "applied action report");

            ActionHistory::record(&mut self.domain.history, ActionHistoryEntry::from_report(report));
            self.status_message = Some(report.summary());
        }

        self.home.clamp_all(&self.domain.dataset);
        if let Err(e) = ActionHistory::save(&self.config.history_file(), &self.domain.history) {
            tracing::error!(error = %e, "failed to save action history");
        }
    }

    fn export_selection(&mut self) {
        let data = &self.domain.dataset;
        let exports = &self.store.settings().exports;
        let dir = self.config.export_dir();

        let result = match self.home.active_tab {
            Tab::Sessions => services::export_records(
                &self.home.sessions.selection.resolve(&data.sessions),
                exports,
                &dir,
            ),
            Tab::Tokens => services::export_records(
                &self.home.tokens.selection.resolve(&data.tokens),
                exports,
                &dir,
            ),
            Tab::Schema => services::export_records(
                &self.home.schema.selection.resolve(&data.schema),
                exports,
                &dir,
            ),
            Tab::Settings => return,
        };

        match result {
            Ok(path) => {
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                self.error = Some(format!("Export failed: {:#}", e));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────

    fn refresh_health(&mut self) {
        let next = HealthSnapshot::mock(&mut rand::rng());
        self.record_health(next, Local::now().time());
    }

    /// Replace the health snapshot and raise an alert for metrics that just
    /// turned critical, unless alerts are off or `now` is in quiet hours
    fn record_health(&mut self, next: HealthSnapshot, now: NaiveTime) {
        let settings = self.store.settings();
        let critical = next.newly_critical(&self.domain.health, &settings.thresholds);
        self.domain.health = next;
        self.domain.health_updated = Instant::now();

        let alerts = &settings.alerts;
        if critical.is_empty() || !alerts.enabled {
            return;
        }
        if alerts.quiet_hours.contains(now) {
            tracing::info!(cards = ?critical, "critical health alert suppressed by quiet hours");
            return;
        }

        tracing::warn!(cards = ?critical, channels = ?alerts.channels, "health metric became critical");
        let channels = if alerts.channels.is_empty() {
            "no channels".to_string()
        } else {
            alerts.channels.join(", ")
        };
        self.status_message = Some(format!(
            "⚠ Critical: {} (alerted via {})",
            critical.join(", "),
            channels
        ));
    }

    /// Whether auto refresh should fetch new metrics now
    fn refresh_due(&self) -> bool {
        let refresh = &self.store.settings().refresh;
        if !refresh.enabled {
            return false;
        }
        if refresh.pause_while_editing && self.modals.is_editing() {
            return false;
        }
        let interval = Duration::from_secs(refresh.interval_secs.max(1));
        self.domain.health_updated.elapsed() >= interval
    }

    /// Refresh health when the configured interval has elapsed
    fn auto_refresh(&mut self) {
        if self.refresh_due() {
            self.refresh_health();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    fn toggle_setting(&mut self) {
        let Some(field) = self.settings_editor.focused_field() else {
            return;
        };
        if let Some(patch) = field.toggle_patch(self.store.document()) {
            self.store.update(patch);
        }
    }

    fn step_setting(&mut self, direction: i32) {
        let Some(field) = self.settings_editor.focused_field() else {
            return;
        };
        if let Some(patch) = field.step_patch(self.store.document(), direction) {
            self.store.update(patch);
        }
    }

    fn edit_setting(&mut self) {
        let Some(field) = self.settings_editor.focused_field() else {
            return;
        };
        if field.kind == FieldKind::Toggle {
            self.toggle_setting();
            return;
        }
        self.modals.push(Modal::EditSetting {
            field_index: self.settings_editor.selected,
            buffer: field.input_text(self.store.document()),
            error: None,
        });
    }

    fn apply_setting_input(&mut self, field_index: usize, buffer: &str) {
        let Some(field) = SETTING_FIELDS.get(field_index) else {
            self.modals.pop();
            return;
        };
        match field.parse_input(buffer) {
            Ok(patch) => {
                self.store.update(patch);
                self.modals.pop();
                self.status_message = Some(format!(
                    "{} set to {}",
                    field.label,
                    field.display(self.store.document())
                ));
            }
            Err(message) => {
                if let Some(Modal::EditSetting { error, .. }) = self.modals.top_mut() {
                    *error = Some(message);
                }
            }
        }
    }

    fn save_settings(&mut self) {
        let path = self.config.settings_file();
        match services::save_settings(&path, self.store.document()) {
            Ok(()) => {
                self.store.mark_saved();
                tracing::info!(path = %path.display(), "settings saved");
                self.status_message = Some(format!("Settings saved to {}", path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save settings");
                self.error = Some(format!("Failed to save settings: {:#}", e));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        // Any key on the main screen dismisses the last error
        self.error = None;

        if self.home.search_mode {
            self.handle_search_key_event(key)
        } else if self.home.active_tab == Tab::Settings {
            self.settings_editor.handle_key_event(key)
        } else {
            self.home.handle_key_event(key)
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let on_settings = self.home.active_tab == Tab::Settings;

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.poll_actions();
                self.auto_refresh();
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem | Action::PrevItem | Action::FirstItem | Action::LastItem
                if on_settings =>
            {
                self.settings_editor.update(action)?;
            }
            Action::NextItem => self.home.next(&self.domain.dataset),
            Action::PrevItem => self.home.previous(&self.domain.dataset),
            Action::FirstItem => self.home.select_first(&self.domain.dataset),
            Action::LastItem => self.home.select_last(&self.domain.dataset),
            Action::NextTab => self.home.next_tab(&self.domain.dataset),
            Action::PrevTab => self.home.previous_tab(&self.domain.dataset),

            // ─────────────────────────────────────────────────────────────────
            // Scrolling
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                if matches!(self.modals.top(), Some(Modal::History { .. })) {
                    self.history_dialog.update(action.clone())?;
                    if let Some(Modal::History { detail_scroll, .. }) = self.modals.top_mut() {
                        *detail_scroll = self.history_dialog.detail_scroll;
                    }
                } else if on_settings {
                    self.settings_editor.update(action)?;
                } else if action == Action::PageDown {
                    self.home.page(&self.domain.dataset, true);
                } else if action == Action::PageUp {
                    self.home.page(&self.domain.dataset, false);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                let note = self
                    .store
                    .is_dirty()
                    .then(|| "Unsaved settings changes will be lost.".to_string());
                self.confirm_dialog.ask(ConfirmKind::Quit, note);
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenResetDialog => {
                self.confirm_dialog.ask(ConfirmKind::ResetSettings, None);
                self.modals.push(Modal::ResetConfirm);
            }
            Action::OpenHistory => {
                self.history_dialog.selected_index = 0;
                self.history_dialog.detail_scroll = 0;
                self.modals.toggle(Modal::History {
                    selected_index: 0,
                    detail_scroll: 0,
                });
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.help_dialog.on_settings = on_settings;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::OpenFilterPicker => {
                if let Some(pane) = self.home.active_pane() {
                    let options = self.home.filter_options(&self.domain.dataset);
                    self.filter_dialog
                        .set_options(self.home.active_tab.name(), options, &pane.view.filters);
                    self.modals.push(Modal::FilterPicker);
                }
            }
            Action::OpenActionMenu => {
                if !self.home.active_tab.actions().is_empty() {
                    let entries = self.menu_entries();
                    self.action_menu.set_entries(entries);
                    self.modals.push(Modal::ActionMenu);
                }
            }
            Action::OpenActionOutput => {
                self.action_output_dialog.scroll_offset = 0;
                self.modals.toggle(Modal::ActionOutput);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if let Some(modal) = self.modals.top().cloned() {
                    match modal {
                        Modal::QuitConfirm => {
                            self.should_quit = true;
                        }
                        Modal::ResetConfirm => {
                            self.store.reset_to_defaults();
                            self.modals.pop();
                            tracing::info!("settings reset to defaults");
                            self.status_message =
                                Some("Settings reset to defaults (w to save)".to_string());
                        }
                        Modal::EditSetting {
                            field_index,
                            buffer,
                            ..
                        } => {
                            self.apply_setting_input(field_index, &buffer);
                        }
                        _ => {}
                    }
                }
            }
            Action::ModalUp => {
                if matches!(self.modals.top(), Some(Modal::History { .. })) {
                    self.history_dialog.update(Action::ModalUp)?;
                    if let Some(Modal::History { selected_index, detail_scroll }) =
                        self.modals.top_mut()
                    {
                        *selected_index = self.history_dialog.selected_index;
                        *detail_scroll = self.history_dialog.detail_scroll;
                    }
                }
            }
            Action::ModalDown => {
                if matches!(self.modals.top(), Some(Modal::History { .. })) {
                    // Clamp before incrementing
                    let max = self.domain.history.len().saturating_sub(1);
                    if self.history_dialog.selected_index < max {
                        self.history_dialog.update(Action::ModalDown)?;
                    }
                    if let Some(Modal::History { selected_index, detail_scroll }) =
                        self.modals.top_mut()
                    {
                        *selected_index = self.history_dialog.selected_index;
                        *detail_scroll = self.history_dialog.detail_scroll;
                    }
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Search, filter and sort (delegate to HomeComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode => self.home.enter_search_mode(),
            Action::ExitSearchMode => self.home.exit_search_mode(),
            Action::SearchInput(c) => self.home.search_input(c, &self.domain.dataset),
            Action::SearchBackspace => self.home.search_backspace(&self.domain.dataset),
            Action::SetFilter(field, value) => {
                self.home.set_filter(&field, &value, &self.domain.dataset);
                if matches!(self.modals.top(), Some(Modal::FilterPicker)) {
                    self.modals.pop();
                }
            }
            Action::ClearFilters => {
                self.home.clear_filters(&self.domain.dataset);
                if matches!(self.modals.top(), Some(Modal::FilterPicker)) {
                    self.modals.pop();
                }
            }
            Action::CycleSort => self.home.cycle_sort(&self.domain.dataset),
            Action::ToggleSortDirection => self.home.toggle_sort_direction(),

            // ─────────────────────────────────────────────────────────────────
            // Selection
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleSelection => {
                self.home.toggle_selection(&self.domain.dataset);
            }
            Action::SelectAllVisible => {
                let count = self.home.select_all_visible(&self.domain.dataset);
                self.status_message = Some(format!("Selected {} visible rows", count));
            }
            Action::ClearSelection => self.home.clear_selection(),

            // ─────────────────────────────────────────────────────────────────
            // Admin actions
            // ─────────────────────────────────────────────────────────────────
            Action::RunAdminAction(kind) => self.run_admin_action(kind),
            Action::ExportSelection => self.export_selection(),
            Action::RefreshHealth => {
                self.refresh_health();
                if self.status_message.is_none() {
                    self.status_message = Some("Health metrics refreshed".to_string());
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Settings editor
            // ─────────────────────────────────────────────────────────────────
            Action::ToggleSetting => self.toggle_setting(),
            Action::StepSetting(direction) => self.step_setting(direction),
            Action::EditSetting => self.edit_setting(),
            Action::SettingInput(c) => {
                if let Some(Modal::EditSetting { buffer, error, .. }) = self.modals.top_mut() {
                    buffer.push(c);
                    *error = None;
                }
            }
            Action::SettingBackspace => {
                if let Some(Modal::EditSetting { buffer, error, .. }) = self.modals.top_mut() {
                    buffer.pop();
                    *error = None;
                }
            }
            Action::SaveSettings => self.save_settings(),
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = HomeRenderContext {
            dataset: &self.domain.dataset,
            health: &self.domain.health,
            store: &self.store,
            source: &self.domain.source,
            pending_runs: self.domain.pending_runs(),
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
        };

        draw_home_screen(frame, area, &mut self.home, &mut self.settings_editor, &ctx)?;

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm | Modal::ResetConfirm => self.confirm_dialog.handle_key_event(key),
            Modal::FilterPicker => self.filter_dialog.handle_key_event(key),
            Modal::ActionMenu => self.action_menu.handle_key_event(key),
            Modal::ActionOutput => self.action_output_dialog.handle_key_event(key),
            Modal::History { .. } => self.history_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
            Modal::EditSetting { .. } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter => Some(Action::ConfirmModal),
                    KeyCode::Backspace => Some(Action::SettingBackspace),
                    KeyCode::Char(c) => Some(Action::SettingInput(c)),
                    _ => None,
                };
                Ok(action)
            }
        }
    }

    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm | Modal::ResetConfirm => self.confirm_dialog.draw(frame, area)?,
            Modal::FilterPicker => self.filter_dialog.draw(frame, area)?,
            Modal::ActionMenu => self.action_menu.draw(frame, area)?,
            Modal::ActionOutput => {
                self.action_output_dialog
                    .draw_with_runs(frame, area, &self.domain.runs)?;
            }
            Modal::History { .. } => {
                self.history_dialog
                    .draw_with_history(frame, area, &self.domain.history)?;
            }
            Modal::EditSetting {
                field_index,
                buffer,
                error,
            } => {
                if let Some(field) = SETTING_FIELDS.get(*field_index) {
                    draw_edit_dialog(frame, area, field, buffer, error.as_deref());
                }
            }
            Modal::Help { .. } => {
                self.help_dialog.draw(frame, area)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::action_invoker::ImmediateInvoker;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(dir.path().to_string_lossy().to_string()),
            ..Config::default()
        };
        let dataset = Dataset::mock(&mut StdRng::seed_from_u64(11), 20);
        let app = App::with_parts(
            config,
            SettingsStore::default(),
            dataset,
            DataSource::Mock,
            Box::new(ImmediateInvoker::default()),
        );
        (app, dir)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn field_index(path: &str) -> usize {
        SETTING_FIELDS.iter().position(|f| f.path == path).unwrap()
    }

    #[test]
    fn test_ctrl_c_force_quits_from_any_modal() {
        let (mut app, _dir) = test_app();
        app.update(Action::OpenHelp).unwrap();
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_terminate_removes_sessions_and_records_history() {
        let (mut app, dir) = test_app();
        let before = app.domain.dataset.sessions.len();
        let target = app.domain.dataset.sessions[0].id.clone();

        app.update(Action::ToggleSelection).unwrap();
        app.update(Action::RunAdminAction(ActionKind::TerminateSessions))
            .unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::ActionOutput));
        assert_eq!(app.domain.pending_runs(), 1);

        app.update(Action::Tick).unwrap();

        assert_eq!(app.domain.dataset.sessions.len(), before - 1);
        assert!(app.domain.dataset.sessions.iter().all(|s| s.id != target));
        assert!(app.home.sessions.selection.is_empty());
        assert_eq!(app.domain.history.len(), 1);
        assert_eq!(app.domain.pending_runs(), 0);
        assert!(dir.path().join("history.json").exists());
    }

    #[test]
    fn test_terminate_refused_when_disabled() {
        let (mut app, _dir) = test_app();
        app.store.set("permissions.allowSessionTermination", json!(false));
        app.update(Action::ToggleSelection).unwrap();

        app.update(Action::OpenActionMenu).unwrap();
        assert!(app.action_menu.entries[0].blocked.is_some());

        app.update(Action::RunAdminAction(ActionKind::TerminateSessions))
            .unwrap();
        assert!(app.error.is_some());
        assert!(app.domain.runs.is_empty());
    }

    #[test]
    fn test_menu_blocks_selection_actions_without_selection() {
        let (mut app, _dir) = test_app();
        app.update(Action::OpenActionMenu).unwrap();

        let entries = &app.action_menu.entries;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, ActionKind::TerminateSessions);
        assert_eq!(entries[0].target_count, 0);
        assert!(entries[0].blocked.is_some());
        assert_eq!(
            entries[1].target_count,
            app.domain.dataset.ghost_session_ids().len()
        );
        assert!(entries[1].blocked.is_none());
    }

    #[test]
    fn test_filter_picker_applies_filter_and_closes() {
        let (mut app, _dir) = test_app();
        app.update(Action::OpenFilterPicker).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::FilterPicker));

        app.update(Action::SetFilter("riskLevel".to_string(), "High".to_string()))
            .unwrap();
        assert!(app.modals.is_empty());
        assert_eq!(app.home.sessions.view.filter_value("riskLevel"), "High");
    }

    #[test]
    fn test_edit_setting_rejects_bad_input_then_applies() {
        let (mut app, _dir) = test_app();
        app.home.active_tab = Tab::Settings;
        app.settings_editor.selected = field_index("alerts.quietHours.start");

        app.update(Action::EditSetting).unwrap();
        match app.modals.top() {
            Some(Modal::EditSetting { buffer, .. }) => assert_eq!(buffer, "22:00"),
            other => panic!("unexpected modal {:?}", other),
        }

        for _ in 0..5 {
            app.update(Action::SettingBackspace).unwrap();
        }
        for c in "7pm".chars() {
            app.update(Action::SettingInput(c)).unwrap();
        }
        app.update(Action::ConfirmModal).unwrap();
        assert!(matches!(
            app.modals.top(),
            Some(Modal::EditSetting { error: Some(_), .. })
        ));

        for _ in 0..3 {
            app.update(Action::SettingBackspace).unwrap();
        }
        for c in "07:30".chars() {
            app.update(Action::SettingInput(c)).unwrap();
        }
        app.update(Action::ConfirmModal).unwrap();

        assert!(app.modals.is_empty());
        assert_eq!(app.store.settings().alerts.quiet_hours.start, "07:30");
        assert!(app.store.is_dirty());
    }

    #[test]
    fn test_toggle_key_on_settings_tab_flips_field() {
        let (mut app, _dir) = test_app();
        app.home.active_tab = Tab::Settings;
        app.settings_editor.selected = field_index("alerts.includeSnapshot");

        let action = app.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(action, Some(Action::ToggleSetting));
        app.update(Action::ToggleSetting).unwrap();

        assert!(!app.store.settings().alerts.include_snapshot);
        assert!(app.store.settings().alerts.enabled);
    }

    #[test]
    fn test_save_settings_persists_and_clears_dirty() {
        let (mut app, dir) = test_app();
        app.store.set("theme.accent", json!("magenta"));
        assert!(app.store.is_dirty());

        app.update(Action::SaveSettings).unwrap();

        assert!(!app.store.is_dirty());
        let saved = services::load_settings(&dir.path().join("settings.json"));
        assert_eq!(saved["theme"]["accent"], json!("magenta"));
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let (mut app, _dir) = test_app();
        app.store.set("layout.density", json!("compact"));

        app.update(Action::OpenResetDialog).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::ResetConfirm));
        app.update(Action::CloseModal).unwrap();
        assert_eq!(app.store.settings().layout.density, "compact");

        app.update(Action::OpenResetDialog).unwrap();
        app.update(Action::ConfirmModal).unwrap();
        assert!(app.modals.is_empty());
        assert_eq!(app.store.settings().layout.density, "comfortable");
    }

    #[test]
    fn test_quit_dialog_warns_about_unsaved_settings() {
        let (mut app, _dir) = test_app();
        app.store.set("refresh.enabled", json!(false));
        app.update(Action::OpenQuitDialog).unwrap();

        assert!(app.confirm_dialog.note.is_some());
        app.update(Action::ConfirmModal).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_export_without_selection_reports_error() {
        let (mut app, dir) = test_app();
        app.update(Action::ExportSelection).unwrap();
        assert!(app.error.is_some());

        app.update(Action::SelectAllVisible).unwrap();
        app.update(Action::ExportSelection).unwrap();
        assert!(app.status_message.as_deref().is_some_and(|m| m.starts_with("Exported to")));
        assert!(dir.path().join("exports").exists());
    }

    fn calm_health() -> HealthSnapshot {
        HealthSnapshot {
            uptime: 99.9,
            login_success: 99.0,
            error_rate: 0.2,
            latency_ms: 200.0,
            failed_logins_per_min: 10.0,
        }
    }

    fn spiking_health() -> HealthSnapshot {
        HealthSnapshot {
            error_rate: 6.0,
            ..calm_health()
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_metric_turning_critical_raises_alert() {
        let (mut app, _dir) = test_app();
        app.domain.health = calm_health();
        app.status_message = None;

        app.record_health(spiking_health(), at(12, 0));

        assert_eq!(app.domain.health, spiking_health());
        let message = app.status_message.clone().unwrap();
        assert!(message.contains("Error rate"), "{}", message);
        assert!(message.contains("email, slack"), "{}", message);

        // already critical, so no second alert
        app.status_message = None;
        app.record_health(spiking_health(), at(12, 1));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_disabled_alerts_stay_silent() {
        let (mut app, _dir) = test_app();
        app.store.set("alerts.enabled", json!(false));
        app.domain.health = calm_health();
        app.status_message = None;

        app.record_health(spiking_health(), at(12, 0));

        assert_eq!(app.domain.health, spiking_health());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_quiet_hours_suppress_alerts() {
        let (mut app, _dir) = test_app();
        app.store.set("alerts.quietHours.enabled", json!(true));
        app.store.set("alerts.quietHours.start", json!("22:00"));
        app.store.set("alerts.quietHours.end", json!("07:00"));
        app.domain.health = calm_health();
        app.status_message = None;

        app.record_health(spiking_health(), at(23, 30));
        assert!(app.status_message.is_none());

        app.domain.health = calm_health();
        app.record_health(spiking_health(), at(7, 0));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_auto_refresh_pauses_while_editing() {
        let (mut app, _dir) = test_app();
        app.store.set("refresh.enabled", json!(true));
        app.store.set("refresh.intervalSecs", json!(5));
        app.store.set("refresh.pauseWhileEditing", json!(true));
        let stale = Instant::now()
            .checked_sub(Duration::from_secs(60))
            .unwrap();
        app.domain.health_updated = stale;
        assert!(app.refresh_due());

        app.modals.push(Modal::EditSetting {
            field_index: field_index("refresh.intervalSecs"),
            buffer: "10".to_string(),
            error: None,
        });
        assert!(!app.refresh_due());
        app.update(Action::Tick).unwrap();
        assert_eq!(app.domain.health_updated, stale);

        app.store.set("refresh.pauseWhileEditing", json!(false));
        assert!(app.refresh_due());
        app.update(Action::Tick).unwrap();
        assert!(app.domain.health_updated > stale);
    }

    #[test]
    fn test_auto_refresh_off_or_not_yet_due() {
        let (mut app, _dir) = test_app();
        app.store.set("refresh.enabled", json!(true));
        app.store.set("refresh.intervalSecs", json!(600));
        app.domain.health_updated = Instant::now();
        assert!(!app.refresh_due());

        app.domain.health_updated = Instant::now()
            .checked_sub(Duration::from_secs(601))
            .unwrap();
        assert!(app.refresh_due());

        app.store.set("refresh.enabled", json!(false));
        assert!(!app.refresh_due());
    }

    #[test]
    fn test_history_navigation_is_clamped() {
        let (mut app, _dir) = test_app();
        app.update(Action::RunAdminAction(ActionKind::ReapGhostSessions))
            .unwrap();
        app.update(Action::Tick).unwrap();
        app.update(Action::OpenHistory).unwrap();

        app.update(Action::ModalDown).unwrap();
        app.update(Action::ModalDown).unwrap();
        assert_eq!(app.history_dialog.selected_index, 0);
        assert_eq!(
            app.modals.top(),
            Some(&Modal::History {
                selected_index: 0,
                detail_scroll: 0
            })
        );
    }
}
