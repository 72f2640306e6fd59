//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::admin_action::ActionKind;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling and refresh
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    NextItem,
    PrevItem,
    NextTab,
    PrevTab,
    FirstItem,
    LastItem,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHistory,
    OpenHelp,
    OpenFilterPicker,
    OpenActionMenu,
    OpenActionOutput,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    ModalUp,
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Search, filter and sort
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    /// Set an equality filter on the active table (`"all"` clears it)
    SetFilter(String, String),
    ClearFilters,
    /// Advance the sort key to the next column
    CycleSort,
    ToggleSortDirection,

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────
    ToggleSelection,
    SelectAllVisible,
    ClearSelection,

    // ─────────────────────────────────────────────────────────────────────────
    // Admin actions
    // ─────────────────────────────────────────────────────────────────────────
    RunAdminAction(ActionKind),
    ExportSelection,
    RefreshHealth,

    // ─────────────────────────────────────────────────────────────────────────
    // Settings editor
    // ─────────────────────────────────────────────────────────────────────────
    /// Flip the focused toggle field
    ToggleSetting,
    /// Step the focused number or choice field
    StepSetting(i32),
    /// Open text input for the focused field
    EditSetting,
    SettingInput(char),
    SettingBackspace,
    SaveSettings,
    OpenResetDialog,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHistory => write!(f, "OpenHistory"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenFilterPicker => write!(f, "OpenFilterPicker"),
            Action::OpenActionMenu => write!(f, "OpenActionMenu"),
            Action::OpenActionOutput => write!(f, "OpenActionOutput"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::SetFilter(field, value) => write!(f, "SetFilter({}={})", field, value),
            Action::ClearFilters => write!(f, "ClearFilters"),
            Action::CycleSort => write!(f, "CycleSort"),
            Action::ToggleSortDirection => write!(f, "ToggleSortDirection"),
            Action::ToggleSelection => write!(f, "ToggleSelection"),
            Action::SelectAllVisible => write!(f, "SelectAllVisible"),
            Action::ClearSelection => write!(f, "ClearSelection"),
            Action::RunAdminAction(kind) => write!(f, "RunAdminAction({:?})", kind),
            Action::ExportSelection => write!(f, "ExportSelection"),
            Action::RefreshHealth => write!(f, "RefreshHealth"),
            Action::ToggleSetting => write!(f, "ToggleSetting"),
            Action::StepSetting(step) => write!(f, "StepSetting({})", step),
            Action::EditSetting => write!(f, "EditSetting"),
            Action::SettingInput(c) => write!(f, "SettingInput('{}')", c),
            Action::SettingBackspace => write!(f, "SettingBackspace"),
            Action::SaveSettings => write!(f, "SaveSettings"),
            Action::OpenResetDialog => write!(f, "OpenResetDialog"),
        }
    }
}
