//! Modal stack for managing overlays
//!
//! Every dialog's open state lives here, owned by the app, instead of in
//! per-dialog flags.

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Confirmation before replacing the settings with defaults
    ResetConfirm,
    /// Field filter picker for the active table
    FilterPicker,
    /// Admin action menu for the active table
    ActionMenu,
    /// Progress and outcome of admin actions
    ActionOutput,
    /// Action history list and detail view
    History {
        selected_index: usize,
        detail_scroll: usize,
    },
    /// Text input for a settings field
    EditSetting {
        field_index: usize,
        buffer: String,
        error: Option<String>,
    },
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether a modal of the same variant is anywhere on the stack
    pub fn contains(&self, modal: &Modal) -> bool {
        self.stack
            .iter()
            .any(|m| std::mem::discriminant(m) == std::mem::discriminant(modal))
    }

    /// Whether a settings value is being typed in
    pub fn is_editing(&self) -> bool {
        self.stack
            .iter()
            .any(|m| matches!(m, Modal::EditSetting { .. }))
    }

    /// Push `modal` unless one of its kind is already on top, in which case pop it
    pub fn toggle(&mut self, modal: Modal) {
        match self.top() {
            Some(top) if std::mem::discriminant(top) == std::mem::discriminant(&modal) => {
                self.stack.pop();
            }
            _ => self.stack.push(modal),
        }
    }
}
