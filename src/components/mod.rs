//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod action_menu;
pub mod action_output_dialog;
pub mod confirm_dialog;
pub mod filter_dialog;
pub mod help_dialog;
pub mod history_dialog;
pub mod home;
pub mod layout;
pub mod settings_editor;

pub use action_menu::{ActionMenu, MenuEntry};
pub use action_output_dialog::ActionOutputDialog;
pub use confirm_dialog::{ConfirmDialog, ConfirmKind};
pub use filter_dialog::FilterDialog;
pub use help_dialog::HelpDialog;
pub use history_dialog::HistoryDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use settings_editor::{draw_edit_dialog, SettingsEditor};
