//! Component trait - Interface for UI components
//!
//! A component owns its presentation state, maps keys to Actions and renders
//! itself. Components never reach into each other; the App routes Actions.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// A self-contained piece of the UI.
///
/// Input flows key -> `handle_key_event` -> Action -> `update`, and the App
/// calls `draw` once per frame. Dialogs whose content lives in the domain
/// state expose a `draw_with_*` method instead and keep `draw` a no-op.
pub trait Component {
    /// One-time setup after construction
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an Action.
    ///
    /// Dialogs may move their own cursor here; anything touching app state
    /// goes through the returned Action.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Apply an Action to local state, optionally chaining another
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render into `area`
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
