//! UI state - presentation state separate from domain data
//!
//! Most presentation state is owned by `HomeComponent`.

use super::admin_action::ActionKind;

/// Tab selection in the main UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Sessions,
    Tokens,
    Schema,
    Settings,
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        vec![Tab::Sessions, Tab::Tokens, Tab::Schema, Tab::Settings]
    }

    pub fn name(&self) -> &str {
        match self {
            Tab::Sessions => "Sessions",
            Tab::Tokens => "Tokens",
            Tab::Schema => "Schema",
            Tab::Settings => "Settings",
        }
    }

    /// Whether the tab shows a record table
    pub fn is_table(&self) -> bool {
        !matches!(self, Tab::Settings)
    }

    /// Admin actions offered on this tab
    pub fn actions(&self) -> &'static [ActionKind] {
        match self {
            Tab::Sessions => &[
                ActionKind::TerminateSessions,
                ActionKind::ReapGhostSessions,
                ActionKind::AutoFlagHighRisk,
            ],
            Tab::Tokens => &[ActionKind::RefreshTokens],
            Tab::Schema => &[ActionKind::RevalidateSchema],
            Tab::Settings => &[],
        }
    }

    pub fn next(self) -> Tab {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    pub fn previous(self) -> Tab {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + tabs.len() - 1) % tabs.len()]
    }
}
