//! Admin actions and their outcomes
//!
//! Actions are executed by an `ActionInvoker` (see `services::action_invoker`).
//! The model only describes what was asked and what came back.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kinds of bulk/maintenance actions an admin can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Force-refresh the selected refresh tokens
    RefreshTokens,
    /// Remove every ghost session
    ReapGhostSessions,
    /// Flag all high-risk sessions for review
    AutoFlagHighRisk,
    /// Terminate the selected sessions
    TerminateSessions,
    /// Re-run validation for the selected schema rows
    RevalidateSchema,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::RefreshTokens => "Refresh tokens",
            ActionKind::ReapGhostSessions => "Reap ghost sessions",
            ActionKind::AutoFlagHighRisk => "Auto-flag high risk",
            ActionKind::TerminateSessions => "Terminate sessions",
            ActionKind::RevalidateSchema => "Revalidate schema",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActionKind::RefreshTokens => "Rotate the selected refresh tokens",
            ActionKind::ReapGhostSessions => "Clean up sessions idle past the ghost threshold",
            ActionKind::AutoFlagHighRisk => "Mark every high-risk session for review",
            ActionKind::TerminateSessions => "End the selected sessions",
            ActionKind::RevalidateSchema => "Re-check the selected audit schema columns",
        }
    }

    /// Admin endpoint the action stands in for
    pub fn endpoint(&self) -> &'static str {
        match self {
            ActionKind::RefreshTokens => "POST /admin/tokens/refresh",
            ActionKind::ReapGhostSessions => "POST /admin/ghost-session/reap",
            ActionKind::AutoFlagHighRisk => "POST /admin/sessions/auto-flag",
            ActionKind::TerminateSessions => "POST /admin/sessions/terminate",
            ActionKind::RevalidateSchema => "POST /admin/audit-schema/validate",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            ActionKind::RefreshTokens => 'r',
            ActionKind::ReapGhostSessions => 'g',
            ActionKind::AutoFlagHighRisk => 'f',
            ActionKind::TerminateSessions => 't',
            ActionKind::RevalidateSchema => 'v',
        }
    }

    /// Whether the action is limited to the current selection
    pub fn uses_selection(&self) -> bool {
        matches!(
            self,
            ActionKind::RefreshTokens | ActionKind::TerminateSessions | ActionKind::RevalidateSchema
        )
    }
}

/// A request handed to the invoker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub ticket: u64,
    pub kind: ActionKind,
    /// Record ids the action targets
    pub target_ids: Vec<String>,
}

/// Payload of a successful action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSuccess {
    pub message: String,
    pub affected_ids: Vec<String>,
}

/// Typed failure of an admin action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("rejected by server: {0}")]
    Rejected(String),
    #[error("service unavailable")]
    Unavailable,
    #[error("{failed} of {total} targets failed")]
    Partial {
        total: usize,
        failed: usize,
        /// Targets that did go through
        succeeded: Vec<String>,
    },
    #[error("nothing to do: {0}")]
    NoTargets(&'static str),
}

/// Completed action as delivered by the invoker
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub request: ActionRequest,
    pub outcome: Result<ActionSuccess, ActionError>,
    pub elapsed_ms: u64,
}

impl ActionReport {
    /// Ids whose change went through, including the good part of a partial failure
    pub fn applied_ids(&self) -> &[String] {
        match &self.outcome {
            Ok(success) => &success.affected_ids,
            Err(ActionError::Partial { succeeded, .. }) => succeeded,
            Err(_) => &[],
        }
    }

    pub fn summary(&self) -> String {
        match &self.outcome {
            Ok(success) => format!("{}: {}", self.request.kind.label(), success.message),
            Err(err) => format!("{} failed: {}", self.request.kind.label(), err),
        }
    }
}

/// Lifecycle of an action as shown in the action dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActionStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

/// Tracked action for the output dialog
#[derive(Debug, Clone)]
pub struct ActionRun {
    pub request: ActionRequest,
    pub status: ActionStatus,
    pub started_at: DateTime<Local>,
    pub report: Option<ActionReport>,
}

impl ActionRun {
    pub fn new(request: ActionRequest) -> Self {
        Self {
            request,
            status: ActionStatus::Pending,
            started_at: Local::now(),
            report: None,
        }
    }

    pub fn complete(&mut self, report: ActionReport) {
        self.status = if report.outcome.is_ok() {
            ActionStatus::Succeeded
        } else {
            ActionStatus::Failed
        };
        self.report = Some(report);
    }
}
