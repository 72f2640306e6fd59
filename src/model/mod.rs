//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `SettingsStore` - Nested settings document with recursive partial updates
//! - `view` / `SelectionSet` - Filter, search, sort and selection over records
//! - `DomainState` - Business/data state (dataset, health, action runs, history)
//! - `ModalStack` - Modal overlay management

pub mod admin_action;
pub mod catalog;
pub mod dataset;
pub mod domain;
pub mod history;
pub mod modal;
pub mod records;
pub mod selection;
pub mod settings;
pub mod settings_fields;
pub mod settings_store;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use admin_action::{ActionError, ActionKind, ActionReport, ActionRequest, ActionStatus};
pub use dataset::{DataSource, Dataset, HealthSnapshot};
pub use history::ActionHistoryEntry;
pub use records::{SchemaRow, Session, TokenRefresh};
pub use selection::SelectionSet;
pub use settings::{DashboardSettings, HealthLevel};
pub use settings_store::SettingsStore;
pub use view::{Record, SortDirection, ViewState};
