//! External service interactions
//!
//! This module contains services for interacting with the outside world:
//! - Admin action execution (simulated API calls)
//! - Dataset loading from JSON/YAML
//! - Settings persistence
//! - CSV/JSON export of selected records

pub mod action_invoker;
pub mod dataset_loader;
pub mod export;
pub mod settings_repo;

pub use action_invoker::{ActionInvoker, MockActionInvoker};
pub use dataset_loader::{load_dataset, load_or_mock};
pub use export::export_records;
pub use settings_repo::{load_settings, save_settings};
