//! Domain state - business/data state separate from UI concerns

use super::admin_action::{ActionReport, ActionRequest, ActionRun, ActionStatus};
use super::dataset::{DataSource, Dataset, HealthSnapshot};
use super::history::ActionHistoryEntry;
use std::time::Instant;

/// Action runs kept for the output dialog
const RUN_LIMIT: usize = 20;

/// Domain state containing all business data
pub struct DomainState {
    /// Records shown in the tables
    pub dataset: Dataset,

    /// Where `dataset` was loaded from
    pub source: DataSource,

    /// Latest health metrics
    pub health: HealthSnapshot,

    /// When `health` was last refreshed
    pub health_updated: Instant,

    /// Persisted action history, newest first
    pub history: Vec<ActionHistoryEntry>,

    /// Actions started this session, newest first
    pub runs: Vec<ActionRun>,
}

impl DomainState {
    pub fn new(dataset: Dataset, source: DataSource, health: HealthSnapshot) -> Self {
        Self {
            dataset,
            source,
            health,
            health_updated: Instant::now(),
            history: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Track a newly started action
    pub fn start_run(&mut self, request: ActionRequest) {
        self.runs.insert(0, ActionRun::new(request));
        self.runs.truncate(RUN_LIMIT);
    }

    /// Attach a report to its run and apply its effect to the dataset.
    ///
    /// Returns the number of records changed.
    pub fn complete_run(&mut self, report: &ActionReport) -> usize {
        if let Some(run) = self
            .runs
            .iter_mut()
            .find(|r| r.request.ticket == report.request.ticket)
        {
            run.complete(report.clone());
        }
        self.dataset.apply_report(report)
    }

    pub fn pending_runs(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| r.status == ActionStatus::Pending)
            .count()
    }
}
