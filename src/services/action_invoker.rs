//! Admin action invoker
//!
//! Runs simulated admin actions off the UI thread and hands completed reports
//! back when polled. The app polls on every tick and never blocks on an action.

use crate::model::admin_action::{ActionError, ActionKind, ActionReport, ActionRequest, ActionSuccess};
use rand::Rng;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// Something that can execute admin actions asynchronously
pub trait ActionInvoker {
    /// Start an action and return the request that tracks it
    fn invoke(&mut self, kind: ActionKind, target_ids: Vec<String>) -> ActionRequest;

    /// Collect every report that completed since the last poll
    fn poll(&mut self) -> Vec<ActionReport>;

    /// Number of actions still in flight
    fn pending(&self) -> usize;
}

fn nothing_to_do(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::RefreshTokens => "no tokens selected",
        ActionKind::ReapGhostSessions => "no ghost sessions",
        ActionKind::AutoFlagHighRisk => "no unflagged high-risk sessions",
        ActionKind::TerminateSessions => "no sessions selected",
        ActionKind::RevalidateSchema => "no schema rows selected",
    }
}

fn success_message(kind: ActionKind, count: usize) -> String {
    let (verb, noun) = match kind {
        ActionKind::RefreshTokens => ("refreshed", "token"),
        ActionKind::ReapGhostSessions => ("reaped", "ghost session"),
        ActionKind::AutoFlagHighRisk => ("flagged", "session"),
        ActionKind::TerminateSessions => ("terminated", "session"),
        ActionKind::RevalidateSchema => ("revalidated", "column"),
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{} {} {}{}", verb, count, noun, plural)
}

/// Roll the outcome of a simulated action
pub fn simulate_outcome(
    kind: ActionKind,
    target_ids: &[String],
    failure_rate: f64,
    latency_ms: u64,
    rng: &mut impl Rng,
) -> Result<ActionSuccess, ActionError> {
    if target_ids.is_empty() {
        return Err(ActionError::NoTargets(nothing_to_do(kind)));
    }

    if rng.random_bool(failure_rate.clamp(0.0, 1.0)) {
        let error = match rng.random_range(0..4) {
            0 => ActionError::Timeout(latency_ms.max(1) * 10),
            1 => ActionError::Rejected(format!("{} denied for current role", kind.endpoint())),
            2 if target_ids.len() > 1 => {
                let failed = rng.random_range(1..target_ids.len());
                ActionError::Partial {
                    total: target_ids.len(),
                    failed,
                    succeeded: target_ids[..target_ids.len() - failed].to_vec(),
                }
            }
            _ => ActionError::Unavailable,
        };
        return Err(error);
    }

    Ok(ActionSuccess {
        message: success_message(kind, target_ids.len()),
        affected_ids: target_ids.to_vec(),
    })
}

/// Invoker that fakes the admin API on worker threads
pub struct MockActionInvoker {
    latency: Duration,
    failure_rate: f64,
    next_ticket: u64,
    in_flight: usize,
    sender: Sender<ActionReport>,
    receiver: Receiver<ActionReport>,
}

impl MockActionInvoker {
    pub fn new(latency_ms: u64, failure_rate: f64) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            latency: Duration::from_millis(latency_ms),
            failure_rate,
            next_ticket: 1,
            in_flight: 0,
            sender,
            receiver,
        }
    }
}

impl ActionInvoker for MockActionInvoker {
    fn invoke(&mut self, kind: ActionKind, target_ids: Vec<String>) -> ActionRequest {
        let request = ActionRequest {
            ticket: self.next_ticket,
            kind,
            target_ids,
        };
        self.next_ticket += 1;
        self.in_flight += 1;

        tracing::info!(
            ticket = request.ticket,
            endpoint = kind.endpoint(),
            targets = request.target_ids.len(),
            "invoking admin action"
        );

        let tx = self.sender.clone();
        let latency = self.latency;
        let failure_rate = self.failure_rate;
        let job = request.clone();

        thread::spawn(move || {
            let started = Instant::now();
            thread::sleep(latency);
            let outcome = simulate_outcome(
                job.kind,
                &job.target_ids,
                failure_rate,
                latency.as_millis() as u64,
                &mut rand::rng(),
            );
            let _ = tx.send(ActionReport {
                request: job,
                outcome,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        });

        request
    }

    fn poll(&mut self) -> Vec<ActionReport> {
        let mut reports = Vec::new();

        loop {
            match self.receiver.try_recv() {
                Ok(report) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    match &report.outcome {
                        Ok(_) => tracing::info!(
                            ticket = report.request.ticket,
                            elapsed_ms = report.elapsed_ms,
                            "admin action completed"
                        ),
                        Err(err) => tracing::warn!(
                            ticket = report.request.ticket,
                            error = %err,
                            "admin action failed"
                        ),
                    }
                    reports.push(report);
                }
                // The invoker owns a sender, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        reports
    }

    fn pending(&self) -> usize {
        self.in_flight
    }
}

/// Invoker that completes every action successfully on the next poll
#[cfg(test)]
#[derive(Default)]
pub struct ImmediateInvoker {
    next_ticket: u64,
    queued: Vec<ActionReport>,
}

#[cfg(test)]
impl ActionInvoker for ImmediateInvoker {
    fn invoke(&mut self, kind: ActionKind, target_ids: Vec<String>) -> ActionRequest {
        self.next_ticket += 1;
        let request = ActionRequest {
            ticket: self.next_ticket,
            kind,
            target_ids,
        };
        let outcome = simulate_outcome(kind, &request.target_ids, 0.0, 0, &mut rand::rng());
        self.queued.push(ActionReport {
            request: request.clone(),
            outcome,
            elapsed_ms: 0,
        });
        request
    }

    fn poll(&mut self) -> Vec<ActionReport> {
        std::mem::take(&mut self.queued)
    }

    fn pending(&self) -> usize {
        self.queued.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("sess-{:04}", i)).collect()
    }

    #[test]
    fn test_simulate_success_affects_all_targets() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = simulate_outcome(ActionKind::TerminateSessions, &ids(3), 0.0, 10, &mut rng);

        let success = outcome.unwrap();
        assert_eq!(success.affected_ids, ids(3));
        assert_eq!(success.message, "terminated 3 sessions");
    }

    #[test]
    fn test_simulate_without_targets_is_no_targets_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = simulate_outcome(ActionKind::ReapGhostSessions, &[], 0.0, 10, &mut rng);
        assert_eq!(outcome, Err(ActionError::NoTargets("no ghost sessions")));
    }

    #[test]
    fn test_simulate_always_fails_at_full_failure_rate() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let outcome = simulate_outcome(ActionKind::RefreshTokens, &ids(4), 1.0, 10, &mut rng);
            match outcome {
                Err(ActionError::Partial { total, failed, succeeded }) => {
                    assert_eq!(total, 4);
                    assert_eq!(succeeded.len() + failed, total);
                }
                Err(_) => {}
                Ok(_) => panic!("expected a failure"),
            }
        }
    }

    #[test]
    fn test_mock_invoker_reports_through_poll() {
        let mut invoker = MockActionInvoker::new(0, 0.0);
        let request = invoker.invoke(ActionKind::RevalidateSchema, ids(2));
        assert_eq!(request.ticket, 1);
        assert_eq!(invoker.pending(), 1);

        let mut reports = Vec::new();
        for _ in 0..200 {
            reports.extend(invoker.poll());
            if !reports.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].request, request);
        assert!(reports[0].outcome.is_ok());
        assert_eq!(invoker.pending(), 0);
    }

    #[test]
    fn test_mock_invoker_tickets_increase() {
        let mut invoker = MockActionInvoker::new(0, 0.0);
        let first = invoker.invoke(ActionKind::RefreshTokens, ids(1));
        let second = invoker.invoke(ActionKind::RefreshTokens, ids(1));
        assert!(second.ticket > first.ticket);
    }

    #[test]
    fn test_immediate_invoker_completes_on_next_poll() {
        let mut invoker = ImmediateInvoker::default();
        invoker.invoke(ActionKind::AutoFlagHighRisk, ids(2));
        assert_eq!(invoker.pending(), 1);

        let reports = invoker.poll();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].applied_ids(), ids(2).as_slice());
        assert!(invoker.poll().is_empty());
    }
}
