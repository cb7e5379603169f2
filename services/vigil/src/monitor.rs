//! Per-target state machine and polling loop

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::dispatcher::AlertDispatcher;
use crate::failure_log::{FailureLog, FailureRecord};
use crate::prober::{Outcome, Prober};

/// Liveness of a monitored target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

/// An edge transition between liveness states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Alive -> Dead
    Failed,
    /// Dead -> Alive
    Recovered,
}

/// Mutable fields of one monitor. All of them live behind a single lock so
/// the snapshot path always sees a consistent view.
#[derive(Debug)]
pub struct MonitorStatus {
    pub liveness: Liveness,
    pub failures: FailureLog,
    pub last_success_ms: i64,
    pub last_failure_ms: i64,
    pub last_notification_ms: i64,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorStatus {
    pub fn new() -> Self {
        Self {
            liveness: Liveness::Alive,
            failures: FailureLog::new(),
            last_success_ms: 0,
            last_failure_ms: 0,
            last_notification_ms: 0,
        }
    }

    /// Apply a successful probe, returning the edge transition if one occurred
    pub fn record_success(&mut self, stamp_ms: i64) -> Option<Transition> {
        self.last_success_ms = stamp_ms;
        if self.liveness == Liveness::Dead {
            self.liveness = Liveness::Alive;
            Some(Transition::Recovered)
        } else {
            None
        }
    }

    /// Apply a failed probe, returning the edge transition if one occurred.
    /// The failure is always appended to the log, transition or not.
    pub fn record_failure(&mut self, record: FailureRecord) -> Option<Transition> {
        self.last_failure_ms = record.stamp_ms;
        self.failures.push(record);
        if self.liveness == Liveness::Alive {
            self.liveness = Liveness::Dead;
            Some(Transition::Failed)
        } else {
            None
        }
    }
}

/// One monitored target: immutable identity plus lock-guarded status.
/// Created once at startup and never destroyed.
#[derive(Debug)]
pub struct TargetMonitor {
    url: String,
    notify: Vec<String>,
    poll_interval: Duration,
    status: RwLock<MonitorStatus>,
}

impl TargetMonitor {
    pub fn new(url: String, notify: Vec<String>, poll_interval: Duration) -> Self {
        Self {
            url,
            notify,
            poll_interval,
            status: RwLock::new(MonitorStatus::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn notify_targets(&self) -> &[String] {
        &self.notify
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn status(&self) -> &RwLock<MonitorStatus> {
        &self.status
    }
}

/// Poll one target forever: probe, apply the outcome, hand any edge to the
/// dispatcher, sleep. The sleep is not compensated for probe latency, so the
/// effective period is interval plus probe duration.
pub async fn poll_loop(
    monitor: Arc<TargetMonitor>,
    prober: Arc<Prober>,
    dispatcher: Arc<AlertDispatcher>,
    cancel: CancellationToken,
) {
    dispatcher.announce(&monitor).await;

    loop {
        let outcome = prober.probe(monitor.url()).await;

        match outcome {
            Outcome::Success { stamp_ms } => {
                let transition = monitor.status().write().await.record_success(stamp_ms);
                tracing::debug!("Probe '{}': success (transition={:?})", monitor.url(), transition);
                if let Some(transition) = transition {
                    dispatcher
                        .on_transition(&monitor, transition, None, stamp_ms)
                        .await;
                }
            }
            Outcome::Failure {
                reason,
                took_ms,
                stamp_ms,
            } => {
                tracing::warn!(
                    "Probe '{}' failed after {} ms: {}",
                    monitor.url(),
                    took_ms,
                    reason
                );
                let record = FailureRecord {
                    reason,
                    took_ms,
                    stamp_ms,
                };
                let transition = monitor
                    .status()
                    .write()
                    .await
                    .record_failure(record.clone());
                if let Some(transition) = transition {
                    dispatcher
                        .on_transition(&monitor, transition, Some(&record), stamp_ms)
                        .await;
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(monitor.poll_interval()) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Polling loop for '{}' cancelled", monitor.url());
                break;
            }
        }
    }
}
