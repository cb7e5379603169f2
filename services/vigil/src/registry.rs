//! Registry of target monitors and the status snapshot

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::dispatcher::AlertDispatcher;
use crate::failure_log::FailureRecord;
use crate::monitor::{poll_loop, Liveness, TargetMonitor};
use crate::prober::Prober;

/// Point-in-time view of one monitor, serialized with the wire field names
/// of the reporting endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetView {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Failures")]
    pub failures: Vec<FailureRecord>,
    #[serde(rename = "LastSuccessMs")]
    pub last_success_ms: i64,
    #[serde(rename = "LastFailureMs")]
    pub last_failure_ms: i64,
    #[serde(rename = "LastNotificationMs")]
    pub last_notification_ms: i64,
    #[serde(rename = "Alive")]
    pub alive: bool,
}

/// The fixed set of monitors for the process lifetime, in configuration
/// order
#[derive(Debug)]
pub struct Registry {
    monitors: Vec<Arc<TargetMonitor>>,
}

impl Registry {
    pub fn new(monitors: Vec<Arc<TargetMonitor>>) -> Self {
        Self { monitors }
    }

    pub fn monitors(&self) -> &[Arc<TargetMonitor>] {
        &self.monitors
    }

    /// Read every monitor under its own lock. Each view is internally
    /// consistent; views across monitors are not mutually atomic.
    pub async fn snapshot(&self) -> Vec<TargetView> {
        let mut views = Vec::with_capacity(self.monitors.len());
        for monitor in &self.monitors {
            let status = monitor.status().read().await;
            views.push(TargetView {
                url: monitor.url().to_string(),
                failures: status.failures.iter().cloned().collect(),
                last_success_ms: status.last_success_ms,
                last_failure_ms: status.last_failure_ms,
                last_notification_ms: status.last_notification_ms,
                alive: status.liveness == Liveness::Alive,
            });
        }
        views
    }

    /// Spawn one polling loop per monitor and wait until cancellation
    pub async fn run(
        &self,
        prober: Arc<Prober>,
        dispatcher: Arc<AlertDispatcher>,
        cancel: CancellationToken,
    ) {
        let mut handles = Vec::new();
        for monitor in &self.monitors {
            handles.push(tokio::spawn(poll_loop(
                Arc::clone(monitor),
                Arc::clone(&prober),
                Arc::clone(&dispatcher),
                cancel.clone(),
            )));
        }

        cancel.cancelled().await;

        for handle in handles {
            let _ = handle.await;
        }
    }
}
