//! Alert policies and fire-and-forget notification dispatch

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::{AlertingConfig, PolicyKind};
use crate::failure_log::FailureRecord;
use crate::monitor::{TargetMonitor, Transition};
use crate::notifier::{Alert, Notifier};

/// Upper bound on notification tasks in flight across the whole process.
/// A persistently slow notifier drops alerts instead of growing tasks.
const MAX_INFLIGHT_NOTIFICATIONS: usize = 32;

/// When and how often to notify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPolicy {
    /// Notify on every transition, both directions
    EdgeTriggered,
    /// Notify on failure transitions only, and only if at least
    /// `min_interval_ms` elapsed since the last notification
    RateLimited { min_interval_ms: i64 },
}

impl AlertPolicy {
    pub fn from_config(config: &AlertingConfig) -> Self {
        match config.policy {
            PolicyKind::EdgeTriggered => AlertPolicy::EdgeTriggered,
            PolicyKind::RateLimited => AlertPolicy::RateLimited {
                min_interval_ms: config.min_notification_interval_ms,
            },
        }
    }
}

/// Decides whether a transition produces a notification and hands the
/// delivery to background tasks
#[derive(Debug)]
pub struct AlertDispatcher {
    policy: AlertPolicy,
    notifier: Arc<dyn Notifier>,
    inflight: Arc<Semaphore>,
}

impl AlertDispatcher {
    pub fn new(policy: AlertPolicy, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            policy,
            notifier,
            inflight: Arc::new(Semaphore::new(MAX_INFLIGHT_NOTIFICATIONS)),
        }
    }

    pub fn policy(&self) -> AlertPolicy {
        self.policy
    }

    /// Startup notice for one monitor. Only the rate-limited policy sends
    /// it; it does not touch `last_notification_ms`.
    pub async fn announce(&self, monitor: &TargetMonitor) {
        if let AlertPolicy::RateLimited { .. } = self.policy {
            self.dispatch(monitor, Alert::started(monitor.url()));
        }
    }

    /// Handle an edge transition observed by a monitor's poll loop.
    ///
    /// `failure` is the record that caused a `Failed` transition, `None` for
    /// `Recovered`. `now_ms` is the probe start time the loop observed.
    pub async fn on_transition(
        &self,
        monitor: &TargetMonitor,
        transition: Transition,
        failure: Option<&FailureRecord>,
        now_ms: i64,
    ) {
        match (self.policy, transition) {
            (AlertPolicy::EdgeTriggered, Transition::Failed) => {
                let alert = match failure {
                    Some(record) => Alert::failed(monitor.url(), record.took_ms, &record.reason),
                    None => Alert::failed(monitor.url(), 0, ""),
                };
                monitor.status().write().await.last_notification_ms = now_ms;
                self.dispatch(monitor, alert);
            }
            (AlertPolicy::EdgeTriggered, Transition::Recovered) => {
                monitor.status().write().await.last_notification_ms = now_ms;
                self.dispatch(monitor, Alert::recovered(monitor.url()));
            }
            (AlertPolicy::RateLimited { min_interval_ms }, Transition::Failed) => {
                let gate_open = {
                    let mut status = monitor.status().write().await;
                    if now_ms - status.last_notification_ms > min_interval_ms {
                        status.last_notification_ms = now_ms;
                        true
                    } else {
                        false
                    }
                };
                if gate_open {
                    let alert = match failure {
                        Some(record) => {
                            Alert::failed(monitor.url(), record.took_ms, &record.reason)
                        }
                        None => Alert::failed(monitor.url(), 0, ""),
                    };
                    self.dispatch(monitor, alert);
                } else {
                    tracing::debug!(
                        "Suppressing failure alert for '{}': rate limit window not elapsed",
                        monitor.url()
                    );
                }
            }
            (AlertPolicy::RateLimited { .. }, Transition::Recovered) => {}
        }
    }

    /// Send the same alert to every notify target of the monitor, one
    /// spawned task per destination. A monitor with no notify targets (the
    /// exec deployment shape) gets exactly one delivery.
    fn dispatch(&self, monitor: &TargetMonitor, alert: Alert) {
        let destinations: Vec<String> = if monitor.notify_targets().is_empty() {
            vec![String::new()]
        } else {
            monitor.notify_targets().to_vec()
        };

        for to in destinations {
            let permit = match Arc::clone(&self.inflight).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!(
                        "Notification pool exhausted, dropping alert for '{}' to '{}'",
                        monitor.url(),
                        to
                    );
                    continue;
                }
            };
            let notifier = Arc::clone(&self.notifier);
            let alert = alert.clone();
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = notifier.notify(&to, &alert).await {
                    tracing::warn!(
                        "Notification via '{}' to '{}' failed: {}",
                        notifier.type_name(),
                        to,
                        e
                    );
                }
            });
        }
    }
}
