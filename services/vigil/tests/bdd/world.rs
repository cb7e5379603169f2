//! BDD test world for the vigil service

use std::sync::Arc;

use cucumber::World;
use tokio::sync::RwLock;

use vigil::dispatcher::AlertDispatcher;
use vigil::monitor::{MonitorStatus, TargetMonitor, Transition};
use vigil::notifier::{Alert, Notifier};
use vigil::registry::Registry;

/// A test notifier that records every delivery as (destination, message)
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub deliveries: RwLock<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, to: &str, alert: &Alert) -> vigil::Result<()> {
        self.deliveries
            .write()
            .await
            .push((to.to_string(), alert.message.clone()));
        Ok(())
    }
}

#[derive(Debug, Default, World)]
pub struct VigilWorld {
    // State machine testing
    pub status: Option<MonitorStatus>,
    pub last_transition: Option<Option<Transition>>,

    // Dispatcher testing
    pub monitor: Option<Arc<TargetMonitor>>,
    pub dispatcher: Option<Arc<AlertDispatcher>>,
    pub recorder: Option<Arc<RecordingNotifier>>,

    // Snapshot testing
    pub registry: Option<Arc<Registry>>,
    pub response_status: Option<u16>,
    pub response_json: Option<serde_json::Value>,
}
