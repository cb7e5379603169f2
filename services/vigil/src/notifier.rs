//! Notifier trait for delivering alerts

use async_trait::async_trait;

/// One alert to deliver. `message` carries the human-readable text used by
/// transport notifiers; `alive` and `reason` carry the structured form used
/// by the exec notifier.
#[derive(Debug, Clone)]
pub struct Alert {
    pub url: String,
    pub alive: bool,
    /// Last probe error, empty on recovery and startup notices
    pub reason: String,
    pub message: String,
}

impl Alert {
    pub fn started(url: &str) -> Self {
        Self {
            url: url.to_string(),
            alive: true,
            reason: String::new(),
            message: format!("{} - started monitoring", url),
        }
    }

    pub fn failed(url: &str, took_ms: i64, reason: &str) -> Self {
        Self {
            url: url.to_string(),
            alive: false,
            reason: reason.to_string(),
            message: format!("{} - failed, took: {}, error: {}", url, took_ms, reason),
        }
    }

    pub fn recovered(url: &str) -> Self {
        Self {
            url: url.to_string(),
            alive: true,
            reason: String::new(),
            message: format!("{} - recovered", url),
        }
    }
}

/// Trait for delivering one alert to one destination
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "twilio")
    fn type_name(&self) -> &str;

    /// Deliver the alert to a single destination
    async fn notify(&self, to: &str, alert: &Alert) -> crate::Result<()>;
}
