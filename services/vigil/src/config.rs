//! Configuration types for the vigil service

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub alerting: AlertingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// One target to monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub url: String,
    /// Destinations to alert: phone numbers for the twilio notifier,
    /// unused by the exec notifier
    #[serde(default)]
    pub notify: Vec<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

/// Notifier configuration with tagged enum for extensibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotifierConfig {
    #[serde(rename = "twilio")]
    Twilio {
        account_sid: String,
        auth_token: String,
        from_number: String,
    },
    #[serde(rename = "exec")]
    Exec { command: String },
}

impl NotifierConfig {
    pub fn type_name(&self) -> &str {
        match self {
            NotifierConfig::Twilio { .. } => "twilio",
            NotifierConfig::Exec { .. } => "exec",
        }
    }
}

/// Which alerting policy a deployment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Notify on every liveness transition, both directions
    EdgeTriggered,
    /// Notify on failure transitions only, at most once per interval
    RateLimited,
}

/// Alerting policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    #[serde(default = "default_policy")]
    pub policy: PolicyKind,
    #[serde(default = "default_min_notification_interval_ms")]
    pub min_notification_interval_ms: i64,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            min_notification_interval_ms: default_min_notification_interval_ms(),
        }
    }
}

/// Reporting endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_bind")]
    pub bind: IpAddr,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: default_dashboard_bind(),
            port: default_dashboard_port(),
        }
    }
}

fn default_poll_interval() -> u64 {
    60
}

fn default_policy() -> PolicyKind {
    PolicyKind::EdgeTriggered
}

fn default_min_notification_interval_ms() -> i64 {
    3_600_000
}

fn default_true() -> bool {
    true
}

fn default_dashboard_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_dashboard_port() -> u16 {
    8080
}

impl Config {
    /// Reject configurations the notifier cannot serve. The twilio notifier
    /// needs credentials and a destination per check; the exec notifier
    /// needs a command.
    pub fn validate(&self) -> crate::Result<()> {
        match &self.notifier {
            NotifierConfig::Twilio {
                account_sid,
                auth_token,
                from_number,
            } => {
                if account_sid.is_empty() || auth_token.is_empty() || from_number.is_empty() {
                    return Err(crate::VigilError::Config(
                        "twilio notifier requires account_sid, auth_token and from_number"
                            .to_string(),
                    ));
                }
                for check in &self.checks {
                    if check.notify.is_empty() {
                        return Err(crate::VigilError::Config(format!(
                            "expected phone number to notify for check '{}'",
                            check.url
                        )));
                    }
                }
            }
            NotifierConfig::Exec { command } => {
                if command.is_empty() {
                    return Err(crate::VigilError::Config(
                        "exec notifier requires a command".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::VigilError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
