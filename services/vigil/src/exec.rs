//! Command-exec notifier

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::NotifierConfig;
use crate::notifier::{Alert, Notifier};

/// Invokes an external command with positional arguments
/// `("true"|"false", error-message-or-empty)` for every alert.
#[derive(Debug)]
pub struct ExecNotifier {
    command: String,
}

impl ExecNotifier {
    /// # Panics
    /// If `config` is not the exec variant.
    pub fn new(config: &NotifierConfig) -> Self {
        let NotifierConfig::Exec { command } = config else {
            unreachable!("ExecNotifier requires an exec notifier config");
        };

        tracing::debug!("Created ExecNotifier for command '{}'", command);

        Self {
            command: command.clone(),
        }
    }
}

#[async_trait]
impl Notifier for ExecNotifier {
    fn type_name(&self) -> &str {
        "exec"
    }

    async fn notify(&self, _to: &str, alert: &Alert) -> crate::Result<()> {
        let alive_arg = if alert.alive { "true" } else { "false" };

        let output = Command::new(&self.command)
            .arg(alive_arg)
            .arg(&alert.reason)
            .output()
            .await
            .map_err(|e| {
                crate::VigilError::Notifier(format!("running '{}' failed: {}", self.command, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::info!("{}: {}", self.command, stdout.trim());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(crate::VigilError::Notifier(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
