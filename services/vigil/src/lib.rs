//! Vigil - endpoint health monitoring and alerting service
//!
//! Polls target URLs over HTTP, tracks a bounded history of failures per
//! target, detects liveness transitions, and alerts through a configurable
//! notifier while serving a JSON status snapshot.

pub mod config;
pub mod dashboard;
pub mod dispatcher;
pub mod error;
pub mod exec;
pub mod failure_log;
pub mod io;
pub mod monitor;
pub mod notifier;
pub mod prober;
pub mod registry;
pub mod twilio;

pub use config::{load_config, Config};
pub use error::{Result, VigilError};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::NotifierConfig;
use crate::dispatcher::{AlertDispatcher, AlertPolicy};
use crate::exec::ExecNotifier;
use crate::io::ReqwestHttpClient;
use crate::monitor::TargetMonitor;
use crate::notifier::Notifier;
use crate::prober::Prober;
use crate::registry::Registry;
use crate::twilio::TwilioNotifier;

/// Run the vigil service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new()?);
    let cancel = CancellationToken::new();

    let prober = Arc::new(Prober::new(Arc::clone(&http)));

    let notifier: Arc<dyn Notifier> = match &config.notifier {
        NotifierConfig::Twilio { .. } => {
            Arc::new(TwilioNotifier::new(&config.notifier, Arc::clone(&http)))
        }
        NotifierConfig::Exec { .. } => Arc::new(ExecNotifier::new(&config.notifier)),
    };

    let policy = AlertPolicy::from_config(&config.alerting);
    let dispatcher = Arc::new(AlertDispatcher::new(policy, notifier));

    let monitors: Vec<Arc<TargetMonitor>> = config
        .checks
        .iter()
        .map(|check| {
            Arc::new(TargetMonitor::new(
                check.url.clone(),
                check.notify.clone(),
                Duration::from_secs(check.poll_interval_seconds),
            ))
        })
        .collect();
    let registry = Arc::new(Registry::new(monitors));

    // Shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Reporting endpoint
    if config.dashboard.enabled {
        let addr = SocketAddr::new(config.dashboard.bind, config.dashboard.port);
        let dashboard_registry = Arc::clone(&registry);
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let router = dashboard::build_router(dashboard_registry);
            tracing::info!("Status endpoint listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind status endpoint to {}: {}. Continuing without it.",
                        addr,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Status endpoint stopped");
        });
    }

    tracing::info!(
        "Monitoring {} targets with '{}' notifier ({:?} policy)",
        registry.monitors().len(),
        config.notifier.type_name(),
        policy
    );

    // Blocks until cancelled
    registry.run(prober, dispatcher, cancel).await;

    tracing::info!("Vigil stopped");
    Ok(())
}
