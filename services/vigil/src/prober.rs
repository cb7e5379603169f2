//! Single HTTP probe against a target URL

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::io::HttpClient;

/// The only status code that counts as a healthy response
const EXPECTED_STATUS: u16 = 200;

/// Result of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        stamp_ms: i64,
    },
    Failure {
        reason: String,
        took_ms: i64,
        stamp_ms: i64,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Issues probes and classifies the result
pub struct Prober {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for Prober {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prober").finish()
    }
}

impl Prober {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Probe the URL once.
    ///
    /// A probe fails if the request errors, the body cannot be fully read,
    /// or the status code is anything other than 200. Redirects and
    /// informational codes are failures like any other non-200.
    pub async fn probe(&self, url: &str) -> Outcome {
        let stamp_ms = now_ms();
        let started = Instant::now();

        let result = self.http.get(url).await;
        let took_ms = started.elapsed().as_millis() as i64;

        match result {
            Ok(response) if response.status == EXPECTED_STATUS => Outcome::Success { stamp_ms },
            Ok(response) => Outcome::Failure {
                reason: format!(
                    "expected status code {}, but got {}",
                    EXPECTED_STATUS, response.status
                ),
                took_ms,
                stamp_ms,
            },
            Err(e) => Outcome::Failure {
                reason: e.to_string(),
                took_ms,
                stamp_ms,
            },
        }
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
