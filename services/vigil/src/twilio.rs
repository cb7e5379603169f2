//! Twilio SMS notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::NotifierConfig;
use crate::io::HttpClient;
use crate::notifier::{Alert, Notifier};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Sends alert messages as SMS through the Twilio REST API
pub struct TwilioNotifier {
    account_sid: String,
    auth_token: String,
    from_number: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TwilioNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioNotifier")
            .field("account_sid", &self.account_sid)
            .field("from_number", &self.from_number)
            .finish()
    }
}

impl TwilioNotifier {
    /// # Panics
    /// If `config` is not the twilio variant.
    pub fn new(config: &NotifierConfig, http: Arc<dyn HttpClient>) -> Self {
        let NotifierConfig::Twilio {
            account_sid,
            auth_token,
            from_number,
        } = config
        else {
            unreachable!("TwilioNotifier requires a twilio notifier config");
        };

        tracing::debug!("Created TwilioNotifier for sender '{}'", from_number);

        Self {
            account_sid: account_sid.clone(),
            auth_token: auth_token.clone(),
            from_number: from_number.clone(),
            http,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.account_sid
        )
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    fn type_name(&self) -> &str {
        "twilio"
    }

    async fn notify(&self, to: &str, alert: &Alert) -> crate::Result<()> {
        let params = vec![
            ("From", self.from_number.as_str()),
            ("To", to),
            ("Body", alert.message.as_str()),
        ];

        tracing::info!("sending to {} : {}", to, alert.message);

        let response = self
            .http
            .post_form(&self.messages_url(), &self.account_sid, &self.auth_token, &params)
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(crate::VigilError::Notifier(format!(
                "Twilio API returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("SMS to {} accepted", to);
        Ok(())
    }
}
