use crate::traits::Notifier;
use crate::types::{DigestMessage, Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone)]
pub struct EmailApiConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Sends the digest through a JSON email API authenticated with a bearer key.
#[derive(Clone)]
pub struct HttpEmailNotifier {
    config: EmailApiConfig,
    client: Client,
    timeout: Duration,
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

impl HttpEmailNotifier {
    pub fn new(config: EmailApiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait]
impl Notifier for HttpEmailNotifier {
    async fn send(&self, message: &DigestMessage) -> Result<()> {
        let payload = EmailPayload {
            from: &self.config.from,
            to: &self.config.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::Notify(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::Notify(format!(
                "email API returned {}: {}",
                status,
                body.trim()
            )));
        }

        info!("Digest sent to {} recipient(s)", self.config.to.len());
        Ok(())
    }
}
