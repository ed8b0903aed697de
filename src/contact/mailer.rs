use crate::config::{EmailConfig, EmailTransportConfig};
use crate::errors::{Error, Result};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const SERVICE: &str = "email";

/// One HTML email as accepted by the email API
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Sends through the Resend transactional email API
pub struct ResendMailer {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

impl ResendMailer {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| Error::upstream(SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Email API returned status: {}", status);
            return Err(Error::upstream(SERVICE, format!("{status}: {body}")));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("invalid send response: {e}")))?;
        info!("Email '{}' accepted with id {:?}", email.subject, sent.id);
        Ok(())
    }
}

/// Writes emails to the log instead of delivering them
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        info!("📧 Email to {:?}: {}", email.to, email.subject);
        debug!("{}", email.html);
        Ok(())
    }
}

pub fn from_config(config: &EmailConfig, timeout: Duration) -> anyhow::Result<Arc<dyn Mailer>> {
    Ok(match &config.transport {
        EmailTransportConfig::Resend { api_key, base_url } => Arc::new(ResendMailer::new(base_url, api_key, timeout)?),
        EmailTransportConfig::Log => {
            warn!("Email transport is 'log' - contact form emails will not be delivered");
            Arc::new(LogMailer)
        }
    })
}
