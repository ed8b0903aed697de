use crate::contact::form::ContactInquiry;
use crate::contact::mailer::{Mailer, OutgoingEmail};
use crate::errors::{Error, Result};
use crate::render::Templates;
use anyhow::Context;
use async_trait::async_trait;
use minijinja::context;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Forwards a contact inquiry to the brokerage
#[async_trait]
pub trait InquiryRelay: Send + Sync {
    async fn relay(&self, inquiry: &ContactInquiry) -> Result<()>;
}

/// Addresses and branding used when composing relay emails
#[derive(Debug, Clone)]
pub struct RelayIdentity {
    pub brand: String,
    pub from: String,
    pub business_inbox: String,
    pub support_email: String,
}

/// Validates an inquiry and sends the business notification plus the
/// submitter's auto-reply. No retries: the first failed send fails the relay.
pub struct EmailRelay {
    mailer: Arc<dyn Mailer>,
    templates: Arc<Templates>,
    identity: RelayIdentity,
}

impl EmailRelay {
    pub fn new(mailer: Arc<dyn Mailer>, templates: Arc<Templates>, identity: RelayIdentity) -> Self {
        Self {
            mailer,
            templates,
            identity,
        }
    }

    pub fn business_notification(&self, inquiry: &ContactInquiry) -> Result<OutgoingEmail> {
        let html = self.templates.render(
            "emails/business_notification.html",
            context! { brand => &self.identity.brand, inquiry => inquiry },
        )?;

        Ok(OutgoingEmail {
            from: self.identity.from.clone(),
            to: vec![self.identity.business_inbox.clone()],
            subject: format!("New Contact Form Submission: {}", inquiry.subject),
            html,
        })
    }

    pub fn auto_reply(&self, inquiry: &ContactInquiry) -> Result<OutgoingEmail> {
        let html = self.templates.render(
            "emails/auto_reply.html",
            context! {
                brand => &self.identity.brand,
                business_inbox => &self.identity.business_inbox,
                support_email => &self.identity.support_email,
                inquiry => inquiry,
            },
        )?;

        Ok(OutgoingEmail {
            from: self.identity.from.clone(),
            to: vec![inquiry.email.trim().to_string()],
            subject: format!("Thank you for contacting {}", self.identity.brand),
            html,
        })
    }
}

#[async_trait]
impl InquiryRelay for EmailRelay {
    #[instrument(skip_all, fields(subject = %inquiry.subject))]
    async fn relay(&self, inquiry: &ContactInquiry) -> Result<()> {
        inquiry.validate()?;

        let notification = self.business_notification(inquiry)?;
        let reply = self.auto_reply(inquiry)?;

        self.mailer.send(&notification).await?;
        self.mailer.send(&reply).await?;

        info!("Contact inquiry relayed");
        Ok(())
    }
}

/// Calls a remote `send-contact-email` function over HTTPS
pub struct FunctionClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FunctionReply {
    #[serde(default)]
    success: bool,
    error: Option<String>,
}

impl FunctionClient {
    pub fn new(url: &str, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl InquiryRelay for FunctionClient {
    async fn relay(&self, inquiry: &ContactInquiry) -> Result<()> {
        let mut request = self.client.post(&self.url).json(inquiry);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::upstream("contact function", e.to_string()))?;
        let status = response.status();
        let reply: Option<FunctionReply> = response.json().await.ok();

        match reply {
            Some(FunctionReply { success: true, .. }) if status.is_success() => Ok(()),
            Some(FunctionReply { error: Some(message), .. }) if status.is_client_error() => {
                Err(Error::BadRequest { message })
            }
            other => {
                let detail = other.and_then(|r| r.error).unwrap_or_else(|| status.to_string());
                warn!("Contact function failed with status {}", status);
                Err(Error::upstream("contact function", detail))
            }
        }
    }
}
