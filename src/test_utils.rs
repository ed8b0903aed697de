//! Shared fixtures for handler and relay tests.

use crate::config::Config;
use crate::contact::{ContactInquiry, EmailRelay, InquiryRelay, Mailer, OutgoingEmail, RelayIdentity};
use crate::errors::{Error, Result};
use crate::models::{Property, Testimonial};
use crate::render::Templates;
use crate::sources::{FixtureSource, ListingSource};
use crate::AppState;
use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::{Arc, Mutex};

pub fn test_config() -> Config {
    Config::default()
}

pub fn identity() -> RelayIdentity {
    RelayIdentity {
        brand: "MansaLuxe Realty".into(),
        from: "MansaLuxeRealty <onboarding@resend.dev>".into(),
        business_inbox: "sales@brokerage.test".into(),
        support_email: "support@brokerage.test".into(),
    }
}

/// Records sent emails, failing the send at index `fail_on`
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail_on: Option<usize>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self::failing_at(0)
    }

    /// Fails the send at `index`, after `index` successful sends
    pub fn failing_at(index: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_on: Some(index),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_on == Some(sent.len()) {
            return Err(Error::upstream("email", "rate limited"));
        }
        sent.push(email.clone());
        Ok(())
    }
}

/// Stands in for the contact page relay and records every call
#[derive(Default)]
pub struct RecordingRelay {
    calls: Mutex<Vec<ContactInquiry>>,
    fail: bool,
}

impl RecordingRelay {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ContactInquiry> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InquiryRelay for RecordingRelay {
    async fn relay(&self, inquiry: &ContactInquiry) -> Result<()> {
        self.calls.lock().unwrap().push(inquiry.clone());
        if self.fail {
            return Err(Error::upstream("contact function", "500 Internal Server Error"));
        }
        Ok(())
    }
}

/// Source whose every read fails like an unreachable backend
pub struct FailingSource;

#[async_trait]
impl ListingSource for FailingSource {
    async fn published_properties(&self) -> Result<Vec<Property>> {
        Err(Error::upstream("backend", "connection refused"))
    }

    async fn property(&self, _id: &str) -> Result<Option<Property>> {
        Err(Error::upstream("backend", "connection refused"))
    }

    async fn published_testimonials(&self) -> Result<Vec<Testimonial>> {
        Err(Error::upstream("backend", "connection refused"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

pub fn build_state_with(
    config: Config,
    source: Arc<dyn ListingSource>,
    relay: Arc<dyn InquiryRelay>,
    mailer: Arc<dyn Mailer>,
) -> AppState {
    let templates = Arc::new(Templates::new().unwrap());
    AppState {
        config: Arc::new(config),
        source,
        relay,
        email_relay: Arc::new(EmailRelay::new(mailer, templates.clone(), identity())),
        templates,
    }
}

pub fn build_state(source: Arc<dyn ListingSource>, relay: Arc<dyn InquiryRelay>) -> AppState {
    build_state_with(test_config(), source, relay, Arc::new(RecordingMailer::default()))
}

/// Server over an in-memory catalog, plus the relay the contact page calls
pub fn test_server(properties: Vec<Property>, testimonials: Vec<Testimonial>) -> (TestServer, Arc<RecordingRelay>) {
    let relay = Arc::new(RecordingRelay::default());
    let state = build_state(Arc::new(FixtureSource::new(properties, testimonials)), relay.clone());
    let server = TestServer::new(crate::build_router(state)).unwrap();
    (server, relay)
}
