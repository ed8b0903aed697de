//! Public site and contact relay for a luxury real-estate brokerage.
//!
//! One axum service renders the marketing and catalog pages from the hosted
//! listing database, exposes the same data as JSON, and hosts the
//! `send-contact-email` function that turns a contact inquiry into a business
//! notification plus an auto-reply.
//!
//! ```no_run
//! use clap::Parser;
//! use realty_site::{config::Args, Application, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load(&Args::parse())?;
//! Application::new(config).await?.serve(std::future::pending()).await
//! # }
//! ```

pub mod api;
pub mod config;
pub mod contact;
pub mod errors;
pub mod gallery;
pub mod listings;
pub mod models;
pub mod render;
pub mod site;
pub mod sources;

#[cfg(test)]
mod test_utils;

pub use config::Config;

use crate::config::RelayConfig;
use crate::contact::{mailer, EmailRelay, FunctionClient, InquiryRelay, RelayIdentity};
use crate::render::Templates;
use crate::sources::ListingSource;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, Level};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn ListingSource>,
    /// Relay used by the contact page
    pub relay: Arc<dyn InquiryRelay>,
    /// In-process relay backing the `send-contact-email` endpoint
    pub email_relay: Arc<EmailRelay>,
    pub templates: Arc<Templates>,
}

/// Build the router serving pages, JSON endpoints and the relay function
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(site::router())
        .merge(api::router())
        .fallback(site::pages::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub struct Application {
    router: Router,
    config: Arc<Config>,
}

impl Application {
    /// Connect the listing source, mailer and relay described by `config`
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting with configuration: {:#?}", config);

        let templates = Arc::new(Templates::new()?);
        let source = sources::from_config(&config).await?;
        let mailer = mailer::from_config(&config.email, config.http_timeout)?;

        let identity = RelayIdentity {
            brand: config.brand_name.clone(),
            from: config.email.from.clone(),
            business_inbox: config.email.business_inbox.clone(),
            support_email: config.email.support_email.clone(),
        };
        let email_relay = Arc::new(EmailRelay::new(mailer, templates.clone(), identity));

        let relay: Arc<dyn InquiryRelay> = match &config.contact.relay {
            RelayConfig::InProcess => email_relay.clone(),
            RelayConfig::Function { url, api_key } => {
                info!("Contact form relays through {}", url);
                Arc::new(FunctionClient::new(url, api_key.clone(), config.http_timeout)?)
            }
        };

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            source,
            relay,
            email_relay,
            templates,
        };

        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    /// Serve until `shutdown` resolves, then let in-flight requests finish
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "🏠 {} listening on http://{}, available at http://localhost:{}",
            self.config.brand_name, bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
