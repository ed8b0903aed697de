//! Configuration management.
//!
//! Configuration is loaded from a YAML file (default `config.yaml`) and then
//! overridden by environment variables prefixed with `REALTY_`. Nested keys
//! use a double underscore:
//!
//! ```bash
//! REALTY_PORT=8080
//! REALTY_DATA_SOURCE__ANON_KEY=eyJhbGciOi...
//! REALTY_EMAIL__TRANSPORT__API_KEY=re_...
//! REALTY_CACHE__TTL=10m
//! ```

use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "REALTY_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server
    #[arg(long)]
    pub validate: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Brokerage name used in page titles and email copy
    pub brand_name: String,
    /// Where listings and testimonials are read from
    pub data_source: DataSourceConfig,
    /// In-memory cache in front of the data source
    pub cache: CacheConfig,
    /// Timeout applied to every outbound HTTP request
    #[serde(with = "humantime_serde")]
    pub http_timeout: Duration,
    /// Outbound email settings for the contact relay
    pub email: EmailConfig,
    /// How the contact form reaches the relay
    pub contact: ContactConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            brand_name: "MansaLuxe Realty".to_string(),
            data_source: DataSourceConfig::default(),
            cache: CacheConfig::default(),
            http_timeout: Duration::from_secs(30),
            email: EmailConfig::default(),
            contact: ContactConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSourceConfig {
    /// Hosted database exposing a PostgREST row API
    Supabase {
        url: String,
        anon_key: String,
        #[serde(default = "default_properties_table")]
        properties_table: String,
        #[serde(default = "default_testimonials_table")]
        testimonials_table: String,
    },
    /// Local JSON file with `properties` and `testimonials` arrays
    Fixture { path: PathBuf },
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        DataSourceConfig::Supabase {
            url: String::new(),
            anon_key: String::new(),
            properties_table: default_properties_table(),
            testimonials_table: default_testimonials_table(),
        }
    }
}

fn default_properties_table() -> String {
    "properties".to_string()
}

fn default_testimonials_table() -> String {
    "testimonials".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    pub transport: EmailTransportConfig,
    /// Sender mailbox, e.g. `Brand <onboarding@example.com>`
    pub from: String,
    /// Inbox receiving contact form notifications
    pub business_inbox: String,
    /// Address quoted in the auto-reply footer
    pub support_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: EmailTransportConfig::default(),
            from: "MansaLuxeRealty <onboarding@resend.dev>".to_string(),
            business_inbox: "mansaluxerealty@mrdgngroup.com".to_string(),
            support_email: "support.mansaluxerealty@mrdgngroup.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmailTransportConfig {
    /// Resend transactional email API
    Resend {
        api_key: String,
        #[serde(default = "default_resend_base_url")]
        base_url: String,
    },
    /// Write emails to the log instead of sending them (development)
    #[default]
    Log,
}

fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub relay: RelayConfig,
    /// Preselected dialing code on the contact form
    pub default_country_code: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            default_country_code: "+234".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RelayConfig {
    /// Send emails from this process
    #[default]
    InProcess,
    /// POST inquiries to a remote serverless function
    Function { url: String, api_key: Option<String> },
}

impl Config {
    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("REALTY_").ignore(&["config"]).split("__"))
    }

    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        Self::figment(args).extract()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let DataSourceConfig::Supabase { url, anon_key, .. } = &self.data_source {
            if url.trim().is_empty() || anon_key.trim().is_empty() {
                return Err(Error::Internal {
                    operation: "Config validation: data_source.url and data_source.anon_key are required for the supabase source"
                        .to_string(),
                });
            }
        }

        if let EmailTransportConfig::Resend { api_key, .. } = &self.email.transport {
            if api_key.trim().is_empty() {
                return Err(Error::Internal {
                    operation: "Config validation: email.transport.api_key is required for the resend transport".to_string(),
                });
            }
        }

        if let RelayConfig::Function { url, .. } = &self.contact.relay {
            if url.trim().is_empty() {
                return Err(Error::Internal {
                    operation: "Config validation: contact.relay.url is required in function mode".to_string(),
                });
            }
        }

        if self.cache.enabled && self.cache.ttl.is_zero() {
            return Err(Error::Internal {
                operation: "Config validation: cache.ttl must be greater than zero when the cache is enabled".to_string(),
            });
        }

        Ok(())
    }
}
