use crate::errors::{Error, Result};
use crate::listings::ListingFilter;
use crate::models::{Property, PropertyStatus, Testimonial};
use crate::sources::query::{Direction, RowQuery};
use crate::sources::traits::ListingSource;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const SERVICE: &str = "backend";

/// Reads listings through the hosted database's PostgREST endpoint
pub struct SupabaseSource {
    client: Client,
    rest_url: String,
    anon_key: String,
    properties_table: String,
    testimonials_table: String,
}

impl SupabaseSource {
    /// Create a source for the project at `url` (e.g. `https://abc.supabase.co`)
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
            properties_table: "properties".to_string(),
            testimonials_table: "testimonials".to_string(),
        })
    }

    pub fn with_tables(mut self, properties: &str, testimonials: &str) -> Self {
        self.properties_table = properties.to_string();
        self.testimonials_table = testimonials.to_string();
        self
    }

    fn published(&self) -> RowQuery {
        RowQuery::from_table(&self.properties_table)
            .is_in("status", PropertyStatus::PUBLIC)
            .order("created_at", Direction::Desc)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, query: &RowQuery) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.rest_url, query.table());
        debug!("Querying {} with {:?}", url, query.to_params());

        let response = self
            .client
            .get(&url)
            .query(&query.to_params())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Row query on '{}' returned status: {}", query.table(), status);
            return Err(Error::upstream(
                SERVICE,
                format!("{} returned {}: {}", query.table(), status, body.chars().take(200).collect::<String>()),
            ));
        }

        let rows: Vec<T> = response
            .json()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("invalid rows from {}: {e}", query.table())))?;

        debug!("Fetched {} rows from {}", rows.len(), query.table());
        Ok(rows)
    }
}

#[async_trait]
impl ListingSource for SupabaseSource {
    async fn published_properties(&self) -> Result<Vec<Property>> {
        let rows: Vec<Property> = self.fetch_rows(&self.published()).await?;
        // Rows written with an unexpected status never reach visitors
        Ok(rows.into_iter().filter(Property::is_public).collect())
    }

    async fn featured_properties(&self) -> Result<Vec<Property>> {
        let query = self.published().eq("featured", true);
        let rows: Vec<Property> = self.fetch_rows(&query).await?;
        Ok(rows.into_iter().filter(|p| p.is_public() && p.featured).collect())
    }

    async fn property(&self, id: &str) -> Result<Option<Property>> {
        let query = RowQuery::from_table(&self.properties_table).eq("id", id).limit(1);
        let rows: Vec<Property> = self.fetch_rows(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn search_properties(&self, filter: &ListingFilter) -> Result<Vec<Property>> {
        let mut query = self.published();
        if let Some(term) = &filter.search {
            query = query.any_contains(&["title", "location", "description"], term);
        }
        if let Some(tag) = &filter.property_type {
            query = query.eq("property_type", tag);
        }
        if let Some(min) = filter.min_bedrooms {
            query = query.gte("bedrooms", min);
        }
        if let Some(min) = filter.min_bathrooms {
            query = query.gte("bathrooms", min);
        }
        if let Some(min) = filter.min_price {
            query = query.gte("price", min);
        }
        if let Some(max) = filter.max_price {
            query = query.lte("price", max);
        }
        if filter.featured_only {
            query = query.eq("featured", true);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status);
        }

        let rows: Vec<Property> = self.fetch_rows(&query).await?;
        let matched: Vec<Property> = rows.into_iter().filter(|p| p.is_public() && filter.matches(p)).collect();
        info!("Search matched {} properties", matched.len());
        Ok(matched)
    }

    async fn published_testimonials(&self) -> Result<Vec<Testimonial>> {
        let query = RowQuery::from_table(&self.testimonials_table)
            .eq("published", true)
            .order("display_order", Direction::Asc);
        self.fetch_rows(&query).await
    }

    fn source_name(&self) -> &'static str {
        "supabase"
    }
}
