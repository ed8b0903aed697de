use crate::errors::Result;
use crate::models::{Property, Testimonial};
use crate::sources::traits::ListingSource;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// On-disk catalog layout: `{"properties": [...], "testimonials": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

/// Serves a catalog held in memory, loaded from a JSON file for local development
pub struct FixtureSource {
    catalog: Catalog,
}

impl FixtureSource {
    pub fn new(properties: Vec<Property>, testimonials: Vec<Testimonial>) -> Self {
        Self {
            catalog: Catalog {
                properties,
                testimonials,
            },
        }
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog fixture {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog fixture {}", path.display()))?;

        info!(
            "📋 Loaded {} properties and {} testimonials from {}",
            catalog.properties.len(),
            catalog.testimonials.len(),
            path.display()
        );
        Ok(Self { catalog })
    }
}

#[async_trait]
impl ListingSource for FixtureSource {
    async fn published_properties(&self) -> Result<Vec<Property>> {
        Ok(self.catalog.properties.iter().filter(|p| p.is_public()).cloned().collect())
    }

    async fn property(&self, id: &str) -> Result<Option<Property>> {
        Ok(self.catalog.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn published_testimonials(&self) -> Result<Vec<Testimonial>> {
        let mut testimonials: Vec<Testimonial> =
            self.catalog.testimonials.iter().filter(|t| t.published).cloned().collect();
        testimonials.sort_by_key(|t| t.display_order);
        Ok(testimonials)
    }

    fn source_name(&self) -> &'static str {
        "fixture"
    }
}
