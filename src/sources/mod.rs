pub mod cached;
pub mod fixture;
pub mod query;
pub mod supabase;
pub mod traits;

pub use cached::{CachedSource, TtlCache};
pub use fixture::FixtureSource;
pub use supabase::SupabaseSource;
pub use traits::ListingSource;

use crate::config::{Config, DataSourceConfig};
use std::sync::Arc;
use tracing::info;

/// Build the configured source, wrapped in the TTL cache when enabled
pub async fn from_config(config: &Config) -> anyhow::Result<Arc<dyn ListingSource>> {
    let source: Box<dyn ListingSource> = match &config.data_source {
        DataSourceConfig::Supabase {
            url,
            anon_key,
            properties_table,
            testimonials_table,
        } => Box::new(
            SupabaseSource::new(url, anon_key, config.http_timeout)?.with_tables(properties_table, testimonials_table),
        ),
        DataSourceConfig::Fixture { path } => Box::new(FixtureSource::load(path).await?),
    };

    info!("Listing source: {}", source.source_name());

    if config.cache.enabled {
        info!("Caching listing reads for {:?}", config.cache.ttl);
        Ok(Arc::new(CachedSource::new(source, config.cache.ttl)))
    } else {
        Ok(Arc::from(source))
    }
}
