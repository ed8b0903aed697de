use crate::errors::Result;
use crate::listings::ListingFilter;
use crate::models::{Property, Testimonial};
use crate::sources::traits::ListingSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

struct Entry<T> {
    value: T,
    fetched_at: Instant,
}

/// Keyed payloads that are served without refetching until they reach `ttl`.
///
/// A failed refresh falls back to the expired payload when one exists.
pub struct TtlCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let now = Instant::now();

        let stale = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if now.duration_since(entry.fetched_at) < self.ttl => {
                    debug!("Cache hit for '{}'", key);
                    return Ok(entry.value.clone());
                }
                Some(entry) => Some(entry.value.clone()),
                None => None,
            }
        };

        match fetch().await {
            Ok(value) => {
                let mut entries = self.entries.write().await;
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: value.clone(),
                        fetched_at: now,
                    },
                );
                Ok(value)
            }
            Err(err) => match stale {
                Some(value) => {
                    warn!("Refreshing '{}' failed, serving stale copy: {}", key, err);
                    Ok(value)
                }
                None => Err(err),
            },
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// [`ListingSource`] decorator that keeps fetched collections for a fixed TTL.
///
/// Only the two collections are cached, so the key space is fixed. Single
/// listings are answered from the cached collection; ids outside it (sold
/// listings, unknown ids) go to the inner source uncached.
pub struct CachedSource<S> {
    inner: S,
    properties: TtlCache<Vec<Property>>,
    testimonials: TtlCache<Vec<Testimonial>>,
}

impl<S: ListingSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            properties: TtlCache::new(ttl),
            testimonials: TtlCache::new(ttl),
        }
    }

    /// Drop every cached payload
    pub async fn clear(&self) {
        self.properties.clear().await;
        self.testimonials.clear().await;
    }
}

#[async_trait]
impl<S: ListingSource> ListingSource for CachedSource<S> {
    async fn published_properties(&self) -> Result<Vec<Property>> {
        self.properties
            .get_or_fetch("properties", || self.inner.published_properties())
            .await
    }

    async fn property(&self, id: &str) -> Result<Option<Property>> {
        let properties = self.published_properties().await?;
        if let Some(property) = properties.into_iter().find(|p| p.id == id) {
            return Ok(Some(property));
        }
        self.inner.property(id).await
    }

    async fn search_properties(&self, filter: &ListingFilter) -> Result<Vec<Property>> {
        let properties = self.published_properties().await?;
        Ok(filter.apply(&properties).into_iter().cloned().collect())
    }

    async fn published_testimonials(&self) -> Result<Vec<Testimonial>> {
        self.testimonials
            .get_or_fetch("testimonials", || self.inner.published_testimonials())
            .await
    }

    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }
}
