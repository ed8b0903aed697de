use crate::errors::Result;
use crate::listings::ListingFilter;
use crate::models::{Property, Testimonial};
use async_trait::async_trait;

/// Read access to the listing catalog and testimonials.
///
/// Implementations only read; records are authored in the external admin
/// system.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Listings visible to visitors (available or under contract)
    async fn published_properties(&self) -> Result<Vec<Property>>;

    /// Published listings flagged for the home page
    async fn featured_properties(&self) -> Result<Vec<Property>> {
        let properties = self.published_properties().await?;
        Ok(properties.into_iter().filter(|p| p.featured).collect())
    }

    /// A single listing regardless of status, `None` when no row matches
    async fn property(&self, id: &str) -> Result<Option<Property>>;

    /// Published listings matching `filter`, in source order
    async fn search_properties(&self, filter: &ListingFilter) -> Result<Vec<Property>> {
        let properties = self.published_properties().await?;
        Ok(filter.apply(&properties).into_iter().cloned().collect())
    }

    /// Published testimonials ordered for display
    async fn published_testimonials(&self) -> Result<Vec<Testimonial>>;

    /// Get the name of the backing source
    fn source_name(&self) -> &'static str;
}

#[async_trait]
impl<T: ListingSource + ?Sized> ListingSource for Box<T> {
    async fn published_properties(&self) -> Result<Vec<Property>> {
        (**self).published_properties().await
    }

    async fn featured_properties(&self) -> Result<Vec<Property>> {
        (**self).featured_properties().await
    }

    async fn property(&self, id: &str) -> Result<Option<Property>> {
        (**self).property(id).await
    }

    async fn search_properties(&self, filter: &ListingFilter) -> Result<Vec<Property>> {
        (**self).search_properties(filter).await
    }

    async fn published_testimonials(&self) -> Result<Vec<Testimonial>> {
        (**self).published_testimonials().await
    }

    fn source_name(&self) -> &'static str {
        (**self).source_name()
    }
}
