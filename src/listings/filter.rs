use crate::models::{Property, PropertyStatus};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type tags offered in the catalog's type selector
pub const PROPERTY_TYPES: [&str; 6] = ["penthouse", "villa", "mansion", "estate", "apartment", "duplex"];

/// Visitor-controlled predicates over the listing catalog.
///
/// Parsed straight from the `/properties` query string, so every field
/// tolerates the empty values an HTML form submits for untouched inputs.
/// A record is kept only when it satisfies every active predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
    /// Case-insensitive substring over title, location and description
    #[serde(deserialize_with = "non_empty")]
    pub search: Option<String>,
    /// Exact type tag; `all` means no constraint
    #[serde(rename = "type", deserialize_with = "type_tag")]
    pub property_type: Option<String>,
    #[serde(deserialize_with = "parsed")]
    pub min_bedrooms: Option<u32>,
    #[serde(deserialize_with = "parsed")]
    pub min_bathrooms: Option<u32>,
    #[serde(deserialize_with = "parsed")]
    pub min_price: Option<i64>,
    #[serde(deserialize_with = "parsed")]
    pub max_price: Option<i64>,
    #[serde(rename = "featured", deserialize_with = "checkbox")]
    pub featured_only: bool,
    #[serde(deserialize_with = "status")]
    pub status: Option<PropertyStatus>,
}

impl ListingFilter {
    /// Cleared filter state
    pub fn reset() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    pub fn matches(&self, property: &Property) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = property.title.to_lowercase().contains(&term)
                || property.location.to_lowercase().contains(&term)
                || property.description.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(tag) = &self.property_type {
            if !property.property_type.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if self.min_bedrooms.is_some_and(|min| property.bedrooms < min) {
            return false;
        }

        if self.min_bathrooms.is_some_and(|min| property.bathrooms < min) {
            return false;
        }

        if self.min_price.is_some_and(|min| property.price < min) {
            return false;
        }

        if self.max_price.is_some_and(|max| property.price > max) {
            return false;
        }

        if self.featured_only && !property.featured {
            return false;
        }

        if self.status.is_some_and(|status| property.status != status) {
            return false;
        }

        true
    }

    /// Matching records in their original order
    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        properties.iter().filter(|p| self.matches(p)).collect()
    }

    /// Query string for this filter plus a page number, without the leading `?`
    pub fn to_query(&self, page: usize) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(tag) = &self.property_type {
            pairs.push(("type", tag.clone()));
        }
        if let Some(v) = self.min_bedrooms {
            pairs.push(("min_bedrooms", v.to_string()));
        }
        if let Some(v) = self.min_bathrooms {
            pairs.push(("min_bathrooms", v.to_string()));
        }
        if let Some(v) = self.min_price {
            pairs.push(("min_price", v.to_string()));
        }
        if let Some(v) = self.max_price {
            pairs.push(("max_price", v.to_string()));
        }
        if self.featured_only {
            pairs.push(("featured", "true".to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if page > 1 {
            pairs.push(("page", page.to_string()));
        }

        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

fn type_tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(non_empty(deserializer)?.filter(|tag| !tag.eq_ignore_ascii_case("all")))
}

fn parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match non_empty(deserializer)? {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(
        non_empty(deserializer)?.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "on" | "1" | "yes")
    ))
}

fn status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PropertyStatus>, D::Error> {
    match non_empty(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::test_fixtures::catalog;

    fn parse(query: &str) -> ListingFilter {
        serde_urlencoded::from_str(query).unwrap()
    }

    #[test]
    fn test_empty_filter_keeps_everything_in_order() {
        let properties = catalog();
        let kept = ListingFilter::default().apply(&properties);
        let ids: Vec<&str> = kept.iter().map(|p| p.id.as_str()).collect();
        let expected: Vec<&str> = properties.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_search_covers_title_location_and_description() {
        let properties = catalog();

        let by_title = ListingFilter {
            search: Some("PENTHOUSE".into()),
            ..Default::default()
        };
        assert!(by_title.apply(&properties).iter().all(|p| p.title.contains("Penthouse")));
        assert!(!by_title.apply(&properties).is_empty());

        let by_location = ListingFilter {
            search: Some("ikoyi".into()),
            ..Default::default()
        };
        assert!(by_location
            .apply(&properties)
            .iter()
            .all(|p| p.location.contains("Ikoyi")));

        let by_description = ListingFilter {
            search: Some("private jetty".into()),
            ..Default::default()
        };
        assert_eq!(by_description.apply(&properties).len(), 1);
    }

    #[test]
    fn test_unmatched_search_yields_empty_result() {
        let properties = catalog();
        let filter = ListingFilter {
            search: Some("igloo".into()),
            ..Default::default()
        };
        assert!(filter.apply(&properties).is_empty());
    }

    #[test]
    fn test_featured_only_never_returns_unfeatured() {
        let properties = catalog();
        let filter = ListingFilter {
            featured_only: true,
            ..Default::default()
        };
        let kept = filter.apply(&properties);
        assert!(!kept.is_empty());
        assert!(kept.iter().all(|p| p.featured));
    }

    #[test]
    fn test_numeric_bounds_are_inclusive() {
        let properties = catalog();
        let filter = ListingFilter {
            min_bedrooms: Some(4),
            min_bathrooms: Some(4),
            min_price: Some(300_000_000),
            max_price: Some(900_000_000),
            ..Default::default()
        };
        for p in filter.apply(&properties) {
            assert!(p.bedrooms >= 4 && p.bathrooms >= 4);
            assert!((300_000_000..=900_000_000).contains(&p.price));
        }

        let exact = ListingFilter {
            min_price: Some(properties[0].price),
            max_price: Some(properties[0].price),
            ..Default::default()
        };
        assert!(exact.apply(&properties).iter().any(|p| p.id == properties[0].id));
    }

    #[test]
    fn test_every_predicate_must_hold() {
        let properties = catalog();
        let filter = ListingFilter {
            property_type: Some("villa".into()),
            status: Some(PropertyStatus::UnderContract),
            ..Default::default()
        };
        for p in filter.apply(&properties) {
            assert_eq!(p.property_type, "villa");
            assert_eq!(p.status, PropertyStatus::UnderContract);
        }
    }

    #[test]
    fn test_reset_restores_unfiltered_catalog() {
        let properties = catalog();
        let filter = ListingFilter {
            search: Some("lekki".into()),
            featured_only: true,
            ..Default::default()
        };
        assert!(filter.is_active());
        assert!(filter.apply(&properties).len() < properties.len());

        let cleared = ListingFilter::reset();
        assert!(!cleared.is_active());
        assert_eq!(cleared.apply(&properties).len(), properties.len());
    }

    #[test]
    fn test_query_string_tolerates_blank_form_fields() {
        let filter = parse("search=&type=all&min_bedrooms=&max_price=&status=all");
        assert_eq!(filter, ListingFilter::default());

        let filter = parse("search=+Lekki+&type=villa&min_bedrooms=3&featured=on&status=under_contract");
        assert_eq!(filter.search.as_deref(), Some("Lekki"));
        assert_eq!(filter.property_type.as_deref(), Some("villa"));
        assert_eq!(filter.min_bedrooms, Some(3));
        assert!(filter.featured_only);
        assert_eq!(filter.status, Some(PropertyStatus::UnderContract));
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        assert!(serde_urlencoded::from_str::<ListingFilter>("min_price=cheap").is_err());
    }

    #[test]
    fn test_to_query_round_trips_through_parser() {
        let filter = ListingFilter {
            search: Some("ocean view".into()),
            min_bathrooms: Some(2),
            featured_only: true,
            ..Default::default()
        };
        let query = filter.to_query(3);
        assert!(query.contains("page=3"));
        assert_eq!(parse(&query), filter);
        assert!(!filter.to_query(1).contains("page="));
    }
}
