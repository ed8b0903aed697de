use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Availability of a listing
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    UnderContract,
    Sold,
}

impl PropertyStatus {
    /// Statuses shown to site visitors
    pub const PUBLIC: [PropertyStatus; 2] = [PropertyStatus::Available, PropertyStatus::UnderContract];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::UnderContract => "under_contract",
            PropertyStatus::Sold => "sold",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "Available",
            PropertyStatus::UnderContract => "Under Contract",
            PropertyStatus::Sold => "Sold",
        }
    }

    pub fn is_public(&self) -> bool {
        Self::PUBLIC.contains(self)
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Admin tooling has written "Under Contract", "under-contract" and "under_contract"
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        match normalized.as_str() {
            "available" => Ok(PropertyStatus::Available),
            "under_contract" => Ok(PropertyStatus::UnderContract),
            "sold" => Ok(PropertyStatus::Sold),
            _ => Err(format!("unknown property status '{s}'")),
        }
    }
}

impl<'de> Deserialize<'de> for PropertyStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Core listing record as stored in the `properties` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: i64,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default, alias = "area", deserialize_with = "deserialize_optional_area")]
    pub square_feet: Option<u32>,
    #[serde(alias = "type")]
    pub property_type: String,
    pub status: PropertyStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default, alias = "virtualTourUrl")]
    pub virtual_tour_url: Option<String>,
    #[serde(default, alias = "videoUrl")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    pub fn is_public(&self) -> bool {
        self.status.is_public()
    }

    /// First media URL, used as the card image
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Price with thousands separators, e.g. `1,250,000`
    pub fn formatted_price(&self) -> String {
        group_thousands(self.price)
    }
}

/// Client quote shown on the testimonials page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Testimonial {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub quote: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default, deserialize_with = "optional_id_as_string")]
    pub property_id: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl Testimonial {
    /// Star count clamped to 1..=5
    pub fn stars(&self) -> u8 {
        self.rating.clamp(1, 5)
    }
}

fn default_rating() -> u8 {
    5
}

fn default_published() -> bool {
    true
}

/// Strip currency symbols and separators from a display price
pub fn parse_price(raw: &str) -> Option<i64> {
    let digits: String = raw
        .split('.')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(v) => Ok(v),
        NumberOrText::Float(v) => Ok(v.round() as i64),
        NumberOrText::Text(s) => parse_price(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid price '{s}'"))),
    }
}

fn deserialize_optional_area<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrText::Int(v)) => u32::try_from(v).ok(),
        Some(NumberOrText::Float(v)) => Some(v.round() as u32),
        Some(NumberOrText::Text(s)) => parse_price(&s).and_then(|v| u32::try_from(v).ok()),
    })
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(v) => v.to_string(),
        NumberOrText::Float(v) => v.to_string(),
        NumberOrText::Text(s) => s,
    })
}

fn optional_id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(|id| match id {
        NumberOrText::Int(v) => v.to_string(),
        NumberOrText::Float(v) => v.to_string(),
        NumberOrText::Text(s) => s,
    }))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
