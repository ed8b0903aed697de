use crate::gallery::{Gallery, MediaKind, Thumbnail};
use crate::models::{Property, Testimonial};
use serde::Serialize;

/// Listing summary shown in grids
#[derive(Debug, Clone, Serialize)]
pub struct PropertyCard {
    pub id: String,
    pub title: String,
    pub location: String,
    pub price: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub square_feet: Option<u32>,
    pub property_type: String,
    pub status: &'static str,
    pub featured: bool,
    pub cover: Option<String>,
    pub cover_is_video: bool,
}

impl From<&Property> for PropertyCard {
    fn from(p: &Property) -> Self {
        let cover = p.cover_image().map(str::to_string);
        let cover_is_video = cover.as_deref().is_some_and(|url| MediaKind::of(url) == MediaKind::Video);
        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            location: p.location.clone(),
            price: p.formatted_price(),
            bedrooms: p.bedrooms,
            bathrooms: p.bathrooms,
            square_feet: p.square_feet,
            property_type: p.property_type.clone(),
            status: p.status.label(),
            featured: p.featured,
            cover,
            cover_is_video,
        }
    }
}

/// Media viewer rendered on the detail page
#[derive(Debug, Clone, Serialize)]
pub struct GalleryView {
    pub open: bool,
    pub index: usize,
    pub playing: bool,
    pub current: Option<String>,
    pub kind: Option<MediaKind>,
    pub position: usize,
    pub count: usize,
    pub has_video: bool,
    pub thumbnails: Vec<Thumbnail>,
}

impl From<&Gallery> for GalleryView {
    fn from(g: &Gallery) -> Self {
        Self {
            open: g.is_open(),
            index: g.current_index(),
            playing: g.is_video_playing(),
            current: g.current().map(str::to_string),
            kind: g.current_kind(),
            position: g.current_index() + 1,
            count: g.len(),
            has_video: g.has_video(),
            thumbnails: g.thumbnails(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyDetailView {
    pub card: PropertyCard,
    pub description: String,
    pub amenities: Vec<String>,
    pub features: Vec<String>,
    pub year_built: Option<i32>,
    pub virtual_tour_url: Option<String>,
    pub video_url: Option<String>,
    pub sold: bool,
}

impl From<&Property> for PropertyDetailView {
    fn from(p: &Property) -> Self {
        Self {
            card: PropertyCard::from(p),
            description: p.description.clone(),
            amenities: p.amenities.clone().unwrap_or_default(),
            features: p.features.clone().unwrap_or_default(),
            year_built: p.year_built,
            virtual_tour_url: p.virtual_tour_url.clone(),
            video_url: p.video_url.clone(),
            sold: !p.is_public(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestimonialView {
    pub name: String,
    pub role: String,
    pub company: String,
    pub photo: Option<String>,
    pub quote: String,
    pub stars: u8,
    pub property_id: Option<String>,
}

impl From<&Testimonial> for TestimonialView {
    fn from(t: &Testimonial) -> Self {
        Self {
            name: t.name.clone(),
            role: t.role.clone(),
            company: t.company.clone(),
            photo: t.photo.clone(),
            quote: t.quote.clone(),
            stars: t.stars(),
            property_id: t.property_id.clone(),
        }
    }
}

/// Numbered link in the catalog pager
#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub query: String,
    pub current: bool,
}
