//! JSON endpoints: read-only listing data and the contact relay function.

pub mod contact;
pub mod listings;

use crate::AppState;
use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Headers browsers send when calling the relay function cross-origin
fn function_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ])
}

pub fn router() -> Router<AppState> {
    let function = Router::new()
        .route("/functions/v1/send-contact-email", post(contact::send_contact_email))
        .layer(function_cors());

    Router::new()
        .route("/healthz", get(listings::health))
        .route("/api/properties", get(listings::list_properties))
        .route("/api/properties/featured", get(listings::featured_properties))
        .route("/api/properties/{id}", get(listings::get_property))
        .route("/api/testimonials", get(listings::list_testimonials))
        .merge(function)
}
