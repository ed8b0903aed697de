//! Server-rendered pages of the public site.

pub mod pages;
pub mod routes;
pub mod views;

pub use routes::{NavLink, Route};

use crate::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/properties", get(pages::properties))
        .route("/properties/{id}", get(pages::property_detail))
        .route("/testimonials", get(pages::testimonials))
        .route("/contact", get(pages::contact).post(pages::submit_contact))
        .route("/admin", get(pages::admin))
        .route("/admin/{*rest}", get(pages::admin))
}
