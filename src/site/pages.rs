use super::routes::Route;
use super::views::{GalleryView, PageLink, PropertyCard, PropertyDetailView, TestimonialView};
use crate::contact::{ContactForm, BUDGET_RANGES, COUNTRY_CODES, INQUIRY_PROPERTY_TYPES};
use crate::errors::Result;
use crate::gallery::{Gallery, Key};
use crate::listings::{paginate, ListingFilter, PROPERTY_TYPES};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use minijinja::{context, Value};
use serde::Deserialize;
use tracing::{debug, error, info};

const SEND_FAILED: &str = "Failed to send message. Please try again later.";
const INVALID_FILTER: &str = "Some filter values were not understood, so all properties are shown.";
const SENT: &str = "Thank you for your message! We will get back to you soon.";

fn load_failed(what: &str) -> String {
    format!("Failed to load {what}. Please try again later.")
}

/// Render `template` inside the site shell for `route`
fn render_page(state: &AppState, route: &Route, template: &str, ctx: Value) -> Result<Html<String>> {
    let site = context! {
        brand => &state.config.brand_name,
        title => route.label(),
        nav => route.nav_links(),
    };
    state
        .templates
        .render(template, context! { site => site, ..ctx })
        .map(Html)
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let (featured, load_error): (Vec<PropertyCard>, Option<String>) = match state.source.featured_properties().await {
        Ok(properties) => (properties.iter().map(PropertyCard::from).collect(), None),
        Err(e) => {
            error!("Failed to load featured properties: {}", e);
            (Vec::new(), Some(load_failed("featured properties")))
        }
    };

    render_page(
        &state,
        &Route::Home,
        "home.html",
        context! { featured => featured, load_error => load_error },
    )
}

pub async fn about(State(state): State<AppState>) -> Result<Html<String>> {
    render_page(&state, &Route::About, "about.html", context! {})
}

pub async fn services(State(state): State<AppState>) -> Result<Html<String>> {
    render_page(&state, &Route::Services, "services.html", context! {})
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    /// Requested page; anything unparsable is page 1
    pub fn number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(1)
    }
}

pub async fn properties(
    State(state): State<AppState>,
    filter: std::result::Result<Query<ListingFilter>, QueryRejection>,
    Query(paging): Query<PageQuery>,
) -> Result<Html<String>> {
    let (filter, invalid_filter) = match filter {
        Ok(Query(filter)) => (filter, None),
        Err(rejection) => {
            debug!("Ignoring malformed catalog filter: {}", rejection.body_text());
            (ListingFilter::reset(), Some(INVALID_FILTER))
        }
    };

    let (page, load_error) = match state.source.search_properties(&filter).await {
        Ok(matches) => (Some(paginate(&matches, paging.number()).map(|p| PropertyCard::from(&p))), None),
        Err(e) => {
            error!("Failed to load properties: {}", e);
            (None, Some(load_failed("properties")))
        }
    };

    let links: Vec<PageLink> = page
        .as_ref()
        .map(|page| {
            (1..=page.total_pages)
                .map(|number| PageLink {
                    number,
                    query: filter.to_query(number),
                    current: number == page.page,
                })
                .collect()
        })
        .unwrap_or_default();
    let previous = page
        .as_ref()
        .filter(|p| p.has_previous())
        .map(|p| filter.to_query(p.page - 1));
    let next = page.as_ref().filter(|p| p.has_next()).map(|p| filter.to_query(p.page + 1));

    render_page(
        &state,
        &Route::Properties,
        "properties.html",
        context! {
            criteria => &filter,
            filter_active => filter.is_active(),
            property_types => PROPERTY_TYPES,
            results => page,
            pages => links,
            previous => previous,
            next => next,
            load_error => load_error,
            invalid_filter => invalid_filter,
        },
    )
}

/// Viewer state carried in the detail page URL: the shown item, plus one
/// action to apply to it (`key` as a DOM key name, `play` to toggle a video)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MediaQuery {
    media: Option<String>,
    key: Option<String>,
    play: Option<String>,
}

impl MediaQuery {
    fn gallery(&self, media: Vec<String>) -> Gallery {
        let mut gallery = Gallery::open(media, 0);
        if let Some(index) = self.media.as_deref().and_then(|raw| raw.trim().parse().ok()) {
            gallery.select(index);
        }

        if let Some(key) = self.key.as_deref() {
            gallery.handle_key(Key::from_dom(key));
        }
        if self.play.is_some() {
            gallery.toggle_video();
        }
        gallery
    }
}

pub async fn property_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MediaQuery>,
) -> Result<(StatusCode, Html<String>)> {
    let route = Route::PropertyDetail(id.clone());

    let property = match state.source.property(&id).await {
        Ok(Some(property)) => property,
        Ok(None) => {
            let html = render_page(&state, &route, "property_missing.html", context! { id => &id })?;
            return Ok((StatusCode::NOT_FOUND, html));
        }
        Err(e) => {
            error!("Failed to load property {}: {}", id, e);
            let html = render_page(
                &state,
                &route,
                "property_missing.html",
                context! { id => &id, load_error => load_failed("property") },
            )?;
            return Ok((StatusCode::BAD_GATEWAY, html));
        }
    };

    let gallery = query.gallery(property.images.clone());

    let html = render_page(
        &state,
        &route,
        "property_detail.html",
        context! {
            property => PropertyDetailView::from(&property),
            gallery => GalleryView::from(&gallery),
        },
    )?;
    Ok((StatusCode::OK, html))
}

pub async fn testimonials(State(state): State<AppState>) -> Result<Html<String>> {
    let (testimonials, load_error): (Vec<TestimonialView>, Option<String>) = match state.source.published_testimonials().await {
        Ok(list) => (list.iter().map(TestimonialView::from).collect(), None),
        Err(e) => {
            error!("Failed to load testimonials: {}", e);
            (Vec::new(), Some(load_failed("testimonials")))
        }
    };

    render_page(
        &state,
        &Route::Testimonials,
        "testimonials.html",
        context! { testimonials => testimonials, load_error => load_error },
    )
}

fn contact_page(state: &AppState, form: &ContactForm, notice: Option<&str>, failure: Option<&str>) -> Result<Html<String>> {
    render_page(
        state,
        &Route::Contact,
        "contact.html",
        context! {
            form => form,
            country_codes => COUNTRY_CODES,
            property_types => INQUIRY_PROPERTY_TYPES,
            budget_ranges => BUDGET_RANGES,
            support_email => &state.config.email.support_email,
            notice => notice,
            failure => failure,
        },
    )
}

pub async fn contact(State(state): State<AppState>) -> Result<Html<String>> {
    let form = ContactForm::with_country_code(&state.config.contact.default_country_code);
    contact_page(&state, &form, None, None)
}

/// Forward the submission through the configured relay exactly once
pub async fn submit_contact(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Result<Html<String>> {
    let inquiry = form.clone().into_inquiry();

    match state.relay.relay(&inquiry).await {
        Ok(()) => {
            info!("Contact form submitted");
            let cleared = ContactForm::with_country_code(&state.config.contact.default_country_code);
            contact_page(&state, &cleared, Some(SENT), None)
        }
        Err(e) => {
            e.log();
            contact_page(&state, &form, None, Some(SEND_FAILED))
        }
    }
}

pub async fn admin(State(state): State<AppState>) -> Result<Html<String>> {
    render_page(&state, &Route::Admin, "admin.html", context! {})
}

/// Fallback for unmatched paths. Paths that resolve to a page under another
/// spelling (e.g. a trailing slash) redirect to the canonical path.
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let route = Route::resolve(uri.path());
    if route != Route::NotFound && route.path() != uri.path() {
        return Ok(Redirect::permanent(&route.path()).into_response());
    }

    let html = render_page(&state, &Route::NotFound, "not_found.html", context! { path => uri.path() })?;
    Ok((StatusCode::NOT_FOUND, html).into_response())
}

#[cfg(test)]
mod tests {
    use crate::listings::test_fixtures::catalog;
    use crate::models::Testimonial;
    use crate::test_utils::{build_state, test_server, FailingSource, RecordingRelay};
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn testimonial(id: &str, name: &str, order: i32) -> Testimonial {
        Testimonial {
            id: id.into(),
            name: name.into(),
            role: "Homeowner".into(),
            company: String::new(),
            photo: None,
            quote: format!("{name} loved the service"),
            rating: 5,
            property_id: None,
            published: true,
            display_order: order,
        }
    }

    #[tokio::test]
    async fn test_home_shows_featured_listings() {
        let (server, _) = test_server(catalog(), vec![]);
        let response = server.get("/").await;
        response.assert_status_ok();

        let html = response.text();
        assert!(html.contains("Lekki Penthouse"));
        assert!(html.contains("Banana Island Villa"));
        assert!(!html.contains("Maitama Mansion"));
    }

    #[tokio::test]
    async fn test_catalog_paginates_nine_per_page() {
        let (server, _) = test_server(catalog(), vec![]);

        let first = server.get("/properties").await.text();
        assert!(first.contains("Lekki Penthouse"));
        assert!(!first.contains("Old Ikoyi Estate"));
        assert!(first.contains("Page 1 of 2"));

        let last = server.get("/properties").add_query_param("page", "99").await.text();
        assert!(last.contains("Old Ikoyi Estate"));
        assert!(last.contains("Page 2 of 2"));
    }

    #[tokio::test]
    async fn test_catalog_filter_and_empty_result() {
        let (server, _) = test_server(catalog(), vec![]);

        let villas = server
            .get("/properties")
            .add_query_param("type", "villa")
            .add_query_param("min_price", "")
            .await
            .text();
        assert!(villas.contains("Banana Island Villa"));
        assert!(!villas.contains("Lekki Penthouse"));

        let none = server.get("/properties").add_query_param("search", "igloo").await.text();
        assert!(none.contains("No properties match your filters"));
    }

    #[tokio::test]
    async fn test_malformed_filter_renders_catalog_with_banner() {
        let (server, _) = test_server(catalog(), vec![]);

        let response = server.get("/properties").add_query_param("min_price", "cheap").await;
        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Some filter values were not understood"));
        assert!(html.contains("Lekki Penthouse"));

        let response = server.get("/properties").add_query_param("min_bedrooms", "-2").await;
        response.assert_status_ok();
        assert!(response.text().contains("Some filter values were not understood"));
    }

    #[tokio::test]
    async fn test_status_selector_filters_and_stays_selected() {
        let (server, _) = test_server(catalog(), vec![]);

        let html = server
            .get("/properties")
            .add_query_param("status", "under_contract")
            .await
            .text();
        assert!(html.contains("<option value=\"under_contract\" selected>"));
        assert!(html.contains("GRA Villa"));
        assert!(html.contains("Lekki Waterfront Villa"));
        assert!(!html.contains("Lekki Penthouse"));
    }

    #[tokio::test]
    async fn test_detail_page_and_missing_listing() {
        let mut properties = catalog();
        properties[0].images = vec!["https://cdn.test/a.jpg".into(), "https://cdn.test/tour.mp4".into()];
        let (server, _) = test_server(properties, vec![]);

        let detail = server.get("/properties/1").add_query_param("media", "1").await;
        detail.assert_status_ok();
        let html = detail.text();
        assert!(html.contains("Lekki Penthouse"));
        assert!(html.contains("2 / 2"));
        assert!(html.contains("<video"));

        let missing = server.get("/properties/nope").await;
        missing.assert_status(StatusCode::NOT_FOUND);
        assert!(missing.text().contains("Property not found"));
    }

    #[tokio::test]
    async fn test_gallery_keys_wrap_and_close() {
        let mut properties = catalog();
        properties[0].images = vec![
            "https://cdn.test/a.jpg".into(),
            "https://cdn.test/b.jpg".into(),
            "https://cdn.test/tour.mp4".into(),
        ];
        let (server, _) = test_server(properties, vec![]);
        let detail = |media: &'static str, key: &'static str| {
            server
                .get("/properties/1")
                .add_query_param("media", media)
                .add_query_param("key", key)
        };

        assert!(detail("2", "ArrowRight").await.text().contains("1 / 3"));
        assert!(detail("0", "ArrowLeft").await.text().contains("3 / 3"));
        assert!(detail("1", "Enter").await.text().contains("2 / 3"));

        let closed = detail("1", "Escape").await.text();
        assert!(closed.contains("Gallery closed"));
        assert!(!closed.contains("2 / 3"));

        let out_of_range = server.get("/properties/1").add_query_param("media", "99").await.text();
        assert!(out_of_range.contains("1 / 3"));
    }

    #[tokio::test]
    async fn test_gallery_play_toggles_only_videos() {
        let mut properties = catalog();
        properties[0].images = vec!["https://cdn.test/a.jpg".into(), "https://cdn.test/tour.mp4".into()];
        let (server, _) = test_server(properties, vec![]);

        let video = server
            .get("/properties/1")
            .add_query_param("media", "1")
            .add_query_param("play", "1")
            .await
            .text();
        assert!(video.contains("autoplay"));
        assert!(video.contains("Pause video"));

        let image = server
            .get("/properties/1")
            .add_query_param("media", "0")
            .add_query_param("play", "1")
            .await
            .text();
        assert!(!image.contains("autoplay"));
    }

    #[tokio::test]
    async fn test_testimonials_page_lists_published() {
        let (server, _) = test_server(vec![], vec![testimonial("t1", "Chidi Eze", 1)]);
        let html = server.get("/testimonials").await.text();
        assert!(html.contains("Chidi Eze"));
        assert!(html.contains("Chidi Eze loved the service"));
    }

    #[tokio::test]
    async fn test_read_failure_renders_generic_message() {
        let state = build_state(Arc::new(FailingSource), Arc::new(RecordingRelay::default()));
        let server = axum_test::TestServer::new(crate::build_router(state)).unwrap();

        let html = server.get("/").await.text();
        assert!(html.contains("Failed to load featured properties. Please try again later."));

        let html = server.get("/testimonials").await.text();
        assert!(html.contains("Failed to load testimonials. Please try again later."));
    }

    #[tokio::test]
    async fn test_contact_form_relays_once_with_dialing_code() {
        let (server, relay) = test_server(vec![], vec![]);

        let page = server.get("/contact").await.text();
        assert!(page.contains("value=\"+234\" selected"));

        let response = server
            .post("/contact")
            .form(&[
                ("name", "Ada Obi"),
                ("email", "ada@example.com"),
                ("phone", "8035550101"),
                ("country_code", "+44"),
                ("subject", "Viewing"),
                ("message", "Is Saturday possible?"),
                ("property_type", ""),
                ("budget", ""),
            ])
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("Thank you for your message"));

        let calls = relay.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].phone, "+44 8035550101");
        assert_eq!(calls[0].property_type, None);
    }

    #[tokio::test]
    async fn test_contact_failure_keeps_input_and_shows_banner() {
        let relay = Arc::new(RecordingRelay::failing());
        let state = build_state(Arc::new(crate::sources::FixtureSource::new(vec![], vec![])), relay.clone());
        let server = axum_test::TestServer::new(crate::build_router(state)).unwrap();

        let html = server
            .post("/contact")
            .form(&[("name", "Ada Obi"), ("email", "ada@example.com"), ("subject", "Hi"), ("message", "Hello")])
            .await
            .text();
        assert!(html.contains("Failed to send message"));
        assert!(html.contains("value=\"Ada Obi\""));
        assert_eq!(relay.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found_and_admin_is_stubbed() {
        let (server, _) = test_server(vec![], vec![]);

        let missing = server.get("/blog/post").await;
        missing.assert_status(StatusCode::NOT_FOUND);
        assert!(missing.text().contains("Page not found"));

        server.get("/admin/properties").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_trailing_slash_redirects_to_canonical_page() {
        let (server, _) = test_server(catalog(), vec![]);

        let response = server.get("/about/").await;
        response.assert_status(StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.header("location"), "/about");

        let response = server.get("/properties/3/").await;
        response.assert_status(StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.header("location"), "/properties/3");
    }
}
