use crate::errors::{Error, Result};
use crate::listings::{paginate, ListingFilter, Page};
use crate::models::{Property, Testimonial};
use crate::site::pages::PageQuery;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "source": state.source.source_name() }))
}

pub async fn list_properties(
    State(state): State<AppState>,
    filter: std::result::Result<Query<ListingFilter>, QueryRejection>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<Page<Property>>> {
    let Query(filter) = filter.map_err(|rejection| Error::BadRequest {
        message: rejection.body_text(),
    })?;
    let matches = state.source.search_properties(&filter).await?;
    Ok(Json(paginate(&matches, paging.number())))
}

pub async fn featured_properties(State(state): State<AppState>) -> Result<Json<Vec<Property>>> {
    Ok(Json(state.source.featured_properties().await?))
}

pub async fn get_property(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Property>> {
    match state.source.property(&id).await? {
        Some(property) => Ok(Json(property)),
        None => Err(Error::NotFound {
            resource: "Property".to_string(),
            id,
        }),
    }
}

pub async fn list_testimonials(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>> {
    Ok(Json(state.source.published_testimonials().await?))
}
