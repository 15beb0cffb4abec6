//! Catalog listing API handlers
//!
//! All three listing variants accept the same filter query parameters; the
//! category listing resolves its slug first and 404s for unknown or reserved
//! slugs. Category and clearance responses carry a shared-cache header since
//! their content changes rarely.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
};
use serde::Deserialize;

use crate::catalog::{CatalogQuery, CategoryListing, FilterSelection, Listing};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct PageParam {
    pub page: Option<usize>,
}

fn catalog(state: &ServerState) -> CatalogQuery {
    CatalogQuery::new(state.db.clone(), state.config.listing_page_size)
}

fn cache_headers(state: &ServerState) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = format!("public, s-maxage={}", state.config.listing_cache_secs).parse() {
        headers.insert(header::CACHE_CONTROL, value);
    }
    headers
}

/// GET /api/catalog/products - all-products listing
pub async fn all_products(
    State(state): State<ServerState>,
    Query(page): Query<PageParam>,
    Query(selection): Query<FilterSelection>,
) -> AppResult<Json<Listing>> {
    let listing = catalog(&state)
        .all_products_listing(selection, page.page.unwrap_or(1))
        .await?;
    Ok(Json(listing))
}

/// GET /api/catalog/clearance - clearance listing
pub async fn clearance(
    State(state): State<ServerState>,
    Query(page): Query<PageParam>,
    Query(selection): Query<FilterSelection>,
) -> AppResult<(HeaderMap, Json<Listing>)> {
    let listing = catalog(&state)
        .clearance_listing(selection, page.page.unwrap_or(1))
        .await?;
    Ok((cache_headers(&state), Json(listing)))
}

/// GET /api/catalog/c/{slug} - category listing
pub async fn category(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(selection): Query<FilterSelection>,
) -> AppResult<(HeaderMap, Json<CategoryListing>)> {
    let listing = catalog(&state)
        .category_listing(&slug, selection)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category '{}' not found", slug)))?;
    Ok((cache_headers(&state), Json(listing)))
}
