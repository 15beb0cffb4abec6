//! Catalog listing API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/catalog", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/products", get(handler::all_products))
        .route("/clearance", get(handler::clearance))
        .route("/c/{slug}", get(handler::category))
}
