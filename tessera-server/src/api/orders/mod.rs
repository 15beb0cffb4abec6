//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place))
        // Customer-facing lookup (must be before /{id} to avoid path conflicts)
        .route("/number/{number}", get(handler::get_by_number))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/complete", post(handler::complete))
        .route("/{id}/status", put(handler::set_status))
}
