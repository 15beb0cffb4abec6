//! Cart API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{session}", get(handler::get_cart))
        .route(
            "/{session}/items/{product}",
            put(handler::set_item).delete(handler::remove_item),
        )
        .route("/{session}/wishlist/{product}", post(handler::toggle_wishlist))
        .route("/{session}/wishlist/{product}/move", post(handler::move_to_cart))
}
