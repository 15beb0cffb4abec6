//! Cart API handlers
//!
//! The session id in the path is the browser-held cart session; there is no
//! account linkage. Responses always include the fresh header counts so the
//! client can update its badges without a second request.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::cart::{CartCounts, CartLine};
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub wishlist: Vec<String>,
    pub counts: CartCounts,
}

#[derive(Deserialize)]
pub struct SetItemPayload {
    pub quantity: u32,
    pub unit_price: Option<f64>,
}

#[derive(Serialize)]
pub struct WishlistToggleResponse {
    pub listed: bool,
    pub counts: CartCounts,
}

/// GET /api/cart/:session - full cart and wishlist state
pub async fn get_cart(
    State(state): State<ServerState>,
    Path(session): Path<String>,
) -> AppResult<Json<CartView>> {
    let lines = state.cart.cart_lines(&session)?;
    let wishlist = state.cart.wishlist(&session)?;
    let counts = state.cart.counts(&session)?;
    Ok(Json(CartView {
        lines,
        wishlist,
        counts,
    }))
}

/// PUT /api/cart/:session/items/:product - set a line quantity (0 removes)
pub async fn set_item(
    State(state): State<ServerState>,
    Path((session, product)): Path<(String, String)>,
    Json(payload): Json<SetItemPayload>,
) -> AppResult<Json<CartCounts>> {
    let counts =
        state
            .cart
            .set_cart_line(&session, &product, payload.quantity, payload.unit_price)?;
    Ok(Json(counts))
}

/// DELETE /api/cart/:session/items/:product - remove a line
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((session, product)): Path<(String, String)>,
) -> AppResult<Json<CartCounts>> {
    Ok(Json(state.cart.remove_cart_line(&session, &product)?))
}

/// POST /api/cart/:session/wishlist/:product - toggle a wishlist entry
pub async fn toggle_wishlist(
    State(state): State<ServerState>,
    Path((session, product)): Path<(String, String)>,
) -> AppResult<Json<WishlistToggleResponse>> {
    let listed = state.cart.toggle_wishlist(&session, &product)?;
    let counts = state.cart.counts(&session)?;
    Ok(Json(WishlistToggleResponse { listed, counts }))
}

/// POST /api/cart/:session/wishlist/:product/move - move wishlist entry to cart
pub async fn move_to_cart(
    State(state): State<ServerState>,
    Path((session, product)): Path<(String, String)>,
) -> AppResult<Json<CartLine>> {
    let line = state.cart.move_to_cart(&session, &product, None)?;
    Ok(Json(line))
}
