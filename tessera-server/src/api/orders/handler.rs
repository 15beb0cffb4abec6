//! Order API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::checkout::CheckoutService;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus};
use crate::db::repository::make_thing;
use crate::utils::{AppError, AppResult};

fn checkout(state: &ServerState) -> CheckoutService {
    CheckoutService::new(state.db.clone(), state.cart.clone())
}

#[derive(Deserialize)]
pub struct StatusPayload {
    pub status: OrderStatus,
    pub note: Option<String>,
}

/// POST /api/orders - place a new pending order
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = checkout(&state).place_order(payload).await?;
    Ok(Json(order))
}

/// GET /api/orders/:id - fetch an order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let thing = make_thing("orders", &id);
    let order = checkout(&state)
        .find_order(&thing)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// GET /api/orders/number/:number - fetch an order by its human-facing number
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<String>,
) -> AppResult<Json<Order>> {
    let order = checkout(&state)
        .find_order_by_number(&number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", number)))?;
    Ok(Json(order))
}

/// POST /api/orders/:id/complete - deduct stock and mark paid
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let thing = make_thing("orders", &id);
    let order = checkout(&state).complete_order(&thing).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/status - manual status transition with history
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<Order>> {
    let thing = make_thing("orders", &id);
    let order = checkout(&state)
        .set_status(&thing, payload.status, payload.note)
        .await?;
    Ok(Json(order))
}
