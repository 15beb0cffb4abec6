//! Checkout Module - order placement and completion
//!
//! Placement validates the payload and the client-computed total, then
//! persists a pending order. Completion deducts stock with a conditional
//! per-product decrement; a failed decrement is recorded on the order as a
//! stock shortfall instead of blocking completion.

pub mod money;

use crate::cart::CartStore;
use crate::db::models::{Order, OrderCreate, OrderStatus, StatusChange, StockShortfall};
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::utils::error::{AppError, AppResult};
use rust_decimal::prelude::ToPrimitive;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use uuid::Uuid;
use validator::Validate;

/// Order placement and completion
#[derive(Clone)]
pub struct CheckoutService {
    orders: OrderRepository,
    products: ProductRepository,
    cart: CartStore,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>, cart: CartStore) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db),
            cart,
        }
    }

    /// Validate and persist a new pending order
    pub async fn place_order(&self, payload: OrderCreate) -> AppResult<Order> {
        payload
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let line_amounts: Vec<(f64, i64)> = payload
            .lines
            .iter()
            .map(|l| (l.unit_price, l.quantity))
            .collect();
        let total = money::verify_total(&line_amounts, payload.total)?;

        let order = Order {
            id: None,
            number: generate_order_number(),
            session: payload.session,
            lines: payload.lines,
            total: total.to_f64().unwrap_or(payload.total),
            status: OrderStatus::Pending,
            status_history: vec![StatusChange::now(OrderStatus::Pending, None)],
            stock_issues: Vec::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created = self.orders.create(order).await?;
        tracing::info!(number = %created.number, total = created.total, "Order placed");
        Ok(created)
    }

    /// Complete a pending order: mark it paid and deduct stock
    ///
    /// The pending-to-paid transition is one conditional statement and acts
    /// as the gate: concurrent completions race on it and exactly one wins,
    /// so stock is never deducted twice. Each line then uses a single
    /// conditional decrement, so stock never goes negative either. Lines
    /// whose decrement fails are collected as shortfalls and recorded on the
    /// order; the order stays paid so fulfilment can resolve them.
    pub async fn complete_order(&self, id: &Thing) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

        let mut completed = match self
            .orders
            .transition_status(id, OrderStatus::Pending, OrderStatus::Paid, None)
            .await?
        {
            Some(o) => o,
            None => {
                return Err(AppError::Conflict(format!(
                    "Order {} is not pending, only pending orders can be completed",
                    order.number
                )));
            }
        };

        let mut shortfalls = Vec::new();
        for line in &completed.lines {
            let deducted = self
                .products
                .try_deduct_stock(&line.product, line.quantity)
                .await?;
            if !deducted {
                let available = self.products.current_stock(&line.product).await?;
                tracing::warn!(
                    order = %completed.number,
                    product = %line.product,
                    requested = line.quantity,
                    available = ?available,
                    "Stock deduction failed during order completion"
                );
                shortfalls.push(StockShortfall {
                    product: line.product.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        if !shortfalls.is_empty() {
            completed = self.orders.record_stock_issues(id, shortfalls).await?;
        }

        if let Some(session) = &completed.session {
            if let Err(err) = self.cart.clear_cart(session) {
                tracing::warn!(%session, error = %err, "Failed to clear cart after checkout");
            }
        }

        tracing::info!(number = %completed.number, "Order completed");
        Ok(completed)
    }

    /// Manual status transition with history
    pub async fn set_status(
        &self,
        id: &Thing,
        status: OrderStatus,
        note: Option<String>,
    ) -> AppResult<Order> {
        Ok(self.orders.set_status(id, status, note).await?)
    }

    pub async fn find_order(&self, id: &Thing) -> AppResult<Option<Order>> {
        Ok(self.orders.find_by_id(id).await?)
    }

    /// Look an order up by its human-facing number
    pub async fn find_order_by_number(&self, number: &str) -> AppResult<Option<Order>> {
        Ok(self.orders.find_by_number(number).await?)
    }
}

/// Human-facing order number: date prefix plus a short random suffix
fn generate_order_number() -> String {
    let date = chrono::Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", date, &suffix[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_are_unique_and_prefixed() {
        let a = generate_order_number();
        let b = generate_order_number();
        assert!(a.starts_with("ORD-"));
        assert_ne!(a, b);
        assert_eq!(a.len(), "ORD-20260829-".len() + 8);
    }
}
