//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus, StatusChange, StockShortfall};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

// "order" is a SurrealQL keyword, so the table is plural
const TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &Thing) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE id = $id")
            .bind(("id", id.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find order by its human-facing number
    pub async fn find_by_number(&self, number: &str) -> RepoResult<Option<Order>> {
        let number_owned = number.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE number = $number LIMIT 1")
            .bind(("number", number_owned))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Set the order status and append the change to its history
    ///
    /// One statement, so the status field and its history never diverge.
    pub async fn set_status(
        &self,
        id: &Thing,
        status: OrderStatus,
        note: Option<String>,
    ) -> RepoResult<Order> {
        let entry = StatusChange::now(status, note);
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, status_history += $entry RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .bind(("entry", entry))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Conditionally transition the status, appending to the history
    ///
    /// The status check and the write are one statement, so of any number of
    /// concurrent callers exactly one observes `from` and wins. Returns
    /// `None` when the order was not in `from` (including unknown ids).
    pub async fn transition_status(
        &self,
        id: &Thing,
        from: OrderStatus,
        to: OrderStatus,
        note: Option<String>,
    ) -> RepoResult<Option<Order>> {
        let entry = StatusChange::now(to, note);
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = $to, status_history += $entry \
                 WHERE status = $from RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("from", from))
            .bind(("to", to))
            .bind(("entry", entry))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Record stock shortfalls observed during completion
    ///
    /// Takes the updated order back so a write that matched nothing surfaces
    /// as an error instead of silently dropping the records.
    pub async fn record_stock_issues(
        &self,
        id: &Thing,
        issues: Vec<StockShortfall>,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET stock_issues = $issues RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("issues", issues))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
