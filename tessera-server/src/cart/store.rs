//! Cart and wishlist store
//!
//! A small persistent store for per-session cart lines and wishlist entries,
//! backed by a single redb file. Exposes get/set/subscribe: every committed
//! mutation publishes the session's fresh counts on a broadcast channel so
//! header counters stay in sync across views. Opened once at startup and
//! rehydrated from disk.

use dashmap::DashMap;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// (session, product) -> CartLine json
const CART: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("cart");
/// (session, product) -> added_at epoch millis
const WISHLIST: TableDefinition<(&str, &str), u64> = TableDefinition::new("wishlist");

/// Upper bound for a session's key range; sorts after any product id
const KEY_MAX: &str = "\u{10FFFF}";

/// Cart store errors
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not on wishlist: {0}")]
    NotOnWishlist(String),
}

pub type CartResult<T> = Result<T, CartError>;

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: String,
    pub quantity: u32,
    /// Unit price captured when the line was added
    pub unit_price: Option<f64>,
    /// Epoch millis
    pub added_at: i64,
}

/// Header counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartCounts {
    /// Distinct cart lines
    pub cart_items: usize,
    /// Total units across all lines
    pub cart_quantity: u64,
    pub wishlist_items: usize,
}

/// Published after every committed mutation
#[derive(Debug, Clone, Serialize)]
pub struct CartEvent {
    pub session: String,
    pub counts: CartCounts,
}

/// Persistent cart/wishlist store
#[derive(Clone)]
pub struct CartStore {
    db: Arc<Database>,
    counts_cache: Arc<DashMap<String, CartCounts>>,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    /// Open (or create) the store at the given path and hydrate it
    pub fn open(path: &Path) -> CartResult<Self> {
        let db = Database::create(path)?;

        // Make sure both tables exist so reads never fail on a fresh file
        let txn = db.begin_write()?;
        {
            txn.open_table(CART)?;
            txn.open_table(WISHLIST)?;
        }
        txn.commit()?;

        let (events, _) = broadcast::channel(64);
        let store = Self {
            db: Arc::new(db),
            counts_cache: Arc::new(DashMap::new()),
            events,
        };

        let (lines, entries) = store.hydrate()?;
        tracing::info!(
            cart_lines = lines,
            wishlist_entries = entries,
            "Cart store opened"
        );
        Ok(store)
    }

    /// Count persisted rows at startup
    fn hydrate(&self) -> CartResult<(usize, usize)> {
        let txn = self.db.begin_read()?;
        let cart = txn.open_table(CART)?;
        let wishlist = txn.open_table(WISHLIST)?;
        let lines = cart.len()? as usize;
        let entries = wishlist.len()? as usize;
        Ok((lines, entries))
    }

    /// Subscribe to count changes
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// All cart lines for a session, in product-id order
    pub fn cart_lines(&self, session: &str) -> CartResult<Vec<CartLine>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(CART)?;
        let mut lines = Vec::new();
        for entry in table.range((session, "")..=(session, KEY_MAX))? {
            let (_, value) = entry?;
            lines.push(serde_json::from_slice(value.value())?);
        }
        Ok(lines)
    }

    /// Set a cart line's quantity; zero removes the line
    pub fn set_cart_line(
        &self,
        session: &str,
        product: &str,
        quantity: u32,
        unit_price: Option<f64>,
    ) -> CartResult<CartCounts> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART)?;
            if quantity == 0 {
                table.remove((session, product))?;
            } else {
                let line = CartLine {
                    product: product.to_string(),
                    quantity,
                    unit_price,
                    added_at: chrono::Utc::now().timestamp_millis(),
                };
                let payload = serde_json::to_vec(&line)?;
                table.insert((session, product), payload.as_slice())?;
            }
        }
        txn.commit()?;
        self.publish(session)
    }

    /// Remove a cart line
    pub fn remove_cart_line(&self, session: &str, product: &str) -> CartResult<CartCounts> {
        self.set_cart_line(session, product, 0, None)
    }

    /// Drop every cart line for a session (after checkout)
    pub fn clear_cart(&self, session: &str) -> CartResult<CartCounts> {
        let products: Vec<String> = self
            .cart_lines(session)?
            .into_iter()
            .map(|l| l.product)
            .collect();

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART)?;
            for product in &products {
                table.remove((session, product.as_str()))?;
            }
        }
        txn.commit()?;
        self.publish(session)
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Product ids on a session's wishlist
    pub fn wishlist(&self, session: &str) -> CartResult<Vec<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(WISHLIST)?;
        let mut products = Vec::new();
        for entry in table.range((session, "")..=(session, KEY_MAX))? {
            let (key, _) = entry?;
            products.push(key.value().1.to_string());
        }
        Ok(products)
    }

    /// Toggle a wishlist entry; returns whether the product is now listed
    pub fn toggle_wishlist(&self, session: &str, product: &str) -> CartResult<bool> {
        let txn = self.db.begin_write()?;
        let now_listed;
        {
            let mut table = txn.open_table(WISHLIST)?;
            if table.remove((session, product))?.is_some() {
                now_listed = false;
            } else {
                let now = chrono::Utc::now().timestamp_millis() as u64;
                table.insert((session, product), now)?;
                now_listed = true;
            }
        }
        txn.commit()?;
        self.publish(session)?;
        Ok(now_listed)
    }

    /// Move a wishlist entry into the cart
    ///
    /// Removal and insertion happen in one write transaction, so the entry
    /// can never end up counted in both places or in neither.
    pub fn move_to_cart(
        &self,
        session: &str,
        product: &str,
        unit_price: Option<f64>,
    ) -> CartResult<CartLine> {
        let txn = self.db.begin_write()?;
        let line;
        {
            let mut wishlist = txn.open_table(WISHLIST)?;
            if wishlist.remove((session, product))?.is_none() {
                return Err(CartError::NotOnWishlist(product.to_string()));
            }

            let mut cart = txn.open_table(CART)?;
            let existing: Option<CartLine> = match cart.get((session, product))? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            line = match existing {
                Some(mut l) => {
                    l.quantity += 1;
                    l
                }
                None => CartLine {
                    product: product.to_string(),
                    quantity: 1,
                    unit_price,
                    added_at: chrono::Utc::now().timestamp_millis(),
                },
            };
            let payload = serde_json::to_vec(&line)?;
            cart.insert((session, product), payload.as_slice())?;
        }
        txn.commit()?;
        self.publish(session)?;
        Ok(line)
    }

    // =========================================================================
    // Counts
    // =========================================================================

    /// Header counters for a session
    pub fn counts(&self, session: &str) -> CartResult<CartCounts> {
        if let Some(cached) = self.counts_cache.get(session) {
            return Ok(*cached);
        }
        let counts = self.recount(session)?;
        self.counts_cache.insert(session.to_string(), counts);
        Ok(counts)
    }

    fn recount(&self, session: &str) -> CartResult<CartCounts> {
        let mut counts = CartCounts::default();
        for line in self.cart_lines(session)? {
            counts.cart_items += 1;
            counts.cart_quantity += u64::from(line.quantity);
        }
        counts.wishlist_items = self.wishlist(session)?.len();
        Ok(counts)
    }

    /// Refresh the cache and notify subscribers after a committed mutation
    fn publish(&self, session: &str) -> CartResult<CartCounts> {
        let counts = self.recount(session)?;
        self.counts_cache.insert(session.to_string(), counts);
        // No receivers is fine
        let _ = self.events.send(CartEvent {
            session: session.to_string(),
            counts,
        });
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, CartStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = CartStore::open(&tmp.path().join("cart.redb")).unwrap();
        (tmp, store)
    }

    #[test]
    fn cart_counts_track_lines_and_quantities() {
        let (_tmp, store) = open_store();
        store.set_cart_line("s1", "product:a", 2, Some(19.99)).unwrap();
        let counts = store.set_cart_line("s1", "product:b", 1, None).unwrap();
        assert_eq!(counts.cart_items, 2);
        assert_eq!(counts.cart_quantity, 3);

        // Quantity zero removes the line
        let counts = store.set_cart_line("s1", "product:a", 0, None).unwrap();
        assert_eq!(counts.cart_items, 1);
        assert_eq!(counts.cart_quantity, 1);
    }

    #[test]
    fn sessions_are_isolated() {
        let (_tmp, store) = open_store();
        store.set_cart_line("s1", "product:a", 1, None).unwrap();
        store.set_cart_line("s2", "product:a", 5, None).unwrap();
        assert_eq!(store.counts("s1").unwrap().cart_quantity, 1);
        assert_eq!(store.counts("s2").unwrap().cart_quantity, 5);
    }

    #[test]
    fn wishlist_toggle_is_a_pure_toggle() {
        let (_tmp, store) = open_store();
        assert!(store.toggle_wishlist("s1", "product:a").unwrap());
        assert_eq!(store.wishlist("s1").unwrap(), vec!["product:a"]);

        assert!(!store.toggle_wishlist("s1", "product:a").unwrap());
        assert!(store.wishlist("s1").unwrap().is_empty());
    }

    #[test]
    fn move_to_cart_never_double_counts() {
        let (_tmp, store) = open_store();
        store.toggle_wishlist("s1", "product:a").unwrap();
        let line = store.move_to_cart("s1", "product:a", Some(45.0)).unwrap();
        assert_eq!(line.quantity, 1);

        let counts = store.counts("s1").unwrap();
        assert_eq!(counts.cart_items, 1);
        assert_eq!(counts.wishlist_items, 0);

        // Moving again without a wishlist entry is rejected
        assert!(store.move_to_cart("s1", "product:a", None).is_err());
        assert_eq!(store.counts("s1").unwrap().cart_quantity, 1);
    }

    #[test]
    fn move_to_cart_increments_an_existing_line() {
        let (_tmp, store) = open_store();
        store.set_cart_line("s1", "product:a", 2, Some(45.0)).unwrap();
        store.toggle_wishlist("s1", "product:a").unwrap();
        let line = store.move_to_cart("s1", "product:a", None).unwrap();
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn mutations_publish_count_events() {
        let (_tmp, store) = open_store();
        let mut rx = store.subscribe();
        store.set_cart_line("s1", "product:a", 2, None).unwrap();
        let event = rx.try_recv().unwrap();
        assert_eq!(event.session, "s1");
        assert_eq!(event.counts.cart_quantity, 2);
    }

    #[test]
    fn store_rehydrates_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cart.redb");
        {
            let store = CartStore::open(&path).unwrap();
            store.set_cart_line("s1", "product:a", 4, None).unwrap();
        }
        let reopened = CartStore::open(&path).unwrap();
        assert_eq!(reopened.counts("s1").unwrap().cart_quantity, 4);
    }
}
