//! Server state, shared by every handler

use std::sync::Arc;
use std::time::Instant;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::cart::CartStore;
use crate::core::error::{Result, ServerError};
use crate::core::Config;
use crate::db::DbService;

/// Shared server state
///
/// Cheap to clone; every field is either a handle or behind an Arc.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Arc<Config> | immutable configuration |
/// | db | Surreal<Db> | embedded catalog/order database |
/// | cart | CartStore | persistent cart and wishlist store |
/// | started_at | Instant | process start, for uptime reporting |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: Surreal<Db>,
    pub cart: CartStore,
    pub started_at: Instant,
}

impl ServerState {
    /// Create the full server state: work dirs, database, cart store
    pub async fn initialize(config: Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| ServerError::Startup(e.to_string()))?;

        let cart_path = config.cart_store_dir().join("cart.redb");
        let cart =
            CartStore::open(&cart_path).map_err(|e| ServerError::Startup(e.to_string()))?;

        Ok(Self {
            config: Arc::new(config),
            db: db_service.db,
            cart,
            started_at: Instant::now(),
        })
    }
}
