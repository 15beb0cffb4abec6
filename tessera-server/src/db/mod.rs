//! Database Module
//!
//! Embedded SurrealDB storage for the catalog and orders.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "tessera";
const DATABASE: &str = "storefront";

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        let service = Self { db };
        service.define_schema().await?;

        tracing::info!("Database connection established (embedded, path={db_path})");
        Ok(service)
    }

    /// Define lookup indexes, idempotent on restart
    async fn define_schema(&self) -> Result<(), AppError> {
        const DEFINES: &[&str] = &[
            "DEFINE INDEX IF NOT EXISTS product_slug ON product FIELDS slug UNIQUE",
            "DEFINE INDEX IF NOT EXISTS product_status ON product FIELDS status",
            "DEFINE INDEX IF NOT EXISTS product_category ON product FIELDS category",
            "DEFINE INDEX IF NOT EXISTS category_slug ON category FIELDS slug UNIQUE",
            "DEFINE INDEX IF NOT EXISTS order_number ON orders FIELDS number UNIQUE",
        ];

        for stmt in DEFINES {
            self.db
                .query(*stmt)
                .await
                .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?
                .check()
                .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;
        }
        Ok(())
    }
}
