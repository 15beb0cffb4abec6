//! Repository Module
//!
//! CRUD and query operations over the embedded SurrealDB tables.

pub mod category;
pub mod order;
pub mod product;

pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::{ProductQuery, ProductRepository};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Build a record pointer for a table, accepting either "table:key" or bare keys
pub fn make_thing(table: &str, id: &str) -> Thing {
    let key = strip_table_prefix(table, id);
    Thing::from((table, key))
}

/// Extract the bare key when an id carries its table prefix (e.g. "product:xxx" -> "xxx")
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}
