//! Tessera Storefront Server - embedded e-commerce node for a tiles and
//! flooring catalog
//!
//! # Overview
//!
//! - **Catalog** (`catalog`): faceted product querying over a category tree
//! - **Database** (`db`): embedded SurrealDB storage for products, categories
//!   and orders
//! - **Cart** (`cart`): persistent per-session cart and wishlist store
//! - **Checkout** (`checkout`): order placement, stock deduction, status
//!   history
//! - **HTTP API** (`api`): RESTful storefront endpoints
//!
//! # Module structure
//!
//! ```text
//! tessera-server/src/
//! ├── core/          # config, state, server, errors
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # faceted listing pipeline
//! ├── cart/          # cart/wishlist store
//! ├── checkout/      # order placement and completion
//! ├── db/            # database layer
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod core;
pub mod db;
pub mod utils;

// Re-export common types
pub use cart::{CartCounts, CartEvent, CartLine, CartStore};
pub use catalog::{CatalogQuery, FilterSelection, Listing};
pub use checkout::CheckoutService;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, working directory, logging
pub fn setup_environment() -> std::io::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        log_dir.to_str(),
    );

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
 ______
/_  __/__  ___ ___ ___ _______ _
 / / / -_)(_-<(_-</ -_) __/ _ `/
/_/  \__//___//___/\__/_/  \_,_/
        storefront server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
