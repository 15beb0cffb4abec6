use std::path::PathBuf;

/// Server configuration - all tunables for the storefront node
///
/// # Environment variables
///
/// Every item can be overridden from the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/tessera | working directory (database, cart store, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | runtime environment |
/// | LISTING_PAGE_SIZE | 24 | page size for paginated listings |
/// | LISTING_CACHE_SECS | 60 | shared-cache validity declared by listing pages |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/tessera HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database, cart store and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Page size for the paginated listing variants
    pub listing_page_size: usize,
    /// Cache validity (seconds) declared by the category/clearance pages
    pub listing_cache_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/tessera".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            listing_page_size: std::env::var("LISTING_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(24),
            listing_cache_secs: std::env::var("LISTING_CACHE_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Override selected values, commonly used in tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Ensure the working directory layout exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.cart_store_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// Directory holding the embedded catalog database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding the cart/wishlist store
    pub fn cart_store_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("cart")
    }

    /// Directory for rolling log files
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
