//! Product Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type ProductId = Thing;

/// Product lifecycle status; only `Active` rows are listable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Draft,
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::Archived => "archived",
        }
    }
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub slug: String,
    /// Unit price in euros; products without a price are not orderable
    pub price: Option<f64>,
    #[serde(default = "default_status")]
    pub status: ProductStatus,
    /// Record link to category
    pub category: Option<Thing>,
    // Facet attributes: free-form short strings, empty means unset
    pub material: Option<String>,
    pub finish: Option<String>,
    pub size: Option<String>,
    pub thickness: Option<String>,
    pub application_area: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub is_clearance: bool,
    /// Units on hand, decremented at checkout completion
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image: String,
    /// Epoch millis; default sort key and tie-break input
    #[serde(default)]
    pub created_at: i64,
}

fn default_status() -> ProductStatus {
    ProductStatus::Active
}

impl Product {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: None,
            name,
            slug,
            price: None,
            status: ProductStatus::Active,
            category: None,
            material: None,
            finish: None,
            size: None,
            thickness: None,
            application_area: None,
            brand: None,
            is_clearance: false,
            stock: 0,
            image: String::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub slug: String,
    pub price: Option<f64>,
    pub status: Option<ProductStatus>,
    pub category: Option<Thing>,
    pub material: Option<String>,
    pub finish: Option<String>,
    pub size: Option<String>,
    pub thickness: Option<String>,
    pub application_area: Option<String>,
    pub brand: Option<String>,
    pub is_clearance: Option<bool>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    /// Override creation timestamp (epoch millis); used by imports and tests
    pub created_at: Option<i64>,
}
