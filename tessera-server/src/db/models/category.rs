//! Category Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type CategoryId = Thing;

/// Category model
///
/// Categories form a tree through `parent`; in practice the catalog is two
/// levels deep (roots with one level of children) but nothing here assumes a
/// maximum depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    /// Record link to the parent category, `None` for roots
    pub parent: Option<Thing>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Category {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: None,
            name,
            slug,
            parent: None,
            sort_order: 0,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    pub parent: Option<Thing>,
    pub sort_order: Option<i32>,
}
