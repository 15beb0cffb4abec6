//! Product Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "product";

/// Predicate set for a listing read
///
/// Mirrors the recognized filter keys: a fixed category scope (or a single
/// subcategory override), exact-match facet attributes, and inclusive price
/// bounds. Sorting and pagination happen in memory on the caller side.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Category scope; ignored when `subcategory` is set
    pub category_ids: Vec<Thing>,
    /// Narrows to exactly one category, overriding the scope
    pub subcategory: Option<Thing>,
    pub material: Option<String>,
    pub finish: Option<String>,
    pub size: Option<String>,
    pub thickness: Option<String>,
    pub application_area: Option<String>,
    pub brand: Option<String>,
    /// Inclusive lower price bound
    pub price_min: Option<f64>,
    /// Inclusive upper price bound
    pub price_max: Option<f64>,
    pub clearance_only: bool,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE status = 'active' ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &Thing) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id = $id")
            .bind(("id", id.clone()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Find an active product by its slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE slug = $slug AND status = 'active' LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Facet source: all active products in the category scope, ignoring every
    /// selection except category and status
    pub async fn find_active_in_categories(&self, ids: &[Thing]) -> RepoResult<Vec<Product>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE status = 'active' AND category IN $categories")
            .bind(("categories", ids.to_vec()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products)
    }

    /// Facet source for the clearance listing
    pub async fn find_active_clearance(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE status = 'active' AND is_clearance = true")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Run a listing read with the given predicate set
    ///
    /// WHERE clauses are assembled dynamically and bound individually, so an
    /// absent filter contributes nothing to the query.
    pub async fn find_matching(&self, q: ProductQuery) -> RepoResult<Vec<Product>> {
        let mut where_parts: Vec<&str> = vec!["status = 'active'"];

        if q.subcategory.is_some() {
            where_parts.push("category = $subcategory");
        } else if !q.category_ids.is_empty() {
            where_parts.push("category IN $categories");
        }
        if q.clearance_only {
            where_parts.push("is_clearance = true");
        }
        if q.material.is_some() {
            where_parts.push("material = $material");
        }
        if q.finish.is_some() {
            where_parts.push("finish = $finish");
        }
        if q.size.is_some() {
            where_parts.push("size = $size");
        }
        if q.thickness.is_some() {
            where_parts.push("thickness = $thickness");
        }
        if q.application_area.is_some() {
            where_parts.push("application_area = $application_area");
        }
        if q.brand.is_some() {
            where_parts.push("brand = $brand");
        }
        if q.price_min.is_some() {
            where_parts.push("price >= $price_min");
        }
        if q.price_max.is_some() {
            where_parts.push("price <= $price_max");
        }

        let query_str = format!("SELECT * FROM product WHERE {}", where_parts.join(" AND "));
        let mut query = self.base.db().query(query_str);

        if let Some(v) = q.subcategory {
            query = query.bind(("subcategory", v));
        } else if !q.category_ids.is_empty() {
            query = query.bind(("categories", q.category_ids));
        }
        if let Some(v) = q.material {
            query = query.bind(("material", v));
        }
        if let Some(v) = q.finish {
            query = query.bind(("finish", v));
        }
        if let Some(v) = q.size {
            query = query.bind(("size", v));
        }
        if let Some(v) = q.thickness {
            query = query.bind(("thickness", v));
        }
        if let Some(v) = q.application_area {
            query = query.bind(("application_area", v));
        }
        if let Some(v) = q.brand {
            query = query.bind(("brand", v));
        }
        if let Some(v) = q.price_min {
            query = query.bind(("price_min", v));
        }
        if let Some(v) = q.price_max {
            query = query.bind(("price_max", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    /// Atomically deduct stock for one purchased line
    ///
    /// Returns `Ok(true)` when the decrement applied, `Ok(false)` when the
    /// product had less stock than requested (nothing is changed in that
    /// case). The decrement and its guard run as a single statement.
    pub async fn try_deduct_stock(&self, product: &Thing, quantity: i64) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET stock -= $qty WHERE stock >= $qty RETURN AFTER")
            .bind(("thing", product.clone()))
            .bind(("qty", quantity))
            .await?;
        let updated: Vec<Product> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Read current stock, for shortfall reporting
    pub async fn current_stock(&self, product: &Thing) -> RepoResult<Option<i64>> {
        Ok(self.find_by_id(product).await?.map(|p| p.stock))
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                data.slug
            )));
        }

        let product = Product {
            id: None,
            name: data.name,
            slug: data.slug,
            price: data.price,
            status: data.status.unwrap_or(ProductStatus::Active),
            category: data.category,
            material: data.material,
            finish: data.finish,
            size: data.size,
            thickness: data.thickness,
            application_area: data.application_area,
            brand: data.brand,
            is_clearance: data.is_clearance.unwrap_or(false),
            stock: data.stock.unwrap_or(0),
            image: data.image.unwrap_or_default(),
            created_at: data
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }
}
