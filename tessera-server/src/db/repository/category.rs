//! Category Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, CategoryCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active categories ordered by sort_order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true ORDER BY sort_order")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find an active category by its slug (exact, case-sensitive match)
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug AND is_active = true LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Find direct children of a category
    pub async fn find_children(&self, parent: &Thing) -> RepoResult<Vec<Category>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE parent = $parent AND is_active = true ORDER BY sort_order")
            .bind(("parent", parent.clone()))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories)
    }

    /// Collect every active category id in the catalog
    pub async fn all_category_ids(&self) -> RepoResult<Vec<Thing>> {
        let all = self.find_all().await?;
        Ok(all.into_iter().filter_map(|c| c.id).collect())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.slug
            )));
        }

        let category = Category {
            id: None,
            name: data.name,
            slug: data.slug,
            parent: data.parent,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }
}
