//! Faceted product query
//!
//! Resolves a category slug and a set of filter selections into the matching,
//! sorted product list plus the facet groups describing available
//! refinements. Three listing variants share this implementation: the
//! category page, the all-products page and the clearance page.
//!
//! This is a pure read; the two reads per listing (filtered match, unfiltered
//! facet source) are gathered concurrently and are not transactionally
//! consistent with each other, which is acceptable for read-mostly catalog
//! content.

use super::facets::{FacetThreshold, FilterGroup, derive_filter_groups};
use super::selection::{FilterSelection, SortKey};
use crate::db::models::{Category, Product};
use crate::db::repository::{
    CategoryRepository, ProductRepository, ProductQuery, RepoResult, make_thing,
};
use serde::Serialize;
use std::cmp::Ordering;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

/// Slugs that can never resolve to a category; those paths belong to other
/// routes entirely
pub const RESERVED_SLUGS: &[&str] = &[
    "cart",
    "wishlist",
    "login",
    "register",
    "admin",
    "checkout",
    "account",
    "products",
    "clearance",
    "orders",
];

pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// A rendered listing: the matching page of products and the facet UI input
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub products: Vec<Product>,
    /// Exact match count before pagination
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub filter_groups: Vec<FilterGroup>,
}

/// Category listing with the resolved category and its direct children
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub category: Category,
    pub children: Vec<Category>,
    #[serde(flatten)]
    pub listing: Listing,
}

/// The faceted product query component
#[derive(Clone)]
pub struct CatalogQuery {
    products: ProductRepository,
    categories: CategoryRepository,
    page_size: usize,
}

impl CatalogQuery {
    pub fn new(db: Surreal<Db>, page_size: usize) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            categories: CategoryRepository::new(db),
            page_size,
        }
    }

    /// Category page listing
    ///
    /// Scope is the resolved category plus its direct children. Facet groups
    /// use the relaxed threshold (a single distinct value is enough) and the
    /// result is not paginated. Returns `None` for unknown or reserved slugs.
    pub async fn category_listing(
        &self,
        slug: &str,
        selection: FilterSelection,
    ) -> RepoResult<Option<CategoryListing>> {
        if is_reserved_slug(slug) {
            return Ok(None);
        }
        let category = match self.categories.find_by_slug(slug).await? {
            Some(c) => c,
            None => return Ok(None),
        };
        let category_id = match &category.id {
            Some(id) => id.clone(),
            None => return Ok(None),
        };

        let children = self.categories.find_children(&category_id).await?;
        let mut scope = vec![category_id];
        scope.extend(children.iter().filter_map(|c| c.id.clone()));

        let listing = self
            .run(&scope, &children, selection, FacetThreshold::AnyValue, None, false)
            .await?;

        Ok(Some(CategoryListing {
            category,
            children,
            listing,
        }))
    }

    /// All-products page listing
    ///
    /// Scope is the full category tree (recursive, arbitrary depth), facet
    /// groups use the strict threshold and the result is paginated. Root
    /// categories act as the subcategory options.
    pub async fn all_products_listing(
        &self,
        selection: FilterSelection,
        page: usize,
    ) -> RepoResult<Listing> {
        let scope = self.categories.all_category_ids().await?;
        let roots: Vec<Category> = self
            .categories
            .find_all()
            .await?
            .into_iter()
            .filter(|c| c.parent.is_none())
            .collect();

        self.run(
            &scope,
            &roots,
            selection,
            FacetThreshold::MultipleValues,
            Some(page),
            false,
        )
        .await
    }

    /// Clearance page listing
    ///
    /// Matches `is_clearance` products across the whole catalog; no
    /// subcategory group, strict facet threshold, paginated.
    pub async fn clearance_listing(
        &self,
        selection: FilterSelection,
        page: usize,
    ) -> RepoResult<Listing> {
        self.run(
            &[],
            &[],
            selection,
            FacetThreshold::MultipleValues,
            Some(page),
            true,
        )
        .await
    }

    /// Shared listing pipeline: match, derive facets, sort, paginate
    async fn run(
        &self,
        scope: &[Thing],
        children: &[Category],
        selection: FilterSelection,
        threshold: FacetThreshold,
        page: Option<usize>,
        clearance_only: bool,
    ) -> RepoResult<Listing> {
        let selection = selection.normalized();
        let query = build_product_query(scope, &selection, clearance_only);

        // Filtered match and unfiltered facet source, gathered concurrently.
        // The facet source ignores every selection except category and status.
        let (matched, facet_source) = tokio::join!(
            self.products.find_matching(query),
            self.facet_source(scope, clearance_only),
        );
        let mut matched = matched?;
        let facet_source = facet_source?;

        let sort = selection.sort_key();
        matched.sort_by(|a, b| compare_products(a, b, sort));

        let filter_groups = derive_filter_groups(&facet_source, children, threshold);

        let total = matched.len();
        let (products, page) = match page {
            Some(requested) => {
                let page = requested.max(1);
                let start = (page - 1).saturating_mul(self.page_size).min(total);
                let end = (start + self.page_size).min(total);
                (matched[start..end].to_vec(), page)
            }
            None => (matched, 1),
        };

        Ok(Listing {
            products,
            total,
            page,
            page_size: self.page_size,
            filter_groups,
        })
    }

    async fn facet_source(&self, scope: &[Thing], clearance_only: bool) -> RepoResult<Vec<Product>> {
        if clearance_only {
            self.products.find_active_clearance().await
        } else {
            self.products.find_active_in_categories(scope).await
        }
    }
}

/// Translate a filter selection into repository predicates
fn build_product_query(
    scope: &[Thing],
    selection: &FilterSelection,
    clearance_only: bool,
) -> ProductQuery {
    let range = selection.price_range();
    ProductQuery {
        category_ids: scope.to_vec(),
        subcategory: selection
            .subcategory
            .as_deref()
            .map(|v| make_thing("category", v)),
        material: selection.material.clone(),
        finish: selection.finish.clone(),
        size: selection.size.clone(),
        thickness: selection.thickness.clone(),
        application_area: selection.application_area.clone(),
        brand: selection.brand.clone(),
        price_min: range.min,
        price_max: range.max,
        clearance_only,
    }
}

/// Listing sort comparator
///
/// Price sorts place unpriced products last; the default is newest first.
/// Ties always break on id ascending so repeated reads render identically.
pub fn compare_products(a: &Product, b: &Product, sort: SortKey) -> Ordering {
    let primary = match sort {
        SortKey::PriceAsc => compare_prices(a.price, b.price),
        SortKey::PriceDesc => compare_prices(b.price, a.price),
        SortKey::Newest => b.created_at.cmp(&a.created_at),
    };
    primary.then_with(|| id_string(a).cmp(&id_string(b)))
}

fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn id_string(p: &Product) -> String {
    p.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: &str, price: Option<f64>, created_at: i64) -> Product {
        let mut p = Product::new(id.to_string(), id.to_string());
        p.id = Some(Thing::from(("product", id)));
        p.price = price;
        p.created_at = created_at;
        p
    }

    #[test]
    fn reserved_slugs_never_resolve() {
        assert!(is_reserved_slug("cart"));
        assert!(is_reserved_slug("admin"));
        assert!(!is_reserved_slug("flooring"));
    }

    #[test]
    fn price_sort_puts_unpriced_last() {
        let mut products = vec![
            priced("a", None, 0),
            priced("b", Some(30.0), 0),
            priced("c", Some(10.0), 0),
        ];
        products.sort_by(|x, y| compare_products(x, y, SortKey::PriceAsc));
        let ids: Vec<String> = products.iter().map(id_string).collect();
        assert_eq!(ids, vec!["product:c", "product:b", "product:a"]);
    }

    #[test]
    fn default_sort_is_newest_with_id_tiebreak() {
        let mut products = vec![
            priced("b", None, 100),
            priced("c", None, 200),
            priced("a", None, 100),
        ];
        products.sort_by(|x, y| compare_products(x, y, SortKey::Newest));
        let ids: Vec<String> = products.iter().map(id_string).collect();
        // Newest first; equal timestamps fall back to id ascending
        assert_eq!(ids, vec!["product:c", "product:a", "product:b"]);
    }

    #[test]
    fn selection_translates_to_predicates() {
        let selection = FilterSelection {
            material: Some("Oak".to_string()),
            price: Some("20-40".to_string()),
            ..Default::default()
        };
        let q = build_product_query(&[], &selection, false);
        assert_eq!(q.material.as_deref(), Some("Oak"));
        assert_eq!(q.price_min, Some(20.0));
        assert_eq!(q.price_max, Some(40.0));
        assert!(q.subcategory.is_none());
    }

    #[test]
    fn subcategory_accepts_prefixed_and_bare_ids() {
        let selection = FilterSelection {
            subcategory: Some("category:laminate".to_string()),
            ..Default::default()
        };
        let q = build_product_query(&[], &selection, false);
        assert_eq!(
            q.subcategory,
            Some(Thing::from(("category", "laminate")))
        );
    }
}
