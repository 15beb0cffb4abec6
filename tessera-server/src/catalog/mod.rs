//! Catalog Module - faceted product querying
//!
//! # Structure
//!
//! - [`selection`] - recognized filter keys, normalization, price ranges
//! - [`facets`] - filter-group derivation from the unfiltered scope
//! - [`query`] - category resolution, matching, sorting, pagination
//! - [`urls`] - filter toggling and query-string encoding

pub mod facets;
pub mod query;
pub mod selection;
pub mod urls;

pub use facets::{FacetAttribute, FacetThreshold, FilterGroup, FilterOption, PRICE_BUCKETS};
pub use query::{CatalogQuery, CategoryListing, Listing, RESERVED_SLUGS, is_reserved_slug};
pub use selection::{FILTER_KEYS, FilterSelection, PriceRange, SortKey};
pub use urls::{filter_href, query_string, toggle_filter};
