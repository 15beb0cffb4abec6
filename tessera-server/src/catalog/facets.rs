//! Facet derivation
//!
//! Builds the filter groups shown next to a listing. Groups always derive
//! from the unfiltered, category-scoped active set, never from the filtered
//! result, so selecting one filter cannot hide the other options.

use crate::db::models::{Category, Product};
use serde::Serialize;
use std::collections::BTreeSet;

/// The fixed set of product attributes that can become filter groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetAttribute {
    Material,
    Finish,
    Size,
    Thickness,
    ApplicationArea,
    Brand,
}

impl FacetAttribute {
    pub const ALL: [FacetAttribute; 6] = [
        FacetAttribute::Material,
        FacetAttribute::Finish,
        FacetAttribute::Size,
        FacetAttribute::Thickness,
        FacetAttribute::ApplicationArea,
        FacetAttribute::Brand,
    ];

    /// Filter key, matching the query-string key and the product field
    pub fn key(&self) -> &'static str {
        match self {
            FacetAttribute::Material => "material",
            FacetAttribute::Finish => "finish",
            FacetAttribute::Size => "size",
            FacetAttribute::Thickness => "thickness",
            FacetAttribute::ApplicationArea => "application_area",
            FacetAttribute::Brand => "brand",
        }
    }

    /// Display label for the group
    pub fn label(&self) -> &'static str {
        match self {
            FacetAttribute::Material => "Material",
            FacetAttribute::Finish => "Finish",
            FacetAttribute::Size => "Size",
            FacetAttribute::Thickness => "Thickness",
            FacetAttribute::ApplicationArea => "Application area",
            FacetAttribute::Brand => "Brand",
        }
    }

    /// This attribute's value on a product
    pub fn value_of<'a>(&self, product: &'a Product) -> Option<&'a str> {
        match self {
            FacetAttribute::Material => product.material.as_deref(),
            FacetAttribute::Finish => product.finish.as_deref(),
            FacetAttribute::Size => product.size.as_deref(),
            FacetAttribute::Thickness => product.thickness.as_deref(),
            FacetAttribute::ApplicationArea => product.application_area.as_deref(),
            FacetAttribute::Brand => product.brand.as_deref(),
        }
    }
}

/// One selectable option inside a filter group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

/// A named, derived set of selectable values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterGroup {
    /// Matches a filter key (`material`, ...) or a synthetic key
    /// (`subcategory`, `price`)
    pub id: String,
    pub label: String,
    pub options: Vec<FilterOption>,
}

/// Minimum number of distinct values before an attribute group is shown
///
/// The category page shows a group for a single distinct value; the
/// all-products and clearance pages require more than one. Parameterized
/// here so both behaviors share one derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetThreshold {
    AnyValue,
    MultipleValues,
}

impl FacetThreshold {
    fn min_distinct(&self) -> usize {
        match self {
            FacetThreshold::AnyValue => 1,
            FacetThreshold::MultipleValues => 2,
        }
    }
}

/// The four fixed price buckets, always appended last
///
/// The last bucket is an "over" bucket with a literal practical upper bound.
pub const PRICE_BUCKETS: [(&str, &str); 4] = [
    ("Under €20", "0-20"),
    ("€20 - €40", "20-40"),
    ("€40 - €60", "40-60"),
    ("Over €60", "60-5000"),
];

/// Derive the filter groups for a listing
///
/// `products` must be the unfiltered, category-scoped active set.
/// `children` are the resolved category's direct children; when non-empty a
/// `subcategory` group is prepended whose option values are the child ids.
pub fn derive_filter_groups(
    products: &[Product],
    children: &[Category],
    threshold: FacetThreshold,
) -> Vec<FilterGroup> {
    let mut groups = Vec::new();

    if !children.is_empty() {
        groups.push(FilterGroup {
            id: "subcategory".to_string(),
            label: "Subcategory".to_string(),
            options: children
                .iter()
                .filter_map(|c| {
                    c.id.as_ref().map(|id| FilterOption {
                        label: c.name.clone(),
                        value: id.to_string(),
                    })
                })
                .collect(),
        });
    }

    for attr in FacetAttribute::ALL {
        // Distinct non-blank values, lexicographically sorted
        let values: BTreeSet<&str> = products
            .iter()
            .filter_map(|p| attr.value_of(p))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        if values.len() >= threshold.min_distinct() {
            groups.push(FilterGroup {
                id: attr.key().to_string(),
                label: attr.label().to_string(),
                options: values
                    .into_iter()
                    .map(|v| FilterOption {
                        label: v.to_string(),
                        value: v.to_string(),
                    })
                    .collect(),
            });
        }
    }

    groups.push(FilterGroup {
        id: "price".to_string(),
        label: "Price".to_string(),
        options: PRICE_BUCKETS
            .iter()
            .map(|(label, value)| FilterOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect(),
    });

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(material: Option<&str>, brand: Option<&str>) -> Product {
        let mut p = Product::new("Test".to_string(), "test".to_string());
        p.material = material.map(str::to_string);
        p.brand = brand.map(str::to_string);
        p
    }

    #[test]
    fn price_group_is_always_present_and_last() {
        let groups = derive_filter_groups(&[], &[], FacetThreshold::AnyValue);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.last().unwrap().id, "price");
        assert_eq!(groups.last().unwrap().options.len(), 4);
        assert_eq!(groups.last().unwrap().options[3].value, "60-5000");
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let products = vec![
            product(Some("Oak"), None),
            product(Some("Ceramic"), None),
            product(Some("Oak"), None),
        ];
        let groups = derive_filter_groups(&products, &[], FacetThreshold::AnyValue);
        let material = groups.iter().find(|g| g.id == "material").unwrap();
        let values: Vec<&str> = material.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["Ceramic", "Oak"]);
    }

    #[test]
    fn blank_values_never_form_a_group() {
        let products = vec![product(Some("   "), None), product(Some(""), None)];
        let groups = derive_filter_groups(&products, &[], FacetThreshold::AnyValue);
        assert!(groups.iter().all(|g| g.id != "material"));
    }

    #[test]
    fn threshold_asymmetry_between_listing_variants() {
        // One distinct value: shown on the category page, hidden elsewhere
        let products = vec![product(Some("Oak"), Some("Atlas"))];
        let relaxed = derive_filter_groups(&products, &[], FacetThreshold::AnyValue);
        assert!(relaxed.iter().any(|g| g.id == "material"));

        let strict = derive_filter_groups(&products, &[], FacetThreshold::MultipleValues);
        assert!(strict.iter().all(|g| g.id != "material"));

        // Two distinct values pass both thresholds
        let products = vec![product(Some("Oak"), None), product(Some("Vinyl"), None)];
        let strict = derive_filter_groups(&products, &[], FacetThreshold::MultipleValues);
        assert!(strict.iter().any(|g| g.id == "material"));
    }

    #[test]
    fn subcategory_group_is_prepended_when_children_exist() {
        let mut child = Category::new("Laminate".to_string(), "laminate".to_string());
        child.id = Some(surrealdb::sql::Thing::from(("category", "laminate")));
        let groups = derive_filter_groups(&[], &[child], FacetThreshold::AnyValue);
        assert_eq!(groups[0].id, "subcategory");
        assert_eq!(groups[0].options[0].label, "Laminate");
        assert_eq!(groups[0].options[0].value, "category:laminate");
    }
}
