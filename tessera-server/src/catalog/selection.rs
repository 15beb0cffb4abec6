//! Filter selection parsing
//!
//! The recognized filter keys, their normalization rules, price-range parsing
//! and sort keys. Absent and empty-string values both mean "no filter".

use serde::Deserialize;

/// Recognized filter keys, in canonical query-string order
pub const FILTER_KEYS: [&str; 9] = [
    "subcategory",
    "material",
    "finish",
    "size",
    "thickness",
    "application_area",
    "brand",
    "price",
    "sort",
];

/// One value per recognized filter key
///
/// Deserializes straight from the listing query string; unrecognized keys are
/// dropped by serde, unrecognized values simply match nothing downstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterSelection {
    pub subcategory: Option<String>,
    pub material: Option<String>,
    pub finish: Option<String>,
    pub size: Option<String>,
    pub thickness: Option<String>,
    pub application_area: Option<String>,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub sort: Option<String>,
}

impl FilterSelection {
    /// Collapse empty and whitespace-only values into `None`
    pub fn normalized(mut self) -> Self {
        for key in FILTER_KEYS {
            let slot = self.slot_mut(key);
            if let Some(v) = slot
                && v.trim().is_empty()
            {
                *slot = None;
            }
        }
        self
    }

    /// Current value for a recognized key
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "subcategory" => self.subcategory.as_deref(),
            "material" => self.material.as_deref(),
            "finish" => self.finish.as_deref(),
            "size" => self.size.as_deref(),
            "thickness" => self.thickness.as_deref(),
            "application_area" => self.application_area.as_deref(),
            "brand" => self.brand.as_deref(),
            "price" => self.price.as_deref(),
            "sort" => self.sort.as_deref(),
            _ => None,
        }
    }

    /// Mutable slot for a recognized key
    ///
    /// # Panics
    ///
    /// Panics on an unrecognized key; callers iterate `FILTER_KEYS`.
    pub(crate) fn slot_mut(&mut self, key: &str) -> &mut Option<String> {
        match key {
            "subcategory" => &mut self.subcategory,
            "material" => &mut self.material,
            "finish" => &mut self.finish,
            "size" => &mut self.size,
            "thickness" => &mut self.thickness,
            "application_area" => &mut self.application_area,
            "brand" => &mut self.brand,
            "price" => &mut self.price,
            "sort" => &mut self.sort,
            other => panic!("unrecognized filter key: {other}"),
        }
    }

    /// Parsed price bounds, when a price filter is present
    pub fn price_range(&self) -> PriceRange {
        self.price
            .as_deref()
            .map(PriceRange::parse)
            .unwrap_or_default()
    }

    /// Parsed sort key
    pub fn sort_key(&self) -> SortKey {
        SortKey::from_param(self.sort.as_deref())
    }
}

/// Listing sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    /// `created_at` descending; the default for absent or unrecognized params
    Newest,
}

impl SortKey {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price_asc") => SortKey::PriceAsc,
            Some("price_desc") => SortKey::PriceDesc,
            _ => SortKey::Newest,
        }
    }
}

/// Inclusive price bounds parsed from a `"<min>-<max>"` filter value
///
/// A bound that does not parse to a finite number is skipped rather than
/// raising an error, so malformed input degrades to a wider match. The
/// open-ended "over" bucket arrives as a literal large upper bound
/// (`60-5000`) and is applied as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn parse(raw: &str) -> Self {
        let (min_str, max_str) = match raw.split_once('-') {
            Some(parts) => parts,
            None => (raw, ""),
        };
        Self {
            min: parse_finite(min_str),
            max: parse_finite(max_str),
        }
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_range_parses_both_bounds() {
        let r = PriceRange::parse("20-40");
        assert_eq!(r.min, Some(20.0));
        assert_eq!(r.max, Some(40.0));
    }

    #[test]
    fn price_range_keeps_literal_over_bound() {
        let r = PriceRange::parse("60-5000");
        assert_eq!(r.min, Some(60.0));
        assert_eq!(r.max, Some(5000.0));
    }

    #[test]
    fn malformed_bounds_are_skipped_not_errors() {
        assert_eq!(PriceRange::parse("abc-40"), PriceRange { min: None, max: Some(40.0) });
        assert_eq!(PriceRange::parse("20-xyz"), PriceRange { min: Some(20.0), max: None });
        assert_eq!(PriceRange::parse("garbage"), PriceRange::default());
        assert_eq!(PriceRange::parse("20-inf"), PriceRange { min: Some(20.0), max: None });
    }

    #[test]
    fn sort_key_defaults_to_newest() {
        assert_eq!(SortKey::from_param(Some("price_asc")), SortKey::PriceAsc);
        assert_eq!(SortKey::from_param(Some("price_desc")), SortKey::PriceDesc);
        assert_eq!(SortKey::from_param(Some("alphabetical")), SortKey::Newest);
        assert_eq!(SortKey::from_param(None), SortKey::Newest);
    }

    #[test]
    fn normalization_drops_blank_values() {
        let sel = FilterSelection {
            material: Some("  ".to_string()),
            brand: Some("Atlas".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(sel.material, None);
        assert_eq!(sel.brand.as_deref(), Some("Atlas"));
    }
}
