//! Listing URL construction
//!
//! The rendering layer encodes filter selections into the query string; each
//! filter is toggled by the presence or absence of its key, and selecting an
//! already-selected value clears it. Keys are emitted in canonical order so
//! equivalent selections always produce the same URL.

use super::selection::{FILTER_KEYS, FilterSelection};

/// Toggle a filter value: selecting the current value clears the key,
/// anything else replaces it
pub fn toggle_filter(selection: &FilterSelection, key: &str, value: &str) -> FilterSelection {
    let mut next = selection.clone();
    if !FILTER_KEYS.contains(&key) {
        return next;
    }
    let slot = next.slot_mut(key);
    if slot.as_deref() == Some(value) {
        *slot = None;
    } else {
        *slot = Some(value.to_string());
    }
    next
}

/// Encode a selection as a query string, leading `?` included
///
/// Returns an empty string for an empty selection. Page numbers are never
/// part of a selection: changing any filter lands back on page one.
pub fn query_string(selection: &FilterSelection) -> String {
    let mut parts = Vec::new();
    for key in FILTER_KEYS {
        if let Some(value) = selection.get(key) {
            parts.push(format!("{key}={}", urlencoding::encode(value)));
        }
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

/// Href for toggling one filter option on a listing path
pub fn filter_href(path: &str, selection: &FilterSelection, key: &str, value: &str) -> String {
    format!("{path}{}", query_string(&toggle_filter(selection, key, value)))
}
