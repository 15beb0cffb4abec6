//! Cart Module - persistent per-session cart and wishlist
//!
//! A single-file embedded store; see [`store::CartStore`].

pub mod store;

pub use store::{CartCounts, CartError, CartEvent, CartLine, CartResult, CartStore};
