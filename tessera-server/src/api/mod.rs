//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`catalog`] - faceted listing endpoints
//! - [`categories`] - category management
//! - [`products`] - product management
//! - [`cart`] - cart and wishlist endpoints
//! - [`orders`] - order placement and lifecycle

pub mod health;

pub mod cart;
pub mod catalog;
pub mod categories;
pub mod orders;
pub mod products;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
