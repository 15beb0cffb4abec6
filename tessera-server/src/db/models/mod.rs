//! Data models for the catalog and order tables

pub mod category;
pub mod order;
pub mod product;

pub use category::{Category, CategoryCreate, CategoryId};
pub use order::{Order, OrderCreate, OrderId, OrderLine, OrderStatus, StatusChange, StockShortfall};
pub use product::{Product, ProductCreate, ProductId, ProductStatus};
