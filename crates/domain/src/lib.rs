//! Domain layer for the bookstore catalog.
//!
//! This crate provides the core catalog contracts:
//! - rating aggregation (stored average recomputed on rating writes)
//! - derived read fields (like count, discounted price, owner name)
//! - ownership-based access policy
//! - per-(user, book) relation upsert with partial updates

pub mod catalog;
pub mod error;
pub mod policy;
pub mod rating;
pub mod view;

pub use catalog::{CatalogService, CreateBook, RelationUpdate, UpdateBook};
pub use error::CatalogError;
pub use policy::{Principal, can_write};
pub use rating::average_rating;
pub use view::{BookView, Reader, discounted_price};
