//! Persistence layer for the bookstore catalog.
//!
//! Defines the record types (books, users, per-user book relations),
//! the [`CatalogStore`] trait, and two implementations: an in-memory
//! store for tests and a PostgreSQL store for production.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod query;
pub mod store;

pub use common::{BookId, UserId};
pub use error::{Result, StoreError};
pub use memory::InMemoryCatalogStore;
pub use model::{Book, BookPatch, BookRelation, NewBook, NewUser, User};
pub use postgres::PostgresCatalogStore;
pub use query::{BookOrdering, BookQuery};
pub use store::CatalogStore;
