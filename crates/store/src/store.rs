use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{Book, BookId, BookPatch, BookQuery, BookRelation, NewBook, NewUser, Result, User, UserId};

/// Core trait for catalog store implementations.
///
/// The store owns the two relational tables (books and per-user book
/// relations) plus the user profiles the catalog reads. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // -- Users --

    /// Inserts a new user and returns the stored record.
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    /// Looks up a user by id. Returns `None` if unknown.
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    // -- Books --

    /// Inserts a new book and returns the stored record.
    async fn insert_book(&self, book: NewBook) -> Result<Book>;

    /// Looks up a book by id. Returns `None` if unknown.
    async fn get_book(&self, id: BookId) -> Result<Option<Book>>;

    /// Lists books matching the query.
    ///
    /// Without an explicit ordering, books come back in id order. With
    /// one, ties carry no guaranteed secondary order.
    async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>>;

    /// Applies a full update of the writable fields to a book.
    ///
    /// Returns the updated record, or `None` if the book does not
    /// exist.
    async fn update_book(&self, id: BookId, patch: BookPatch) -> Result<Option<Book>>;

    /// Deletes a book and (by cascade) all its relations.
    ///
    /// Returns whether a book was actually deleted.
    async fn delete_book(&self, id: BookId) -> Result<bool>;

    /// Writes the stored aggregate rating for a book.
    ///
    /// This is a direct field update with no other side effects; the
    /// rating aggregator in the domain layer is its only caller.
    async fn set_book_rating(&self, id: BookId, rating: Option<Decimal>) -> Result<()>;

    // -- Relations --

    /// Returns the relation for (user, book), creating a default one
    /// if none exists yet.
    ///
    /// The insert is conditional on the (user_id, book_id) uniqueness
    /// constraint, so concurrent first-time writers converge on a
    /// single row. The boolean reports whether this call created the
    /// row.
    async fn get_or_create_relation(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<(BookRelation, bool)>;

    /// Persists an updated relation row.
    async fn save_relation(&self, relation: &BookRelation) -> Result<()>;

    /// All relation rows referencing a book.
    async fn relations_for_book(&self, book_id: BookId) -> Result<Vec<BookRelation>>;

    /// The users holding a relation to a book, in id order.
    async fn readers_for_book(&self, book_id: BookId) -> Result<Vec<User>>;
}
