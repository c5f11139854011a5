use common::{BookId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog user.
///
/// Authentication happens upstream; the store only keeps the profile
/// fields the catalog needs: a display handle, the reader-facing name,
/// and the staff flag that grants write access to every book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

/// Fields required to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl NewUser {
    /// Convenience constructor for a regular (non-staff) user.
    pub fn named(username: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_staff: false,
        }
    }

    /// Marks the user as staff.
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }
}

/// A book in the catalog.
///
/// `rating` is the stored average of all user rates, maintained by the
/// rating aggregator in the domain layer; it is never written by the
/// read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub price: Decimal,
    pub author_name: String,
    /// Owner deletion must not delete the book, hence optional.
    pub owner_id: Option<UserId>,
    /// Discount percentage, 0..=100.
    pub discount: i32,
    pub rating: Option<Decimal>,
}

/// Fields required to insert a new book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub name: String,
    pub price: Decimal,
    pub author_name: String,
    pub owner_id: Option<UserId>,
    pub discount: i32,
}

/// A full update of a book's writable fields.
///
/// `owner_id` and `rating` are deliberately absent: ownership is fixed
/// at creation and the rating is only written through
/// [`CatalogStore::set_book_rating`](crate::CatalogStore::set_book_rating).
/// `discount` is optional because not every client is allowed to (or
/// wants to) touch it; `None` leaves the stored value unchanged.
#[derive(Debug, Clone)]
pub struct BookPatch {
    pub name: String,
    pub price: Decimal,
    pub author_name: String,
    pub discount: Option<i32>,
}

/// A per-(user, book) relation row: like, bookmark, and rate state.
///
/// At most one row exists per (user, book) pair; the store enforces
/// this with a uniqueness constraint and conditional insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRelation {
    pub id: Uuid,
    pub user_id: UserId,
    pub book_id: BookId,
    pub like: bool,
    pub in_bookmarks: bool,
    /// Rate in 1..=5, absent until the user rates the book.
    pub rate: Option<i32>,
}

impl BookRelation {
    /// A fresh relation with all fields at their defaults.
    pub fn new(user_id: UserId, book_id: BookId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            book_id,
            like: false,
            in_bookmarks: false,
            rate: None,
        }
    }
}
