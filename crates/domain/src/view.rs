//! Derived read model for books.

use rust_decimal::Decimal;
use serde::Serialize;
use store::{Book, BookRelation, User};

/// A reader of a book, exposed with display name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reader {
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for Reader {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// A book plus its derived, read-only fields.
///
/// Derivation never mutates stored state. The `rating` on the inner
/// book is the stored aggregate maintained by the rating aggregator;
/// the view does not re-average at read time.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub likes_count: i64,
    pub discounted_price: Decimal,
    /// Owner's display handle; empty string when the owner is absent.
    pub owner_name: String,
    pub readers: Vec<Reader>,
}

impl BookView {
    /// Attaches the derived fields to a book.
    pub fn derive(book: Book, relations: &[BookRelation], owner_name: String, readers: &[User]) -> Self {
        let likes_count = relations.iter().filter(|r| r.like).count() as i64;
        let discounted_price = discounted_price(book.price, book.discount);
        let readers = readers.iter().map(Reader::from).collect();

        Self {
            book,
            likes_count,
            discounted_price,
            owner_name,
            readers,
        }
    }
}

/// `price × (1 − discount / 100)`, rounded to 2 decimal places.
///
/// A zero discount returns the price exactly, not a re-rounded copy.
pub fn discounted_price(price: Decimal, discount: i32) -> Decimal {
    if discount == 0 {
        return price;
    }
    let factor = Decimal::ONE - Decimal::from(discount) / Decimal::from(100);
    (price * factor).round_dp(2)
}
