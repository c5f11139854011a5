//! Catalog service orchestrating books and per-user relations.

use common::{BookId, UserId};
use rust_decimal::Decimal;
use store::{Book, BookPatch, BookQuery, BookRelation, CatalogStore, NewBook};

use crate::error::CatalogError;
use crate::policy::{Principal, can_write};
use crate::rating::average_rating;
use crate::view::BookView;

/// Fields a client supplies when creating a book.
///
/// There is no owner field: the owner is forced to the creating
/// principal server-side, whatever the request payload claimed.
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub name: String,
    pub price: Decimal,
    pub author_name: String,
    pub discount: Option<i32>,
}

/// Fields a client supplies when updating a book.
#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub name: String,
    pub price: Decimal,
    pub author_name: String,
    pub discount: Option<i32>,
}

/// A partial update of the caller's relation to a book.
///
/// `None` leaves a field unchanged; `rate` distinguishes "absent from
/// the payload" (`None`) from "explicitly cleared" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct RelationUpdate {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
    pub rate: Option<Option<i32>>,
}

/// Service for managing the book catalog.
///
/// Wraps a [`CatalogStore`] and applies the catalog contracts on top:
/// access policy on mutations, derived fields on reads, and the
/// rating recomputation discipline on relation writes.
pub struct CatalogService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> CatalogService<S> {
    /// Creates a new catalog service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves a forwarded user id into a principal.
    ///
    /// Absent or unknown ids resolve to the anonymous principal rather
    /// than an error; reads are open to everyone.
    pub async fn resolve_principal(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Principal, CatalogError> {
        let Some(user_id) = user_id else {
            return Ok(Principal::Anonymous);
        };
        Ok(match self.store.get_user(user_id).await? {
            Some(user) => Principal::User(user),
            None => Principal::Anonymous,
        })
    }

    /// Creates a book owned by the authenticated principal.
    #[tracing::instrument(skip(self, principal, req), fields(name = %req.name))]
    pub async fn create_book(
        &self,
        principal: &Principal,
        req: CreateBook,
    ) -> Result<BookView, CatalogError> {
        let Some(user) = principal.user() else {
            return Err(CatalogError::Unauthenticated);
        };

        validate_price(req.price)?;
        let discount = req.discount.unwrap_or(0);
        validate_discount(discount)?;

        let book = self
            .store
            .insert_book(NewBook {
                name: req.name,
                price: req.price,
                author_name: req.author_name,
                owner_id: Some(user.id),
                discount,
            })
            .await?;

        metrics::counter!("catalog_book_writes_total").increment(1);
        tracing::info!(book_id = %book.id, owner = %user.username, "book created");

        self.view_for(book).await
    }

    /// Retrieves a book with derived fields attached.
    #[tracing::instrument(skip(self))]
    pub async fn get_book(&self, id: BookId) -> Result<BookView, CatalogError> {
        let book = self.store.get_book(id).await?.ok_or(CatalogError::NotFound)?;
        self.view_for(book).await
    }

    /// Lists books matching the query, with derived fields attached.
    #[tracing::instrument(skip(self, query))]
    pub async fn list_books(&self, query: &BookQuery) -> Result<Vec<BookView>, CatalogError> {
        let books = self.store.list_books(query).await?;
        let mut views = Vec::with_capacity(books.len());
        for book in books {
            views.push(self.view_for(book).await?);
        }
        Ok(views)
    }

    /// Updates a book's writable fields, gated by the access policy.
    #[tracing::instrument(skip(self, principal, req))]
    pub async fn update_book(
        &self,
        principal: &Principal,
        id: BookId,
        req: UpdateBook,
    ) -> Result<BookView, CatalogError> {
        let book = self.store.get_book(id).await?.ok_or(CatalogError::NotFound)?;
        if !can_write(principal, &book) {
            return Err(CatalogError::Forbidden);
        }

        validate_price(req.price)?;
        if let Some(discount) = req.discount {
            validate_discount(discount)?;
        }

        let updated = self
            .store
            .update_book(
                id,
                BookPatch {
                    name: req.name,
                    price: req.price,
                    author_name: req.author_name,
                    discount: req.discount,
                },
            )
            .await?
            .ok_or(CatalogError::NotFound)?;

        metrics::counter!("catalog_book_writes_total").increment(1);

        self.view_for(updated).await
    }

    /// Deletes a book, gated by the access policy.
    #[tracing::instrument(skip(self, principal))]
    pub async fn delete_book(
        &self,
        principal: &Principal,
        id: BookId,
    ) -> Result<(), CatalogError> {
        let book = self.store.get_book(id).await?.ok_or(CatalogError::NotFound)?;
        if !can_write(principal, &book) {
            return Err(CatalogError::Forbidden);
        }

        self.store.delete_book(id).await?;
        metrics::counter!("catalog_book_writes_total").increment(1);
        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    /// Applies a partial update to the caller's relation to a book,
    /// creating the relation on first touch.
    ///
    /// Recomputes the book's stored rating exactly when the save
    /// created the relation or changed its rate; a save touching only
    /// `like` or `in_bookmarks` leaves the stored rating alone.
    #[tracing::instrument(skip(self, principal, update))]
    pub async fn update_relation(
        &self,
        principal: &Principal,
        book_id: BookId,
        update: RelationUpdate,
    ) -> Result<BookRelation, CatalogError> {
        let Some(user) = principal.user() else {
            return Err(CatalogError::Unauthenticated);
        };

        // Validate before touching the store, so a bad rate neither
        // creates nor modifies a row.
        if let Some(Some(rate)) = update.rate
            && !(1..=5).contains(&rate)
        {
            return Err(CatalogError::invalid(
                "rate",
                format!("\"{rate}\" is not a valid choice."),
            ));
        }

        if self.store.get_book(book_id).await?.is_none() {
            return Err(CatalogError::NotFound);
        }

        let (mut relation, created) =
            self.store.get_or_create_relation(user.id, book_id).await?;
        let old_rate = relation.rate;

        if let Some(like) = update.like {
            relation.like = like;
        }
        if let Some(in_bookmarks) = update.in_bookmarks {
            relation.in_bookmarks = in_bookmarks;
        }
        if let Some(rate) = update.rate {
            relation.rate = rate;
        }

        self.store.save_relation(&relation).await?;

        if created || relation.rate != old_rate {
            self.recompute_rating(book_id).await?;
        }

        Ok(relation)
    }

    /// Recomputes and persists the stored average rating for a book.
    ///
    /// Read-then-write over the relation set: under concurrent rating
    /// submissions the last aggregate write wins, which is acceptable
    /// for a display statistic.
    #[tracing::instrument(skip(self))]
    pub async fn recompute_rating(&self, book_id: BookId) -> Result<(), CatalogError> {
        let relations = self.store.relations_for_book(book_id).await?;
        let rating = average_rating(&relations);
        self.store.set_book_rating(book_id, rating).await?;

        metrics::counter!("catalog_rating_recomputations_total").increment(1);
        tracing::debug!(book_id = %book_id, rating = ?rating, "rating recomputed");
        Ok(())
    }

    async fn view_for(&self, book: Book) -> Result<BookView, CatalogError> {
        let relations = self.store.relations_for_book(book.id).await?;
        let readers = self.store.readers_for_book(book.id).await?;
        let owner_name = match book.owner_id {
            Some(owner_id) => self
                .store
                .get_user(owner_id)
                .await?
                .map(|u| u.username)
                .unwrap_or_default(),
            None => String::new(),
        };

        Ok(BookView::derive(book, &relations, owner_name, &readers))
    }
}

fn validate_price(price: Decimal) -> Result<(), CatalogError> {
    if price.is_sign_negative() {
        return Err(CatalogError::invalid(
            "price",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(())
}

fn validate_discount(discount: i32) -> Result<(), CatalogError> {
    if !(0..=100).contains(&discount) {
        return Err(CatalogError::invalid(
            "discount",
            "Ensure this value is between 0 and 100.",
        ));
    }
    Ok(())
}
