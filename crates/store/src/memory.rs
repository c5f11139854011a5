use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::{
    Book, BookId, BookPatch, BookQuery, BookRelation, NewBook, NewUser, Result, StoreError, User,
    UserId,
    query::BookOrdering,
    store::CatalogStore,
};

/// In-memory catalog store implementation for testing.
///
/// This implementation keeps all rows in memory and provides the same
/// interface as the PostgreSQL implementation. Relations are keyed by
/// (user, book), which stands in for the uniqueness constraint.
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    books: Arc<RwLock<HashMap<BookId, Book>>>,
    relations: Arc<RwLock<HashMap<(UserId, BookId), BookRelation>>>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of books stored.
    pub async fn book_count(&self) -> usize {
        self.books.read().await.len()
    }

    /// Clears all rows.
    pub async fn clear(&self) {
        self.users.write().await.clear();
        self.books.write().await.clear();
        self.relations.write().await.clear();
    }
}

fn matches(book: &Book, query: &BookQuery) -> bool {
    if let Some(price) = query.price
        && book.price != price
    {
        return false;
    }
    if let Some(ref search) = query.search {
        let needle = search.to_lowercase();
        if !book.name.to_lowercase().contains(&needle)
            && !book.author_name.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let record = User {
            id: UserId::new(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
        };
        self.users.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_book(&self, book: NewBook) -> Result<Book> {
        let record = Book {
            id: BookId::new(),
            name: book.name,
            price: book.price,
            author_name: book.author_name,
            owner_id: book.owner_id,
            discount: book.discount,
            rating: None,
        };
        self.books.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        let mut found: Vec<Book> = books
            .values()
            .filter(|b| matches(b, query))
            .cloned()
            .collect();

        match query.ordering {
            Some(BookOrdering::PriceAsc) => found.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(BookOrdering::PriceDesc) => found.sort_by(|a, b| b.price.cmp(&a.price)),
            Some(BookOrdering::AuthorNameAsc) => {
                found.sort_by(|a, b| a.author_name.cmp(&b.author_name))
            }
            Some(BookOrdering::AuthorNameDesc) => {
                found.sort_by(|a, b| b.author_name.cmp(&a.author_name))
            }
            None => found.sort_by_key(|b| b.id.as_uuid()),
        }

        Ok(found)
    }

    async fn update_book(&self, id: BookId, patch: BookPatch) -> Result<Option<Book>> {
        let mut books = self.books.write().await;
        let Some(book) = books.get_mut(&id) else {
            return Ok(None);
        };

        book.name = patch.name;
        book.price = patch.price;
        book.author_name = patch.author_name;
        if let Some(discount) = patch.discount {
            book.discount = discount;
        }

        Ok(Some(book.clone()))
    }

    async fn delete_book(&self, id: BookId) -> Result<bool> {
        let removed = self.books.write().await.remove(&id).is_some();
        if removed {
            // Cascade, as the foreign key would in Postgres.
            self.relations
                .write()
                .await
                .retain(|(_, book_id), _| *book_id != id);
        }
        Ok(removed)
    }

    async fn set_book_rating(&self, id: BookId, rating: Option<Decimal>) -> Result<()> {
        let mut books = self.books.write().await;
        let book = books.get_mut(&id).ok_or_else(|| StoreError::RowNotFound {
            entity: "book",
            id: id.to_string(),
        })?;
        book.rating = rating;
        Ok(())
    }

    async fn get_or_create_relation(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<(BookRelation, bool)> {
        let mut relations = self.relations.write().await;
        if let Some(existing) = relations.get(&(user_id, book_id)) {
            return Ok((existing.clone(), false));
        }

        let relation = BookRelation::new(user_id, book_id);
        relations.insert((user_id, book_id), relation.clone());
        Ok((relation, true))
    }

    async fn save_relation(&self, relation: &BookRelation) -> Result<()> {
        let mut relations = self.relations.write().await;
        let key = (relation.user_id, relation.book_id);
        match relations.get_mut(&key) {
            Some(stored) => {
                *stored = relation.clone();
                Ok(())
            }
            None => Err(StoreError::RowNotFound {
                entity: "relation",
                id: relation.id.to_string(),
            }),
        }
    }

    async fn relations_for_book(&self, book_id: BookId) -> Result<Vec<BookRelation>> {
        let relations = self.relations.read().await;
        Ok(relations
            .values()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn readers_for_book(&self, book_id: BookId) -> Result<Vec<User>> {
        let relations = self.relations.read().await;
        let users = self.users.read().await;
        let mut readers: Vec<User> = relations
            .values()
            .filter(|r| r.book_id == book_id)
            .filter_map(|r| users.get(&r.user_id).cloned())
            .collect();
        readers.sort_by_key(|u| u.id.as_uuid());
        Ok(readers)
    }
}
