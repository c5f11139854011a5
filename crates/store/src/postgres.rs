use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Book, BookId, BookPatch, BookQuery, BookRelation, NewBook, NewUser, Result, StoreError, User,
    UserId,
    query::BookOrdering,
    store::CatalogStore,
};

/// PostgreSQL-backed catalog store implementation.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Creates a new PostgreSQL catalog store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        Ok(User {
            id: UserId::from_uuid(row.try_get::<Uuid, _>("id")?),
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_staff: row.try_get("is_staff")?,
        })
    }

    fn row_to_book(row: PgRow) -> Result<Book> {
        Ok(Book {
            id: BookId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            author_name: row.try_get("author_name")?,
            owner_id: row
                .try_get::<Option<Uuid>, _>("owner_id")?
                .map(UserId::from_uuid),
            discount: row.try_get("discount")?,
            rating: row.try_get("rating")?,
        })
    }

    fn row_to_relation(row: PgRow) -> Result<BookRelation> {
        Ok(BookRelation {
            id: row.try_get("id")?,
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            book_id: BookId::from_uuid(row.try_get::<Uuid, _>("book_id")?),
            like: row.try_get("liked")?,
            in_bookmarks: row.try_get("in_bookmarks")?,
            rate: row.try_get("rate")?,
        })
    }
}

const BOOK_COLUMNS: &str = "id, name, price, author_name, owner_id, discount, rating";

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, first_name, last_name, is_staff)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, first_name, last_name, is_staff
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_user(row)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, first_name, last_name, is_staff FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn insert_book(&self, book: NewBook) -> Result<Book> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO books (id, name, price, author_name, owner_id, discount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BOOK_COLUMNS}
            "#,
        ))
        .bind(BookId::new().as_uuid())
        .bind(&book.name)
        .bind(book.price)
        .bind(&book.author_name)
        .bind(book.owner_id.map(|id| id.as_uuid()))
        .bind(book.discount)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_book(row)
    }

    async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_book).transpose()
    }

    async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let mut sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE 1=1");
        let mut param_count = 0;

        // Build dynamic query
        if query.price.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND price = ${param_count}"));
        }
        if query.search.is_some() {
            param_count += 1;
            sql.push_str(&format!(
                " AND (name ILIKE ${param_count} OR author_name ILIKE ${param_count})"
            ));
        }

        sql.push_str(match query.ordering {
            Some(BookOrdering::PriceAsc) => " ORDER BY price ASC",
            Some(BookOrdering::PriceDesc) => " ORDER BY price DESC",
            Some(BookOrdering::AuthorNameAsc) => " ORDER BY author_name ASC",
            Some(BookOrdering::AuthorNameDesc) => " ORDER BY author_name DESC",
            None => " ORDER BY id ASC",
        });

        let mut sqlx_query = sqlx::query(&sql);
        if let Some(price) = query.price {
            sqlx_query = sqlx_query.bind(price);
        }
        if let Some(ref search) = query.search {
            sqlx_query = sqlx_query.bind(format!("%{search}%"));
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_book).collect()
    }

    async fn update_book(&self, id: BookId, patch: BookPatch) -> Result<Option<Book>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE books
            SET name = $2,
                price = $3,
                author_name = $4,
                discount = COALESCE($5, discount)
            WHERE id = $1
            RETURNING {BOOK_COLUMNS}
            "#,
        ))
        .bind(id.as_uuid())
        .bind(&patch.name)
        .bind(patch.price)
        .bind(&patch.author_name)
        .bind(patch.discount)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_book).transpose()
    }

    async fn delete_book(&self, id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_book_rating(&self, id: BookId, rating: Option<Decimal>) -> Result<()> {
        let result = sqlx::query("UPDATE books SET rating = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(rating)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                entity: "book",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn get_or_create_relation(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<(BookRelation, bool)> {
        // A single conditional insert against the uniqueness constraint;
        // concurrent first-time writers converge on one row.
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_book_relations (id, user_id, book_id, liked, in_bookmarks, rate)
            VALUES ($1, $2, $3, FALSE, FALSE, NULL)
            ON CONFLICT (user_id, book_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.as_uuid())
        .bind(book_id.as_uuid())
        .execute(&self.pool)
        .await?;

        let created = inserted.rows_affected() > 0;

        let row = sqlx::query(
            r#"
            SELECT id, user_id, book_id, liked, in_bookmarks, rate
            FROM user_book_relations
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(book_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok((Self::row_to_relation(row)?, created))
    }

    async fn save_relation(&self, relation: &BookRelation) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE user_book_relations
            SET liked = $2, in_bookmarks = $3, rate = $4
            WHERE id = $1
            "#,
        )
        .bind(relation.id)
        .bind(relation.like)
        .bind(relation.in_bookmarks)
        .bind(relation.rate)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                entity: "relation",
                id: relation.id.to_string(),
            });
        }
        Ok(())
    }

    async fn relations_for_book(&self, book_id: BookId) -> Result<Vec<BookRelation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, book_id, liked, in_bookmarks, rate
            FROM user_book_relations
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_relation).collect()
    }

    async fn readers_for_book(&self, book_id: BookId) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.first_name, u.last_name, u.is_staff
            FROM users u
            JOIN user_book_relations r ON r.user_id = u.id
            WHERE r.book_id = $1
            ORDER BY u.id ASC
            "#,
        )
        .bind(book_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_user).collect()
    }
}
