//! PostgreSQL integration tests.
//!
//! These tests use a shared PostgreSQL container and are ignored by
//! default because they need a running Docker daemon. Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use rust_decimal::Decimal;
use serial_test::serial;
use sqlx::PgPool;
use store::{
    BookOrdering, BookPatch, BookQuery, CatalogStore, NewBook, NewUser, PostgresCatalogStore,
    StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresCatalogStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    let store = PostgresCatalogStore::new(pool.clone());
    store.run_migrations().await.unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE user_book_relations, books, users")
        .execute(&pool)
        .await
        .unwrap();

    store
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn new_book(name: &str, price: &str, author: &str) -> NewBook {
    NewBook {
        name: name.to_string(),
        price: dec(price),
        author_name: author.to_string(),
        owner_id: None,
        discount: 0,
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn insert_and_fetch_book_roundtrip() {
    let store = get_test_store().await;

    let book = store
        .insert_book(new_book("Test book 1", "10.00", "Author 1"))
        .await
        .unwrap();

    let fetched = store.get_book(book.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Test book 1");
    assert_eq!(fetched.price, dec("10.00"));
    assert_eq!(fetched.discount, 0);
    assert_eq!(fetched.rating, None);
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn list_filter_search_and_order() {
    let store = get_test_store().await;

    store
        .insert_book(new_book("Test book 1", "10.00", "Author 1"))
        .await
        .unwrap();
    store
        .insert_book(new_book("Test book 2", "20.00", "Author 2"))
        .await
        .unwrap();
    store
        .insert_book(new_book("Test book Author 1", "20.00", "Author 3"))
        .await
        .unwrap();

    let by_price = store
        .list_books(&BookQuery::all().with_price(dec("20.00")))
        .await
        .unwrap();
    assert_eq!(by_price.len(), 2);

    let by_search = store
        .list_books(&BookQuery::all().with_search("author 1"))
        .await
        .unwrap();
    assert_eq!(by_search.len(), 2);

    let ordered = store
        .list_books(&BookQuery::all().with_ordering(BookOrdering::PriceDesc))
        .await
        .unwrap();
    assert_eq!(ordered[0].price, dec("20.00"));
    assert_eq!(ordered[2].price, dec("10.00"));
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn relation_upsert_is_single_row() {
    let store = get_test_store().await;

    let user = store
        .insert_user(NewUser::named("reader", "Sultan", "Sulaimanov"))
        .await
        .unwrap();
    let book = store
        .insert_book(new_book("Test book 1", "10.00", "Author 1"))
        .await
        .unwrap();

    let (first, created) = store.get_or_create_relation(user.id, book.id).await.unwrap();
    assert!(created);

    let (second, created) = store.get_or_create_relation(user.id, book.id).await.unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);

    let relations = store.relations_for_book(book.id).await.unwrap();
    assert_eq!(relations.len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn save_relation_and_set_rating() {
    let store = get_test_store().await;

    let user = store
        .insert_user(NewUser::named("reader", "Ulan", "Kurmanbekov"))
        .await
        .unwrap();
    let book = store
        .insert_book(new_book("Test book 1", "10.00", "Author 1"))
        .await
        .unwrap();

    let (mut relation, _) = store.get_or_create_relation(user.id, book.id).await.unwrap();
    relation.like = true;
    relation.rate = Some(5);
    store.save_relation(&relation).await.unwrap();

    let stored = store.relations_for_book(book.id).await.unwrap();
    assert_eq!(stored[0].rate, Some(5));
    assert!(stored[0].like);

    store
        .set_book_rating(book.id, Some(dec("5.00")))
        .await
        .unwrap();
    let fetched = store.get_book(book.id).await.unwrap().unwrap();
    assert_eq!(fetched.rating, Some(dec("5.00")));
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn owner_deletion_nulls_book_ownership() {
    let store = get_test_store().await;

    let owner = store
        .insert_user(NewUser::named("owner", "Marlen", "Melsov"))
        .await
        .unwrap();
    let book = store
        .insert_book(NewBook {
            owner_id: Some(owner.id),
            ..new_book("Test book 1", "10.00", "Author 1")
        })
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(owner.id.as_uuid())
        .execute(store.pool())
        .await
        .unwrap();

    let fetched = store.get_book(book.id).await.unwrap().unwrap();
    assert_eq!(fetched.owner_id, None);
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn book_deletion_cascades_and_update_patches() {
    let store = get_test_store().await;

    let user = store
        .insert_user(NewUser::named("reader", "Sultan", "Sulaimanov"))
        .await
        .unwrap();
    let book = store
        .insert_book(NewBook {
            discount: 30,
            ..new_book("Test book 1", "10.00", "Author 1")
        })
        .await
        .unwrap();
    store.get_or_create_relation(user.id, book.id).await.unwrap();

    let updated = store
        .update_book(
            book.id,
            BookPatch {
                name: "Renamed".to_string(),
                price: dec("15.00"),
                author_name: "Author 1".to_string(),
                discount: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.discount, 30);

    assert!(store.delete_book(book.id).await.unwrap());
    assert!(store.relations_for_book(book.id).await.unwrap().is_empty());

    let err = store.set_book_rating(book.id, None).await.unwrap_err();
    assert!(matches!(err, StoreError::RowNotFound { .. }));
}
