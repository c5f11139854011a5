//! Book collection and detail endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use domain::{BookView, CatalogService, CreateBook, UpdateBook};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{BookOrdering, BookQuery, CatalogStore};

use crate::error::ApiError;
use crate::routes::{parse_book_id, principal_from_headers};

/// Shared application state accessible from all handlers.
pub struct AppState<S: CatalogStore> {
    pub catalog: CatalogService<S>,
}

// -- Request types --

/// Body for both POST (create) and PUT (full update).
#[derive(Deserialize)]
pub struct BookWriteRequest {
    pub name: String,
    pub price: Decimal,
    pub author_name: String,
    pub discount: Option<i32>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub price: Option<Decimal>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ReaderResponse {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize)]
pub struct BookResponse {
    pub id: String,
    pub name: String,
    pub price: String,
    pub discounted_price: String,
    pub author_name: String,
    pub likes_count: i64,
    pub rating: Option<String>,
    pub owner_name: String,
    pub readers: Vec<ReaderResponse>,
}

impl From<BookView> for BookResponse {
    fn from(view: BookView) -> Self {
        Self {
            id: view.book.id.to_string(),
            name: view.book.name,
            price: money(view.book.price),
            discounted_price: money(view.discounted_price),
            author_name: view.book.author_name,
            likes_count: view.likes_count,
            rating: view.book.rating.map(money),
            owner_name: view.owner_name,
            readers: view
                .readers
                .into_iter()
                .map(|r| ReaderResponse {
                    first_name: r.first_name,
                    last_name: r.last_name,
                })
                .collect(),
        }
    }
}

/// Renders a decimal as a fixed 2-decimal string ("10.00", "9.00").
fn money(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

// -- Handlers --

/// GET /books/ — list books with optional filter, search, and ordering.
#[tracing::instrument(skip(state, params))]
pub async fn list<S: CatalogStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let ordering = match params.ordering.as_deref() {
        Some(raw) => Some(BookOrdering::parse(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("\"{raw}\" is not a valid ordering."))
        })?),
        None => None,
    };

    let query = BookQuery {
        price: params.price,
        search: params.search,
        ordering,
    };

    let views = state.catalog.list_books(&query).await?;
    Ok(Json(views.into_iter().map(BookResponse::from).collect()))
}

/// POST /books/ — create a book owned by the caller.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: CatalogStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<BookWriteRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let principal = principal_from_headers(&state, &headers).await?;

    let view = state
        .catalog
        .create_book(
            &principal,
            CreateBook {
                name: req.name,
                price: req.price,
                author_name: req.author_name,
                discount: req.discount,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

/// GET /books/:id/ — retrieve a book with derived fields.
#[tracing::instrument(skip(state))]
pub async fn retrieve<S: CatalogStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book_id = parse_book_id(&id)?;
    let view = state.catalog.get_book(book_id).await?;
    Ok(Json(view.into()))
}

/// PUT /books/:id/ — full update of a book's writable fields.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update<S: CatalogStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<BookWriteRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let book_id = parse_book_id(&id)?;
    let principal = principal_from_headers(&state, &headers).await?;

    let view = state
        .catalog
        .update_book(
            &principal,
            book_id,
            UpdateBook {
                name: req.name,
                price: req.price,
                author_name: req.author_name,
                discount: req.discount,
            },
        )
        .await?;

    Ok(Json(view.into()))
}

/// DELETE /books/:id/ — delete a book and its relations.
#[tracing::instrument(skip(state, headers))]
pub async fn destroy<S: CatalogStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let book_id = parse_book_id(&id)?;
    let principal = principal_from_headers(&state, &headers).await?;

    state.catalog.delete_book(&principal, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
