//! Per-user book relation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use domain::RelationUpdate;
use serde::{Deserialize, Deserializer, Serialize};
use store::{BookRelation, CatalogStore};

use crate::error::ApiError;
use crate::routes::books::AppState;
use crate::routes::{parse_book_id, principal_from_headers};

/// Body for PATCH /relations/:book_id/ — any subset of the fields.
///
/// `rate` uses a double option so that an absent field (leave
/// unchanged) is distinguished from an explicit `null` (clear the
/// rate).
#[derive(Deserialize)]
pub struct RelationPatchRequest {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub rate: Option<Option<i32>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

#[derive(Serialize)]
pub struct RelationResponse {
    pub book: String,
    pub like: bool,
    pub in_bookmarks: bool,
    pub rate: Option<i32>,
}

impl From<BookRelation> for RelationResponse {
    fn from(relation: BookRelation) -> Self {
        Self {
            book: relation.book_id.to_string(),
            like: relation.like,
            in_bookmarks: relation.in_bookmarks,
            rate: relation.rate,
        }
    }
}

/// PATCH /relations/:book_id/ — partial update of the caller's
/// relation to the book, auto-created on first touch.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update<S: CatalogStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<RelationPatchRequest>,
) -> Result<Json<RelationResponse>, ApiError> {
    let book_id = parse_book_id(&book_id)?;
    let principal = principal_from_headers(&state, &headers).await?;

    let relation = state
        .catalog
        .update_relation(
            &principal,
            book_id,
            RelationUpdate {
                like: req.like,
                in_bookmarks: req.in_bookmarks,
                rate: req.rate,
            },
        )
        .await?;

    Ok(Json(relation.into()))
}
