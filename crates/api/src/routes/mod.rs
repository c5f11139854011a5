pub mod books;
pub mod health;
pub mod metrics;
pub mod relations;

use axum::http::HeaderMap;
use common::{BookId, UserId};
use domain::Principal;
use store::CatalogStore;
use uuid::Uuid;

use crate::error::ApiError;
use books::AppState;

/// Header carrying the authenticated user's id, set by the upstream
/// gateway. Absent or unknown ids resolve to the anonymous principal.
pub const USER_ID_HEADER: &str = "x-user-id";

pub(crate) async fn principal_from_headers<S: CatalogStore>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(Principal::Anonymous);
    };

    let raw = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("Invalid X-User-Id header".to_string()))?;
    let uuid = Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid X-User-Id header: {e}")))?;

    Ok(state
        .catalog
        .resolve_principal(Some(UserId::from(uuid)))
        .await?)
}

pub(crate) fn parse_book_id(id: &str) -> Result<BookId, ApiError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(BookId::from(uuid))
}
