//! Catalog error types.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An error occurred in the catalog store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The requested entity does not exist.
    #[error("Not found.")]
    NotFound,

    /// The operation requires an authenticated principal.
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,

    /// The principal may not mutate this book.
    ///
    /// The message is deliberately uniform for every denial reason;
    /// the response never reveals whether ownership or staff status
    /// was the missing piece.
    #[error("You do not have permission to perform this action.")]
    Forbidden,

    /// A field failed validation; nothing was persisted.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl CatalogError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
