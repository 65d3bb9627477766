//! Error type for editor operations.

use thiserror::Error;

use crate::book::{BookId, FormError};
use crate::catalog::CatalogError;
use crate::gateway::GatewayError;
use crate::lock::LockError;

/// Why an editor operation did not advance the state.
///
/// In every case the catalog, cursor and form are left as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The remote call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// A store transition was rejected.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The form could not be coerced into a book.
    #[error("invalid form: {0}")]
    InvalidForm(#[from] FormError),
    /// No book at this catalog position.
    #[error("no book at position {0}")]
    NoSuchPosition(usize),
    /// No book with this id in the local catalog.
    #[error("no book with id {0}")]
    NoSuchBook(BookId),
    /// The book has no id yet, so it cannot be edited or deleted remotely.
    #[error("book at position {0} has not been persisted")]
    NotPersisted(usize),
    /// Internal state lock was poisoned.
    #[error("editor state lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The per-book lock table failed.
    #[error("record lock failed: {0}")]
    RecordLock(#[from] LockError),
}

impl EditorError {
    /// The underlying gateway failure, if that is what this is.
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            EditorError::Gateway(e) => Some(e),
            _ => None,
        }
    }
}
