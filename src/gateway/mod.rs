//! Gateway - the remote book collection.
//!
//! The gateway is a stateless boundary: list, create, update and delete,
//! keyed by a server-assigned integer id. Every call is a single attempt;
//! there is no retry and no idempotency key.
//!
//! Two implementations ship with the crate:
//!
//! - [`HttpGateway`] talks to the REST service (`GET/POST /books`,
//!   `PUT/DELETE /books/{id}`).
//! - [`InMemoryGateway`] keeps the collection in process and assigns ids
//!   itself. Used by tests and as the backend of the reference server.

mod error;
mod http;
mod in_memory;

use async_trait::async_trait;

use crate::book::{Book, BookId};

pub use error::{FailureReason, GatewayError, GatewayOperation};
pub use http::HttpGateway;
pub use in_memory::InMemoryGateway;

/// Remote persistence for the catalog.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Every book, in the server's order.
    async fn list(&self) -> Result<Vec<Book>, GatewayError>;

    /// Persist a new book. Any `id` on the input is ignored; the returned
    /// book carries the id the server assigned.
    async fn create(&self, book: &Book) -> Result<Book, GatewayError>;

    /// Overwrite the book with `id`, returning the server's copy.
    async fn update(&self, id: BookId, book: &Book) -> Result<Book, GatewayError>;

    async fn delete(&self, id: BookId) -> Result<(), GatewayError>;
}

#[async_trait]
impl<G: CatalogGateway + ?Sized> CatalogGateway for std::sync::Arc<G> {
    async fn list(&self) -> Result<Vec<Book>, GatewayError> {
        (**self).list().await
    }

    async fn create(&self, book: &Book) -> Result<Book, GatewayError> {
        (**self).create(book).await
    }

    async fn update(&self, id: BookId, book: &Book) -> Result<Book, GatewayError> {
        (**self).update(id, book).await
    }

    async fn delete(&self, id: BookId) -> Result<(), GatewayError> {
        (**self).delete(id).await
    }
}
