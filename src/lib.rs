//! book_catalog - a book catalog editor kept in sync with a REST service.
//!
//! - [`Catalog`] is the local ordered collection, changed only through the
//!   four [`CatalogAction`]s.
//! - [`CatalogGateway`] is the remote collection ([`HttpGateway`] over HTTP,
//!   [`InMemoryGateway`] in process).
//! - [`CatalogEditor`] sequences gateway calls and catalog transitions,
//!   tracks the book under edit and the search string.

mod book;
mod catalog;
pub mod config;
mod editor;
mod gateway;
mod lock;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;

pub use book::{Book, BookForm, BookId, FormError};
pub use catalog::{filter_by_title, reduce, Catalog, CatalogAction, CatalogError, TitleFilter};
pub use config::{Config, ConfigError, GatewayConfig, ServerConfig};
pub use editor::{CatalogEditor, EditorError, EditorMode, SubmitOutcome, VisibleBook};
pub use gateway::{
    CatalogGateway, FailureReason, GatewayError, GatewayOperation, HttpGateway, InMemoryGateway,
};
pub use lock::{InMemoryLockManager, LockError, RecordGuard};
