//! Reference HTTP server for the book service.
//!
//! Requires the `server` feature. Serves the same surface [`HttpGateway`]
//! talks to, backed by any [`CatalogGateway`] (normally an
//! [`InMemoryGateway`]).
//!
//! ## Routes
//!
//! - `GET /books` - list
//! - `POST /books` - create; body = Book without id, answers Book with id
//! - `PUT /books/:id` - update; body = Book, answers Book
//! - `DELETE /books/:id` - delete; answers 204
//! - `GET /health` - `{ "ok": true, "books": n }`
//!
//! Failures answer `{ "error": "..." }` with the backend's status (404 for
//! an unknown id) or 502 when the backend gave none.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use book_catalog::{server, InMemoryGateway};
//!
//! let app = server::router(Arc::new(InMemoryGateway::new()));
//! // or
//! server::serve(Arc::new(InMemoryGateway::new()), "127.0.0.1:8081").await?;
//! ```
//!
//! [`HttpGateway`]: crate::HttpGateway
//! [`InMemoryGateway`]: crate::InMemoryGateway

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::{info, warn};

use crate::book::{Book, BookId};
use crate::gateway::{CatalogGateway, GatewayError};

/// Build an axum `Router` serving the book API from `backend`.
pub fn router<G: CatalogGateway + 'static>(backend: Arc<G>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<G>))
        .route("/books", get(list_handler::<G>).post(create_handler::<G>))
        .route(
            "/books/:id",
            axum::routing::put(update_handler::<G>).delete(delete_handler::<G>),
        )
        .with_state(backend)
}

/// Serve the book API at `addr` (e.g. `"127.0.0.1:8081"`).
pub async fn serve<G: CatalogGateway + 'static>(
    backend: Arc<G>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(backend);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "book service listening");
    axum::serve(listener, app).await
}

fn error_response(err: GatewayError) -> Response {
    let status = err
        .status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    warn!(status = status.as_u16(), error = %err, "request failed");
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

async fn health_handler<G: CatalogGateway + 'static>(
    State(backend): State<Arc<G>>,
) -> Response {
    match backend.list().await {
        Ok(books) => Json(json!({ "ok": true, "books": books.len() })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_handler<G: CatalogGateway + 'static>(State(backend): State<Arc<G>>) -> Response {
    match backend.list().await {
        Ok(books) => Json(books).into_response(),
        Err(e) => error_response(e),
    }
}

async fn create_handler<G: CatalogGateway + 'static>(
    State(backend): State<Arc<G>>,
    Json(book): Json<Book>,
) -> Response {
    match backend.create(&book).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_handler<G: CatalogGateway + 'static>(
    State(backend): State<Arc<G>>,
    Path(id): Path<BookId>,
    Json(book): Json<Book>,
) -> Response {
    match backend.update(id, &book).await {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_handler<G: CatalogGateway + 'static>(
    State(backend): State<Arc<G>>,
    Path(id): Path<BookId>,
) -> Response {
    match backend.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
