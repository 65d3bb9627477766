//! HTTP gateway - the REST book service behind reqwest.
//!
//! | call   | request                   | success body |
//! |--------|---------------------------|--------------|
//! | list   | `GET /books`              | `[Book]`     |
//! | create | `POST /books` + Book      | Book         |
//! | update | `PUT /books/{id}` + Book  | Book         |
//! | delete | `DELETE /books/{id}`      | ignored      |
//!
//! Any non-2xx status is a failure. Bodies are JSON; reqwest sets
//! `Content-Type: application/json` on the ones we send.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{GatewayError, GatewayOperation};
use super::CatalogGateway;
use crate::book::{Book, BookId};
use crate::config::GatewayConfig;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway from configuration. Fails only if the HTTP client
    /// itself cannot be constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, &config.base_url))
    }

    /// Use an existing client (shares its connection pool).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    fn book_url(&self, id: BookId) -> String {
        format!("{}/books/{}", self.base_url, id)
    }

    /// Send and require a 2xx status.
    async fn send(
        &self,
        operation: GatewayOperation,
        request: RequestBuilder,
    ) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::transport(operation, e))?;

        let status = response.status();
        debug!(operation = %operation, status = status.as_u16(), "gateway response");
        if !status.is_success() {
            return Err(GatewayError::status(operation, status.as_u16()));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: GatewayOperation,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = self.send(operation, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transport(operation, e))?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::decode(operation, e))
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn list(&self) -> Result<Vec<Book>, GatewayError> {
        let request = self.client.get(self.books_url());
        self.send_json(GatewayOperation::List, request).await
    }

    async fn create(&self, book: &Book) -> Result<Book, GatewayError> {
        let request = self.client.post(self.books_url()).json(&book.without_id());
        self.send_json(GatewayOperation::Create, request).await
    }

    async fn update(&self, id: BookId, book: &Book) -> Result<Book, GatewayError> {
        let request = self.client.put(self.book_url(id)).json(book);
        self.send_json(GatewayOperation::Update, request).await
    }

    async fn delete(&self, id: BookId) -> Result<(), GatewayError> {
        let request = self.client.delete(self.book_url(id));
        self.send(GatewayOperation::Delete, request).await?;
        Ok(())
    }
}
