use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use super::error::{FailureReason, GatewayError, GatewayOperation};
use super::CatalogGateway;
use crate::book::{Book, BookId};

/// Process-local gateway. Ids are assigned sequentially from 1.
///
/// Clones share the same collection, so a test can hold one handle while
/// the editor (or the reference server) owns another.
///
/// Test hooks:
/// - [`fail_next`](Self::fail_next) makes the next call of an operation fail.
/// - [`set_latency`](Self::set_latency) delays an operation before it runs.
/// - [`calls`](Self::calls) counts how often an operation was attempted.
#[derive(Clone)]
pub struct InMemoryGateway {
    books: Arc<RwLock<Vec<Book>>>,
    next_id: Arc<AtomicI64>,
    hooks: Arc<Mutex<Hooks>>,
}

#[derive(Default)]
struct Hooks {
    failures: VecDeque<GatewayOperation>,
    latency: HashMap<GatewayOperation, Duration>,
    calls: HashMap<GatewayOperation, usize>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        InMemoryGateway {
            books: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            hooks: Arc::new(Mutex::new(Hooks::default())),
        }
    }

    /// Start with `books` already persisted. Books without an id get one;
    /// the id sequence continues after the largest id present.
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let gateway = Self::new();
        let mut seeded: Vec<Book> = books.into_iter().collect();
        let max_id = seeded.iter().filter_map(|b| b.id).max().unwrap_or(0);
        gateway
            .next_id
            .store(max_id.saturating_add(1), Ordering::SeqCst);
        for book in seeded.iter_mut().filter(|b| b.id.is_none()) {
            book.id = Some(gateway.next_id.fetch_add(1, Ordering::SeqCst));
        }
        if let Ok(mut books) = gateway.books.write() {
            *books = seeded;
        }
        gateway
    }

    /// Make the next call to `operation` fail. Calls queue up: two
    /// `fail_next(List)` fail the next two lists.
    pub fn fail_next(&self, operation: GatewayOperation) {
        if let Ok(mut hooks) = self.hooks.lock() {
            hooks.failures.push_back(operation);
        }
    }

    /// Delay every `operation` by `latency` before it touches the collection.
    pub fn set_latency(&self, operation: GatewayOperation, latency: Duration) {
        if let Ok(mut hooks) = self.hooks.lock() {
            hooks.latency.insert(operation, latency);
        }
    }

    /// Number of attempted calls of `operation`, failed ones included.
    pub fn calls(&self, operation: GatewayOperation) -> usize {
        self.hooks
            .lock()
            .map(|hooks| hooks.calls.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Current server-side contents.
    pub fn snapshot(&self) -> Vec<Book> {
        self.books.read().map(|books| books.clone()).unwrap_or_default()
    }

    /// Record the call, wait out any latency, then fire an injected failure.
    async fn enter(&self, operation: GatewayOperation) -> Result<(), GatewayError> {
        let (latency, fail) = {
            let mut hooks = self.hooks.lock().map_err(|_| poisoned(operation))?;
            *hooks.calls.entry(operation).or_insert(0) += 1;
            let fail = match hooks.failures.iter().position(|op| *op == operation) {
                Some(index) => {
                    hooks.failures.remove(index);
                    true
                }
                None => false,
            };
            (hooks.latency.get(&operation).copied(), fail)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if fail {
            return Err(GatewayError::new(operation, FailureReason::Injected));
        }
        Ok(())
    }
}

fn poisoned(operation: GatewayOperation) -> GatewayError {
    GatewayError::transport(operation, "in-memory store lock poisoned")
}

#[async_trait]
impl CatalogGateway for InMemoryGateway {
    async fn list(&self) -> Result<Vec<Book>, GatewayError> {
        let op = GatewayOperation::List;
        self.enter(op).await?;
        let books = self.books.read().map_err(|_| poisoned(op))?;
        Ok(books.clone())
    }

    async fn create(&self, book: &Book) -> Result<Book, GatewayError> {
        let op = GatewayOperation::Create;
        self.enter(op).await?;
        let mut books = self.books.write().map_err(|_| poisoned(op))?;
        let created = book
            .without_id()
            .with_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        books.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: BookId, book: &Book) -> Result<Book, GatewayError> {
        let op = GatewayOperation::Update;
        self.enter(op).await?;
        let mut books = self.books.write().map_err(|_| poisoned(op))?;
        let slot = books
            .iter_mut()
            .find(|b| b.id == Some(id))
            .ok_or_else(|| GatewayError::status(op, 404))?;
        // the path id wins over whatever the body carried
        *slot = book.without_id().with_id(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: BookId) -> Result<(), GatewayError> {
        let op = GatewayOperation::Delete;
        self.enter(op).await?;
        let mut books = self.books.write().map_err(|_| poisoned(op))?;
        let position = books
            .iter()
            .position(|b| b.id == Some(id))
            .ok_or_else(|| GatewayError::status(op, 404))?;
        books.remove(position);
        Ok(())
    }
}
