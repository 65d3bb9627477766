//! Test gateways and fixtures for the sync suite.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use book_catalog::{Book, BookId, CatalogGateway, FailureReason, GatewayError, GatewayOperation};

pub fn dune() -> Book {
    Book::new("Dune", "Herbert", 1965).with_id(1)
}

pub fn emma() -> Book {
    Book::new("Emma", "Austen", 1815).with_id(2)
}

pub fn ubik() -> Book {
    Book::new("Ubik", "Dick", 1969).with_id(3)
}

/// A gateway that answers from canned responses and records every call.
///
/// Unscripted calls fail, so a test only passes if it scripted exactly
/// the calls the editor makes.
#[derive(Default)]
pub struct ScriptedGateway {
    lists: Mutex<VecDeque<Result<Vec<Book>, GatewayError>>>,
    creates: Mutex<VecDeque<Result<Book, GatewayError>>>,
    updates: Mutex<VecDeque<Result<Book, GatewayError>>>,
    deletes: Mutex<VecDeque<Result<(), GatewayError>>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_ok(self, books: Vec<Book>) -> Self {
        self.lists.lock().unwrap().push_back(Ok(books));
        self
    }

    pub fn list_err(self) -> Self {
        self.lists.lock().unwrap().push_back(Err(injected(GatewayOperation::List)));
        self
    }

    pub fn create_ok(self, book: Book) -> Self {
        self.creates.lock().unwrap().push_back(Ok(book));
        self
    }

    pub fn create_err(self) -> Self {
        self.creates
            .lock()
            .unwrap()
            .push_back(Err(injected(GatewayOperation::Create)));
        self
    }

    pub fn update_ok(self, book: Book) -> Self {
        self.updates.lock().unwrap().push_back(Ok(book));
        self
    }

    pub fn update_err(self) -> Self {
        self.updates
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::status(GatewayOperation::Update, 500)));
        self
    }

    pub fn delete_ok(self) -> Self {
        self.deletes.lock().unwrap().push_back(Ok(()));
        self
    }

    pub fn delete_err(self) -> Self {
        self.deletes
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::status(GatewayOperation::Delete, 503)));
        self
    }

    /// Calls made so far, e.g. `["list", "create {...}", "list"]`.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

fn injected(operation: GatewayOperation) -> GatewayError {
    GatewayError::new(operation, FailureReason::Injected)
}

fn next<T>(
    queue: &Mutex<VecDeque<Result<T, GatewayError>>>,
    operation: GatewayOperation,
) -> Result<T, GatewayError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(injected(operation)))
}

#[async_trait]
impl CatalogGateway for ScriptedGateway {
    async fn list(&self) -> Result<Vec<Book>, GatewayError> {
        self.record("list".to_string());
        next(&self.lists, GatewayOperation::List)
    }

    async fn create(&self, book: &Book) -> Result<Book, GatewayError> {
        self.record(format!("create {}", serde_json::to_string(book).unwrap()));
        next(&self.creates, GatewayOperation::Create)
    }

    async fn update(&self, id: BookId, book: &Book) -> Result<Book, GatewayError> {
        self.record(format!("update {} {}", id, serde_json::to_string(book).unwrap()));
        next(&self.updates, GatewayOperation::Update)
    }

    async fn delete(&self, id: BookId) -> Result<(), GatewayError> {
        self.record(format!("delete {}", id));
        next(&self.deletes, GatewayOperation::Delete)
    }
}
