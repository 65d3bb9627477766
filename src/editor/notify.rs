//! Change notifications, so a front end knows when to re-render.
//!
//! Event names match [`CatalogAction::name`](crate::CatalogAction::name):
//! `catalog.replaced`, `book.added`, `book.updated`, `book.deleted`. The
//! payload is a JSON string. Listeners run on emitter threads, so they see
//! the change shortly after it is applied, not synchronously.

use std::sync::Mutex;

use event_emitter_rs::EventEmitter;
use serde_json::{json, Value};
use tracing::warn;

use crate::catalog::CatalogAction;

pub(crate) struct ChangeNotifier {
    emitter: Mutex<EventEmitter>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// Register a listener. Returns the listener id.
    pub fn on<F>(&self, event: &str, listener: F) -> Option<String>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        match self.emitter.lock() {
            Ok(mut emitter) => Some(emitter.on(event, listener)),
            Err(_) => {
                warn!(event, "change emitter poisoned; listener not registered");
                None
            }
        }
    }

    pub fn emit(&self, action: &CatalogAction) {
        let payload = payload(action).to_string();
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.emit(action.name(), payload);
            }
            Err(_) => warn!(event = action.name(), "change emitter poisoned; event dropped"),
        }
    }
}

fn payload(action: &CatalogAction) -> Value {
    match action {
        CatalogAction::ReplaceAll(books) => json!({ "count": books.len() }),
        CatalogAction::Add(book) => json!({ "book": book }),
        CatalogAction::UpdateAt { position, book } => {
            json!({ "position": position, "book": book })
        }
        CatalogAction::DeleteById(id) => json!({ "id": id }),
    }
}
