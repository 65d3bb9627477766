use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use super::error::EditorError;
use super::state::{EditorMode, EditorState, VisibleBook};
use crate::book::{Book, BookForm, BookId};
use crate::catalog::{Catalog, CatalogAction};
use crate::gateway::{CatalogGateway, GatewayError, GatewayOperation};
use crate::lock::InMemoryLockManager;

#[cfg(feature = "emitter")]
use super::notify::ChangeNotifier;

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new book was persisted and appended.
    Created(Book),
    /// The book under edit was persisted. `applied` is false when the book
    /// had already left the local catalog, in which case it was not
    /// re-inserted.
    Updated { book: Book, applied: bool },
}

impl SubmitOutcome {
    pub fn book(&self) -> &Book {
        match self {
            SubmitOutcome::Created(book) => book,
            SubmitOutcome::Updated { book, .. } => book,
        }
    }
}

/// The owning controller: sequences gateway calls and catalog transitions.
///
/// The catalog is only ever changed from the gateway's responses, never from
/// what was submitted locally. Creates and deletes are followed by a full
/// refetch. Updates and deletes of the same book are serialized, so their
/// responses land in the order the calls were made.
///
/// All methods take `&self`; share the editor across tasks with an `Arc`.
/// The state mutex is never held across an `.await`.
pub struct CatalogEditor<G> {
    gateway: G,
    state: Mutex<EditorState>,
    locks: InMemoryLockManager,
    #[cfg(feature = "emitter")]
    notifier: ChangeNotifier,
}

impl<G: CatalogGateway> CatalogEditor<G> {
    /// An editor with an empty catalog. Call [`refresh`](Self::refresh) to
    /// load the remote collection.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: Mutex::new(EditorState::default()),
            locks: InMemoryLockManager::new(),
            #[cfg(feature = "emitter")]
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The per-book locks serializing updates and deletes.
    pub fn locks(&self) -> &InMemoryLockManager {
        &self.locks
    }

    fn state(&self, operation: &'static str) -> Result<MutexGuard<'_, EditorState>, EditorError> {
        self.state
            .lock()
            .map_err(|_| EditorError::LockPoisoned(operation))
    }

    /// Apply one catalog transition. The caller announces it after the
    /// state lock is released.
    fn dispatch(
        state: &mut EditorState,
        action: CatalogAction,
    ) -> Result<CatalogAction, EditorError> {
        debug!(action = action.name(), "catalog transition");
        state.catalog.apply(action.clone())?;
        Ok(action)
    }

    #[cfg(feature = "emitter")]
    fn announce(&self, action: &CatalogAction) {
        self.notifier.emit(action);
    }

    #[cfg(not(feature = "emitter"))]
    fn announce(&self, _action: &CatalogAction) {}

    /// Register a change listener for one of the `CatalogAction::name` events.
    /// The listener receives the JSON payload as a string.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, event: &str, listener: F) -> Option<String>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.notifier.on(event, listener)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// A copy of the full catalog.
    pub fn catalog(&self) -> Result<Catalog, EditorError> {
        Ok(self.state("read catalog")?.catalog.clone())
    }

    pub fn books(&self) -> Result<Vec<Book>, EditorError> {
        Ok(self.state("read catalog")?.catalog.as_slice().to_vec())
    }

    /// The catalog filtered by the current search string.
    pub fn visible(&self) -> Result<Vec<VisibleBook>, EditorError> {
        Ok(self.state("read visible")?.visible())
    }

    pub fn mode(&self) -> Result<EditorMode, EditorError> {
        Ok(self.state("read mode")?.mode())
    }

    /// The record under edit, looked up by id in the current catalog.
    pub fn editing(&self) -> Result<Option<Book>, EditorError> {
        Ok(self.state("read cursor")?.editing().cloned())
    }

    pub fn form(&self) -> Result<BookForm, EditorError> {
        Ok(self.state("read form")?.form.clone())
    }

    pub fn search(&self) -> Result<String, EditorError> {
        Ok(self.state("read search")?.search.clone())
    }

    // ------------------------------------------------------------------
    // Local intents (no gateway call)
    // ------------------------------------------------------------------

    pub fn set_search(&self, search: impl Into<String>) -> Result<(), EditorError> {
        self.state("set search")?.search = search.into();
        Ok(())
    }

    pub fn set_form(&self, form: BookForm) -> Result<(), EditorError> {
        self.state("set form")?.form = form;
        Ok(())
    }

    /// Edit the book at `position` in the full catalog.
    pub fn begin_edit(&self, position: usize) -> Result<Book, EditorError> {
        let mut state = self.state("begin edit")?;
        let id = id_at(&state.catalog, position)?;
        let book = state
            .begin_edit(id)
            .cloned()
            .ok_or(EditorError::NoSuchBook(id))?;
        debug!(id, position, "editing");
        Ok(book)
    }

    /// Edit the book with `id`.
    pub fn begin_edit_id(&self, id: BookId) -> Result<Book, EditorError> {
        let mut state = self.state("begin edit")?;
        let book = state
            .begin_edit(id)
            .cloned()
            .ok_or(EditorError::NoSuchBook(id))?;
        debug!(id, "editing");
        Ok(book)
    }

    /// Back to browsing; the form is cleared.
    pub fn cancel_edit(&self) -> Result<(), EditorError> {
        self.state("cancel edit")?.end_edit();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Remote intents
    // ------------------------------------------------------------------

    /// List the remote collection and install it verbatim.
    ///
    /// On failure the catalog is left as it was.
    pub async fn refresh(&self) -> Result<usize, EditorError> {
        let books = self
            .gateway
            .list()
            .await
            .map_err(|e| log_failure("fetching books", e))?;

        let count = books.len();
        let action = {
            let mut state = self.state("refresh")?;
            Self::dispatch(&mut state, CatalogAction::ReplaceAll(books))?
        };
        self.announce(&action);
        debug!(count, "catalog refreshed");
        Ok(count)
    }

    /// Refetch after a successful create/delete. The mutation already
    /// landed, so a failure here is only logged.
    async fn reconcile(&self, after: GatewayOperation) {
        if let Err(e) = self.refresh().await {
            warn!(after = %after, error = %e, "refetch failed; catalog may be stale");
        }
    }

    /// Submit `form`: update the book under edit, or create a new one.
    pub async fn submit_form(&self, form: BookForm) -> Result<SubmitOutcome, EditorError> {
        self.set_form(form)?;
        self.submit().await
    }

    /// Submit the current form.
    ///
    /// - Editing: the gateway's copy replaces the book at its current
    ///   position, and the editor returns to browsing.
    /// - Browsing: the gateway's copy is appended, the form is cleared, and
    ///   the catalog is refetched.
    ///
    /// On any failure nothing changes and the form stays populated.
    pub async fn submit(&self) -> Result<SubmitOutcome, EditorError> {
        let (cursor, form) = {
            let state = self.state("submit")?;
            (state.cursor, state.form.clone())
        };

        let book = form.to_book(cursor).map_err(|e| {
            warn!(error = %e, "form rejected");
            EditorError::from(e)
        })?;

        match cursor {
            Some(id) => self.update(id, book).await,
            None => self.create(book).await,
        }
    }

    async fn create(&self, book: Book) -> Result<SubmitOutcome, EditorError> {
        let created = self
            .gateway
            .create(&book)
            .await
            .map_err(|e| log_failure("adding book", e))?;
        info!(id = ?created.id, title = %created.title, "book created");

        let action = {
            let mut state = self.state("create")?;
            let action = Self::dispatch(&mut state, CatalogAction::Add(created.clone()))?;
            // the user may have started editing something else meanwhile
            if state.cursor.is_none() {
                state.form.clear();
            }
            action
        };
        self.announce(&action);

        self.reconcile(GatewayOperation::Create).await;
        Ok(SubmitOutcome::Created(created))
    }

    async fn update(&self, id: BookId, book: Book) -> Result<SubmitOutcome, EditorError> {
        let _guard = self.locks.acquire(id).await?;

        let updated = self
            .gateway
            .update(id, &book)
            .await
            .map_err(|e| log_failure("updating book", e))?;
        info!(id, title = %updated.title, "book updated");

        let action = {
            let mut state = self.state("update")?;
            let action = match state.catalog.position_of(id) {
                Some(position) => Some(Self::dispatch(
                    &mut state,
                    CatalogAction::UpdateAt {
                        position,
                        book: updated.clone(),
                    },
                )?),
                None => {
                    warn!(id, "updated book is no longer in the catalog; not re-inserting");
                    None
                }
            };
            state.end_edit_of(id);
            action
        };

        let applied = action.is_some();
        if let Some(action) = action {
            self.announce(&action);
        }
        Ok(SubmitOutcome::Updated {
            book: updated,
            applied,
        })
    }

    /// Delete the book at `position` in the full catalog.
    pub async fn delete_at(&self, position: usize) -> Result<BookId, EditorError> {
        let id = {
            let state = self.state("delete")?;
            id_at(&state.catalog, position)?
        };
        self.delete_id(id).await?;
        Ok(id)
    }

    /// Delete the book with `id`, then refetch.
    ///
    /// If the cursor was on this book the editor returns to browsing.
    pub async fn delete_id(&self, id: BookId) -> Result<(), EditorError> {
        {
            let _guard = self.locks.acquire(id).await?;

            self.gateway
                .delete(id)
                .await
                .map_err(|e| log_failure("deleting book", e))?;
            info!(id, "book deleted");

            let action = {
                let mut state = self.state("delete")?;
                let action = Self::dispatch(&mut state, CatalogAction::DeleteById(id))?;
                state.end_edit_of(id);
                action
            };
            self.announce(&action);
        }

        self.reconcile(GatewayOperation::Delete).await;
        Ok(())
    }
}

/// Id of the book at `position`, or why there isn't one.
fn id_at(catalog: &Catalog, position: usize) -> Result<BookId, EditorError> {
    catalog
        .get(position)
        .ok_or(EditorError::NoSuchPosition(position))?
        .id
        .ok_or(EditorError::NotPersisted(position))
}

fn log_failure(context: &'static str, err: GatewayError) -> EditorError {
    error!(operation = %err.operation, error = %err, "error {}", context);
    EditorError::Gateway(err)
}
