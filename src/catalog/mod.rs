//! Catalog - the local, ordered copy of the remote book collection.
//!
//! The catalog changes only through four actions, applied by the pure
//! transition function [`reduce`] (or in place through [`Catalog::apply`]):
//!
//! - `ReplaceAll` installs a freshly listed collection verbatim.
//! - `Add` appends a book returned by a successful create.
//! - `UpdateAt` replaces the book at a position with the gateway's copy.
//! - `DeleteById` drops the first book carrying an id.
//!
//! Each application is all-or-nothing: a failed action leaves the catalog
//! exactly as it was.
//!
//! ## Example
//!
//! ```
//! use book_catalog::{reduce, Book, Catalog, CatalogAction};
//!
//! let catalog = Catalog::new();
//! let catalog = reduce(catalog, CatalogAction::Add(Book::new("Dune", "Herbert", 1965).with_id(1)))?;
//! let catalog = reduce(catalog, CatalogAction::DeleteById(1))?;
//! assert!(catalog.is_empty());
//! # Ok::<(), book_catalog::CatalogError>(())
//! ```

mod filter;

use thiserror::Error;

use crate::book::{Book, BookId};

pub use filter::{filter_by_title, TitleFilter};

/// Store precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("position {position} is out of bounds for a catalog of {len} books")]
    PositionOutOfBounds { position: usize, len: usize },
}

/// The four legal catalog transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    ReplaceAll(Vec<Book>),
    Add(Book),
    UpdateAt { position: usize, book: Book },
    DeleteById(BookId),
}

impl CatalogAction {
    /// Short name used in logs and change notifications.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogAction::ReplaceAll(_) => "catalog.replaced",
            CatalogAction::Add(_) => "book.added",
            CatalogAction::UpdateAt { .. } => "book.updated",
            CatalogAction::DeleteById(_) => "book.deleted",
        }
    }
}

/// Ordered book collection. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Apply one action in place.
    ///
    /// Returns `true` when the catalog changed. `DeleteById` for an absent id
    /// and `ReplaceAll` with identical contents still count as applied but
    /// report `false`.
    pub fn apply(&mut self, action: CatalogAction) -> Result<bool, CatalogError> {
        match action {
            CatalogAction::ReplaceAll(books) => Ok(self.replace_all(books)),
            CatalogAction::Add(book) => {
                self.add(book);
                Ok(true)
            }
            CatalogAction::UpdateAt { position, book } => {
                self.update_at(position, book)?;
                Ok(true)
            }
            CatalogAction::DeleteById(id) => Ok(self.delete_by_id(id)),
        }
    }

    /// Discard the current contents and install `books` verbatim.
    pub fn replace_all(&mut self, books: Vec<Book>) -> bool {
        let changed = self.books != books;
        self.books = books;
        changed
    }

    /// Append to the end.
    pub fn add(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Replace the book at `position`.
    pub fn update_at(&mut self, position: usize, book: Book) -> Result<(), CatalogError> {
        let len = self.books.len();
        let slot = self
            .books
            .get_mut(position)
            .ok_or(CatalogError::PositionOutOfBounds { position, len })?;
        *slot = book;
        Ok(())
    }

    /// Remove the first book whose id is `id`. Returns whether one was removed.
    pub fn delete_by_id(&mut self, id: BookId) -> bool {
        match self.position_of(id) {
            Some(position) => {
                self.books.remove(position);
                true
            }
            None => false,
        }
    }

    /// Current position of the book with `id`.
    pub fn position_of(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|book| book.id == Some(id))
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == Some(id))
    }

    pub fn get(&self, position: usize) -> Option<&Book> {
        self.books.get(position)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    pub fn as_slice(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    /// Books whose title contains `search`, ignoring case.
    pub fn filtered(&self, search: &str) -> Vec<&Book> {
        filter_by_title(&self.books, search)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

/// Pure transition: `(state, action) -> state`.
///
/// On error the input catalog is dropped; callers that need to keep it
/// should clone first or use [`Catalog::apply`], which never changes the
/// catalog on failure.
pub fn reduce(mut catalog: Catalog, action: CatalogAction) -> Result<Catalog, CatalogError> {
    catalog.apply(action)?;
    Ok(catalog)
}
