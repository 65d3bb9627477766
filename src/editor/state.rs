use serde::Serialize;

use crate::book::{Book, BookForm, BookId};
use crate::catalog::{Catalog, TitleFilter};

/// What the form is currently for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EditorMode {
    /// No cursor: submitting creates a new book.
    Browsing,
    /// Submitting updates the book with this id.
    Editing { id: BookId },
}

/// A book in the filtered view, with its position in the full catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleBook {
    pub position: usize,
    pub book: Book,
}

/// Everything the editor owns, guarded by one mutex.
#[derive(Debug, Default)]
pub(crate) struct EditorState {
    pub catalog: Catalog,
    pub cursor: Option<BookId>,
    pub form: BookForm,
    pub search: String,
}

impl EditorState {
    pub fn mode(&self) -> EditorMode {
        match self.cursor {
            Some(id) => EditorMode::Editing { id },
            None => EditorMode::Browsing,
        }
    }

    /// Point the cursor at `id` and load its fields into the form.
    pub fn begin_edit(&mut self, id: BookId) -> Option<&Book> {
        let book = self.catalog.find(id)?;
        self.form = BookForm::from_book(book);
        self.cursor = Some(id);
        Some(book)
    }

    pub fn end_edit(&mut self) {
        self.cursor = None;
        self.form.clear();
    }

    /// Drop the cursor if it points at `id`. Returns whether it did.
    pub fn end_edit_of(&mut self, id: BookId) -> bool {
        if self.cursor == Some(id) {
            self.end_edit();
            true
        } else {
            false
        }
    }

    /// The record under edit, resolved against the current catalog.
    pub fn editing(&self) -> Option<&Book> {
        self.cursor.and_then(|id| self.catalog.find(id))
    }

    pub fn visible(&self) -> Vec<VisibleBook> {
        let filter = TitleFilter::new(&self.search);
        self.catalog
            .iter()
            .enumerate()
            .filter(|(_, book)| filter.matches(book))
            .map(|(position, book)| VisibleBook {
                position,
                book: book.clone(),
            })
            .collect()
    }
}
