//! The `Book` record and the form it is edited through.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-assigned identifier of a persisted book.
pub type BookId = i64;

/// One catalog record.
///
/// `id` is `None` until the gateway has persisted the record and handed one
/// back. It is omitted from the JSON body when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl Book {
    /// A record that has not been persisted yet.
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Same record, carrying the given id.
    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }

    /// Same record with the id stripped (the create request body).
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Case-insensitive substring match on the title.
    pub fn title_contains(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }
}

/// Error coercing form text into a `Book`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("year is not a number: {0:?}")]
    InvalidYear(String),
}

/// The editable fields, exactly as typed.
///
/// `year` stays text until submit, where it is coerced to an integer. No
/// other validation happens: empty titles and authors are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub year: String,
}

impl BookForm {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: year.into(),
        }
    }

    /// Populate the form from an existing record.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.to_string(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.author.is_empty() && self.year.is_empty()
    }

    /// Coerce the fields into a `Book` carrying `id`.
    pub fn to_book(&self, id: Option<BookId>) -> Result<Book, FormError> {
        let year = parse_year(&self.year)?;
        Ok(Book {
            id,
            title: self.title.clone(),
            author: self.author.clone(),
            year,
        })
    }
}

/// Leading-integer parse: surrounding whitespace is ignored, an optional
/// sign is accepted, and trailing non-digits are dropped ("1965 AD" -> 1965).
fn parse_year(raw: &str) -> Result<i32, FormError> {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    trimmed[..digits_end]
        .parse::<i32>()
        .map_err(|_| FormError::InvalidYear(raw.to_string()))
}
