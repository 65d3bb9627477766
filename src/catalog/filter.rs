//! Title search over a catalog. Stateless; recomputed on every read.

use crate::book::Book;

/// Books whose title contains `search`, ignoring case, in input order.
///
/// An empty search keeps everything.
pub fn filter_by_title<'a, I>(books: I, search: &str) -> Vec<&'a Book>
where
    I: IntoIterator<Item = &'a Book>,
{
    let filter = TitleFilter::new(search);
    books.into_iter().filter(|book| filter.matches(book)).collect()
}

/// A lowercased search term, built once and matched against many books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    needle: String,
}

impl TitleFilter {
    pub fn new(search: &str) -> Self {
        Self {
            needle: search.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.is_empty() || book.title_contains(&self.needle)
    }
}
