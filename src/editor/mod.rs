//! Editor - keeps the local catalog in sync with the gateway.
//!
//! The editor is either browsing (no cursor) or editing one book, tracked by
//! id. Intents map onto gateway calls and catalog transitions:
//!
//! | intent              | gateway call   | on success                              |
//! |---------------------|----------------|-----------------------------------------|
//! | `refresh`           | `list`         | `ReplaceAll`                            |
//! | `submit` (browsing) | `create`       | `Add`, clear form, refetch              |
//! | `submit` (editing)  | `update`       | `UpdateAt(current position)`, browse    |
//! | `delete_*`          | `delete`       | `DeleteById`, refetch                   |
//!
//! A failed call changes nothing. The failure is logged and returned as an
//! [`EditorError`], so the caller decides how to present it.
//!
//! ## Example
//!
//! ```ignore
//! use book_catalog::{BookForm, CatalogEditor, HttpGateway, GatewayConfig};
//!
//! let editor = CatalogEditor::new(HttpGateway::new(&GatewayConfig::default())?);
//! editor.refresh().await?;
//! editor.submit_form(BookForm::new("Dune", "Herbert", "1965")).await?;
//! editor.set_search("dun")?;
//! for entry in editor.visible()? {
//!     println!("{}: {}", entry.position, entry.book.title);
//! }
//! ```

mod editor;
mod error;
#[cfg(feature = "emitter")]
mod notify;
mod state;

pub use editor::{CatalogEditor, SubmitOutcome};
pub use error::EditorError;
pub use state::{EditorMode, VisibleBook};
