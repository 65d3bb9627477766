//! Per-record locks.
//!
//! Mutating gateway calls on the same book are serialized through one async
//! lock per id, so their responses are applied to the catalog in the order
//! the calls were issued. Calls on different ids, and creates, are not
//! serialized against each other.

mod error;
mod in_memory;

pub use error::LockError;
pub use in_memory::{InMemoryLockManager, RecordGuard};
