//! Transactional storage port for the report book.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use pickdesk_models::Result;
use tracing::debug;

use crate::book::ReportBook;

/// Storage the desk runs against.
///
/// # Implementation Notes
///
/// - `transact` is all-or-nothing: when the closure returns an error, no
///   change it made may become visible.
/// - Transactions are serialized against each other.
/// - `read` must only ever observe committed state.
pub trait ReportStore: Send + Sync {
    fn read<T>(&self, f: impl FnOnce(&ReportBook) -> T) -> T;

    fn transact<T>(&self, f: impl FnOnce(&mut ReportBook) -> Result<T>) -> Result<T>;
}

/// Process-local store. A transaction works on a copy of the book and swaps
/// it in only when the closure succeeds.
///
/// Every transaction clones the whole book, so a write costs O(total records).
/// The clone and the closure run under an upgradable read lock: readers keep
/// seeing the last committed book and only the final swap excludes them.
/// Writers still queue behind each other.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    book: Arc<RwLock<ReportBook>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(book: ReportBook) -> Self {
        Self {
            book: Arc::new(RwLock::new(book)),
        }
    }
}

impl ReportStore for InMemoryStore {
    fn read<T>(&self, f: impl FnOnce(&ReportBook) -> T) -> T {
        let book = self.book.read();
        f(&book)
    }

    fn transact<T>(&self, f: impl FnOnce(&mut ReportBook) -> Result<T>) -> Result<T> {
        let book = self.book.upgradable_read();
        let mut draft = book.clone();
        let output = f(&mut draft).map_err(|e| {
            debug!(error = %e, "transaction rolled back");
            e
        })?;
        *RwLockUpgradableReadGuard::upgrade(book) = draft;
        Ok(output)
    }
}
