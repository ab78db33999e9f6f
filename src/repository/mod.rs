//! Repository layer holding the in-memory book store

pub mod books;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{AppError, AppResult};

pub use books::BookStore;

/// Shared handle to the process-wide store.
///
/// Clones point at the same store. Each request holds the lock for a single
/// handler call, so handlers run one at a time against the store.
#[derive(Clone, Default)]
pub struct Repository {
    books: Arc<Mutex<BookStore>>,
}

impl Repository {
    /// Create a repository with an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository around an existing store
    pub fn with_store(store: BookStore) -> Self {
        Self {
            books: Arc::new(Mutex::new(store)),
        }
    }

    /// Lock the book store for one operation
    pub fn books(&self) -> AppResult<MutexGuard<'_, BookStore>> {
        self.books
            .lock()
            .map_err(|_| AppError::Internal("book store lock poisoned".to_string()))
    }
}
