//! Book operations
//!
//! The free functions are the operations themselves: each takes the store
//! explicitly and either completes its single mutation or leaves the store
//! untouched. [`BooksService`] runs them against the shared store.

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use regex::{Regex, RegexBuilder};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookCreated, BookFilter, BookList, BookPayload, BookShort, ValidBook},
    repository::{BookStore, Repository},
};

/// Client-facing messages
pub mod messages {
    pub const CREATE_MISSING_NAME: &str = "Failed to add book. Please provide the book name";
    pub const CREATE_READ_PAGE: &str =
        "Failed to add book. readPage must not be greater than pageCount";
    pub const CREATED: &str = "Book added successfully";
    pub const CREATE_FAILED: &str = "Failed to add book";
    pub const NOT_FOUND: &str = "Book not found";
    pub const UPDATE_MISSING_NAME: &str = "Failed to update book. Please provide the book name";
    pub const UPDATE_READ_PAGE: &str =
        "Failed to update book. readPage must not be greater than pageCount";
    pub const UPDATE_NOT_FOUND: &str = "Failed to update book. Id not found";
    pub const UPDATED: &str = "Book updated successfully";
    pub const DELETE_NOT_FOUND: &str = "Failed to delete book. Id not found";
    pub const DELETED: &str = "Book deleted successfully";
}

const BOOK_ID_LEN: usize = 16;

/// Which operation a payload is validated for; only the messages differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Create,
    Update,
}

/// Reject invalid payloads and derive `finished`.
///
/// The name is checked before the page counts.
pub fn validate_payload(payload: BookPayload, kind: PayloadKind) -> AppResult<ValidBook> {
    let (missing_name, read_page_too_large) = match kind {
        PayloadKind::Create => (messages::CREATE_MISSING_NAME, messages::CREATE_READ_PAGE),
        PayloadKind::Update => (messages::UPDATE_MISSING_NAME, messages::UPDATE_READ_PAGE),
    };

    let name = match payload.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AppError::Validation(missing_name.to_string())),
    };

    if payload.read_page > payload.page_count {
        return Err(AppError::Validation(read_page_too_large.to_string()));
    }

    // Reaching the last page finishes the book; an explicit `finished` is never undone
    let finished = payload.finished || payload.read_page == payload.page_count;

    Ok(ValidBook {
        name,
        year: payload.year,
        author: payload.author,
        summary: payload.summary,
        publisher: payload.publisher,
        page_count: payload.page_count,
        read_page: payload.read_page,
        reading: payload.reading,
        finished,
    })
}

/// Fresh 16-character alphanumeric id
pub fn generate_book_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOOK_ID_LEN)
        .map(char::from)
        .collect()
}

/// Validate, stamp and append a new record
pub fn create_book(store: &mut BookStore, payload: BookPayload) -> AppResult<BookCreated> {
    let valid = validate_payload(payload, PayloadKind::Create)?;

    let mut id = generate_book_id();
    while store.contains(&id) {
        id = generate_book_id();
    }

    store.append(valid.into_book(id.clone(), Utc::now()));

    if !store.contains(&id) {
        return Err(AppError::Internal(messages::CREATE_FAILED.to_string()));
    }

    Ok(BookCreated { book_id: id })
}

/// Case-insensitive name matching; falls back to a literal substring when
/// the pattern is not a valid regex
enum NameMatcher {
    Pattern(Regex),
    Literal(String),
}

impl NameMatcher {
    fn new(pattern: &str) -> Self {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => NameMatcher::Pattern(regex),
            Err(_) => NameMatcher::Literal(pattern.to_lowercase()),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Pattern(regex) => regex.is_match(name),
            NameMatcher::Literal(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Records matching every given filter, projected to `{id, name, publisher}`
pub fn list_books(store: &BookStore, filter: &BookFilter) -> BookList {
    let matcher = filter.name.as_deref().map(NameMatcher::new);

    let books = store
        .iter()
        .filter(|book| filter.reading.map_or(true, |reading| book.reading == reading))
        .filter(|book| filter.finished.map_or(true, |finished| book.finished == finished))
        .filter(|book| matcher.as_ref().map_or(true, |m| m.matches(&book.name)))
        .map(BookShort::from)
        .collect();

    BookList { books }
}

pub fn get_book(store: &BookStore, id: &str) -> AppResult<Book> {
    store
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(messages::NOT_FOUND.to_string()))
}

/// Overwrite all fields but `id` and `insertedAt`; validation runs before the lookup
pub fn update_book(store: &mut BookStore, id: &str, payload: BookPayload) -> AppResult<()> {
    let valid = validate_payload(payload, PayloadKind::Update)?;

    let not_found = || AppError::NotFound(messages::UPDATE_NOT_FOUND.to_string());
    let index = store.position(id).ok_or_else(not_found)?;
    let book = store.get_mut(index).ok_or_else(not_found)?;

    valid.apply_to(book, Utc::now());
    Ok(())
}

pub fn delete_book(store: &mut BookStore, id: &str) -> AppResult<Book> {
    store
        .position(id)
        .and_then(|index| store.remove_at(index))
        .ok_or_else(|| AppError::NotFound(messages::DELETE_NOT_FOUND.to_string()))
}

/// Runs book operations against the shared store
#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn create(&self, payload: BookPayload) -> AppResult<BookCreated> {
        let mut store = self.repository.books()?;
        let created = create_book(&mut store, payload)?;
        tracing::info!(id = %created.book_id, "Book created");
        Ok(created)
    }

    pub fn list(&self, filter: &BookFilter) -> AppResult<BookList> {
        let store = self.repository.books()?;
        let list = list_books(&store, filter);
        tracing::debug!(?filter, count = list.books.len(), "Books listed");
        Ok(list)
    }

    pub fn get(&self, id: &str) -> AppResult<Book> {
        let store = self.repository.books()?;
        get_book(&store, id).inspect_err(|_| tracing::debug!(id, "Book lookup missed"))
    }

    pub fn update(&self, id: &str, payload: BookPayload) -> AppResult<()> {
        let mut store = self.repository.books()?;
        update_book(&mut store, id, payload)?;
        tracing::info!(id, "Book updated");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        let mut store = self.repository.books()?;
        delete_book(&mut store, id)?;
        tracing::info!(id, remaining = store.len(), "Book deleted");
        Ok(())
    }

    /// Number of stored records, used by the readiness probe
    pub fn count(&self) -> AppResult<usize> {
        Ok(self.repository.books()?.len())
    }
}
