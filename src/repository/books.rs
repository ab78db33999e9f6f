//! In-memory book store

use crate::models::book::Book;

/// Ordered sequence of book records.
///
/// Order follows insertion and is what list responses preserve. Indexes
/// returned by [`BookStore::position`] stay valid until the next removal.
#[derive(Debug, Default)]
pub struct BookStore {
    books: Vec<Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    /// First record with the given id
    pub fn find(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Index of the first record with the given id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Book> {
        self.books.get_mut(index)
    }

    /// Remove the record at `index`, shifting later records down
    pub fn remove_at(&mut self, index: usize) -> Option<Book> {
        (index < self.books.len()).then(|| self.books.remove(index))
    }
}
