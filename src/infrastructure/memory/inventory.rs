//! In-memory inventory ledger
//!
//! Copy counts live in one map behind a `RwLock`. Taking the write lock
//! for `reserve_copy` makes the check-and-decrement a single atomic unit:
//! two threads racing for the last copy serialize on the lock and exactly
//! one sees it available.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entities::{Book, NewBook};
use crate::domain::ports::InventoryLedger;
use crate::domain::value_objects::BookId;
use crate::error::{DeweyError, DeweyResult};

#[derive(Debug, Default)]
struct InventoryState {
    books: HashMap<BookId, Book>,
    by_isbn: HashMap<String, BookId>,
}

#[derive(Debug, Default)]
pub struct InMemoryInventory {
    state: RwLock<InventoryState>,
    next_id: AtomicU64,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, InventoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, InventoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl InventoryLedger for InMemoryInventory {
    fn register(&self, new: NewBook) -> DeweyResult<Book> {
        let mut state = self.write();
        if state.by_isbn.contains_key(&new.isbn) {
            return Err(DeweyError::validation(
                "isbn",
                format!("{} is already registered", new.isbn),
            ));
        }
        let id = BookId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let book = Book::new(id, new.isbn, new.title, new.total_copies);
        state.by_isbn.insert(book.isbn().to_owned(), id);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    fn book(&self, id: BookId) -> DeweyResult<Option<Book>> {
        Ok(self.read().books.get(&id).cloned())
    }

    fn book_by_isbn(&self, isbn: &str) -> DeweyResult<Option<Book>> {
        let state = self.read();
        Ok(state
            .by_isbn
            .get(isbn)
            .and_then(|id| state.books.get(id))
            .cloned())
    }

    fn reserve_copy(&self, id: BookId) -> DeweyResult<Book> {
        let mut state = self.write();
        let book = state
            .books
            .get_mut(&id)
            .ok_or(DeweyError::BookNotFound(id))?;
        if !book.reserve_copy() {
            return Err(DeweyError::BookUnavailable {
                book_id: id,
                reason: "no copies available".to_owned(),
            });
        }
        Ok(book.clone())
    }

    fn release_copy(&self, id: BookId) -> DeweyResult<Book> {
        let mut state = self.write();
        let book = state
            .books
            .get_mut(&id)
            .ok_or(DeweyError::BookNotFound(id))?;
        book.release_copy();
        Ok(book.clone())
    }
}
