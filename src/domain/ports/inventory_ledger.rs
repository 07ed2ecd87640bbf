//! Inventory ledger port
//!
//! The ledger owns the copy counts. `reserve_copy` must be atomic: under
//! concurrent borrows of the last copy, exactly one caller may win. The
//! circulation service relies on that guarantee instead of holding its own
//! lock around the decrement.

use crate::domain::entities::{Book, NewBook};
use crate::domain::value_objects::BookId;
use crate::error::DeweyResult;

pub trait InventoryLedger: Send + Sync {
    /// Add a title to the ledger, fully available. Rejects a duplicate
    /// ISBN with a validation error.
    fn register(&self, new: NewBook) -> DeweyResult<Book>;

    /// Look up a book by id
    fn book(&self, id: BookId) -> DeweyResult<Option<Book>>;

    /// Look up a book by ISBN
    fn book_by_isbn(&self, isbn: &str) -> DeweyResult<Option<Book>>;

    /// Atomically claim one available copy. Fails with `BookUnavailable`
    /// when none are left and `BookNotFound` for an unknown id. Returns
    /// the book as stored after the decrement.
    fn reserve_copy(&self, id: BookId) -> DeweyResult<Book>;

    /// Hand one copy back, clamped at `total_copies`. Returns the book as
    /// stored after the increment.
    fn release_copy(&self, id: BookId) -> DeweyResult<Book>;
}
