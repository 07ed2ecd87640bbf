//! Book entity - the inventory unit
//!
//! A book owns its copy counters. `available_copies` only moves through
//! `reserve_copy`/`release_copy`, which preserve the ledger invariant
//! `available_copies <= total_copies` no matter how calls interleave.
//! All I/O lives behind the `InventoryLedger` port.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::BookId;

/// A catalogued book with its lendable copy counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    isbn: String,
    title: String,
    total_copies: u32,
    available_copies: u32,
}

impl Book {
    /// Create a book with all copies available
    pub fn new(
        id: BookId,
        isbn: impl Into<String>,
        title: impl Into<String>,
        total_copies: u32,
    ) -> Self {
        Self {
            id,
            isbn: isbn.into(),
            title: title.into(),
            total_copies,
            available_copies: total_copies,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    /// Whether at least one copy is lendable right now
    pub fn has_available_copy(&self) -> bool {
        self.available_copies > 0
    }

    /// Take one copy. Returns `false` when none are available; the counter
    /// never goes below zero.
    pub fn reserve_copy(&mut self) -> bool {
        if self.available_copies == 0 {
            return false;
        }
        self.available_copies -= 1;
        true
    }

    /// Give one copy back. Clamped at `total_copies`; the state machine is
    /// responsible for calling this exactly once per returned loan.
    pub fn release_copy(&mut self) {
        if self.available_copies < self.total_copies {
            self.available_copies += 1;
        }
    }
}

/// Input for registering a book with the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub total_copies: u32,
}

impl NewBook {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>, total_copies: u32) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            total_copies,
        }
    }
}
