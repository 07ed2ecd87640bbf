//! Error types for dewey
//!
//! One central `thiserror` enum; every failure the engine can report is a
//! distinct, machine-matchable variant so the API layer can map each kind
//! to its own response.

use thiserror::Error;

use crate::domain::value_objects::{BookId, LoanId};

/// Result type alias for dewey operations
pub type DeweyResult<T> = Result<T, DeweyError>;

/// Main error type for dewey operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeweyError {
    /// Malformed input: missing borrower fields, bad email, bad dates,
    /// non-positive extension days, malformed ranges.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// No copies left, or the book already has an active loan outstanding
    #[error("book {book_id} is unavailable: {reason}")]
    BookUnavailable { book_id: BookId, reason: String },

    /// Borrower is at the active-loan policy cap
    #[error("borrower {email} has reached the limit of {limit} active loans")]
    LoanLimitExceeded { email: String, limit: u32 },

    /// No loan with the given id
    #[error("loan {0} not found")]
    LoanNotFound(LoanId),

    /// No book with the given id
    #[error("book {0} not found")]
    BookNotFound(BookId),

    /// Operation not allowed in the loan's current status
    /// (e.g. returning an already-returned loan)
    #[error("invalid operation on loan {loan_id}: {reason}")]
    InvalidLoanOperation { loan_id: LoanId, reason: String },

    /// Lost-update detected: the loan changed under us and bounded retries
    /// were exhausted
    #[error("loan {loan_id} was modified concurrently ({attempts} attempts)")]
    ConcurrencyConflict { loan_id: LoanId, attempts: u32 },
}

impl DeweyError {
    /// Shorthand for a validation failure on a named field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DeweyError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for input/policy failures the caller caused (as opposed to
    /// state conflicts detected by the engine)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DeweyError::Validation { .. } | DeweyError::LoanLimitExceeded { .. }
        )
    }
}
