//! Loan repository port

use chrono::{DateTime, Utc};

use crate::domain::entities::{Loan, NewLoan};
use crate::domain::value_objects::{BookId, DateRange, EmailAddress, LoanId, LoanStatus};
use crate::error::DeweyResult;

/// Filter for loan lookups. All fields are conjunctive; the default query
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanQuery {
    pub book_id: Option<BookId>,
    pub borrower_email: Option<EmailAddress>,
    pub status: Option<LoanStatus>,
    /// Restrict to loans that are still out (`Active` or `Overdue`)
    pub outstanding: bool,
    /// Due strictly before this instant (the overdue scan)
    pub due_before: Option<DateTime<Utc>>,
    /// Due inside this inclusive window (the reminder scan)
    pub due_within: Option<DateRange>,
}

impl LoanQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_book(mut self, book_id: BookId) -> Self {
        self.book_id = Some(book_id);
        self
    }

    pub fn for_borrower(mut self, email: EmailAddress) -> Self {
        self.borrower_email = Some(email);
        self
    }

    pub fn with_status(mut self, status: LoanStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn outstanding_only(mut self) -> Self {
        self.outstanding = true;
        self
    }

    pub fn due_before(mut self, instant: DateTime<Utc>) -> Self {
        self.due_before = Some(instant);
        self
    }

    pub fn due_within(mut self, window: DateRange) -> Self {
        self.due_within = Some(window);
        self
    }

    /// Whether `loan` satisfies every set filter
    pub fn matches(&self, loan: &Loan) -> bool {
        if let Some(book_id) = self.book_id {
            if loan.book_id() != book_id {
                return false;
            }
        }
        if let Some(ref email) = self.borrower_email {
            if loan.borrower().email() != email {
                return false;
            }
        }
        if let Some(status) = self.status {
            if loan.status() != status {
                return false;
            }
        }
        if self.outstanding && !loan.is_outstanding() {
            return false;
        }
        if let Some(instant) = self.due_before {
            if loan.due_date() >= instant {
                return false;
            }
        }
        if let Some(ref window) = self.due_within {
            if !window.contains(loan.due_date()) {
                return false;
            }
        }
        true
    }
}

pub trait LoanRepository: Send + Sync {
    /// Persist a validated loan, assigning its id. First version is 1.
    fn create(&self, new: NewLoan) -> DeweyResult<Loan>;

    /// Fetch one loan by id
    fn get(&self, id: LoanId) -> DeweyResult<Option<Loan>>;

    /// Store `loan` if and only if its version matches the stored record,
    /// bumping the version. A mismatch fails with `ConcurrencyConflict`;
    /// an unknown id with `LoanNotFound`. Returns the record as stored.
    fn update(&self, loan: &Loan) -> DeweyResult<Loan>;

    /// All loans matching `query`, newest loan date first (ties broken by
    /// descending id)
    fn find(&self, query: &LoanQuery) -> DeweyResult<Vec<Loan>>;

    /// Number of loans matching `query`
    fn count(&self, query: &LoanQuery) -> DeweyResult<usize>;
}
