//! Loan entity - one borrowing of one book
//!
//! Loans are historical records: they are created by a borrow, mutated by
//! return/extend and the overdue sweep, and never deleted. Every status
//! mutation goes through a guard method that consults the
//! [`LoanStatus`](crate::domain::value_objects::LoanStatus) transition
//! table, so an illegal lifecycle hop is unrepresentable.
//!
//! The `version` field is the compare-and-swap guard: `LoanRepository`
//! implementations must reject an update whose version does not match the
//! stored record, which is how concurrent return/extend calls are detected
//! instead of silently losing one of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BookId, EmailAddress, LoanId, LoanStatus};
use crate::error::{DeweyError, DeweyResult};

/// The person a loan is issued to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    name: String,
    email: EmailAddress,
    external_id: Option<String>,
}

impl Borrower {
    pub fn new(name: impl Into<String>, email: EmailAddress) -> Self {
        Self {
            name: name.into(),
            email,
            external_id: None,
        }
    }

    /// Attach the patron id of an external membership system
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}

/// Validated input for creating a loan (produced by the lending policy)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    pub book_id: BookId,
    pub borrower: Borrower,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// One borrowing of one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,
    book_id: BookId,
    borrower: Borrower,
    loan_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
    status: LoanStatus,
    notes: Option<String>,
    version: u64,
}

impl Loan {
    /// Materialize a stored loan from validated input. Repositories call
    /// this when persisting a create; the first version is 1.
    pub fn from_new(id: LoanId, new: NewLoan) -> Self {
        Self {
            id,
            book_id: new.book_id,
            borrower: new.borrower,
            loan_date: new.loan_date,
            due_date: new.due_date,
            return_date: None,
            status: LoanStatus::Active,
            notes: new.notes,
            version: 1,
        }
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn borrower(&self) -> &Borrower {
        &self.borrower
    }

    pub fn loan_date(&self) -> DateTime<Utc> {
        self.loan_date
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn return_date(&self) -> Option<DateTime<Utc>> {
        self.return_date
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// CAS guard value; bumped by the repository on every successful update
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// An active loan in the policy sense (`Active` or `Overdue`)
    pub fn is_outstanding(&self) -> bool {
        self.status.is_outstanding()
    }

    /// Whether the due date has passed at `now` and the loan is still out
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.is_outstanding() && self.due_date < now
    }

    /// Signed whole days between the due date and `now` (positive = late)
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        (now - self.due_date).num_days()
    }

    /// Replace the free-text notes
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = Some(notes.into());
    }

    /// `Active` -> `Overdue` (the sweep transition)
    pub fn mark_overdue(&mut self) -> DeweyResult<()> {
        self.transition_to(LoanStatus::Overdue)
    }

    /// `Active`/`Overdue` -> `Returned`. Keeps an already-set return date
    /// (reconciling imported records); otherwise stamps `at`, clamped so
    /// the `return_date >= loan_date` invariant holds even under clock
    /// skew.
    pub fn mark_returned(&mut self, at: DateTime<Utc>) -> DeweyResult<()> {
        self.transition_to(LoanStatus::Returned)?;
        if self.return_date.is_none() {
            self.return_date = Some(at.max(self.loan_date));
        }
        Ok(())
    }

    /// Push the due date out by `days` (already validated positive). An
    /// overdue loan whose new due date is at or past `now` becomes active
    /// again. A day count that pushes the due date off the calendar is a
    /// validation error and leaves the loan untouched.
    pub fn extend_due(&mut self, days: i64, now: DateTime<Utc>) -> DeweyResult<()> {
        if !self.is_outstanding() {
            return Err(self.invalid_op("cannot extend a returned loan"));
        }
        let due_date = chrono::Duration::try_days(days)
            .and_then(|delta| self.due_date.checked_add_signed(delta))
            .ok_or_else(|| {
                DeweyError::validation(
                    "additional_days",
                    format!("{days} days moves the due date off the calendar"),
                )
            })?;
        self.due_date = due_date;
        if self.status == LoanStatus::Overdue && self.due_date >= now {
            self.transition_to(LoanStatus::Active)?;
        }
        Ok(())
    }

    fn transition_to(&mut self, to: LoanStatus) -> DeweyResult<()> {
        if !self.status.can_transition(to) {
            return Err(self.invalid_op(format!(
                "cannot transition from {} to {}",
                self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }

    fn invalid_op(&self, reason: impl Into<String>) -> DeweyError {
        DeweyError::InvalidLoanOperation {
            loan_id: self.id,
            reason: reason.into(),
        }
    }
}
