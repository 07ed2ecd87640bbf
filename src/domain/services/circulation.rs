//! Circulation service - the loan state machine
//!
//! Owns the full lifecycle: borrow, return, extension and the overdue
//! sweep. Two mechanisms keep it correct under concurrent callers:
//!
//! * the borrow critical section takes the per-book mutex and then the
//!   per-borrower mutex (always in that order), so availability and
//!   limit checks cannot interleave with a competing borrow;
//! * return and extend go through a version compare-and-swap on the loan
//!   repository with a bounded retry, so a lost update is impossible and
//!   a copy is released exactly once per loan.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::CirculationConfig;
use crate::domain::entities::{Borrower, Loan, NewLoan, NewTrackingEvent};
use crate::domain::policies::LendingPolicy;
use crate::domain::ports::{Clock, InventoryLedger, LoanQuery, LoanRepository, TrackingRepository};
use crate::domain::services::locks::KeyedLocks;
use crate::domain::value_objects::{
    BookId, EmailAddress, EventKind, LoanId, LoanStatus, DESC_LOAN_CONFIRMATION,
};
use crate::error::{DeweyError, DeweyResult};

/// Input for [`CirculationService::borrow`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowRequest {
    pub book_id: BookId,
    pub borrower_name: String,
    pub borrower_email: String,
    pub external_id: Option<String>,
    /// Explicit due date; defaults to the policy's loan period
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl BorrowRequest {
    pub fn new(
        book_id: BookId,
        borrower_name: impl Into<String>,
        borrower_email: impl Into<String>,
    ) -> Self {
        Self {
            book_id,
            borrower_name: borrower_name.into(),
            borrower_email: borrower_email.into(),
            external_id: None,
            due_date: None,
            notes: None,
        }
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

pub struct CirculationService {
    books: Arc<dyn InventoryLedger>,
    loans: Arc<dyn LoanRepository>,
    tracking: Arc<dyn TrackingRepository>,
    clock: Arc<dyn Clock>,
    policy: LendingPolicy,
    update_retry_limit: u32,
    book_locks: KeyedLocks<BookId>,
    borrower_locks: KeyedLocks<EmailAddress>,
}

impl CirculationService {
    pub fn new(
        books: Arc<dyn InventoryLedger>,
        loans: Arc<dyn LoanRepository>,
        tracking: Arc<dyn TrackingRepository>,
        clock: Arc<dyn Clock>,
        config: &CirculationConfig,
    ) -> Self {
        Self {
            books,
            loans,
            tracking,
            clock,
            policy: LendingPolicy::from_config(config),
            update_retry_limit: config.update_retry_limit,
            book_locks: KeyedLocks::new(),
            borrower_locks: KeyedLocks::new(),
        }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Issue a loan.
    ///
    /// Checks run in a fixed order: request validation, book existence,
    /// no-outstanding-loan-for-this-book, borrower limit, copy
    /// reservation. The availability and limit checks plus the
    /// reservation happen under the book and borrower mutexes, so two
    /// racing borrows of the same book (or by the same borrower) cannot
    /// both pass.
    pub fn borrow(&self, request: BorrowRequest) -> DeweyResult<Loan> {
        let email = self
            .policy
            .validate_borrower(&request.borrower_name, &request.borrower_email)?;

        let now = self.clock.now();
        let loan_date = now;
        let due_date = match request.due_date {
            Some(explicit) => {
                self.policy.validate_due_date(loan_date, explicit)?;
                explicit
            }
            None => self.policy.default_due_date(loan_date)?,
        };

        let book_id = request.book_id;
        if self.books.book(book_id)?.is_none() {
            return Err(DeweyError::BookNotFound(book_id));
        }

        // Lock order: book first, borrower second. Only borrow takes both.
        let book_mutex = self.book_locks.for_key(&book_id);
        let _book_guard = book_mutex.lock().unwrap_or_else(|e| e.into_inner());
        let borrower_mutex = self.borrower_locks.for_key(&email);
        let _borrower_guard = borrower_mutex.lock().unwrap_or_else(|e| e.into_inner());

        // One outstanding loan per book, regardless of how many copies
        // the ledger still reports available.
        let book_outstanding = self
            .loans
            .count(&LoanQuery::all().for_book(book_id).outstanding_only())?;
        if book_outstanding > 0 {
            return Err(DeweyError::BookUnavailable {
                book_id,
                reason: "book already has an outstanding loan".to_owned(),
            });
        }

        let outstanding = self
            .loans
            .count(&LoanQuery::all().for_borrower(email.clone()).outstanding_only())?;
        self.policy.ensure_under_cap(&email, outstanding)?;

        self.books.reserve_copy(book_id)?;

        let mut borrower = Borrower::new(request.borrower_name, email);
        if let Some(external_id) = request.external_id {
            borrower = borrower.with_external_id(external_id);
        }
        let new_loan = NewLoan {
            book_id,
            borrower,
            loan_date,
            due_date,
            notes: request.notes,
        };
        let loan = match self.loans.create(new_loan) {
            Ok(loan) => loan,
            Err(err) => {
                // Reservation must not leak when the create fails.
                if let Err(release_err) = self.books.release_copy(book_id) {
                    tracing::error!(
                        book = %book_id,
                        error = %release_err,
                        "failed to release reserved copy after create failure"
                    );
                }
                return Err(err);
            }
        };

        self.tracking.append(NewTrackingEvent::new(
            loan.id(),
            EventKind::LoanCreated,
            DESC_LOAN_CONFIRMATION,
            now,
        ))?;
        Ok(loan)
    }

    /// Close a loan: `Returned` status, return date, copy released,
    /// audit row appended. Returning twice fails with
    /// `InvalidLoanOperation`.
    pub fn return_loan(&self, loan_id: LoanId, notes: Option<&str>) -> DeweyResult<Loan> {
        let now = self.clock.now();
        let stored = self.update_with_retry(loan_id, |loan| {
            loan.mark_returned(now)?;
            if let Some(notes) = notes {
                loan.set_notes(notes);
            }
            Ok(())
        })?;

        self.books.release_copy(stored.book_id())?;
        self.tracking.append(NewTrackingEvent::new(
            loan_id,
            EventKind::LoanReturned,
            "book returned",
            now,
        ))?;
        Ok(stored)
    }

    /// Push a loan's due date out by `additional_days` (>= 1). An
    /// overdue loan whose new due date lies at or beyond now becomes
    /// active again.
    pub fn extend(&self, loan_id: LoanId, additional_days: i64) -> DeweyResult<Loan> {
        self.policy.validate_extension_days(additional_days)?;
        let now = self.clock.now();
        let stored =
            self.update_with_retry(loan_id, |loan| loan.extend_due(additional_days, now))?;

        self.tracking.append(NewTrackingEvent::new(
            loan_id,
            EventKind::LoanExtended,
            format!(
                "due date extended by {} day(s) to {}",
                additional_days,
                stored.due_date().format("%Y-%m-%d"),
            ),
            now,
        ))?;
        Ok(stored)
    }

    /// Move every `Active` loan whose due date has passed to `Overdue`.
    /// Returns how many loans transitioned. Safe to run repeatedly and
    /// concurrently: a loan that was returned or already swept in the
    /// meantime fails its version check and is simply skipped.
    pub fn sweep_overdue(&self) -> DeweyResult<usize> {
        let now = self.clock.now();
        let stale = self.loans.find(
            &LoanQuery::all()
                .with_status(LoanStatus::Active)
                .due_before(now),
        )?;

        let mut transitioned = 0;
        for mut loan in stale {
            let loan_id = loan.id();
            loan.mark_overdue()?;
            match self.loans.update(&loan) {
                Ok(_) => {
                    self.tracking.append(NewTrackingEvent::new(
                        loan_id,
                        EventKind::StatusChange,
                        "loan past due",
                        now,
                    ))?;
                    transitioned += 1;
                }
                Err(DeweyError::ConcurrencyConflict { .. }) => {
                    tracing::debug!(loan = %loan_id, "loan changed under the sweep, skipping");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(transitioned)
    }

    /// Whether the book has an outstanding (`Active` or `Overdue`) loan
    pub fn is_book_currently_loaned(&self, book_id: BookId) -> DeweyResult<bool> {
        let outstanding = self
            .loans
            .count(&LoanQuery::all().for_book(book_id).outstanding_only())?;
        Ok(outstanding > 0)
    }

    /// Fetch one loan
    pub fn loan(&self, loan_id: LoanId) -> DeweyResult<Option<Loan>> {
        self.loans.get(loan_id)
    }

    /// Outstanding loans held by one borrower, newest first
    pub fn active_loans_for_borrower(&self, email: &EmailAddress) -> DeweyResult<Vec<Loan>> {
        self.loans.find(
            &LoanQuery::all()
                .for_borrower(email.clone())
                .outstanding_only(),
        )
    }

    /// Every loan ever issued for one book, newest first
    pub fn loan_history_for_book(&self, book_id: BookId) -> DeweyResult<Vec<Loan>> {
        self.loans.find(&LoanQuery::all().for_book(book_id))
    }

    /// Re-read, mutate and CAS-store a loan, retrying on version
    /// conflicts up to the configured limit.
    fn update_with_retry(
        &self,
        loan_id: LoanId,
        mut apply: impl FnMut(&mut Loan) -> DeweyResult<()>,
    ) -> DeweyResult<Loan> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let mut loan = self
                .loans
                .get(loan_id)?
                .ok_or(DeweyError::LoanNotFound(loan_id))?;
            apply(&mut loan)?;
            match self.loans.update(&loan) {
                Ok(stored) => return Ok(stored),
                Err(DeweyError::ConcurrencyConflict { .. }) if attempts < self.update_retry_limit => {
                    tracing::debug!(loan = %loan_id, attempts, "loan update conflicted, retrying");
                }
                Err(DeweyError::ConcurrencyConflict { .. }) => {
                    return Err(DeweyError::ConcurrencyConflict { loan_id, attempts });
                }
                Err(err) => return Err(err),
            }
        }
    }
}
