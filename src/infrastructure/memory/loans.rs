//! In-memory loan repository
//!
//! `update` enforces the version compare-and-swap: a write whose version
//! does not match the stored record is rejected, never merged. The check
//! and the store happen under one write lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entities::{Loan, NewLoan};
use crate::domain::ports::{LoanQuery, LoanRepository};
use crate::domain::value_objects::LoanId;
use crate::error::{DeweyError, DeweyResult};

#[derive(Debug, Default)]
pub struct InMemoryLoans {
    loans: RwLock<HashMap<LoanId, Loan>>,
    next_id: AtomicU64,
}

impl InMemoryLoans {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<LoanId, Loan>> {
        self.loans.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<LoanId, Loan>> {
        self.loans.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl LoanRepository for InMemoryLoans {
    fn create(&self, new: NewLoan) -> DeweyResult<Loan> {
        let id = LoanId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let loan = Loan::from_new(id, new);
        self.write().insert(id, loan.clone());
        Ok(loan)
    }

    fn get(&self, id: LoanId) -> DeweyResult<Option<Loan>> {
        Ok(self.read().get(&id).cloned())
    }

    fn update(&self, loan: &Loan) -> DeweyResult<Loan> {
        let mut loans = self.write();
        let stored = loans
            .get_mut(&loan.id())
            .ok_or(DeweyError::LoanNotFound(loan.id()))?;
        if stored.version() != loan.version() {
            return Err(DeweyError::ConcurrencyConflict {
                loan_id: loan.id(),
                attempts: 1,
            });
        }
        let bumped = loan.clone().with_version(loan.version() + 1);
        *stored = bumped.clone();
        Ok(bumped)
    }

    fn find(&self, query: &LoanQuery) -> DeweyResult<Vec<Loan>> {
        let mut matched: Vec<Loan> = self
            .read()
            .values()
            .filter(|loan| query.matches(loan))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.loan_date()
                .cmp(&a.loan_date())
                .then(b.id().cmp(&a.id()))
        });
        Ok(matched)
    }

    fn count(&self, query: &LoanQuery) -> DeweyResult<usize> {
        Ok(self.read().values().filter(|loan| query.matches(loan)).count())
    }
}
