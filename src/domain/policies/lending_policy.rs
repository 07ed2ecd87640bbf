//! Lending policy - the pure rules of who may borrow what, for how long
//!
//! Everything here is deterministic and storage-free. The circulation
//! service gathers the facts (current active-loan count, the book row) and
//! asks the policy to rule on them, so every rule is unit-testable without
//! repositories.

use chrono::{DateTime, Duration, Utc};

use crate::config::CirculationConfig;
use crate::domain::value_objects::EmailAddress;
use crate::error::{DeweyError, DeweyResult};

/// Default loan period when no explicit due date is supplied
pub const DEFAULT_LOAN_PERIOD_DAYS: i64 = 14;

/// Default ceiling on simultaneously outstanding loans per borrower
pub const DEFAULT_MAX_LOANS_PER_BORROWER: u32 = 5;

#[derive(Debug, Clone)]
pub struct LendingPolicy {
    loan_period_days: i64,
    max_loans_per_borrower: u32,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            max_loans_per_borrower: DEFAULT_MAX_LOANS_PER_BORROWER,
        }
    }
}

impl LendingPolicy {
    pub fn new(loan_period_days: i64, max_loans_per_borrower: u32) -> Self {
        Self {
            loan_period_days,
            max_loans_per_borrower,
        }
    }

    pub fn from_config(config: &CirculationConfig) -> Self {
        Self::new(config.loan_period_days, config.max_loans_per_borrower)
    }

    pub fn loan_period_days(&self) -> i64 {
        self.loan_period_days
    }

    pub fn max_loans_per_borrower(&self) -> u32 {
        self.max_loans_per_borrower
    }

    /// Validate and normalize the borrower identity of a borrow request
    pub fn validate_borrower(&self, name: &str, email: &str) -> DeweyResult<EmailAddress> {
        if name.trim().is_empty() {
            return Err(DeweyError::validation(
                "borrower_name",
                "must not be empty",
            ));
        }
        EmailAddress::parse(email)
    }

    /// Due date for a loan issued at `loan_date` with no explicit
    /// override. A loan period that runs off the calendar is a
    /// validation error rather than a panic.
    pub fn default_due_date(&self, loan_date: DateTime<Utc>) -> DeweyResult<DateTime<Utc>> {
        Duration::try_days(self.loan_period_days)
            .and_then(|period| loan_date.checked_add_signed(period))
            .ok_or_else(|| {
                DeweyError::validation(
                    "loan_period_days",
                    format!("{} days runs off the calendar", self.loan_period_days),
                )
            })
    }

    /// An explicit due date must not precede the loan date
    pub fn validate_due_date(
        &self,
        loan_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> DeweyResult<()> {
        if due_date < loan_date {
            return Err(DeweyError::validation(
                "due_date",
                "must not be earlier than the loan date",
            ));
        }
        Ok(())
    }

    /// Rule on the per-borrower cap given the count of loans currently out
    pub fn ensure_under_cap(&self, email: &EmailAddress, outstanding: usize) -> DeweyResult<()> {
        if outstanding >= self.max_loans_per_borrower as usize {
            return Err(DeweyError::LoanLimitExceeded {
                email: email.as_str().to_owned(),
                limit: self.max_loans_per_borrower,
            });
        }
        Ok(())
    }

    /// Extensions move the due date forward by at least one day
    pub fn validate_extension_days(&self, days: i64) -> DeweyResult<()> {
        if days < 1 {
            return Err(DeweyError::validation(
                "days",
                "extension must be at least one day",
            ));
        }
        Ok(())
    }
}
