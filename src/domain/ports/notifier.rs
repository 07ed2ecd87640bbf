//! Notifier port
//!
//! Delivery is infrastructure: the engine only decides *that* a notice is
//! owed and records the send in the tracking log. Failures from a sink are
//! opaque, so the port speaks `anyhow`; the scheduler folds them into its
//! batch report rather than aborting the run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Loan;
use crate::domain::value_objects::{BookId, EmailAddress, LoanId};

/// A rendered notification, ready for whatever channel the sink wraps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub recipient: EmailAddress,
    pub subject: String,
    pub body: String,
}

impl Notice {
    /// Reminder for a loan coming due
    pub fn due_reminder(loan: &Loan) -> Self {
        Self {
            loan_id: loan.id(),
            book_id: loan.book_id(),
            recipient: loan.borrower().email().clone(),
            subject: "Your loan is due soon".to_owned(),
            body: format!(
                "Hello {}, loan {} is due on {}. Please return or extend it.",
                loan.borrower().name(),
                loan.id(),
                loan.due_date().format("%Y-%m-%d"),
            ),
        }
    }

    /// Notice for a loan past its due date
    pub fn overdue_notice(loan: &Loan, now: DateTime<Utc>) -> Self {
        let days = loan.days_overdue(now).max(1);
        Self {
            loan_id: loan.id(),
            book_id: loan.book_id(),
            recipient: loan.borrower().email().clone(),
            subject: "Your loan is overdue".to_owned(),
            body: format!(
                "Hello {}, loan {} was due on {} and is {} day(s) overdue. Please return it.",
                loan.borrower().name(),
                loan.id(),
                loan.due_date().format("%Y-%m-%d"),
                days,
            ),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn deliver(&self, notice: &Notice) -> anyhow::Result<()>;
}

/// Sink that swallows every notice. Default wiring for embedders that only
/// want the tracking log.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn deliver(&self, _notice: &Notice) -> anyhow::Result<()> {
        Ok(())
    }
}
