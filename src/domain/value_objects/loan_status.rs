//! Loan Status Value Object
//!
//! The three-state loan lifecycle and its transition table:
//!
//! ```text
//! Active ──► Overdue ──► Returned
//!    │           │
//!    └───────────┼─────► Returned   (on-time return)
//!                └─────► Active     (extension past "now")
//! ```
//!
//! `Returned` is terminal. Every status mutation in the engine goes through
//! `can_transition`, so an illegal hop cannot be encoded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// Checked out, due date not yet passed (or re-armed by an extension)
    Active,
    /// Due date passed without a return
    Overdue,
    /// Returned; terminal
    Returned,
}

impl LoanStatus {
    /// Wire/storage name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Overdue => "OVERDUE",
            LoanStatus::Returned => "RETURNED",
        }
    }

    /// An "active loan" in the policy sense: the book is out, the copy is
    /// reserved. Covers both `Active` and `Overdue`.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Overdue)
    }

    /// Whether the lifecycle permits moving from `self` to `to`
    pub fn can_transition(&self, to: LoanStatus) -> bool {
        matches!(
            (self, to),
            (LoanStatus::Active, LoanStatus::Overdue)
                | (LoanStatus::Active, LoanStatus::Returned)
                | (LoanStatus::Overdue, LoanStatus::Active)
                | (LoanStatus::Overdue, LoanStatus::Returned)
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
