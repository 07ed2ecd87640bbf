//! Tracking Event Kind Value Object
//!
//! The categorical type of an audit event, plus the well-known notice
//! sub-type strings used in event descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorical type of a tracking event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// A loan was created by a borrow operation
    LoanCreated,
    /// A loan was returned
    LoanReturned,
    /// A loan's due date was extended
    LoanExtended,
    /// A status transition outside create/return/extend (the overdue sweep)
    StatusChange,
    /// A reminder or overdue notice went out
    NotificationSent,
}

impl EventKind {
    /// Wire/storage name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LoanCreated => "LOAN_CREATED",
            EventKind::LoanReturned => "LOAN_RETURNED",
            EventKind::LoanExtended => "LOAN_EXTENDED",
            EventKind::StatusChange => "STATUS_CHANGE",
            EventKind::NotificationSent => "NOTIFICATION_SENT",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Description tag on the `LoanCreated` event
pub const DESC_LOAN_CONFIRMATION: &str = "LOAN_CONFIRMATION";

/// Description tag on `NotificationSent` events for due-soon reminders
pub const DESC_DUE_REMINDER: &str = "DUE_REMINDER";

/// Description tag on `NotificationSent` events for overdue notices
pub const DESC_OVERDUE_NOTICE: &str = "OVERDUE_NOTICE";
