//! Value Objects
//!
//! Immutable, validated types shared across the domain.

pub mod date_range;
pub mod email;
pub mod event_kind;
pub mod ids;
pub mod loan_status;
pub mod page;

pub use date_range::DateRange;
pub use email::EmailAddress;
pub use event_kind::{
    EventKind, DESC_DUE_REMINDER, DESC_LOAN_CONFIRMATION, DESC_OVERDUE_NOTICE,
};
pub use ids::{BookId, EventId, LoanId};
pub use loan_status::LoanStatus;
pub use page::{Page, PageRequest, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
