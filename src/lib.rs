//! Dewey - circulation engine for lending libraries
//!
//! Dewey keeps a lending library honest: it drives the loan lifecycle
//! (borrow, return, extend, overdue), guards inventory consistency under
//! concurrent borrowers, records an append-only audit trail of every
//! lifecycle action, schedules due-date and overdue notifications, and
//! answers analytics questions over the accumulated history.
//!
//! The crate is transport-agnostic: embed it behind an HTTP layer, a CLI
//! or a batch job. Storage and delivery sit behind ports
//! ([`InventoryLedger`], [`LoanRepository`], [`TrackingRepository`],
//! [`Notifier`], [`Clock`]) with in-memory adapters included.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{NotificationScheduler, OverdueRun, ReminderRun};
pub use config::CirculationConfig;
pub use domain::entities::{Book, Borrower, Loan, NewBook, NewLoan, NewTrackingEvent, TrackingEvent};
pub use domain::policies::LendingPolicy;
pub use domain::ports::{
    Clock, FixedClock, InventoryLedger, LoanQuery, LoanRepository, Notice, Notifier, NoopNotifier,
    SystemClock, TrackingQuery, TrackingRepository,
};
pub use domain::services::{
    AnalyticsReport, AnalyticsService, BookCount, BorrowRequest, BorrowerAnalysis, BorrowerCount,
    CirculationService, DailyCount, LoanStatistics, OverdueAnalysis, TrackingLog,
};
pub use domain::value_objects::{
    BookId, DateRange, EmailAddress, EventId, EventKind, LoanId, LoanStatus, Page, PageRequest,
    DESC_DUE_REMINDER, DESC_LOAN_CONFIRMATION, DESC_OVERDUE_NOTICE,
};
pub use error::{DeweyError, DeweyResult};
pub use infrastructure::{InMemoryInventory, InMemoryLoans, InMemoryTracking, LogNotifier};
