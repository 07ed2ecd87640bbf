//! Domain entities

pub mod book;
pub mod loan;
pub mod tracking;

pub use book::{Book, NewBook};
pub use loan::{Borrower, Loan, NewLoan};
pub use tracking::{NewTrackingEvent, TrackingEvent};
