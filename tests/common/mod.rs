//! Common test utilities for circulation scenario tests.
//!
//! Provides `Engine`: a fully wired engine on in-memory adapters with a
//! fixed clock and a recording notifier, plus seeding helpers.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use dewey::{
    AnalyticsService, Book, BookId, BorrowRequest, CirculationConfig, CirculationService, Clock,
    FixedClock, InMemoryInventory, InMemoryLoans, InMemoryTracking, InventoryLedger, Loan,
    LoanRepository, NewBook, Notice, NotificationScheduler, Notifier, TrackingLog,
    TrackingRepository,
};

/// Noon UTC on the given day
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Default fixture start instant
pub fn start_of_2024() -> DateTime<Utc> {
    at(2024, 1, 1)
}

/// Notifier that records every delivered notice and can be told to
/// refuse delivery for chosen loans.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    refuse: Mutex<HashSet<u64>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices delivered so far, oldest first
    pub fn sent(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }

    /// Make every future delivery for this loan fail
    pub fn refuse_loan(&self, loan_id: dewey::LoanId) {
        self.refuse.lock().unwrap().insert(loan_id.value());
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&self, notice: &Notice) -> anyhow::Result<()> {
        if self.refuse.lock().unwrap().contains(&notice.loan_id.value()) {
            anyhow::bail!("delivery refused for loan {}", notice.loan_id);
        }
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// A fully wired engine over in-memory adapters
pub struct Engine {
    pub books: Arc<InMemoryInventory>,
    pub loans: Arc<InMemoryLoans>,
    pub tracking: Arc<InMemoryTracking>,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub circulation: Arc<CirculationService>,
    pub scheduler: NotificationScheduler,
    pub tracking_log: TrackingLog,
    pub analytics: AnalyticsService,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(CirculationConfig::default())
    }

    pub fn with_config(config: CirculationConfig) -> Self {
        let books = Arc::new(InMemoryInventory::new());
        let loans = Arc::new(InMemoryLoans::new());
        let tracking = Arc::new(InMemoryTracking::new());
        let clock = Arc::new(FixedClock::new(start_of_2024()));
        let notifier = Arc::new(RecordingNotifier::new());

        let circulation = Arc::new(CirculationService::new(
            Arc::clone(&books) as Arc<dyn InventoryLedger>,
            Arc::clone(&loans) as Arc<dyn LoanRepository>,
            Arc::clone(&tracking) as Arc<dyn TrackingRepository>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            &config,
        ));
        let scheduler = NotificationScheduler::new(
            Arc::clone(&circulation),
            Arc::clone(&loans) as Arc<dyn LoanRepository>,
            Arc::clone(&tracking) as Arc<dyn TrackingRepository>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            &config,
        );
        let tracking_log = TrackingLog::new(
            Arc::clone(&loans) as Arc<dyn LoanRepository>,
            Arc::clone(&tracking) as Arc<dyn TrackingRepository>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        let analytics = AnalyticsService::new(
            Arc::clone(&books) as Arc<dyn InventoryLedger>,
            Arc::clone(&loans) as Arc<dyn LoanRepository>,
            Arc::clone(&tracking) as Arc<dyn TrackingRepository>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        );

        Self {
            books,
            loans,
            tracking,
            clock,
            notifier,
            circulation,
            scheduler,
            tracking_log,
            analytics,
        }
    }

    /// Register a book with the given number of copies
    pub fn seed_book(&self, isbn: &str, title: &str, copies: u32) -> Book {
        self.books
            .register(NewBook::new(isbn, title, copies))
            .unwrap()
    }

    /// Borrow with defaults for everything but the borrower email
    pub fn borrow(&self, book_id: BookId, email: &str) -> Loan {
        self.circulation
            .borrow(BorrowRequest::new(book_id, "Test Reader", email))
            .unwrap()
    }

    /// Current available copies for a book
    pub fn available(&self, book_id: BookId) -> u32 {
        self.books
            .book(book_id)
            .unwrap()
            .unwrap()
            .available_copies()
    }
}
