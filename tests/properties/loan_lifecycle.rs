//! Property tests for the loan lifecycle state machine.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use dewey::{
    BorrowRequest, CirculationConfig, CirculationService, Clock, DeweyError, FixedClock,
    InMemoryInventory, InMemoryLoans, InMemoryTracking, InventoryLedger, LoanRepository,
    LoanStatus, NewBook, TrackingRepository,
};

#[derive(Debug, Clone, Copy)]
enum LifecycleOp {
    Advance(i64),
    Extend(i64),
    Sweep,
    Return,
}

fn lifecycle_op() -> impl Strategy<Value = LifecycleOp> {
    prop_oneof![
        (0i64..4).prop_map(LifecycleOp::Advance),
        (1i64..10).prop_map(LifecycleOp::Extend),
        Just(LifecycleOp::Sweep),
        Just(LifecycleOp::Return),
    ]
}

struct Harness {
    books: Arc<InMemoryInventory>,
    clock: Arc<FixedClock>,
    circulation: CirculationService,
}

fn harness() -> Harness {
    let books = Arc::new(InMemoryInventory::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    ));
    let circulation = CirculationService::new(
        Arc::clone(&books) as Arc<dyn InventoryLedger>,
        Arc::new(InMemoryLoans::new()) as Arc<dyn LoanRepository>,
        Arc::new(InMemoryTracking::new()) as Arc<dyn TrackingRepository>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        &CirculationConfig::default(),
    );
    Harness {
        books,
        clock,
        circulation,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: under any sequence of clock advances, extensions, sweeps
    /// and returns, the loan obeys its state machine: at most one return
    /// succeeds, extensions move the due date by exactly the granted days
    /// while the loan is out and fail afterwards, a loan is `Overdue` only
    /// when its due date is in the past, and the book's available count
    /// mirrors whether the loan is outstanding.
    #[test]
    fn property_lifecycle_never_breaks_invariants(
        ops in proptest::collection::vec(lifecycle_op(), 0..24)
    ) {
        let h = harness();
        let book = h.books.register(NewBook::new("isbn-l", "L", 2)).unwrap();
        let loan_id = h
            .circulation
            .borrow(BorrowRequest::new(book.id(), "Prop Reader", "prop@example.com"))
            .unwrap()
            .id();
        let mut returned = false;

        for op in ops {
            match op {
                LifecycleOp::Advance(days) => h.clock.advance(Duration::days(days)),
                LifecycleOp::Extend(days) => {
                    let before = h.circulation.loan(loan_id).unwrap().unwrap();
                    let result = h.circulation.extend(loan_id, days);
                    if returned {
                        prop_assert!(
                            matches!(result.unwrap_err(), DeweyError::InvalidLoanOperation { .. }),
                            "expected DeweyError::InvalidLoanOperation"
                        );
                    } else {
                        let after = result.unwrap();
                        prop_assert_eq!(
                            after.due_date(),
                            before.due_date() + Duration::days(days)
                        );
                    }
                }
                LifecycleOp::Sweep => {
                    let swept = h.circulation.sweep_overdue().unwrap();
                    prop_assert!(swept <= 1);
                    let loan = h.circulation.loan(loan_id).unwrap().unwrap();
                    if loan.is_past_due(h.clock.now()) {
                        prop_assert_eq!(loan.status(), LoanStatus::Overdue);
                    }
                }
                LifecycleOp::Return => {
                    let result = h.circulation.return_loan(loan_id, None);
                    if returned {
                        prop_assert!(
                            matches!(result.unwrap_err(), DeweyError::InvalidLoanOperation { .. }),
                            "expected DeweyError::InvalidLoanOperation"
                        );
                    } else {
                        prop_assert_eq!(result.unwrap().status(), LoanStatus::Returned);
                        returned = true;
                    }
                }
            }

            let now = h.clock.now();
            let loan = h.circulation.loan(loan_id).unwrap().unwrap();
            let available = h.books.book(book.id()).unwrap().unwrap().available_copies();

            prop_assert_eq!(loan.is_outstanding(), !returned);
            prop_assert!(loan.due_date() >= loan.loan_date());
            if loan.status() == LoanStatus::Overdue {
                prop_assert!(loan.due_date() < now);
            }
            if returned {
                let return_date = loan.return_date().unwrap();
                prop_assert!(return_date >= loan.loan_date());
                prop_assert!(return_date <= now);
            } else {
                prop_assert!(loan.return_date().is_none());
            }
            prop_assert_eq!(available, if returned { 2 } else { 1 });
        }
    }

    /// PROPERTY: consecutive extensions accumulate exactly, and every
    /// successful extension bumps the stored version by one.
    #[test]
    fn property_extensions_accumulate(
        extensions in proptest::collection::vec(1i64..15, 0..8)
    ) {
        let h = harness();
        let book = h.books.register(NewBook::new("isbn-e", "E", 1)).unwrap();
        let loan = h
            .circulation
            .borrow(BorrowRequest::new(book.id(), "Prop Reader", "prop@example.com"))
            .unwrap();
        let original_due = loan.due_date();

        let count = extensions.len();
        let mut granted = 0;
        for days in extensions {
            h.circulation.extend(loan.id(), days).unwrap();
            granted += days;
        }

        let after = h.circulation.loan(loan.id()).unwrap().unwrap();
        prop_assert_eq!(after.due_date(), original_due + Duration::days(granted));
        prop_assert_eq!(after.version(), 1 + count as u64);
    }
}
