//! Property tests for inventory copy counting.

use proptest::prelude::*;

use dewey::{BookId, DeweyError, InMemoryInventory, InventoryLedger, NewBook};

#[derive(Debug, Clone, Copy)]
enum CopyOp {
    Reserve,
    Release,
}

fn copy_op() -> impl Strategy<Value = CopyOp> {
    prop_oneof![Just(CopyOp::Reserve), Just(CopyOp::Release)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: any interleaving of reserve/release keeps
    /// `0 <= available <= total`, reservations fail exactly when no copy
    /// is available, and the ledger always agrees with a counting model.
    #[test]
    fn property_copy_count_matches_a_counting_model(
        total in 0u32..5,
        ops in proptest::collection::vec(copy_op(), 0..60)
    ) {
        let ledger = InMemoryInventory::new();
        let book = ledger.register(NewBook::new("isbn-p", "P", total)).unwrap();
        let mut model = total;

        for op in ops {
            match op {
                CopyOp::Reserve => {
                    let result = ledger.reserve_copy(book.id());
                    if model > 0 {
                        model -= 1;
                        prop_assert_eq!(result.unwrap().available_copies(), model);
                    } else {
                        prop_assert!(
                            matches!(result.unwrap_err(), DeweyError::BookUnavailable { .. }),
                            "expected DeweyError::BookUnavailable"
                        );
                    }
                }
                CopyOp::Release => {
                    model = (model + 1).min(total);
                    let after = ledger.release_copy(book.id()).unwrap();
                    prop_assert_eq!(after.available_copies(), model);
                }
            }
            let current = ledger.book(book.id()).unwrap().unwrap();
            prop_assert!(current.available_copies() <= current.total_copies());
        }
    }

    /// PROPERTY: operations on an unregistered id never panic and always
    /// report `BookNotFound`.
    #[test]
    fn property_unknown_ids_are_rejected(id in 1u64..1000) {
        let ledger = InMemoryInventory::new();
        prop_assert!(matches!(
            ledger.reserve_copy(BookId::new(id)).unwrap_err(),
            DeweyError::BookNotFound(_)
        ));
        prop_assert!(matches!(
            ledger.release_copy(BookId::new(id)).unwrap_err(),
            DeweyError::BookNotFound(_)
        ));
        prop_assert!(ledger.book(BookId::new(id)).unwrap().is_none());
    }
}
