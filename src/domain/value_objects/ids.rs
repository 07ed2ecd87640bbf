//! Identifier Value Objects
//!
//! Newtype ids for the three record kinds the engine owns. Keeping them
//! distinct types prevents a loan id from ever being passed where a book id
//! is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id
            pub fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw numeric value
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_type! {
    /// Identity of a book (inventory unit)
    BookId
}

id_type! {
    /// Identity of a loan
    LoanId
}

id_type! {
    /// Identity of a tracking (audit) event
    EventId
}
