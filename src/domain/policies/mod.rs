//! Pure domain policies

pub mod lending_policy;

pub use lending_policy::{
    LendingPolicy, DEFAULT_LOAN_PERIOD_DAYS, DEFAULT_MAX_LOANS_PER_BORROWER,
};
