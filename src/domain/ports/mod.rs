//! Ports - the trait seams between domain logic and infrastructure

pub mod clock;
pub mod inventory_ledger;
pub mod loan_repository;
pub mod notifier;
pub mod tracking_repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use inventory_ledger::InventoryLedger;
pub use loan_repository::{LoanQuery, LoanRepository};
pub use notifier::{Notice, Notifier, NoopNotifier};
pub use tracking_repository::{TrackingQuery, TrackingRepository};
