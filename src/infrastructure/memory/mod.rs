//! In-memory adapters for the domain ports

pub mod inventory;
pub mod loans;
pub mod tracking;

pub use inventory::InMemoryInventory;
pub use loans::InMemoryLoans;
pub use tracking::InMemoryTracking;
