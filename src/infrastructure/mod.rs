//! Infrastructure adapters behind the domain ports

pub mod memory;
pub mod notify;

pub use memory::{InMemoryInventory, InMemoryLoans, InMemoryTracking};
pub use notify::LogNotifier;
