//! Application layer - long-running drivers over the domain services

pub mod scheduler;

pub use scheduler::{NotificationScheduler, OverdueRun, ReminderRun};
