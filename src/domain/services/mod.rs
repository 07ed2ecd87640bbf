//! Domain services

pub mod analytics;
pub mod circulation;
pub mod locks;
pub mod tracking_log;

pub use analytics::{
    AnalyticsReport, AnalyticsService, BookCount, BorrowerAnalysis, BorrowerCount, DailyCount,
    LoanStatistics, OverdueAnalysis,
};
pub use circulation::{BorrowRequest, CirculationService};
pub use locks::KeyedLocks;
pub use tracking_log::TrackingLog;
