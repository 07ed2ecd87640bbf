//! Date Range Value Object
//!
//! An inclusive `[start, end]` window over event timestamps and loan dates.
//! Construction validates the ordering, so a range in hand is always usable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeweyError, DeweyResult};

/// Validated inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Build a range, rejecting `end < start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DeweyResult<Self> {
        if end < start {
            return Err(DeweyError::validation(
                "date_range",
                format!("end {end} is before start {start}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Start of the range (inclusive)
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the range (inclusive)
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `at` falls inside the range
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}
