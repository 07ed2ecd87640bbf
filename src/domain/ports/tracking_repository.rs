//! Tracking repository port

use chrono::{DateTime, Utc};

use crate::domain::entities::{NewTrackingEvent, TrackingEvent};
use crate::domain::value_objects::{DateRange, EventKind, LoanId};
use crate::error::DeweyResult;

/// Filter for audit-trail lookups. Fields are conjunctive; the default
/// query matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingQuery {
    pub loan_id: Option<LoanId>,
    pub kind: Option<EventKind>,
    /// Inclusive timestamp window
    pub range: Option<DateRange>,
}

impl TrackingQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_loan(mut self, loan_id: LoanId) -> Self {
        self.loan_id = Some(loan_id);
        self
    }

    pub fn of_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn matches(&self, event: &TrackingEvent) -> bool {
        if let Some(loan_id) = self.loan_id {
            if event.loan_id() != loan_id {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if event.kind() != kind {
                return false;
            }
        }
        if let Some(ref range) = self.range {
            if !range.contains(event.timestamp()) {
                return false;
            }
        }
        true
    }
}

pub trait TrackingRepository: Send + Sync {
    /// Append one audit row, assigning its id. Rows are immutable once
    /// stored.
    fn append(&self, new: NewTrackingEvent) -> DeweyResult<TrackingEvent>;

    /// All events matching `query`, newest first (ties broken by
    /// descending id)
    fn find(&self, query: &TrackingQuery) -> DeweyResult<Vec<TrackingEvent>>;

    /// Drop events stamped strictly before `cutoff`; returns how many
    /// were removed. An event stamped exactly at the cutoff survives.
    fn delete_before(&self, cutoff: DateTime<Utc>) -> DeweyResult<usize>;
}
