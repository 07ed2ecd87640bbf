//! Tracking log service - append and query the audit trail

use std::sync::Arc;

use chrono::Duration;

use crate::domain::entities::{NewTrackingEvent, TrackingEvent};
use crate::domain::ports::{Clock, LoanRepository, TrackingQuery, TrackingRepository};
use crate::domain::value_objects::{DateRange, EventKind, LoanId, Page, PageRequest};
use crate::error::{DeweyError, DeweyResult};

pub struct TrackingLog {
    loans: Arc<dyn LoanRepository>,
    events: Arc<dyn TrackingRepository>,
    clock: Arc<dyn Clock>,
}

impl TrackingLog {
    pub fn new(
        loans: Arc<dyn LoanRepository>,
        events: Arc<dyn TrackingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            loans,
            events,
            clock,
        }
    }

    /// Append an audit row for a known loan, stamped now. Unknown loan
    /// ids fail with `LoanNotFound`.
    pub fn record(
        &self,
        loan_id: LoanId,
        kind: EventKind,
        description: impl Into<String>,
    ) -> DeweyResult<TrackingEvent> {
        if self.loans.get(loan_id)?.is_none() {
            return Err(DeweyError::LoanNotFound(loan_id));
        }
        self.events.append(NewTrackingEvent::new(
            loan_id,
            kind,
            description,
            self.clock.now(),
        ))
    }

    /// One loan's trail, newest first
    pub fn history(&self, loan_id: LoanId, page: PageRequest) -> DeweyResult<Page<TrackingEvent>> {
        let events = self.events.find(&TrackingQuery::all().for_loan(loan_id))?;
        Ok(page.slice(events))
    }

    /// Every event of one kind, newest first
    pub fn by_kind(&self, kind: EventKind, page: PageRequest) -> DeweyResult<Page<TrackingEvent>> {
        let events = self.events.find(&TrackingQuery::all().of_kind(kind))?;
        Ok(page.slice(events))
    }

    /// Events stamped inside an inclusive window, newest first
    pub fn by_date_range(
        &self,
        range: DateRange,
        page: PageRequest,
    ) -> DeweyResult<Page<TrackingEvent>> {
        let events = self.events.find(&TrackingQuery::all().within(range))?;
        Ok(page.slice(events))
    }

    /// The most recent `limit` events across all loans
    pub fn recent(&self, limit: usize) -> DeweyResult<Vec<TrackingEvent>> {
        let mut events = self.events.find(&TrackingQuery::all())?;
        events.truncate(limit);
        Ok(events)
    }

    /// Drop events older than `days_to_keep` days. The cutoff comparison
    /// is strict, so rows stamped at this very instant always survive a
    /// concurrent cleanup. Returns how many rows were removed. A
    /// retention reaching before the representable calendar is rejected.
    pub fn cleanup(&self, days_to_keep: u32) -> DeweyResult<usize> {
        if days_to_keep == 0 {
            return Err(DeweyError::validation(
                "days_to_keep",
                "retention must be at least one day",
            ));
        }
        let cutoff = Duration::try_days(i64::from(days_to_keep))
            .and_then(|retention| self.clock.now().checked_sub_signed(retention))
            .ok_or_else(|| {
                DeweyError::validation(
                    "days_to_keep",
                    format!("{days_to_keep} days reaches before the calendar"),
                )
            })?;
        let removed = self.events.delete_before(cutoff)?;
        if removed > 0 {
            tracing::info!(removed, days_to_keep, "pruned tracking events");
        }
        Ok(removed)
    }
}
