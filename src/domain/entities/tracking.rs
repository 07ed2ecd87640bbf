//! Tracking event entity - one immutable audit row per lifecycle action

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{EventId, EventKind, LoanId};

/// Input for appending an audit row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrackingEvent {
    pub loan_id: LoanId,
    pub kind: EventKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl NewTrackingEvent {
    pub fn new(
        loan_id: LoanId,
        kind: EventKind,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            loan_id,
            kind,
            description: description.into(),
            timestamp,
        }
    }
}

/// A stored audit row. Events are append-only; nothing mutates them after
/// the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    id: EventId,
    loan_id: LoanId,
    kind: EventKind,
    description: String,
    timestamp: DateTime<Utc>,
}

impl TrackingEvent {
    pub fn from_new(id: EventId, new: NewTrackingEvent) -> Self {
        Self {
            id,
            loan_id: new.loan_id,
            kind: new.kind,
            description: new.description,
            timestamp: new.timestamp,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
