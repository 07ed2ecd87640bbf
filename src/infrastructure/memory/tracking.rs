//! In-memory tracking repository
//!
//! An append-only vector. Events keep their insertion order on disk;
//! queries sort newest-first on the way out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::domain::entities::{NewTrackingEvent, TrackingEvent};
use crate::domain::ports::{TrackingQuery, TrackingRepository};
use crate::domain::value_objects::EventId;
use crate::error::DeweyResult;

#[derive(Debug, Default)]
pub struct InMemoryTracking {
    events: RwLock<Vec<TrackingEvent>>,
    next_id: AtomicU64,
}

impl InMemoryTracking {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<TrackingEvent>> {
        self.events.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<TrackingEvent>> {
        self.events.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl TrackingRepository for InMemoryTracking {
    fn append(&self, new: NewTrackingEvent) -> DeweyResult<TrackingEvent> {
        let id = EventId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let event = TrackingEvent::from_new(id, new);
        self.write().push(event.clone());
        Ok(event)
    }

    fn find(&self, query: &TrackingQuery) -> DeweyResult<Vec<TrackingEvent>> {
        let mut matched: Vec<TrackingEvent> = self
            .read()
            .iter()
            .filter(|event| query.matches(event))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.timestamp()
                .cmp(&a.timestamp())
                .then(b.id().cmp(&a.id()))
        });
        Ok(matched)
    }

    fn delete_before(&self, cutoff: DateTime<Utc>) -> DeweyResult<usize> {
        let mut events = self.write();
        let before = events.len();
        events.retain(|event| event.timestamp() >= cutoff);
        Ok(before - events.len())
    }
}
