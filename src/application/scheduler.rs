//! Notification scheduler
//!
//! Periodically scans for loans that are due soon or overdue, delivers
//! notices and records each send in the tracking log. Both triggers are
//! idempotent: the tracking log itself is the dedup store, so re-running
//! a trigger inside the same window sends nothing twice.
//!
//! A failure on one loan never aborts the batch. Failures are logged,
//! collected into the run report and retried naturally on the next pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::config::CirculationConfig;
use crate::domain::entities::{Loan, NewTrackingEvent};
use crate::domain::ports::{
    Clock, LoanQuery, LoanRepository, Notice, Notifier, TrackingQuery, TrackingRepository,
};
use crate::domain::services::CirculationService;
use crate::domain::value_objects::{
    DateRange, EventKind, LoanId, LoanStatus, DESC_DUE_REMINDER, DESC_OVERDUE_NOTICE,
};
use crate::error::{DeweyError, DeweyResult};

/// Outcome of one due-reminder pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderRun {
    /// Loans found inside the reminder window
    pub scanned: usize,
    /// Notices delivered and recorded
    pub sent: usize,
    /// Loans already reminded for their current window
    pub skipped: usize,
    pub failures: Vec<(LoanId, String)>,
}

impl ReminderRun {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of one overdue pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverdueRun {
    /// Loans the sweep moved to `Overdue` this pass
    pub newly_overdue: usize,
    /// Notices delivered and recorded
    pub notified: usize,
    /// Overdue loans already notified today
    pub skipped: usize,
    pub failures: Vec<(LoanId, String)>,
}

impl OverdueRun {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct NotificationScheduler {
    circulation: Arc<CirculationService>,
    loans: Arc<dyn LoanRepository>,
    tracking: Arc<dyn TrackingRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    reminder_window_days: i64,
    sweep_interval: StdDuration,
}

impl NotificationScheduler {
    pub fn new(
        circulation: Arc<CirculationService>,
        loans: Arc<dyn LoanRepository>,
        tracking: Arc<dyn TrackingRepository>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: &CirculationConfig,
    ) -> Self {
        Self {
            circulation,
            loans,
            tracking,
            notifier,
            clock,
            reminder_window_days: i64::from(config.reminder_window_days),
            sweep_interval: StdDuration::from_secs(config.sweep_interval_secs),
        }
    }

    /// Remind borrowers whose `Active` loans come due within the
    /// configured window. Idempotent per (loan, window): a reminder
    /// recorded since `due_date - window` suppresses the next one, and an
    /// extension that moves the due date out re-arms the reminder.
    pub fn trigger_due_reminders(&self) -> DeweyResult<ReminderRun> {
        let now = self.clock.now();
        let window = Duration::try_days(self.reminder_window_days);
        let horizon = window.and_then(|w| now.checked_add_signed(w));
        let (window, horizon) = window.zip(horizon).ok_or_else(|| {
            DeweyError::validation(
                "reminder_window_days",
                "window reaches past the calendar",
            )
        })?;
        let candidates = self.loans.find(
            &LoanQuery::all()
                .with_status(LoanStatus::Active)
                .due_within(DateRange::new(now, horizon)?),
        )?;

        let mut run = ReminderRun {
            scanned: candidates.len(),
            ..ReminderRun::default()
        };
        for loan in candidates {
            // an anchor clamped to the calendar floor counts every prior reminder
            let window_start = loan
                .due_date()
                .checked_sub_signed(window)
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            match self.reminded_since(loan.id(), window_start) {
                Ok(true) => {
                    run.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    let reason = err.to_string();
                    tracing::warn!(loan = %loan.id(), %reason, "reminder dedup lookup failed");
                    run.failures.push((loan.id(), reason));
                    continue;
                }
            }
            match self.send(&loan, Notice::due_reminder(&loan), DESC_DUE_REMINDER, now) {
                Ok(()) => run.sent += 1,
                Err(reason) => {
                    tracing::warn!(loan = %loan.id(), %reason, "due reminder failed");
                    run.failures.push((loan.id(), reason));
                }
            }
        }
        tracing::info!(
            scanned = run.scanned,
            sent = run.sent,
            skipped = run.skipped,
            failed = run.failures.len(),
            "due reminder pass finished"
        );
        Ok(run)
    }

    /// Sweep due dates, then notify every overdue borrower not yet
    /// notified today. Calendar-day dedup keeps one overdue notice per
    /// loan per day no matter how often the trigger fires.
    pub fn trigger_overdue_processing(&self) -> DeweyResult<OverdueRun> {
        let newly_overdue = self.circulation.sweep_overdue()?;
        let now = self.clock.now();
        let today = now.date_naive();
        let overdue = self
            .loans
            .find(&LoanQuery::all().with_status(LoanStatus::Overdue))?;

        let mut run = OverdueRun {
            newly_overdue,
            ..OverdueRun::default()
        };
        for loan in overdue {
            match self.notified_on(loan.id(), today) {
                Ok(true) => {
                    run.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    let reason = err.to_string();
                    tracing::warn!(loan = %loan.id(), %reason, "overdue dedup lookup failed");
                    run.failures.push((loan.id(), reason));
                    continue;
                }
            }
            match self.send(
                &loan,
                Notice::overdue_notice(&loan, now),
                DESC_OVERDUE_NOTICE,
                now,
            ) {
                Ok(()) => run.notified += 1,
                Err(reason) => {
                    tracing::warn!(loan = %loan.id(), %reason, "overdue notice failed");
                    run.failures.push((loan.id(), reason));
                }
            }
        }
        tracing::info!(
            newly_overdue = run.newly_overdue,
            notified = run.notified,
            skipped = run.skipped,
            failed = run.failures.len(),
            "overdue pass finished"
        );
        Ok(run)
    }

    /// Drive both triggers every sweep interval until `running` drops.
    /// Sleeps in short slices so a cleared flag stops the loop promptly.
    pub fn run(&self, running: Arc<AtomicBool>) {
        tracing::info!(
            interval_secs = self.sweep_interval.as_secs(),
            "notification scheduler started"
        );
        while running.load(Ordering::SeqCst) {
            if let Err(err) = self.trigger_due_reminders() {
                tracing::error!(error = %err, "due reminder pass aborted");
            }
            if let Err(err) = self.trigger_overdue_processing() {
                tracing::error!(error = %err, "overdue pass aborted");
            }

            let mut remaining = self.sweep_interval;
            while running.load(Ordering::SeqCst) && !remaining.is_zero() {
                let step = remaining.min(StdDuration::from_millis(200));
                thread::sleep(step);
                remaining -= step;
            }
        }
        tracing::info!("notification scheduler stopped");
    }

    /// Deliver a notice and record the send. Either step failing counts
    /// as a per-loan failure; a recorded send only happens after a
    /// successful delivery, so a delivery that failed is retried on the
    /// next pass.
    fn send(
        &self,
        loan: &Loan,
        notice: Notice,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        self.notifier
            .deliver(&notice)
            .map_err(|err| format!("{err:#}"))?;
        self.tracking
            .append(NewTrackingEvent::new(
                loan.id(),
                EventKind::NotificationSent,
                description,
                now,
            ))
            .map_err(|err| err.to_string())?;
        Ok(())
    }

    fn reminded_since(&self, loan_id: LoanId, since: DateTime<Utc>) -> DeweyResult<bool> {
        let sends = self.notification_events(loan_id)?;
        Ok(sends
            .iter()
            .any(|e| e.description() == DESC_DUE_REMINDER && e.timestamp() >= since))
    }

    fn notified_on(&self, loan_id: LoanId, day: NaiveDate) -> DeweyResult<bool> {
        let sends = self.notification_events(loan_id)?;
        Ok(sends
            .iter()
            .any(|e| e.description() == DESC_OVERDUE_NOTICE && e.timestamp().date_naive() == day))
    }

    fn notification_events(
        &self,
        loan_id: LoanId,
    ) -> DeweyResult<Vec<crate::domain::entities::TrackingEvent>> {
        self.tracking.find(
            &TrackingQuery::all()
                .for_loan(loan_id)
                .of_kind(EventKind::NotificationSent),
        )
    }
}
