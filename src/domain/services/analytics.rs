//! Analytics service - read-only aggregation over loans and tracking events
//!
//! Every method folds a fresh snapshot from the repositories, so reports
//! are internally consistent but not transactional across calls. Rates
//! are fractions in `[0, 1]`; an empty population always yields `0.0`
//! rather than a division error.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::Loan;
use crate::domain::ports::{
    Clock, InventoryLedger, LoanQuery, LoanRepository, TrackingQuery, TrackingRepository,
};
use crate::domain::value_objects::{
    BookId, DateRange, EmailAddress, EventKind, LoanStatus, Page, PageRequest,
};
use crate::error::{DeweyError, DeweyResult};

/// Status breakdown of a loan population
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanStatistics {
    pub total_loans: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
    pub returned_loans: usize,
    /// Fraction of loans currently overdue
    pub overdue_rate: f64,
    /// Fraction of loans already returned
    pub return_rate: f64,
}

/// How late the currently-overdue loans are
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverdueAnalysis {
    pub overdue_count: usize,
    pub average_days_overdue: f64,
    pub longest_days_overdue: i64,
}

/// Borrower population over a loan set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorrowerAnalysis {
    pub unique_borrowers: usize,
    pub total_loans: usize,
    pub average_loans_per_borrower: f64,
    /// Borrowers with at least two loans in the set
    pub repeat_borrowers: usize,
    pub repeat_rate: f64,
}

/// One row of the most-borrowed-books ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCount {
    pub book_id: BookId,
    /// Title from the ledger; absent if the book has left the catalog
    pub title: Option<String>,
    pub loans: usize,
}

/// One row of the most-active-borrowers ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowerCount {
    pub email: EmailAddress,
    pub name: String,
    pub loans: usize,
}

/// Notifications sent on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: usize,
}

/// Combined report for one window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub range: DateRange,
    pub statistics: LoanStatistics,
    pub borrowers: BorrowerAnalysis,
}

pub struct AnalyticsService {
    books: Arc<dyn InventoryLedger>,
    loans: Arc<dyn LoanRepository>,
    events: Arc<dyn TrackingRepository>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(
        books: Arc<dyn InventoryLedger>,
        loans: Arc<dyn LoanRepository>,
        events: Arc<dyn TrackingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            books,
            loans,
            events,
            clock,
        }
    }

    /// Status counts and rates, optionally restricted to loans issued
    /// inside `range`
    pub fn loan_statistics(&self, range: Option<DateRange>) -> DeweyResult<LoanStatistics> {
        let loans = self.loans_issued_in(range)?;
        let total = loans.len();
        let mut active = 0;
        let mut overdue = 0;
        let mut returned = 0;
        for loan in &loans {
            match loan.status() {
                LoanStatus::Active => active += 1,
                LoanStatus::Overdue => overdue += 1,
                LoanStatus::Returned => returned += 1,
            }
        }
        Ok(LoanStatistics {
            total_loans: total,
            active_loans: active,
            overdue_loans: overdue,
            returned_loans: returned,
            overdue_rate: ratio(overdue, total),
            return_rate: ratio(returned, total),
        })
    }

    /// Lateness of everything currently overdue
    pub fn overdue_analysis(&self) -> DeweyResult<OverdueAnalysis> {
        let now = self.clock.now();
        let overdue = self
            .loans
            .find(&LoanQuery::all().with_status(LoanStatus::Overdue))?;
        let count = overdue.len();
        let mut total_days = 0i64;
        let mut longest = 0i64;
        for loan in &overdue {
            let days = loan.days_overdue(now).max(0);
            total_days += days;
            longest = longest.max(days);
        }
        Ok(OverdueAnalysis {
            overdue_count: count,
            average_days_overdue: if count == 0 {
                0.0
            } else {
                total_days as f64 / count as f64
            },
            longest_days_overdue: longest,
        })
    }

    /// Borrower population stats, optionally restricted to loans issued
    /// inside `range`
    pub fn borrower_analysis(&self, range: Option<DateRange>) -> DeweyResult<BorrowerAnalysis> {
        let loans = self.loans_issued_in(range)?;
        let mut per_borrower: BTreeMap<&EmailAddress, usize> = BTreeMap::new();
        for loan in &loans {
            *per_borrower.entry(loan.borrower().email()).or_insert(0) += 1;
        }
        let unique = per_borrower.len();
        let repeat = per_borrower.values().filter(|&&n| n >= 2).count();
        let average = if unique == 0 {
            0.0
        } else {
            loans.len() as f64 / unique as f64
        };
        Ok(BorrowerAnalysis {
            unique_borrowers: unique,
            total_loans: loans.len(),
            average_loans_per_borrower: average,
            repeat_borrowers: repeat,
            repeat_rate: ratio(repeat, unique),
        })
    }

    /// Books ranked by loan count, descending; ties resolve to the lower
    /// book id so pages are stable across calls
    pub fn most_borrowed_books(
        &self,
        range: Option<DateRange>,
        page: PageRequest,
    ) -> DeweyResult<Page<BookCount>> {
        let loans = self.loans_issued_in(range)?;
        let mut counts: BTreeMap<BookId, usize> = BTreeMap::new();
        for loan in &loans {
            *counts.entry(loan.book_id()).or_insert(0) += 1;
        }
        let mut ranked: Vec<(BookId, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let sliced = page.slice(ranked);
        let mut items = Vec::with_capacity(sliced.items.len());
        for (book_id, loans) in sliced.items {
            let title = self.books.book(book_id)?.map(|b| b.title().to_owned());
            items.push(BookCount {
                book_id,
                title,
                loans,
            });
        }
        Ok(Page {
            items,
            total: sliced.total,
            offset: sliced.offset,
            limit: sliced.limit,
        })
    }

    /// Borrowers ranked by loan count, descending; ties resolve to the
    /// lexicographically smaller email
    pub fn most_active_borrowers(
        &self,
        range: Option<DateRange>,
        page: PageRequest,
    ) -> DeweyResult<Page<BorrowerCount>> {
        let loans = self.loans_issued_in(range)?;
        let mut counts: BTreeMap<EmailAddress, (usize, String)> = BTreeMap::new();
        for loan in &loans {
            // `loans` comes back newest first, so the first sighting of
            // an email carries the borrower's most recent name.
            let entry = counts
                .entry(loan.borrower().email().clone())
                .or_insert_with(|| (0, loan.borrower().name().to_owned()));
            entry.0 += 1;
        }
        let mut ranked: Vec<BorrowerCount> = counts
            .into_iter()
            .map(|(email, (loans, name))| BorrowerCount { email, name, loans })
            .collect();
        ranked.sort_by(|a, b| b.loans.cmp(&a.loans).then(a.email.cmp(&b.email)));
        Ok(page.slice(ranked))
    }

    /// Notifications sent per calendar day over the trailing `days`
    /// window, oldest day first. Days with no sends appear with a zero
    /// count, so the series always has exactly `days` entries.
    pub fn daily_notification_stats(&self, days: u32) -> DeweyResult<Vec<DailyCount>> {
        if days == 0 {
            return Err(DeweyError::validation(
                "days",
                "window must cover at least one day",
            ));
        }
        let today = self.clock.now().date_naive();
        let first_day = chrono::Duration::try_days(i64::from(days) - 1)
            .and_then(|span| today.checked_sub_signed(span))
            .ok_or_else(|| {
                DeweyError::validation(
                    "days",
                    format!("{days} days reaches before the calendar"),
                )
            })?;

        let sent = self
            .events
            .find(&TrackingQuery::all().of_kind(EventKind::NotificationSent))?;
        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for event in &sent {
            let day = event.timestamp().date_naive();
            if day >= first_day && day <= today {
                *per_day.entry(day).or_insert(0) += 1;
            }
        }

        Ok(first_day
            .iter_days()
            .take(days as usize)
            .map(|day| DailyCount {
                day,
                count: per_day.get(&day).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Loan statistics and borrower analysis for one window
    pub fn analytics_for_date_range(&self, range: DateRange) -> DeweyResult<AnalyticsReport> {
        Ok(AnalyticsReport {
            range,
            statistics: self.loan_statistics(Some(range))?,
            borrowers: self.borrower_analysis(Some(range))?,
        })
    }

    /// All loans, or those issued inside `range` when given
    fn loans_issued_in(&self, range: Option<DateRange>) -> DeweyResult<Vec<Loan>> {
        let mut loans = self.loans.find(&LoanQuery::all())?;
        if let Some(range) = range {
            loans.retain(|loan| range.contains(loan.loan_date()));
        }
        Ok(loans)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
