//! Run context and report-window arithmetic.
//!
//! The report window is always the previous calendar month relative to the
//! run timestamp. The timestamp is threaded in explicitly rather than read
//! from the wall clock inside the stages, so tests inject a fixed instant;
//! the CLI constructs it from the wall clock once per run.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Everything a run needs that is not source data: the instant the run
/// started at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub now: NaiveDateTime,
}

impl RunContext {
    /// Capture the wall clock. Called once, at the edge.
    pub fn from_wall_clock() -> Self {
        Self {
            now: Local::now().naive_local(),
        }
    }

    pub fn report_window(&self) -> ReportWindow {
        ReportWindow::previous_month(self.now)
    }
}

/// Closed interval `[first day of previous month 00:00:00, first day of
/// current month - 1s]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    pub fn previous_month(now: NaiveDateTime) -> Self {
        let first_this = first_of_month(now.date());
        let first_prev = first_of_previous_month(first_this);
        let start = first_prev.and_time(NaiveTime::MIN);
        let end = first_this.and_time(NaiveTime::MIN) - TimeDelta::seconds(1);
        Self { start, end }
    }

    /// The date key for the summary table: first day of the reported month.
    pub fn report_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn first_of_previous_month(first_this: NaiveDate) -> NaiveDate {
    let (year, month) = if first_this.month() == 1 {
        (first_this.year() - 1, 12)
    } else {
        (first_this.year(), first_this.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first_this)
}
