//! Transport join, elapsed-interval computation, and same-day dedup.
//!
//! Remaining rows join the transport form by `CaseNo = VN`. Matched rows get
//! `Summary` = received time-of-day minus dispatch time-of-day, in seconds.
//! Rows with no match, a blank transport method, an unparseable time, or a
//! negative interval are dropped. Same-day duplicates per case collapse to
//! the row with the smallest interval, ties going to the earliest source
//! row.

use std::collections::BTreeMap;

use anyhow::Result;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use medstat_model::schema::source;

use crate::data_utils::{filter_rows, int_values, opt_int_values, string_values};
use crate::datetime::{interval_seconds, parse_time, parse_time_last_token};

/// Target threshold for the monthly goal: 15 minutes.
pub const THRESHOLD_SECONDS: i64 = 15 * 60;

/// Transport form rows keyed by visit number: (received time, method).
/// Null visit numbers are dropped; duplicates keep the first source row,
/// even one with a blank method, so later rows for the same visit number
/// stay shadowed.
pub fn build_transport_lookup(transport: &DataFrame) -> Result<BTreeMap<i64, (String, String)>> {
    let visit_numbers = string_values(transport, source::VISIT_NUMBER)?;
    let received = string_values(transport, source::RECEIVED_TIME)?;
    let methods = string_values(transport, source::TRANSPORT_METHOD)?;
    let mut lookup = BTreeMap::new();
    for idx in 0..visit_numbers.len() {
        let Some(visit_number) = crate::data_utils::parse_i64(&visit_numbers[idx]) else {
            continue;
        };
        lookup
            .entry(visit_number)
            .or_insert_with(|| (received[idx].clone(), methods[idx].clone()));
    }
    debug!(
        entries = lookup.len(),
        rows = visit_numbers.len(),
        "built transport lookup"
    );
    Ok(lookup)
}

/// The surviving remaining partition plus stage counts.
#[derive(Debug, Clone)]
pub struct IntervalOutcome {
    pub remaining: DataFrame,
    /// Rows that found a transport match.
    pub matched: usize,
    /// Matched rows dropped for an unparseable or negative interval.
    pub negative_dropped: usize,
    /// Surviving rows with `Summary <= 15 min` (a filter, not a dedup).
    pub within_threshold: usize,
}

/// Join, compute intervals, drop negatives, and dedup by `(CaseNo, date)`.
pub fn compute_intervals(
    remaining: &DataFrame,
    lookup: &BTreeMap<i64, (String, String)>,
) -> Result<IntervalOutcome> {
    let case_numbers = int_values(remaining, source::CASE_NO)?;
    let dispatch_times = string_values(remaining, source::TIME)?;

    let mut keep = Vec::with_capacity(remaining.height());
    let mut received_values: Vec<String> = Vec::new();
    let mut method_values: Vec<String> = Vec::new();
    let mut summaries: Vec<i64> = Vec::new();
    let mut matched = 0usize;
    let mut negative_dropped = 0usize;

    for idx in 0..remaining.height() {
        let Some((received, method)) = lookup.get(&case_numbers[idx]) else {
            keep.push(false);
            continue;
        };
        // An incomplete form row (blank method) is no match.
        if method.trim().is_empty() {
            keep.push(false);
            continue;
        }
        matched += 1;
        let summary = parse_time(&dispatch_times[idx])
            .zip(parse_time_last_token(received))
            .map(|(origin, arrived)| interval_seconds(origin, arrived));
        match summary {
            Some(seconds) if seconds >= 0 => {
                keep.push(true);
                received_values.push(received.clone());
                method_values.push(method.clone());
                summaries.push(seconds);
            }
            _ => {
                // Unparseable times produce a null interval; nulls and
                // negatives are dropped, not corrected.
                negative_dropped += 1;
                keep.push(false);
            }
        }
    }

    let mut joined = filter_rows(remaining, &keep)?;
    joined.with_column(Series::new(source::RECEIVED_TIME.into(), received_values))?;
    joined.with_column(Series::new(source::TRANSPORT_METHOD.into(), method_values))?;
    joined.with_column(Series::new(source::SUMMARY.into(), summaries))?;

    let deduped = dedup_same_day(&joined)?;
    let summary_values = opt_int_values(&deduped, source::SUMMARY)?;
    let within_threshold = summary_values
        .iter()
        .filter(|value| matches!(value, Some(seconds) if *seconds <= THRESHOLD_SECONDS))
        .count();

    debug!(
        remaining = remaining.height(),
        matched,
        negative_dropped,
        deduped = deduped.height(),
        within_threshold,
        "computed transport intervals"
    );
    Ok(IntervalOutcome {
        remaining: deduped,
        matched,
        negative_dropped,
        within_threshold,
    })
}

/// For each `(CaseNo, New_date)` group keep only the row with the smallest
/// `Summary`; on ties the earliest source row wins.
fn dedup_same_day(df: &DataFrame) -> Result<DataFrame> {
    let case_numbers = int_values(df, source::CASE_NO)?;
    let dates = string_values(df, source::NEW)?;
    let summaries = int_values(df, source::SUMMARY)?;

    let mut best: BTreeMap<(i64, String), (usize, i64)> = BTreeMap::new();
    for idx in 0..df.height() {
        let key = (case_numbers[idx], dates[idx].clone());
        match best.get(&key) {
            Some((_, best_summary)) if *best_summary <= summaries[idx] => {}
            _ => {
                best.insert(key, (idx, summaries[idx]));
            }
        }
    }
    let mut keep = vec![false; df.height()];
    for (idx, _) in best.values() {
        keep[*idx] = true;
    }
    filter_rows(df, &keep)
}
