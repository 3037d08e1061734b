//! Shape partitions into destination records.
//!
//! The destination mapping in `medstat_model::schema` is the contract:
//! source columns it does not name are dropped, and destination columns
//! whose source column is absent from a partition load as null. The excluded
//! partition never carries transport fields, so those arrive null there by
//! construction.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use polars::prelude::{AnyValue, DataFrame};

use medstat_model::schema::source;
use medstat_model::{DetailRecord, Partition, RunCounts, SummaryRecord};

use crate::context::ReportWindow;
use crate::data_utils::{any_to_i64, any_to_string, parse_f64};

/// Shape one partition into detail records, preserving row order.
pub fn shape_partition(df: &DataFrame, partition: Partition) -> Result<Vec<DetailRecord>> {
    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        records.push(shape_row(df, idx, partition)?);
    }
    Ok(records)
}

/// Union of both partitions: remaining first, then excluded, each in
/// upstream order.
pub fn shape_output(
    remaining: &DataFrame,
    excluded: &DataFrame,
) -> Result<Vec<DetailRecord>> {
    let mut records = shape_partition(remaining, Partition::Remaining)?;
    records.extend(shape_partition(excluded, Partition::Excluded)?);
    Ok(records)
}

/// The one summary row per run, keyed by the report date.
pub fn build_summary(window: &ReportWindow, counts: &RunCounts) -> SummaryRecord {
    SummaryRecord {
        report_date: window.report_date(),
        target_count: counts.target_count(),
        overall_count: counts.overall_count(),
    }
}

fn shape_row(df: &DataFrame, idx: usize, partition: Partition) -> Result<DetailRecord> {
    let case_no = required_int(df, source::CASE_NO, idx)?;
    let med_number = required_int(df, source::MED_NUMBER, idx)?;
    let summary_interval = match partition {
        // Null intervals store as zero for the remaining partition.
        Partition::Remaining => Some(opt_int(df, source::SUMMARY, idx).unwrap_or(0)),
        Partition::Excluded => None,
    };
    Ok(DetailRecord {
        mk: opt_string(df, source::MK, idx),
        hn: opt_string(df, source::HN, idx),
        case_no,
        med_number,
        med_description: opt_string(df, source::MED_DESCRIPTION, idx),
        order_id: opt_string(df, source::ORDER_ID, idx),
        med_priority: opt_string(df, source::PRIORITY, idx),
        med_type: opt_string(df, source::TYPE, idx),
        department: opt_string(df, source::DEPARTMENT, idx),
        clinic_ward: opt_string(df, source::CLINIC_WARD, idx),
        user_staff: opt_string(df, source::USER, idx),
        new_date: opt_string(df, source::NEW, idx)
            .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()),
        new_time: opt_string(df, source::TIME, idx)
            .and_then(|raw| NaiveTime::parse_from_str(&raw, "%H:%M:%S").ok()),
        active: opt_string(df, source::ACTIVE, idx),
        final_time: opt_string(df, source::FINAL, idx),
        new_to_active_minutes: opt_f64(df, source::NEW_TO_ACTIVE, idx),
        active_to_final_minutes: opt_f64(df, source::ACTIVE_TO_FINAL, idx),
        new_to_final_minutes: opt_f64(df, source::NEW_TO_FINAL, idx),
        received_time: opt_string(df, source::RECEIVED_TIME, idx),
        summary_interval,
        transport_method: opt_string(df, source::TRANSPORT_METHOD, idx),
        is_excluded: partition.flag(),
    })
}

/// A destination column whose source column is absent, or whose cell is
/// blank, loads as null. Never an error.
fn opt_string(df: &DataFrame, name: &str, idx: usize) -> Option<String> {
    let column = df.column(name).ok()?;
    let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn opt_int(df: &DataFrame, name: &str, idx: usize) -> Option<i64> {
    let column = df.column(name).ok()?;
    any_to_i64(column.get(idx).unwrap_or(AnyValue::Null))
}

fn opt_f64(df: &DataFrame, name: &str, idx: usize) -> Option<f64> {
    opt_string(df, name, idx).and_then(|raw| parse_f64(&raw))
}

fn required_int(df: &DataFrame, name: &str, idx: usize) -> Result<i64> {
    opt_int(df, name, idx).with_context(|| format!("column {name}, row {idx}: expected integer"))
}
