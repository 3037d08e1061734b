//! Row-level access helpers over polars frames.
//!
//! The pipeline joins and partitions by walking columns directly and
//! filtering with boolean masks; these helpers keep the `AnyValue` handling
//! in one place.

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};

pub fn any_to_string(value: AnyValue) -> String {
    match value {
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Null => String::new(),
        _ => value.to_string(),
    }
}

pub fn any_to_i64(value: AnyValue) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(value) => Some(value as i64),
        AnyValue::Int16(value) => Some(value as i64),
        AnyValue::Int32(value) => Some(value as i64),
        AnyValue::Int64(value) => Some(value),
        AnyValue::UInt8(value) => Some(value as i64),
        AnyValue::UInt16(value) => Some(value as i64),
        AnyValue::UInt32(value) => Some(value as i64),
        AnyValue::UInt64(value) => Some(value as i64),
        AnyValue::String(value) => parse_i64(value),
        AnyValue::StringOwned(value) => parse_i64(&value),
        _ => None,
    }
}

pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// All values of a string column; nulls come back as empty strings.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name).with_context(|| format!("column {name}"))?;
    Ok((0..df.height())
        .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Values of a string column with nulls preserved. An empty cell counts as
/// null: the loader stores missing cells as empty strings.
pub fn opt_string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name).with_context(|| format!("column {name}"))?;
    Ok((0..df.height())
        .map(|idx| {
            let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
            if value.trim().is_empty() { None } else { Some(value) }
        })
        .collect())
}

/// All values of a strictly-typed integer column.
pub fn int_values(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let column = df.column(name).with_context(|| format!("column {name}"))?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_i64(column.get(idx).unwrap_or(AnyValue::Null))
            .with_context(|| format!("column {name}, row {idx}: expected integer"))?;
        values.push(value);
    }
    Ok(values)
}

/// Values of a nullable integer column.
pub fn opt_int_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df.column(name).with_context(|| format!("column {name}"))?;
    Ok((0..df.height())
        .map(|idx| any_to_i64(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}

/// Keep rows whose mask entry is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask).context("filter rows")
}
