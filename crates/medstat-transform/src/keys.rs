//! Composite key derivation and dimension joins.
//!
//! Keys are plain string concatenations: `Med_Number + "_" + category`. A
//! missing category coerces to the empty string, so the key stays
//! syntactically valid but can never match a dimension key (dimension keys
//! always carry a non-empty category suffix). Dimension lookups are deduped
//! by key, keeping the first occurrence in source order, which makes both
//! joins many-to-one.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use medstat_model::schema::{derived, source};

use crate::data_utils::{int_values, string_values};
use crate::datetime::parse_datetime;

/// Split the order timestamp into date and time-of-day columns and derive
/// both composite keys. `New` becomes a `YYYY-MM-DD` date string; `time`
/// holds the `HH:MM:SS` time of day. A blank timestamp yields empty strings
/// and surfaces later as null output fields; a non-empty timestamp that does
/// not parse aborts the run, like a malformed identifier at load.
pub fn prepare_orders(orders: &mut DataFrame) -> Result<()> {
    let raw_new = string_values(orders, source::NEW)?;
    let mut dates = Vec::with_capacity(raw_new.len());
    let mut times = Vec::with_capacity(raw_new.len());
    for (idx, raw) in raw_new.iter().enumerate() {
        if raw.trim().is_empty() {
            dates.push(String::new());
            times.push(String::new());
            continue;
        }
        let instant = parse_datetime(raw).with_context(|| {
            format!("column New, row {idx}: unparseable timestamp {raw:?}")
        })?;
        dates.push(instant.date().format("%Y-%m-%d").to_string());
        times.push(instant.time().format("%H:%M:%S").to_string());
    }
    orders.with_column(Series::new(source::NEW.into(), dates))?;
    orders.with_column(Series::new(source::TIME.into(), times))?;

    let med_numbers = int_values(orders, source::MED_NUMBER)?;
    let departments = string_values(orders, source::DEPARTMENT)?;
    let clinics = string_values(orders, source::CLINIC_WARD)?;
    let key_department: Vec<String> = med_numbers
        .iter()
        .zip(&departments)
        .map(|(med, dep)| composite_key(*med, dep))
        .collect();
    let key_clinic: Vec<String> = med_numbers
        .iter()
        .zip(&clinics)
        .map(|(med, clinic)| composite_key(*med, clinic))
        .collect();
    orders.with_column(Series::new(derived::KEY_DEPARTMENT.into(), key_department))?;
    orders.with_column(Series::new(derived::KEY_CLINIC.into(), key_clinic))?;
    Ok(())
}

fn composite_key(med_number: i64, category: &str) -> String {
    format!("{med_number}_{}", category.trim())
}

/// A deduped dimension sheet, keyed by its composite key.
#[derive(Debug, Clone, Default)]
pub struct DimensionLookup {
    entries: BTreeMap<String, (Option<String>, Option<String>)>,
}

impl DimensionLookup {
    /// Build from a dimension frame, keeping the first row per key in
    /// source order. Rows with an empty key are skipped; main-side keys are
    /// never empty.
    pub fn from_frame(dimension: &DataFrame) -> Result<Self> {
        let keys = string_values(dimension, source::KEY)?;
        let descriptions = string_values(dimension, source::MATERIAL_DESCRIPTION)?;
        let types = string_values(dimension, source::DIM_TYPE)?;
        let mut entries = BTreeMap::new();
        for idx in 0..keys.len() {
            let key = keys[idx].trim();
            if key.is_empty() {
                continue;
            }
            entries.entry(key.to_string()).or_insert_with(|| {
                (
                    non_empty(&descriptions[idx]),
                    non_empty(&types[idx]),
                )
            });
        }
        debug!(entries = entries.len(), rows = keys.len(), "built dimension lookup");
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&(Option<String>, Option<String>)> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Left-join a dimension lookup onto the frame by `key_column`, adding
/// description and type columns. Unmatched keys yield nulls.
pub fn apply_lookup(
    df: &mut DataFrame,
    key_column: &str,
    lookup: &DimensionLookup,
    description_column: &str,
    type_column: &str,
) -> Result<()> {
    let keys = string_values(df, key_column)?;
    let mut descriptions: Vec<Option<String>> = Vec::with_capacity(keys.len());
    let mut types: Vec<Option<String>> = Vec::with_capacity(keys.len());
    for key in &keys {
        match lookup.get(key) {
            Some((description, dim_type)) => {
                descriptions.push(description.clone());
                types.push(dim_type.clone());
            }
            None => {
                descriptions.push(None);
                types.push(None);
            }
        }
    }
    df.with_column(Series::new(description_column.into(), descriptions))?;
    df.with_column(Series::new(type_column.into(), types))?;
    Ok(())
}
