//! Partition joined orders into excluded and remaining.
//!
//! A row is excluded when its department or clinic value appears among the
//! distinct non-null category values of the main row-set AND the matching
//! dimension description is non-null. The partition is total: every joined
//! row lands in exactly one side.

use std::collections::BTreeSet;

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::debug;

use medstat_model::schema::{derived, source};

use crate::data_utils::{filter_rows, opt_string_values};

#[derive(Debug, Clone)]
pub struct Partitions {
    pub excluded: DataFrame,
    pub remaining: DataFrame,
}

pub fn split_partitions(joined: &DataFrame) -> Result<Partitions> {
    let departments = opt_string_values(joined, source::DEPARTMENT)?;
    let clinics = opt_string_values(joined, source::CLINIC_WARD)?;
    let mat_department = opt_string_values(joined, derived::MAT_DEPARTMENT)?;
    let mat_clinic = opt_string_values(joined, derived::MAT_CLINIC)?;

    let department_set: BTreeSet<&str> = departments
        .iter()
        .filter_map(|value| value.as_deref())
        .collect();
    let clinic_set: BTreeSet<&str> = clinics
        .iter()
        .filter_map(|value| value.as_deref())
        .collect();

    let mut is_excluded = Vec::with_capacity(joined.height());
    for idx in 0..joined.height() {
        let floor_match = departments[idx]
            .as_deref()
            .map(|value| department_set.contains(value))
            .unwrap_or(false)
            && mat_department[idx].is_some();
        let clinic_match = clinics[idx]
            .as_deref()
            .map(|value| clinic_set.contains(value))
            .unwrap_or(false)
            && mat_clinic[idx].is_some();
        is_excluded.push(floor_match || clinic_match);
    }

    let keep_remaining: Vec<bool> = is_excluded.iter().map(|flag| !flag).collect();
    let excluded = filter_rows(joined, &is_excluded)?;
    let remaining = filter_rows(joined, &keep_remaining)?;
    debug!(
        joined = joined.height(),
        excluded = excluded.height(),
        remaining = remaining.height(),
        "partitioned joined orders"
    );
    Ok(Partitions {
        excluded,
        remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn joined_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new(source::CASE_NO.into(), [1001i64, 1002, 1003]).into(),
            Series::new(source::DEPARTMENT.into(), ["ER", "ICU", ""]).into(),
            Series::new(source::CLINIC_WARD.into(), ["", "", "OPD"]).into(),
            Series::new(
                derived::MAT_DEPARTMENT.into(),
                [Some("Stock A"), None, None],
            )
            .into(),
            Series::new(derived::MAT_CLINIC.into(), [None::<&str>, None, None]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn partition_is_total_and_exclusive() {
        let joined = joined_frame();
        let partitions = split_partitions(&joined).unwrap();
        assert_eq!(
            partitions.excluded.height() + partitions.remaining.height(),
            joined.height()
        );
        // Only the row with a non-null dimension match is excluded.
        assert_eq!(partitions.excluded.height(), 1);
        assert_eq!(partitions.remaining.height(), 2);
    }

    #[test]
    fn null_category_rows_stay_remaining() {
        let partitions = split_partitions(&joined_frame()).unwrap();
        let departments =
            opt_string_values(&partitions.remaining, source::DEPARTMENT).unwrap();
        // ICU had no dimension match; the null-department row never matched.
        assert!(departments.contains(&Some("ICU".to_string())));
        assert!(departments.contains(&None));
    }
}
