//! Sheet table to DataFrame conversion.
//!
//! Columns are carried as strings unless declared integer. Integer columns
//! parse strictly: a blank or non-numeric cell fails the load, matching the
//! contract that a malformed identifier aborts the run.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use crate::error::{IngestError, Result};
use crate::workbook::SheetTable;

/// Build a frame from a sheet table, parsing `int_columns` strictly to
/// `Int64` and carrying everything else as strings.
pub fn table_to_frame(table: &SheetTable, int_columns: &[&str]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.headers.len());
    for (idx, header) in table.headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        let strict_int = int_columns
            .iter()
            .any(|name| header.eq_ignore_ascii_case(name));
        if strict_int {
            let values = int_column_values(table, idx)?;
            columns.push(Series::new(header.as_str().into(), values).into());
        } else {
            let values = string_column_values(table, idx);
            columns.push(Series::new(header.as_str().into(), values).into());
        }
    }
    DataFrame::new(columns).map_err(|source| IngestError::Frame {
        sheet: table.name.clone(),
        source,
    })
}

fn string_column_values(table: &SheetTable, idx: usize) -> Vec<String> {
    table
        .rows
        .iter()
        .map(|row| row.get(idx).cloned().unwrap_or_default())
        .collect()
}

fn int_column_values(table: &SheetTable, idx: usize) -> Result<Vec<i64>> {
    let mut values = Vec::with_capacity(table.rows.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let raw = row.get(idx).map(String::as_str).unwrap_or("");
        let parsed = raw.trim().parse::<i64>().map_err(|_| IngestError::IntColumn {
            sheet: table.name.clone(),
            column: table.headers[idx].clone(),
            // Header row is sheet row 1.
            row: row_idx + 2,
            value: raw.to_string(),
        })?;
        values.push(parsed);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> SheetTable {
        SheetTable {
            name: "data".to_string(),
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| (*v).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn builds_string_and_int_columns() {
        let table = table(
            &["CaseNo", "Department"],
            &[&["1001", "ER"], &["1002", ""]],
        );
        let df = table_to_frame(&table, &["CaseNo"]).expect("frame");
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.column("CaseNo").unwrap().dtype(),
            &polars::prelude::DataType::Int64
        );
        assert_eq!(
            df.column("Department").unwrap().dtype(),
            &polars::prelude::DataType::String
        );
    }

    #[test]
    fn non_numeric_int_cell_fails_the_load() {
        let table = table(&["CaseNo"], &[&["1001"], &["n/a"]]);
        let err = table_to_frame(&table, &["CaseNo"]).unwrap_err();
        match err {
            IngestError::IntColumn { row, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_int_cell_fails_the_load() {
        let table = table(&["Med_Number"], &[&[""]]);
        assert!(table_to_frame(&table, &["Med_Number"]).is_err());
    }
}
