//! Workbook access and cell normalization.
//!
//! Sheets come back as string tables: headers plus rows of normalized cell
//! text. Datetime cells render as `YYYY-MM-DD HH:MM:SS` and whole-number
//! float cells render without a trailing `.0`, so downstream parsing only
//! ever sees one textual form per value kind.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Sheets, open_workbook_auto};

use crate::error::{IngestError, Result};

/// One sheet, loaded in full: normalized headers plus string rows padded to
/// the header width. Fully empty rows are skipped.
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Case-insensitive header lookup.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(column))
    }

    /// Header lookup that fails the load when the column is absent.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| IngestError::ColumnMissing {
                sheet: self.name.clone(),
                column: column.to_string(),
            })
    }

}

/// An open workbook positioned at a path; sheets are read on demand.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Open the workbook, failing fast when the path does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IngestError::WorkbookMissing {
                path: path.to_path_buf(),
            });
        }
        let sheets = open_workbook_auto(path).map_err(|source| IngestError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load one named sheet as a string table. The first non-empty row is
    /// taken as the header row.
    pub fn sheet_table(&mut self, sheet: &str) -> Result<SheetTable> {
        if !self
            .sheets
            .sheet_names()
            .iter()
            .any(|name| name == sheet)
        {
            return Err(IngestError::SheetMissing {
                sheet: sheet.to_string(),
            });
        }
        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|source| IngestError::Workbook {
                path: self.path.clone(),
                source,
            })?;
        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(normalize_cell).collect();
            if cells.iter().all(|value| value.is_empty()) {
                continue;
            }
            raw_rows.push(cells);
        }
        let Some(header_row) = raw_rows.first() else {
            return Ok(SheetTable {
                name: sheet.to_string(),
                headers: Vec::new(),
                rows: Vec::new(),
            });
        };
        let headers: Vec<String> = header_row.iter().map(|raw| normalize_header(raw)).collect();
        let mut rows = Vec::with_capacity(raw_rows.len().saturating_sub(1));
        for raw in raw_rows.iter().skip(1) {
            let mut row = Vec::with_capacity(headers.len());
            for idx in 0..headers.len() {
                row.push(raw.get(idx).cloned().unwrap_or_default());
            }
            rows.push(row);
        }
        Ok(SheetTable {
            name: sheet.to_string(),
            headers,
            rows,
        })
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Render one cell as normalized text.
fn normalize_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.trim().trim_matches('\u{feff}').to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => format_numeric(*value),
        Data::Bool(value) => {
            if *value {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        Data::DateTime(value) => value
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.trim().to_string(),
    }
}

fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTime;

    #[test]
    fn headers_are_normalized() {
        assert_eq!(normalize_header("  Med_Number "), "Med_Number");
        assert_eq!(normalize_header("\u{feff}CaseNo"), "CaseNo");
        assert_eq!(normalize_header("Material   Description"), "Material Description");
    }

    #[test]
    fn whole_floats_lose_the_fraction() {
        assert_eq!(normalize_cell(&Data::Float(1001.0)), "1001");
        assert_eq!(normalize_cell(&Data::Float(12.5)), "12.5");
        assert_eq!(normalize_cell(&Data::Int(50)), "50");
    }

    #[test]
    fn datetime_cells_render_iso_like() {
        // 2024-05-01 08:12:00 in Excel serial form.
        let serial = 45413.0 + (8.0 * 3600.0 + 12.0 * 60.0) / 86400.0;
        let cell = Data::DateTime(ExcelDateTime::new(
            serial,
            calamine::ExcelDateTimeType::DateTime,
            false,
        ));
        assert_eq!(normalize_cell(&cell), "2024-05-01 08:12:00");
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let table = SheetTable {
            name: "data".to_string(),
            headers: vec!["CaseNo".to_string(), "Department".to_string()],
            rows: vec![vec!["1001".to_string(), "ER".to_string()]],
        };
        assert_eq!(table.column_index("caseno"), Some(0));
        assert_eq!(table.column_index("Department"), Some(1));
        assert!(table.require_column("HN").is_err());
    }
}
