use std::path::PathBuf;

use thiserror::Error;

/// Load-stage failures. All of these abort the run before any destination
/// mutation is attempted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("workbook not found: {path}")]
    WorkbookMissing { path: PathBuf },
    #[error("read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("sheet not found: {sheet}")]
    SheetMissing { sheet: String },
    #[error("sheet {sheet}: missing column {column}")]
    ColumnMissing { sheet: String, column: String },
    #[error("sheet {sheet}: column {column}, row {row}: not an integer: {value:?}")]
    IntColumn {
        sheet: String,
        column: String,
        /// 1-based sheet row, counting the header row.
        row: usize,
        value: String,
    },
    #[error("sheet {sheet}: {source}")]
    Frame {
        sheet: String,
        #[source]
        source: polars::prelude::PolarsError,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
