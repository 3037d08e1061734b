//! Workbook ingestion for the medication transport statistics pipeline.

pub mod error;
pub mod frame;
pub mod sources;
pub mod workbook;

pub use error::{IngestError, Result};
pub use frame::table_to_frame;
pub use sources::{SourceFrames, load_sources};
pub use workbook::{SheetTable, Workbook};
