pub mod records;
pub mod schema;

pub use records::{DetailRecord, Partition, RunCounts, SummaryRecord};
pub use schema::{DETAIL_TABLE, DestinationColumn, SUMMARY_TABLE, detail_columns};
