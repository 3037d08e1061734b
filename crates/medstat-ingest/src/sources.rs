//! The four named source sheets and their load contract.
//!
//! A missing sheet or declared column aborts the entire run; there is no
//! partial-load recovery.

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::info;

use medstat_model::schema::source;

use crate::error::Result;
use crate::frame::table_to_frame;
use crate::workbook::{SheetTable, Workbook};

pub const SHEET_ORDERS: &str = "data";
pub const SHEET_DEPARTMENT: &str = "Department";
pub const SHEET_CLINIC: &str = "Clinic";
pub const SHEET_TRANSPORT: &str = "Form Responses 1";

/// Columns that must exist on the main sheet.
const ORDER_COLUMNS: &[&str] = &[
    source::CASE_NO,
    source::MED_NUMBER,
    source::DEPARTMENT,
    source::CLINIC_WARD,
    source::NEW,
];

/// Columns that must exist on each dimension sheet.
const DIMENSION_COLUMNS: &[&str] = &[source::KEY, source::MATERIAL_DESCRIPTION, source::DIM_TYPE];

/// Columns that must exist on the transport sheet.
const TRANSPORT_COLUMNS: &[&str] = &[
    source::SUBMITTED_DATE,
    source::VISIT_NUMBER,
    source::RECEIVED_TIME,
    source::TRANSPORT_METHOD,
];

/// The four row-sets a run starts from.
#[derive(Debug, Clone)]
pub struct SourceFrames {
    pub orders: DataFrame,
    pub departments: DataFrame,
    pub clinics: DataFrame,
    pub transport: DataFrame,
}

/// Load all four sheets from one workbook with the declared coercions.
pub fn load_sources(path: &Path) -> Result<SourceFrames> {
    let mut workbook = Workbook::open(path)?;

    let orders_table = required_sheet(&mut workbook, SHEET_ORDERS, ORDER_COLUMNS)?;
    let departments_table = required_sheet(&mut workbook, SHEET_DEPARTMENT, DIMENSION_COLUMNS)?;
    let clinics_table = required_sheet(&mut workbook, SHEET_CLINIC, DIMENSION_COLUMNS)?;
    let transport_table = required_sheet(&mut workbook, SHEET_TRANSPORT, TRANSPORT_COLUMNS)?;

    let orders = table_to_frame(&orders_table, &[source::CASE_NO, source::MED_NUMBER])?;
    let departments = table_to_frame(&departments_table, &[])?;
    let clinics = table_to_frame(&clinics_table, &[])?;
    let transport = table_to_frame(&transport_table, &[])?;

    info!(
        orders = orders.height(),
        departments = departments.height(),
        clinics = clinics.height(),
        transport = transport.height(),
        "loaded source sheets"
    );

    Ok(SourceFrames {
        orders,
        departments,
        clinics,
        transport,
    })
}

fn required_sheet(
    workbook: &mut Workbook,
    sheet: &str,
    required_columns: &[&str],
) -> Result<SheetTable> {
    let table = workbook.sheet_table(sheet)?;
    for column in required_columns {
        table.require_column(column)?;
    }
    Ok(table)
}
