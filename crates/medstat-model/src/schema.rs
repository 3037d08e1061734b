//! Destination schema for the statistics store.
//!
//! The destination store owns two tables: `med_stat` (detail rows, one per
//! surviving order) and `med_stat_summary` (one row per report month). The
//! detail shape is declared here as an ordered mapping from destination
//! column to the source column it is filled from, evaluated once by the
//! shaper. A destination column whose source column is absent from a
//! partition (the excluded partition never carries transport fields) is
//! loaded as null; source columns not named here are dropped.

/// Detail table name in the destination store.
pub const DETAIL_TABLE: &str = "med_stat";

/// Summary table name in the destination store.
pub const SUMMARY_TABLE: &str = "med_stat_summary";

/// Source-side column names as they appear in the workbook and in the
/// derived frames. The transport sheet headers are Thai; they are renamed to
/// the destination schema during shaping.
pub mod source {
    pub const MK: &str = "MK";
    pub const HN: &str = "HN";
    pub const CASE_NO: &str = "CaseNo";
    pub const MED_NUMBER: &str = "Med_Number";
    pub const MED_DESCRIPTION: &str = "Med_Description";
    pub const ORDER_ID: &str = "OrderID";
    pub const PRIORITY: &str = "Priority";
    pub const TYPE: &str = "Type";
    pub const DEPARTMENT: &str = "Department";
    pub const CLINIC_WARD: &str = "Clinic-Ward";
    pub const USER: &str = "User";
    pub const NEW: &str = "New";
    pub const TIME: &str = "time";
    pub const ACTIVE: &str = "Active";
    pub const FINAL: &str = "Final";
    pub const NEW_TO_ACTIVE: &str = "Sum of New_to_Active_minutes";
    pub const ACTIVE_TO_FINAL: &str = "Sum of Active_to_Final_minutes";
    pub const NEW_TO_FINAL: &str = "Sum of New_to_Final_minutes";
    /// Transport sheet: submission date.
    pub const SUBMITTED_DATE: &str = "วันที่";
    /// Transport sheet: visit number, joined against `CaseNo`.
    pub const VISIT_NUMBER: &str = "VN";
    /// Transport sheet: destination-received time.
    pub const RECEIVED_TIME: &str = "เวลาปลายทางได้รับ";
    /// Transport sheet: transport method.
    pub const TRANSPORT_METHOD: &str = "ส่งทาง";
    /// Derived during the interval stage: elapsed seconds.
    pub const SUMMARY: &str = "Summary";

    /// Dimension sheets share one schema.
    pub const KEY: &str = "key";
    pub const MATERIAL_DESCRIPTION: &str = "Material Description";
    pub const DIM_TYPE: &str = "type";
}

/// Derived column names used between transform stages.
pub mod derived {
    pub const KEY_DEPARTMENT: &str = "key_department";
    pub const KEY_CLINIC: &str = "key_clinic";
    pub const MAT_DEPARTMENT: &str = "Mat_Department";
    pub const TYPE_DEPARTMENT: &str = "Type_Department";
    pub const MAT_CLINIC: &str = "Mat_Clinic";
    pub const TYPE_CLINIC: &str = "Type_Clinic";
}

/// One destination column and the source column that fills it.
///
/// `source` is `None` for columns the shaper assigns itself (the partition
/// flag) rather than copies from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationColumn {
    pub name: &'static str,
    pub source: Option<&'static str>,
}

const DETAIL_COLUMNS: &[DestinationColumn] = &[
    DestinationColumn { name: "mk", source: Some(source::MK) },
    DestinationColumn { name: "hn", source: Some(source::HN) },
    DestinationColumn { name: "case_no", source: Some(source::CASE_NO) },
    DestinationColumn { name: "med_number", source: Some(source::MED_NUMBER) },
    DestinationColumn { name: "med_description", source: Some(source::MED_DESCRIPTION) },
    DestinationColumn { name: "order_id", source: Some(source::ORDER_ID) },
    DestinationColumn { name: "med_priority", source: Some(source::PRIORITY) },
    DestinationColumn { name: "med_type", source: Some(source::TYPE) },
    DestinationColumn { name: "department", source: Some(source::DEPARTMENT) },
    DestinationColumn { name: "clinic_ward", source: Some(source::CLINIC_WARD) },
    DestinationColumn { name: "user_staff", source: Some(source::USER) },
    DestinationColumn { name: "new_date", source: Some(source::NEW) },
    DestinationColumn { name: "new_time", source: Some(source::TIME) },
    DestinationColumn { name: "active", source: Some(source::ACTIVE) },
    DestinationColumn { name: "final", source: Some(source::FINAL) },
    DestinationColumn { name: "new_to_active_minutes", source: Some(source::NEW_TO_ACTIVE) },
    DestinationColumn { name: "active_to_final_minutes", source: Some(source::ACTIVE_TO_FINAL) },
    DestinationColumn { name: "new_to_final_minutes", source: Some(source::NEW_TO_FINAL) },
    DestinationColumn { name: "received_time", source: Some(source::RECEIVED_TIME) },
    DestinationColumn { name: "summary_interval", source: Some(source::SUMMARY) },
    DestinationColumn { name: "transport_method", source: Some(source::TRANSPORT_METHOD) },
    DestinationColumn { name: "is_excluded", source: None },
];

/// Ordered destination columns for the detail table.
pub fn detail_columns() -> &'static [DestinationColumn] {
    DETAIL_COLUMNS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_columns_are_unique() {
        let mut names: Vec<&str> = DETAIL_COLUMNS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DETAIL_COLUMNS.len());
    }

    #[test]
    fn partition_flag_has_no_source() {
        let flag = DETAIL_COLUMNS
            .iter()
            .find(|c| c.name == "is_excluded")
            .expect("is_excluded column");
        assert!(flag.source.is_none());
    }

    #[test]
    fn thai_transport_columns_are_renamed() {
        let renamed: Vec<&str> = DETAIL_COLUMNS
            .iter()
            .filter(|c| {
                c.source == Some(source::RECEIVED_TIME)
                    || c.source == Some(source::TRANSPORT_METHOD)
            })
            .map(|c| c.name)
            .collect();
        assert_eq!(renamed, ["received_time", "transport_method"]);
        // Derived join columns never reach the destination.
        assert!(
            DETAIL_COLUMNS
                .iter()
                .all(|c| c.source != Some("Mat_Department"))
        );
    }
}
