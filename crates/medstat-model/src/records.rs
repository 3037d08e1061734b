//! Typed records exchanged between the transform and the destination store.

use chrono::{NaiveDate, NaiveTime};

/// Which side of the classification split a detail row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// Unmatched by both dimensions; carries a transport interval.
    Remaining,
    /// Matched a dimension; excluded from interval computation.
    Excluded,
}

impl Partition {
    /// Value stored in the `is_excluded` destination column.
    pub fn flag(self) -> i16 {
        match self {
            Partition::Remaining => 0,
            Partition::Excluded => 1,
        }
    }
}

/// One shaped row of the `med_stat` detail table.
///
/// Nullable fields stay nullable all the way into the store; the excluded
/// partition never carries transport fields, so `received_time`,
/// `summary_interval`, and `transport_method` are null there.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub mk: Option<String>,
    pub hn: Option<String>,
    pub case_no: i64,
    pub med_number: i64,
    pub med_description: Option<String>,
    pub order_id: Option<String>,
    pub med_priority: Option<String>,
    pub med_type: Option<String>,
    pub department: Option<String>,
    pub clinic_ward: Option<String>,
    pub user_staff: Option<String>,
    pub new_date: Option<NaiveDate>,
    pub new_time: Option<NaiveTime>,
    pub active: Option<String>,
    pub final_time: Option<String>,
    pub new_to_active_minutes: Option<f64>,
    pub active_to_final_minutes: Option<f64>,
    pub new_to_final_minutes: Option<f64>,
    pub received_time: Option<String>,
    /// Elapsed seconds between dispatch and destination receipt. Whole
    /// seconds for the remaining partition (null coerced to 0 upstream),
    /// null for the excluded partition.
    pub summary_interval: Option<i64>,
    pub transport_method: Option<String>,
    pub is_excluded: i16,
}

/// One row of the `med_stat_summary` table, keyed by report date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRecord {
    /// First day of the reported month.
    pub report_date: NaiveDate,
    /// Remaining rows within the 15-minute threshold plus excluded rows.
    pub target_count: i64,
    /// All remaining rows after dedup plus excluded rows.
    pub overall_count: i64,
}

/// Stage-by-stage row counts, carried into the run report and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// Rows loaded from the main sheet.
    pub source_rows: usize,
    /// Transport rows inside the report window.
    pub transport_rows: usize,
    /// Rows routed to the excluded partition.
    pub excluded: usize,
    /// Rows in the remaining partition before the transport join.
    pub remaining: usize,
    /// Remaining rows that found a transport match.
    pub transport_matched: usize,
    /// Matched rows dropped for a negative or unparseable interval.
    pub negative_dropped: usize,
    /// Remaining rows after same-day dedup (final remaining).
    pub remaining_final: usize,
    /// Final remaining rows within the 15-minute threshold.
    pub within_threshold: usize,
}

impl RunCounts {
    pub fn target_count(&self) -> i64 {
        (self.within_threshold + self.excluded) as i64
    }

    pub fn overall_count(&self) -> i64 {
        (self.remaining_final + self.excluded) as i64
    }

    /// Rows written to the detail table.
    pub fn detail_rows(&self) -> usize {
        self.remaining_final + self.excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_flags() {
        assert_eq!(Partition::Remaining.flag(), 0);
        assert_eq!(Partition::Excluded.flag(), 1);
    }

    #[test]
    fn counts_roll_up() {
        let counts = RunCounts {
            source_rows: 10,
            transport_rows: 8,
            excluded: 3,
            remaining: 7,
            transport_matched: 6,
            negative_dropped: 1,
            remaining_final: 4,
            within_threshold: 2,
        };
        assert_eq!(counts.target_count(), 5);
        assert_eq!(counts.overall_count(), 7);
        assert!(counts.target_count() <= counts.overall_count());
        assert_eq!(counts.detail_rows(), 7);
    }
}
