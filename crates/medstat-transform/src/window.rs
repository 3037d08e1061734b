//! Date filter: restrict the transport row-set to the report window.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::debug;

use medstat_model::schema::source;

use crate::context::ReportWindow;
use crate::data_utils::{filter_rows, string_values};
use crate::datetime::parse_datetime;

/// Keep transport rows whose submission date falls inside the window.
/// Unparseable dates are treated as null and excluded.
pub fn filter_to_window(transport: &DataFrame, window: &ReportWindow) -> Result<DataFrame> {
    let submitted = string_values(transport, source::SUBMITTED_DATE)?;
    let keep: Vec<bool> = submitted
        .iter()
        .map(|raw| {
            parse_datetime(raw)
                .map(|instant| window.contains(instant))
                .unwrap_or(false)
        })
        .collect();
    let filtered = filter_rows(transport, &keep)?;
    debug!(
        total = transport.height(),
        in_window = filtered.height(),
        start = %window.start,
        end = %window.end,
        "filtered transport rows to report window"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use polars::prelude::{NamedFrom, Series};

    fn transport_frame(dates: &[&str]) -> DataFrame {
        let dates: Vec<String> = dates.iter().map(|d| (*d).to_string()).collect();
        let vn: Vec<String> = (0..dates.len()).map(|i| format!("{}", 1000 + i)).collect();
        DataFrame::new(vec![
            Series::new(source::SUBMITTED_DATE.into(), dates).into(),
            Series::new(source::VISIT_NUMBER.into(), vn).into(),
        ])
        .unwrap()
    }

    fn may_window() -> ReportWindow {
        let run: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        ReportWindow::previous_month(run)
    }

    #[test]
    fn keeps_only_rows_in_the_previous_month() {
        let df = transport_frame(&[
            "2024-05-01 00:00:00",
            "2024-05-31 23:59:59",
            "2024-06-01 00:00:00",
            "2024-04-30 12:00:00",
        ]);
        let filtered = filter_to_window(&df, &may_window()).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        let df = transport_frame(&["2024-05-10", "no date", ""]);
        let filtered = filter_to_window(&df, &may_window()).unwrap();
        assert_eq!(filtered.height(), 1);
    }
}
