//! End-to-end transform over in-memory source frames.

use chrono::NaiveDate;
use polars::prelude::{DataFrame, NamedFrom, Series};

use medstat_ingest::SourceFrames;
use medstat_model::schema::source;
use medstat_transform::{ReportWindow, run_transform};

fn orders_frame() -> DataFrame {
    let case_no: Vec<i64> = vec![1001, 2001, 1003, 1004, 1005, 1005];
    let med_number: Vec<i64> = vec![50, 60, 50, 50, 50, 50];
    let department = vec!["ER", "ICU", "Ward7", "Ward7", "ER", "ER"];
    let clinic_ward = vec!["", "", "", "", "", ""];
    let new = vec![
        "2024-05-01 08:00:00",
        "2024-05-02 09:30:00",
        "2024-05-03 08:00:00",
        "2024-05-03 10:00:00",
        "2024-05-04 08:00:00",
        "2024-05-04 08:05:00",
    ];
    let mk = vec!["M1", "M2", "M3", "M4", "M5", "M5"];
    DataFrame::new(vec![
        Series::new(source::CASE_NO.into(), case_no).into(),
        Series::new(source::MED_NUMBER.into(), med_number).into(),
        Series::new(source::DEPARTMENT.into(), department).into(),
        Series::new(source::CLINIC_WARD.into(), clinic_ward).into(),
        Series::new(source::NEW.into(), new).into(),
        Series::new(source::MK.into(), mk).into(),
    ])
    .unwrap()
}

fn dimension_frame(rows: &[(&str, &str, &str)]) -> DataFrame {
    let keys: Vec<String> = rows.iter().map(|r| r.0.to_string()).collect();
    let descriptions: Vec<String> = rows.iter().map(|r| r.1.to_string()).collect();
    let types: Vec<String> = rows.iter().map(|r| r.2.to_string()).collect();
    DataFrame::new(vec![
        Series::new(source::KEY.into(), keys).into(),
        Series::new(source::MATERIAL_DESCRIPTION.into(), descriptions).into(),
        Series::new(source::DIM_TYPE.into(), types).into(),
    ])
    .unwrap()
}

fn transport_frame() -> DataFrame {
    // Rows: a match for 1001 (plus a duplicate that must lose keep-first),
    // a negative-interval match for 1003, an out-of-window row for 1004, a
    // shared match for both 1005 entries, and a row with no visit number.
    let submitted = vec![
        "2024-05-01 08:30:00",
        "2024-05-01 09:00:00",
        "2024-05-03 08:10:00",
        "2024-06-02 10:00:00",
        "2024-05-04 08:30:00",
        "2024-05-05 11:00:00",
    ];
    let vn = vec!["1001", "1001", "1003", "1004", "1005", ""];
    let received = vec![
        "2024-05-01 08:12:00",
        "2024-05-01 09:00:00",
        "2024-05-03 07:50:00",
        "2024-06-02 10:05:00",
        "08:20:00",
        "2024-05-05 11:05:00",
    ];
    let method = vec![
        "Pneumatic",
        "Courier",
        "Pneumatic",
        "Courier",
        "Courier",
        "Courier",
    ];
    let to_strings = |values: Vec<&str>| -> Vec<String> {
        values.into_iter().map(str::to_string).collect()
    };
    DataFrame::new(vec![
        Series::new(source::SUBMITTED_DATE.into(), to_strings(submitted)).into(),
        Series::new(source::VISIT_NUMBER.into(), to_strings(vn)).into(),
        Series::new(source::RECEIVED_TIME.into(), to_strings(received)).into(),
        Series::new(source::TRANSPORT_METHOD.into(), to_strings(method)).into(),
    ])
    .unwrap()
}

fn fixture() -> (SourceFrames, ReportWindow) {
    let sources = SourceFrames {
        orders: orders_frame(),
        departments: dimension_frame(&[("60_ICU", "Ward stock", "ward")]),
        clinics: dimension_frame(&[]),
        transport: transport_frame(),
    };
    let run_at = NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(2, 0, 0)
        .unwrap();
    (sources, ReportWindow::previous_month(run_at))
}

#[test]
fn full_transform_counts_and_partition_totality() {
    let (sources, window) = fixture();
    let output = run_transform(&sources, &window).unwrap();
    let counts = output.counts;

    assert_eq!(counts.source_rows, 6);
    // Only the out-of-window transport row is filtered here; the null-VN
    // row survives until the lookup drops it.
    assert_eq!(counts.transport_rows, 5);
    // Partition totality before the transport join.
    assert_eq!(counts.excluded + counts.remaining, counts.source_rows);
    assert_eq!(counts.excluded, 1);
    assert_eq!(counts.remaining, 5);
    // 1004's transport row fell outside the window.
    assert_eq!(counts.transport_matched, 4);
    assert_eq!(counts.negative_dropped, 1);
    // 1001 plus the deduped 1005 pair.
    assert_eq!(counts.remaining_final, 2);
    assert_eq!(counts.within_threshold, 2);

    assert_eq!(output.summary.report_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert_eq!(output.summary.target_count, 3);
    assert_eq!(output.summary.overall_count, 3);
    assert!(output.summary.target_count <= output.summary.overall_count);
    assert_eq!(output.detail.len(), counts.detail_rows());
}

#[test]
fn matched_row_carries_interval_and_transport_fields() {
    let (sources, window) = fixture();
    let output = run_transform(&sources, &window).unwrap();
    let record = output
        .detail
        .iter()
        .find(|record| record.case_no == 1001)
        .expect("case 1001 present");
    assert_eq!(record.is_excluded, 0);
    assert_eq!(record.summary_interval, Some(720));
    assert_eq!(record.transport_method.as_deref(), Some("Pneumatic"));
    assert_eq!(record.mk.as_deref(), Some("M1"));
    assert_eq!(record.new_date, NaiveDate::from_ymd_opt(2024, 5, 1));
}

#[test]
fn negative_interval_and_unmatched_rows_are_absent() {
    let (sources, window) = fixture();
    let output = run_transform(&sources, &window).unwrap();
    assert!(!output.detail.iter().any(|record| record.case_no == 1003));
    assert!(!output.detail.iter().any(|record| record.case_no == 1004));
}

#[test]
fn dimension_match_routes_to_the_excluded_partition() {
    let (sources, window) = fixture();
    let output = run_transform(&sources, &window).unwrap();
    let record = output
        .detail
        .iter()
        .find(|record| record.case_no == 2001)
        .expect("case 2001 present");
    assert_eq!(record.is_excluded, 1);
    assert_eq!(record.summary_interval, None);
    assert_eq!(record.received_time, None);
}

#[test]
fn same_day_dedup_keeps_the_minimum_interval() {
    let (sources, window) = fixture();
    let output = run_transform(&sources, &window).unwrap();
    let day_four: Vec<_> = output
        .detail
        .iter()
        .filter(|record| record.case_no == 1005)
        .collect();
    assert_eq!(day_four.len(), 1);
    // Dispatched 08:05, received 08:20: the smaller of the two intervals.
    assert_eq!(day_four[0].summary_interval, Some(900));
}

#[test]
fn union_order_is_remaining_then_excluded() {
    let (sources, window) = fixture();
    let output = run_transform(&sources, &window).unwrap();
    let flags: Vec<i16> = output.detail.iter().map(|record| record.is_excluded).collect();
    let first_excluded = flags.iter().position(|flag| *flag == 1).unwrap();
    assert!(flags[..first_excluded].iter().all(|flag| *flag == 0));
    assert!(flags[first_excluded..].iter().all(|flag| *flag == 1));
}
