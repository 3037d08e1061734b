//! End-of-run report, printed to stdout.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::commands::{LoadOutcome, RunOutcome};

pub fn print_report(outcome: &RunOutcome) {
    println!("Report month: {}", outcome.summary.report_date.format("%Y-%m"));

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    apply_table_style(&mut table);
    let counts = &outcome.counts;
    let rows: &[(&str, usize)] = &[
        ("Orders loaded", counts.source_rows),
        ("Transport rows in window", counts.transport_rows),
        ("Excluded (dimension match)", counts.excluded),
        ("Remaining before transport join", counts.remaining),
        ("Transport matched", counts.transport_matched),
        ("Dropped (negative/unparseable)", counts.negative_dropped),
        ("Remaining after dedup", counts.remaining_final),
        ("Within 15-minute target", counts.within_threshold),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.add_row(vec![
        Cell::new("Target count").add_attribute(Attribute::Bold),
        Cell::new(outcome.summary.target_count).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Overall count").add_attribute(Attribute::Bold),
        Cell::new(outcome.summary.overall_count).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    match &outcome.load {
        LoadOutcome::Skipped => println!("Destination load: skipped"),
        LoadOutcome::Loaded {
            detail_rows,
            summary_inserted,
        } => {
            println!("Detail rows loaded: {detail_rows}");
            if *summary_inserted {
                println!("Summary row inserted");
            } else {
                println!("Summary row already present (skipped)");
            }
        }
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}
