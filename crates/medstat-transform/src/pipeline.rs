//! Stage orchestration for the monthly transform.
//!
//! Stages run strictly forward: date filter, key derivation and dimension
//! joins, classification, interval computation, shaping. Each stage runs
//! inside its own tracing span; the caller owns source loading and the
//! destination load.

use anyhow::Result;
use tracing::{info, info_span};

use medstat_ingest::SourceFrames;
use medstat_model::schema::derived;
use medstat_model::{DetailRecord, RunCounts, SummaryRecord};

use crate::classify::split_partitions;
use crate::context::ReportWindow;
use crate::interval::{build_transport_lookup, compute_intervals};
use crate::keys::{DimensionLookup, apply_lookup, prepare_orders};
use crate::shape::{build_summary, shape_output};
use crate::window::filter_to_window;

/// Everything the destination load needs, plus the stage counts for the run
/// report.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub detail: Vec<DetailRecord>,
    pub summary: SummaryRecord,
    pub counts: RunCounts,
}

/// Run the full transform over loaded source frames.
pub fn run_transform(sources: &SourceFrames, window: &ReportWindow) -> Result<TransformOutput> {
    let mut counts = RunCounts {
        source_rows: sources.orders.height(),
        ..RunCounts::default()
    };

    let transport = info_span!("date_filter")
        .in_scope(|| filter_to_window(&sources.transport, window))?;
    counts.transport_rows = transport.height();

    let joined = info_span!("join").in_scope(|| -> Result<_> {
        let mut orders = sources.orders.clone();
        prepare_orders(&mut orders)?;
        let department_lookup = DimensionLookup::from_frame(&sources.departments)?;
        let clinic_lookup = DimensionLookup::from_frame(&sources.clinics)?;
        apply_lookup(
            &mut orders,
            derived::KEY_DEPARTMENT,
            &department_lookup,
            derived::MAT_DEPARTMENT,
            derived::TYPE_DEPARTMENT,
        )?;
        apply_lookup(
            &mut orders,
            derived::KEY_CLINIC,
            &clinic_lookup,
            derived::MAT_CLINIC,
            derived::TYPE_CLINIC,
        )?;
        Ok(orders)
    })?;

    let partitions = info_span!("classify").in_scope(|| split_partitions(&joined))?;
    counts.excluded = partitions.excluded.height();
    counts.remaining = partitions.remaining.height();

    let outcome = info_span!("interval").in_scope(|| {
        let lookup = build_transport_lookup(&transport)?;
        compute_intervals(&partitions.remaining, &lookup)
    })?;
    counts.transport_matched = outcome.matched;
    counts.negative_dropped = outcome.negative_dropped;
    counts.remaining_final = outcome.remaining.height();
    counts.within_threshold = outcome.within_threshold;

    let detail = info_span!("shape")
        .in_scope(|| shape_output(&outcome.remaining, &partitions.excluded))?;
    let summary = build_summary(window, &counts);

    info!(
        report_date = %summary.report_date,
        target = summary.target_count,
        overall = summary.overall_count,
        detail_rows = detail.len(),
        "transform complete"
    );
    Ok(TransformOutput {
        detail,
        summary,
        counts,
    })
}
