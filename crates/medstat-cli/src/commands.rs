//! Command orchestration: load, transform, and the destination load.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use medstat_ingest::load_sources;
use medstat_model::{RunCounts, SummaryRecord};
use medstat_store::DestinationStore;
use medstat_transform::{RunContext, TransformOutput, run_transform};

use medstat_cli::config::Config;

use crate::cli::{CheckArgs, RunArgs};

/// What a run produced, for the end-of-run report.
pub struct RunOutcome {
    pub counts: RunCounts,
    pub summary: SummaryRecord,
    pub load: LoadOutcome,
}

/// Destination-load result.
pub enum LoadOutcome {
    /// Store writes were skipped (`check` or `--dry-run`).
    Skipped,
    Loaded {
        detail_rows: u64,
        summary_inserted: bool,
    },
}

/// Full pipeline: transform, then truncate-and-load the destination.
pub fn run_pipeline(args: &RunArgs) -> Result<RunOutcome> {
    let config = Config::load(&args.config)?;
    let output = transform_stage(&config, args.workbook.as_deref())?;
    if args.dry_run {
        info!("dry run: skipping destination load");
        return Ok(RunOutcome {
            counts: output.counts,
            summary: output.summary,
            load: LoadOutcome::Skipped,
        });
    }
    let database_url = config.resolve_database_url(args.database_url.as_deref())?;
    let load_span = info_span!("load", report_date = %output.summary.report_date);
    let load = load_span.in_scope(|| load_destination(&database_url, &output))?;
    Ok(RunOutcome {
        counts: output.counts,
        summary: output.summary,
        load,
    })
}

/// Transform-only: same stages, no store connection.
pub fn run_check(args: &CheckArgs) -> Result<RunOutcome> {
    let config = Config::load(&args.config)?;
    let output = transform_stage(&config, args.workbook.as_deref())?;
    Ok(RunOutcome {
        counts: output.counts,
        summary: output.summary,
        load: LoadOutcome::Skipped,
    })
}

fn transform_stage(
    config: &Config,
    workbook_override: Option<&std::path::Path>,
) -> Result<TransformOutput> {
    let context = RunContext::from_wall_clock();
    let window = context.report_window();
    info!(
        report_date = %window.report_date(),
        window_start = %window.start,
        window_end = %window.end,
        "report window computed"
    );
    let workbook = config.workbook_path(workbook_override);
    let sources = info_span!("ingest", workbook = %workbook.display())
        .in_scope(|| load_sources(&workbook))
        .context("load source workbook")?;
    info_span!("transform").in_scope(|| run_transform(&sources, &window))
}

/// Drive the async store on a runtime owned by the load phase. The detail
/// load and the summary insert are separate transactions; the summary is
/// not attempted if the detail load fails.
fn load_destination(database_url: &str, output: &TransformOutput) -> Result<LoadOutcome> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build store runtime")?;
    runtime.block_on(async {
        let store = DestinationStore::connect(database_url).await?;
        let detail_rows = store.replace_detail(&output.detail).await?;
        let summary_inserted = store.insert_summary_if_absent(&output.summary).await?;
        store.close().await;
        Ok(LoadOutcome::Loaded {
            detail_rows,
            summary_inserted,
        })
    })
}
