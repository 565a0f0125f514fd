//! End-to-end orchestration of the extraction, transformation, and
//! loading phases.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::{extract, inspect, load, transform};

/// Counters describing one completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows parsed from the source feed.
    pub rows_ingested: usize,
    /// Rows written to the artifact.
    pub rows_exported: usize,
    /// Rows dropped for a search reason outside the known pair.
    pub reports_dropped: usize,
    /// Rows dropped for a registering unit matching no region.
    pub regions_dropped: usize,
    /// Rows dropped for a weapon description missing from the term lists.
    pub weapons_dropped: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u128,
}

/// Run the full pipeline under the given configuration. Row-level
/// exclusions are data, not errors; anything returned as `Err` here is
/// fatal to the run.
pub fn run(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let started = Instant::now();

    let regions = Arc::new(config.regions.compile()?);
    let weapons = Arc::new(config.weapons.compile()?);

    info!("Beginning data extraction...");
    info!("1/5 Importing data...");
    let rows = extract::import_json(&config.input_path)?;
    let rows_ingested = rows.len();

    info!("2/5 Selecting columns...");
    let frame = extract::select_columns(rows);
    inspect::snapshot(&frame, "select_columns");

    info!("3/5 Dropping duplicates...");
    let frame = extract::drop_duplicates(frame);
    inspect::snapshot(&frame, "drop_duplicates");

    info!("4/5 Casting datatypes...");
    let frame = extract::cast_types(frame);
    inspect::snapshot(&frame, "cast_types");

    info!("5/5 Dropping nulls...");
    let frame = extract::drop_nulls(frame);

    info!("Beginning data transformation...");
    info!("1/4 Transforming 'reasonsearch' column...");
    let (frame, report_audit) = transform::classify_reports(frame);
    inspect::snapshot(&frame, "classify_reports");

    info!("2/4 Transforming 'organunit' column...");
    let (frame, region_audit) = transform::classify_regions(frame, &regions);
    inspect::snapshot(&frame, "classify_regions");

    info!("3/4 Transforming 'weaponkind' column...");
    let (frame, weapon_audit) = transform::classify_weapons(frame, &weapons);
    inspect::snapshot(&frame, "classify_weapons");

    info!("4/4 Transforming date columns...");
    let frame = transform::resolve_dates(frame);
    inspect::snapshot(&frame, "resolve_dates");

    info!("Beginning data loading...");
    info!("1/2 Sorting columns...");
    let frame = load::sort_records(frame);
    inspect::snapshot(&frame, "sort_records");

    info!("2/2 Exporting data...");
    let rows_exported = load::export_parquet(&frame, &config.output_path, config.compression)?;

    if inspect::debug_enabled() {
        let verified = load::read_exported(&config.output_path)?;
        debug!(rows = verified.len(), "read back exported artifact");
        if let Some(row) = verified.first() {
            debug!("first exported row: {row:?}");
        }
    }

    let summary = RunSummary {
        rows_ingested,
        rows_exported,
        reports_dropped: report_audit.dropped,
        regions_dropped: region_audit.dropped,
        weapons_dropped: weapon_audit.dropped,
        elapsed_ms: started.elapsed().as_millis(),
    };
    info!(
        rows_in = summary.rows_ingested,
        rows_out = summary.rows_exported,
        reports_dropped = summary.reports_dropped,
        regions_dropped = summary.regions_dropped,
        weapons_dropped = summary.weapons_dropped,
        elapsed_ms = summary.elapsed_ms,
        "Pipeline run was successful."
    );
    Ok(summary)
}
