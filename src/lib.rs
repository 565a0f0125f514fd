#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command line parsing and logging setup.
pub mod cli;
/// Pipeline configuration types.
pub mod config;
/// Centralized constants used across extraction, transformation, and export.
pub mod constants;
/// Record types for every pipeline stage.
pub mod data;
/// Extraction phase: import, projection, dedup, casting, null filters.
pub mod extract;
/// Deferred query plans over typed rows.
pub mod frame;
/// Debug-gated stage diagnostics.
pub mod inspect;
/// Loading phase: canonical sort and parquet export.
pub mod load;
/// End-to-end pipeline orchestration.
pub mod pipeline;
/// Static classification reference data.
pub mod taxonomy;
/// Transformation phase: report, region, weapon, and date resolution.
pub mod transform;
/// Shared type aliases.
pub mod types;

mod errors;

pub use cli::run_cli;
pub use config::{CompressionCodec, PipelineConfig};
pub use data::{
    CategorizedRecord, CleanRecord, RawRecord, RegionRecord, Report, ReportRecord, TypedRecord,
    VettedRecord,
};
pub use errors::PipelineError;
pub use frame::{ColumnStats, Frame};
pub use pipeline::{run, RunSummary};
pub use taxonomy::{
    Region, RegionPatterns, RegionTaxonomy, WeaponCategory, WeaponTaxonomy, WeaponTerms,
};
pub use types::{PatternSource, ReasonText, RegionLabel, UnitName, WeaponName};
