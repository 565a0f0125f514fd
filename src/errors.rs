use std::path::PathBuf;

use thiserror::Error;

/// Error type for pipeline input, configuration, and export failures.
///
/// Row-level data problems (unparseable dates, unmatched classification
/// text) are never represented here; they become filtered rows and
/// warning counters instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source file '{}' is unavailable: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("source file '{}' is not a parseable JSON record array: {reason}", path.display())]
    SourceMalformed { path: PathBuf, reason: String },
    #[error("required column '{column}' is missing from the source")]
    MissingColumn { column: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed exporting artifact to '{}': {reason}", path.display())]
    Export { path: PathBuf, reason: String },
}
