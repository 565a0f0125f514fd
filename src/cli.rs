//! Command line entry point for the pipeline binary.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{error::ErrorKind, Parser, ValueEnum};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::{CompressionCodec, PipelineConfig};
use crate::errors::PipelineError;
use crate::pipeline::{self, RunSummary};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    Gzip,
    Snappy,
    None,
}

impl From<CompressionArg> for CompressionCodec {
    fn from(value: CompressionArg) -> Self {
        match value {
            CompressionArg::Gzip => CompressionCodec::Gzip,
            CompressionArg::Snappy => CompressionCodec::Snappy,
            CompressionArg::None => CompressionCodec::None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "weapons-etl",
    version,
    disable_help_subcommand = true,
    about = "Normalize the MIA lost and stolen weapons register",
    long_about = "One-shot batch pipeline: import the register feed, normalize records into report, region, weapon category, and event date, and export a compressed parquet artifact."
)]
struct PipelineCli {
    #[arg(long, value_name = "PATH", help = "Source JSON feed path override")]
    input: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "Output artifact path override")]
    output: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Optional JSON configuration file; missing keys keep defaults"
    )]
    config: Option<PathBuf>,
    #[arg(long, value_enum, help = "Output compression override")]
    compression: Option<CompressionArg>,
    #[arg(
        long = "log-file",
        value_name = "PATH",
        help = "Mirror logs to a file, truncating any previous contents"
    )]
    log_file: Option<PathBuf>,
}

/// Parse arguments, initialize logging, and run the pipeline. Returns
/// `Ok(None)` when the invocation only displayed help or version text.
pub fn run_cli<I>(args: I) -> Result<Option<RunSummary>, PipelineError>
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    let Some(cli) = parse_cli::<PipelineCli, _>(args)? else {
        return Ok(None);
    };

    init_logging(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(input) = cli.input {
        config.input_path = input;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(compression) = cli.compression {
        config.compression = compression.into();
    }

    pipeline::run(&config).map(Some)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, PipelineError>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()
                    .map_err(|err| PipelineError::Configuration(err.to_string()))?;
                Ok(None)
            }
            _ => {
                err.print().ok();
                Err(PipelineError::Configuration(
                    "invalid command line arguments".to_string(),
                ))
            }
        },
    }
}

/// Install the global subscriber: env-filtered, INFO by default, writing
/// to stderr and optionally mirrored to a truncated log file. When the
/// log file cannot be created, logging falls back to stderr and the
/// failure is returned as fatal.
fn init_logging(log_file: Option<&Path>) -> Result<(), PipelineError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = match File::create(path) {
                Ok(file) => file,
                Err(err) => {
                    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
                    return Err(PipelineError::Configuration(format!(
                        "cannot create log file '{}': {err}",
                        path.display()
                    )));
                }
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr.and(Arc::new(file)))
                .with_ansi(false)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    }
    Ok(())
}
