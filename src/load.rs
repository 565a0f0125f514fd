//! Loading phase: canonical sort and parquet export.
//!
//! The export is atomic from a consumer's point of view: rows are written
//! to a sibling temp file which is renamed over the final path only after
//! the writer closes cleanly. A failed run removes its partial file and
//! leaves any previous artifact untouched.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::DateTime;
use parquet::basic::{Compression, GzipLevel};
use parquet::data_type::{ByteArray, ByteArrayType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::{SerializedFileWriter, SerializedRowGroupWriter};
use parquet::record::RowAccessor;
use parquet::schema::parser::parse_message_type;
use parquet::schema::types::Type;
use tracing::info;

use crate::config::CompressionCodec;
use crate::constants::export::{PARTIAL_SUFFIX, ROW_GROUP_SIZE};
use crate::data::{CleanRecord, Report};
use crate::errors::PipelineError;
use crate::frame::Frame;
use crate::taxonomy::{Region, WeaponCategory};

const EXPORT_SCHEMA: &str = "
message clean_record {
    required binary report (UTF8);
    required binary region (UTF8);
    required binary weaponcategory (UTF8);
    required int64 date (TIMESTAMP(MICROS,false));
}
";

/// Append the canonical ordering to the plan: event date ascending, then
/// region label ascending. The sort is stable, so ties beyond the two
/// keys keep their upstream order.
pub fn sort_records(frame: Frame<CleanRecord>) -> Frame<CleanRecord> {
    frame.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.region.as_str().cmp(b.region.as_str()))
    })
}

/// Run the plan and write its rows to a compressed parquet artifact.
/// Returns the number of rows written.
pub fn export_parquet(
    frame: &Frame<CleanRecord>,
    path: &Path,
    compression: CompressionCodec,
) -> Result<usize, PipelineError> {
    let schema = Arc::new(
        parse_message_type(EXPORT_SCHEMA).map_err(|err| export_error(path, err.to_string()))?,
    );
    let props = Arc::new(
        WriterProperties::builder()
            .set_compression(parquet_compression(compression))
            .build(),
    );

    let tmp_path = partial_path(path)?;
    let rows = frame.collect();
    if let Err(err) = write_and_publish(&rows, &tmp_path, path, schema, props) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    info!("Exported data to '{}'.", path.display());
    Ok(rows.len())
}

fn write_and_publish(
    rows: &[CleanRecord],
    tmp_path: &Path,
    path: &Path,
    schema: Arc<Type>,
    props: Arc<WriterProperties>,
) -> Result<(), PipelineError> {
    let file = File::create(tmp_path).map_err(|err| export_error(path, err.to_string()))?;
    let mut writer = SerializedFileWriter::new(file, schema, props)
        .map_err(|err| export_error(path, err.to_string()))?;

    for chunk in rows.chunks(ROW_GROUP_SIZE) {
        let mut group = writer
            .next_row_group()
            .map_err(|err| export_error(path, err.to_string()))?;

        let reports: Vec<ByteArray> = chunk
            .iter()
            .map(|row| ByteArray::from(row.report.as_str()))
            .collect();
        write_text_column(&mut group, &reports, path)?;

        let regions: Vec<ByteArray> = chunk
            .iter()
            .map(|row| ByteArray::from(row.region.as_str()))
            .collect();
        write_text_column(&mut group, &regions, path)?;

        let categories: Vec<ByteArray> = chunk
            .iter()
            .map(|row| ByteArray::from(row.weaponcategory.as_str()))
            .collect();
        write_text_column(&mut group, &categories, path)?;

        let dates: Vec<i64> = chunk
            .iter()
            .map(|row| row.date.and_utc().timestamp_micros())
            .collect();
        let mut column = group
            .next_column()
            .map_err(|err| export_error(path, err.to_string()))?
            .ok_or_else(|| export_error(path, "column writer exhausted".to_string()))?;
        column
            .typed::<Int64Type>()
            .write_batch(&dates, None, None)
            .map_err(|err| export_error(path, err.to_string()))?;
        column
            .close()
            .map_err(|err| export_error(path, err.to_string()))?;

        group
            .close()
            .map_err(|err| export_error(path, err.to_string()))?;
    }

    writer
        .close()
        .map_err(|err| export_error(path, err.to_string()))?;
    fs::rename(tmp_path, path).map_err(|err| export_error(path, err.to_string()))?;
    Ok(())
}

/// Read an exported artifact back into records, for post-export checks
/// and tests.
pub fn read_exported(path: &Path) -> Result<Vec<CleanRecord>, PipelineError> {
    let file = File::open(path).map_err(|err| PipelineError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let reader =
        SerializedFileReader::new(file).map_err(|err| malformed(path, err.to_string()))?;

    let mut records = Vec::new();
    let rows = reader
        .get_row_iter(None)
        .map_err(|err| malformed(path, err.to_string()))?;
    for row in rows {
        let row = row.map_err(|err| malformed(path, err.to_string()))?;

        let label = row.get_string(0).map_err(|err| malformed(path, err.to_string()))?;
        let report = Report::from_label(label)
            .ok_or_else(|| malformed(path, format!("unknown report label '{label}'")))?;

        let label = row.get_string(1).map_err(|err| malformed(path, err.to_string()))?;
        let region = Region::from_label(label)
            .ok_or_else(|| malformed(path, format!("unknown region label '{label}'")))?;

        let label = row.get_string(2).map_err(|err| malformed(path, err.to_string()))?;
        let weaponcategory = WeaponCategory::from_label(label)
            .ok_or_else(|| malformed(path, format!("unknown weapon category label '{label}'")))?;

        let micros = row
            .get_timestamp_micros(3)
            .or_else(|_| row.get_long(3))
            .map_err(|err| malformed(path, err.to_string()))?;
        let date = DateTime::from_timestamp_micros(micros)
            .ok_or_else(|| malformed(path, format!("date out of range: {micros}")))?
            .naive_utc();

        records.push(CleanRecord {
            report,
            region,
            weaponcategory,
            date,
        });
    }
    Ok(records)
}

fn write_text_column(
    group: &mut SerializedRowGroupWriter<'_, File>,
    values: &[ByteArray],
    path: &Path,
) -> Result<(), PipelineError> {
    let mut column = group
        .next_column()
        .map_err(|err| export_error(path, err.to_string()))?
        .ok_or_else(|| export_error(path, "column writer exhausted".to_string()))?;
    column
        .typed::<ByteArrayType>()
        .write_batch(values, None, None)
        .map_err(|err| export_error(path, err.to_string()))?;
    column
        .close()
        .map_err(|err| export_error(path, err.to_string()))?;
    Ok(())
}

fn partial_path(path: &Path) -> Result<PathBuf, PipelineError> {
    let name = path
        .file_name()
        .ok_or_else(|| export_error(path, "output path has no file name".to_string()))?;
    let mut name = name.to_os_string();
    name.push(PARTIAL_SUFFIX);
    Ok(path.with_file_name(name))
}

fn parquet_compression(codec: CompressionCodec) -> Compression {
    match codec {
        CompressionCodec::Gzip => Compression::GZIP(GzipLevel::default()),
        CompressionCodec::Snappy => Compression::SNAPPY,
        CompressionCodec::None => Compression::UNCOMPRESSED,
    }
}

fn export_error(path: &Path, reason: String) -> PipelineError {
    PipelineError::Export {
        path: path.to_path_buf(),
        reason,
    }
}

fn malformed(path: &Path, reason: String) -> PipelineError {
    PipelineError::SourceMalformed {
        path: path.to_path_buf(),
        reason,
    }
}
