//! Extraction phase: source import, projection, deduplication, datatype
//! casting, and null filtering.
//!
//! The source feed is a single JSON array of register entries with many
//! more fields than the pipeline needs. Import materializes the array and
//! validates column presence eagerly; everything after that is expressed
//! as deferred [`Frame`] plans.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::debug;

use crate::constants::extract::{EVENT_DATE_FORMAT, REQUIRED_COLUMNS};
use crate::data::{RawRecord, TypedRecord, VettedRecord};
use crate::errors::PipelineError;
use crate::frame::{ColumnStats, Frame};
use crate::inspect;

/// One parsed source row, keyed by the feed's own field names.
pub type JsonMap = serde_json::Map<String, Value>;

/// Read and parse the source feed, and verify that every required column
/// appears somewhere in it. An empty feed fails the check for the first
/// required column. At DEBUG the parsed feed's shape is reported: row
/// count, distinct columns, byte size, null counts, and a first-row
/// sample.
pub fn import_json(path: &Path) -> Result<Vec<JsonMap>, PipelineError> {
    let text = fs::read_to_string(path).map_err(|err| PipelineError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let rows: Vec<JsonMap> =
        serde_json::from_str(&text).map_err(|err| PipelineError::SourceMalformed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    describe_source(&rows, text.len());
    for column in REQUIRED_COLUMNS {
        if !rows.iter().any(|row| row.contains_key(column)) {
            return Err(PipelineError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(rows)
}

fn describe_source(rows: &[JsonMap], bytes: usize) {
    if !inspect::debug_enabled() {
        return;
    }
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys())
        .map(String::as_str)
        .collect();
    debug!(rows = rows.len(), columns = columns.len(), bytes, "source feed shape");
    let nulls = columns
        .iter()
        .map(|column| {
            let missing = rows
                .iter()
                .filter(|row| row.get(*column).map_or(true, Value::is_null))
                .count();
            format!("{column}={missing}")
        })
        .collect::<Vec<_>>()
        .join(", ");
    let names = columns.into_iter().collect::<Vec<_>>().join(", ");
    debug!("source columns: {names}");
    debug!("source null counts: {nulls}");
    if let Some(row) = rows.first() {
        debug!("first source row: {row:?}");
    }
}

/// Project the source rows down to the five required columns. Scalar
/// values become text, nulls and composite values become missing.
pub fn select_columns(rows: Vec<JsonMap>) -> Frame<RawRecord> {
    let records = rows
        .into_iter()
        .map(|row| RawRecord {
            weaponkind: value_to_text(row.get("weaponkind")),
            organunit: value_to_text(row.get("organunit")),
            reasonsearch: value_to_text(row.get("reasonsearch")),
            insertdate: value_to_text(row.get("insertdate")),
            theftdate: value_to_text(row.get("theftdate")),
        })
        .collect();
    Frame::from_rows(records)
}

fn value_to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Drop exact duplicates across all five projected columns, keeping first
/// occurrences.
pub fn drop_duplicates(frame: Frame<RawRecord>) -> Frame<RawRecord> {
    frame.unique()
}

/// Cast the two date columns from text to timestamps. Values that do not
/// parse under the feed's datetime format become null rather than errors.
pub fn cast_types(frame: Frame<RawRecord>) -> Frame<TypedRecord> {
    frame.map(|row| TypedRecord {
        weaponkind: row.weaponkind,
        organunit: row.organunit,
        reasonsearch: row.reasonsearch,
        insertdate: parse_event_date(row.insertdate.as_deref()),
        theftdate: parse_event_date(row.theftdate.as_deref()),
    })
}

fn parse_event_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw?, EVENT_DATE_FORMAT).ok()
}

/// Apply the three null filters in order: rows with every column null,
/// then rows missing any text column, then rows with neither date.
/// Survivors are promoted to [`VettedRecord`].
pub fn drop_nulls(frame: Frame<TypedRecord>) -> Frame<VettedRecord> {
    let frame = frame.filter(|row| !row.null_mask().iter().all(|is_null| *is_null));
    inspect::snapshot(&frame, "drop_nulls:all_null");

    let frame = frame.filter(|row| {
        row.weaponkind.is_some() && row.organunit.is_some() && row.reasonsearch.is_some()
    });
    inspect::snapshot(&frame, "drop_nulls:text_fields");

    let frame = frame.filter_map(|row| {
        let (Some(weaponkind), Some(organunit), Some(reasonsearch)) =
            (row.weaponkind, row.organunit, row.reasonsearch)
        else {
            return None;
        };
        if row.insertdate.is_none() && row.theftdate.is_none() {
            return None;
        }
        Some(VettedRecord {
            weaponkind,
            organunit,
            reasonsearch,
            insertdate: row.insertdate,
            theftdate: row.theftdate,
        })
    });
    inspect::snapshot(&frame, "drop_nulls:date_fields");
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(value: Value) -> JsonMap {
        value.as_object().cloned().expect("object literal")
    }

    fn timestamp(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid date")
            .and_hms_opt(10, 30, 0)
            .expect("valid time")
    }

    #[test]
    fn import_reports_unreadable_sources() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let err = import_json(&dir.path().join("absent.json")).expect_err("must fail");
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[test]
    fn import_rejects_non_array_sources() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("feed.json");

        fs::write(&path, r#"{"weaponkind": "НІЖ"}"#).expect("failed to write feed");
        let err = import_json(&path).expect_err("object root must fail");
        assert!(matches!(err, PipelineError::SourceMalformed { .. }));

        fs::write(&path, r#"["НІЖ"]"#).expect("failed to write feed");
        let err = import_json(&path).expect_err("non-object entries must fail");
        assert!(matches!(err, PipelineError::SourceMalformed { .. }));
    }

    #[test]
    fn import_requires_every_column_somewhere() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("feed.json");
        // 'theftdate' never appears, though every other column does.
        fs::write(
            &path,
            r#"[
                {"weaponkind": "НІЖ", "organunit": "УМВС", "reasonsearch": "ВТРАТА"},
                {"weaponkind": "НІЖ", "insertdate": "2015-03-01T10:30:00"}
            ]"#,
        )
        .expect("failed to write feed");

        let err = import_json(&path).expect_err("must fail");
        match err {
            PipelineError::MissingColumn { column } => assert_eq!(column, "theftdate"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_feeds_fail_the_first_column_check() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("feed.json");
        fs::write(&path, "[]").expect("failed to write feed");

        let err = import_json(&path).expect_err("must fail");
        match err {
            PipelineError::MissingColumn { column } => assert_eq!(column, "weaponkind"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn projection_keeps_scalars_and_drops_composites() {
        let rows = vec![record(json!({
            "weaponkind": "ПІСТОЛЕТ",
            "organunit": 1024,
            "reasonsearch": true,
            "insertdate": null,
            "theftdate": ["2015-03-01T10:30:00"],
            "bodycolor": "ignored entirely"
        }))];

        let projected = select_columns(rows).collect();
        assert_eq!(projected.len(), 1);
        let row = &projected[0];
        assert_eq!(row.weaponkind.as_deref(), Some("ПІСТОЛЕТ"));
        assert_eq!(row.organunit.as_deref(), Some("1024"));
        assert_eq!(row.reasonsearch.as_deref(), Some("true"));
        assert_eq!(row.insertdate, None);
        assert_eq!(row.theftdate, None);
    }

    #[test]
    fn absent_keys_project_to_null() {
        let rows = vec![record(json!({"weaponkind": "НІЖ"}))];
        let row = select_columns(rows).head().expect("one row");
        assert_eq!(row.organunit, None);
        assert_eq!(row.theftdate, None);
    }

    #[test]
    fn casting_turns_parse_failures_into_nulls() {
        let raw = RawRecord {
            weaponkind: Some("НІЖ".to_string()),
            organunit: Some("УМВС".to_string()),
            reasonsearch: Some("ВТРАТА".to_string()),
            insertdate: Some("2015-03-01T10:30:00".to_string()),
            theftdate: Some("01.03.2015".to_string()),
        };
        let typed = cast_types(Frame::from_rows(vec![raw]))
            .head()
            .expect("one row");
        assert_eq!(typed.insertdate, Some(timestamp(2015, 3, 1)));
        assert_eq!(typed.theftdate, None);
    }

    #[test]
    fn casting_rejects_out_of_range_components() {
        assert_eq!(parse_event_date(Some("2015-13-01T10:30:00")), None);
        assert_eq!(parse_event_date(Some("2015-03-01T25:30:00")), None);
        assert_eq!(parse_event_date(Some("2015-03-01 10:30:00")), None);
        assert_eq!(parse_event_date(None), None);
    }

    #[test]
    fn null_filters_apply_in_sequence() {
        let text = |value: &str| Some(value.to_string());
        let rows = vec![
            // All columns null.
            TypedRecord {
                weaponkind: None,
                organunit: None,
                reasonsearch: None,
                insertdate: None,
                theftdate: None,
            },
            // Missing a text column.
            TypedRecord {
                weaponkind: text("НІЖ"),
                organunit: None,
                reasonsearch: text("ВТРАТА"),
                insertdate: Some(timestamp(2015, 3, 1)),
                theftdate: None,
            },
            // Both dates null.
            TypedRecord {
                weaponkind: text("НІЖ"),
                organunit: text("УМВС"),
                reasonsearch: text("ВТРАТА"),
                insertdate: None,
                theftdate: None,
            },
            // Survivor with a single date.
            TypedRecord {
                weaponkind: text("НІЖ"),
                organunit: text("УМВС"),
                reasonsearch: text("ВТРАТА"),
                insertdate: Some(timestamp(2015, 3, 1)),
                theftdate: None,
            },
        ];

        let vetted = drop_nulls(Frame::from_rows(rows)).collect();
        assert_eq!(vetted.len(), 1);
        assert_eq!(vetted[0].weaponkind, "НІЖ");
        assert_eq!(vetted[0].insertdate, Some(timestamp(2015, 3, 1)));
        assert_eq!(vetted[0].theftdate, None);
    }

    #[test]
    fn duplicate_rows_collapse_to_first_occurrence() {
        let raw = RawRecord {
            weaponkind: Some("НІЖ".to_string()),
            organunit: Some("УМВС".to_string()),
            reasonsearch: Some("ВТРАТА".to_string()),
            insertdate: Some("2015-03-01T10:30:00".to_string()),
            theftdate: None,
        };
        let mut variant = raw.clone();
        variant.theftdate = Some("2015-02-01T00:00:00".to_string());

        let frame = Frame::from_rows(vec![raw.clone(), variant.clone(), raw.clone()]);
        let unique = drop_duplicates(frame).collect();
        assert_eq!(unique, vec![raw, variant]);
    }
}
