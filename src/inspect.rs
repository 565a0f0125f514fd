//! Debug-gated diagnostics for intermediate pipeline stages.
//!
//! Snapshots re-run the plan prefix they are given, which doubles up work
//! on the stages before them. They are therefore skipped entirely unless
//! DEBUG logging is enabled.

use std::fmt::Debug;

use tracing::{debug, Level};

use crate::frame::{ColumnStats, Frame};

/// Returns `true` when DEBUG-level diagnostics would be emitted.
pub fn debug_enabled() -> bool {
    tracing::enabled!(Level::DEBUG)
}

/// Log the row count, per-column null counts, and the first and last rows
/// of a plan's current output. A no-op unless DEBUG logging is enabled.
pub fn snapshot<T>(frame: &Frame<T>, stage: &str)
where
    T: ColumnStats + Debug + 'static,
{
    if !debug_enabled() {
        return;
    }

    let columns = T::columns();
    let mut nulls = vec![0usize; columns.len()];
    let mut rows = 0usize;
    let mut first: Option<T> = None;
    let mut last: Option<T> = None;
    for row in frame.rows() {
        for (count, is_null) in nulls.iter_mut().zip(row.null_mask()) {
            if is_null {
                *count += 1;
            }
        }
        rows += 1;
        if first.is_none() {
            first = Some(row);
        } else {
            last = Some(row);
        }
    }

    let null_counts = columns
        .iter()
        .zip(&nulls)
        .map(|(column, count)| format!("{column}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    debug!(stage, rows, "stage snapshot");
    debug!(stage, "null counts: {null_counts}");
    if let Some(row) = &first {
        debug!(stage, "first row: {row:?}");
    }
    if let Some(row) = last.as_ref().or(first.as_ref()) {
        debug!(stage, "last row: {row:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::sync::{Arc, Mutex};

    use crate::data::TypedRecord;

    #[derive(Clone)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("capture lock")).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn with_level(level: Level, run: impl FnOnce()) -> String {
        let capture = Capture::new();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, run);
        capture.contents()
    }

    fn typed(
        weaponkind: Option<&str>,
        organunit: Option<&str>,
        reasonsearch: Option<&str>,
    ) -> TypedRecord {
        TypedRecord {
            weaponkind: weaponkind.map(str::to_string),
            organunit: organunit.map(str::to_string),
            reasonsearch: reasonsearch.map(str::to_string),
            insertdate: None,
            theftdate: None,
        }
    }

    #[test]
    fn snapshots_report_rows_null_counts_and_edge_rows() {
        let frame = Frame::from_rows(vec![
            typed(Some("НІЖ"), Some("УМВС"), Some("ВТРАТА")),
            typed(None, Some("ЦЕНТР"), None),
        ]);
        let logs = with_level(Level::DEBUG, || snapshot(&frame, "after_cast"));

        assert!(logs.contains("stage snapshot"));
        assert!(logs.contains("stage=\"after_cast\""));
        assert!(logs.contains("rows=2"));
        assert!(logs.contains(
            "null counts: weaponkind=1, organunit=0, reasonsearch=1, insertdate=2, theftdate=2"
        ));
        let first = logs
            .lines()
            .find(|line| line.contains("first row:"))
            .expect("first row logged");
        assert!(first.contains("НІЖ"));
        let last = logs
            .lines()
            .find(|line| line.contains("last row:"))
            .expect("last row logged");
        assert!(last.contains("ЦЕНТР"));
    }

    #[test]
    fn single_row_frames_repeat_the_row_as_first_and_last() {
        let frame = Frame::from_rows(vec![typed(Some("НІЖ"), Some("УМВС"), Some("ВТРАТА"))]);
        let logs = with_level(Level::DEBUG, || snapshot(&frame, "solo"));

        assert!(logs.contains("rows=1"));
        assert!(logs.contains("first row:"));
        assert!(logs.contains("last row:"));
    }

    #[test]
    fn snapshots_are_skipped_below_debug() {
        let frame = Frame::from_rows(vec![typed(Some("НІЖ"), Some("УМВС"), Some("ВТРАТА"))]);
        let logs = with_level(Level::INFO, || snapshot(&frame, "quiet"));
        assert!(logs.is_empty());
    }
}
