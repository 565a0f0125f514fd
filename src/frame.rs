//! Typed lazy query plans.
//!
//! A [`Frame`] describes a sequence of row transformations without running
//! them. Combinators append operations to the plan; nothing executes until a
//! terminal call (`collect`, `count`, `head`, `tail`, `rows`) materializes
//! it. Plans are re-runnable: every terminal call replays the full chain
//! from the source rows, so diagnostics can sample an intermediate stage
//! without disturbing later execution.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Per-row column metadata used by diagnostic snapshots.
pub trait ColumnStats {
    /// Column names for this row type, in declaration order.
    fn columns() -> &'static [&'static str];
    /// Null flags for this row, aligned with [`ColumnStats::columns`].
    fn null_mask(&self) -> Vec<bool>;
}

/// A deferred, re-runnable plan producing rows of type `T`.
pub struct Frame<T> {
    plan: Arc<dyn Fn() -> Box<dyn Iterator<Item = T>>>,
}

impl<T> Clone for Frame<T> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
        }
    }
}

impl<T: 'static> Frame<T> {
    /// Build a source plan over an in-memory row set.
    pub fn from_rows(rows: Vec<T>) -> Self
    where
        T: Clone,
    {
        let rows = Arc::new(rows);
        Self {
            plan: Arc::new(move || {
                let rows = Arc::clone(&rows);
                Box::new((0..rows.len()).map(move |idx| rows[idx].clone()))
            }),
        }
    }

    /// Append a per-row transformation to the plan.
    pub fn map<U, F>(self, op: F) -> Frame<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let plan = self.plan;
        let op = Arc::new(op);
        Frame {
            plan: Arc::new(move || {
                let op = Arc::clone(&op);
                Box::new((plan)().map(move |row| op(row)))
            }),
        }
    }

    /// Append a row filter to the plan.
    pub fn filter<F>(self, keep: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let plan = self.plan;
        let keep = Arc::new(keep);
        Self {
            plan: Arc::new(move || {
                let keep = Arc::clone(&keep);
                Box::new((plan)().filter(move |row| keep(row)))
            }),
        }
    }

    /// Append a combined transform-and-filter to the plan. Rows mapped to
    /// `None` are dropped.
    pub fn filter_map<U, F>(self, op: F) -> Frame<U>
    where
        U: 'static,
        F: Fn(T) -> Option<U> + 'static,
    {
        let plan = self.plan;
        let op = Arc::new(op);
        Frame {
            plan: Arc::new(move || {
                let op = Arc::clone(&op);
                Box::new((plan)().filter_map(move |row| op(row)))
            }),
        }
    }

    /// Append exact-duplicate elimination to the plan. The first occurrence
    /// of each row survives; later copies are dropped.
    pub fn unique(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        let plan = self.plan;
        Self {
            plan: Arc::new(move || {
                let mut seen = HashSet::new();
                Box::new((plan)().filter(move |row| seen.insert(row.clone())))
            }),
        }
    }

    /// Append a stable sort to the plan. Sorting buffers all upstream rows
    /// when the plan runs; rows comparing equal keep their upstream order.
    pub fn sort_by<F>(self, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        let plan = self.plan;
        let compare = Arc::new(compare);
        Self {
            plan: Arc::new(move || {
                let mut rows: Vec<T> = (plan)().collect();
                rows.sort_by(|a, b| compare(a, b));
                Box::new(rows.into_iter())
            }),
        }
    }

    /// Execute the plan, yielding rows without buffering them.
    pub fn rows(&self) -> Box<dyn Iterator<Item = T>> {
        (self.plan)()
    }

    /// Execute the plan and collect every row.
    pub fn collect(&self) -> Vec<T> {
        self.rows().collect()
    }

    /// Execute the plan and count surviving rows.
    pub fn count(&self) -> usize {
        self.rows().count()
    }

    /// Execute the plan and return the first row, if any.
    pub fn head(&self) -> Option<T> {
        self.rows().next()
    }

    /// Execute the plan and return the last row, if any.
    pub fn tail(&self) -> Option<T> {
        self.rows().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn numbers() -> Frame<u32> {
        Frame::from_rows(vec![3, 1, 2, 1, 3])
    }

    #[test]
    fn combinators_defer_work_until_materialization() {
        let calls = Rc::new(Cell::new(0usize));
        let observed = Rc::clone(&calls);
        let frame = numbers().map(move |value| {
            observed.set(observed.get() + 1);
            value * 10
        });
        assert_eq!(calls.get(), 0);

        let rows = frame.collect();
        assert_eq!(rows, vec![30, 10, 20, 10, 30]);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn plans_replay_from_source_on_every_terminal_call() {
        let frame = numbers().filter(|value| *value < 3);
        assert_eq!(frame.count(), 3);
        assert_eq!(frame.count(), 3);
        assert_eq!(frame.collect(), vec![1, 2, 1]);
    }

    #[test]
    fn unique_keeps_first_occurrence_in_input_order() {
        let frame = numbers().unique();
        assert_eq!(frame.collect(), vec![3, 1, 2]);
        // A second run starts from a fresh seen-set.
        assert_eq!(frame.collect(), vec![3, 1, 2]);
    }

    #[test]
    fn sort_by_is_stable_for_equal_keys() {
        let frame = Frame::from_rows(vec![("b", 1), ("a", 2), ("b", 0), ("a", 1)])
            .sort_by(|left, right| left.0.cmp(right.0));
        assert_eq!(frame.collect(), vec![("a", 2), ("a", 1), ("b", 1), ("b", 0)]);
    }

    #[test]
    fn head_and_tail_read_the_plan_edges() {
        let frame = numbers().map(|value| value + 1);
        assert_eq!(frame.head(), Some(4));
        assert_eq!(frame.tail(), Some(4));
        assert_eq!(Frame::<u32>::from_rows(Vec::new()).head(), None);
    }

    #[test]
    fn filter_map_drops_none_rows() {
        let frame = numbers().filter_map(|value| if value == 1 { None } else { Some(value) });
        assert_eq!(frame.collect(), vec![3, 2, 3]);
    }
}
