//! Partition of a best path into independently resolved intervals.
//!
//! Consecutive sync points bound an interval: `[previous, current)`, the first
//! starting at 0 and the last left open. A variant belongs to the interval
//! its start falls in. A zero-width first interval `[0, 0)` admits the
//! variants starting at 0.

use serde::{Deserialize, Serialize};

use crate::core::variant::VariantSet;
use crate::matching::engine::{BestPath, SideResult};

/// Variant ids of one side falling inside an interval
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSide {
    pub included: Vec<usize>,
    pub excluded: Vec<usize>,
    pub skipped: Vec<usize>,
}

impl IntervalSide {
    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty() && self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncInterval {
    pub start: usize,
    /// `None` for the trailing interval
    pub end: Option<usize>,
    pub base: IntervalSide,
    pub called: IntervalSide,
}

impl SyncInterval {
    /// Whether a variant starting at `position` falls in this interval
    pub fn contains(&self, position: usize) -> bool {
        match self.end {
            Some(end) if end == self.start => position == self.start,
            Some(end) => position >= self.start && position < end,
            None => position >= self.start,
        }
    }
}

impl BestPath {
    /// Split this path at its sync points, assigning every decided variant to
    /// the interval holding its start. Ids missing from `base` or `called` are
    /// ignored.
    #[must_use]
    pub fn sync_intervals(&self, base: &VariantSet, called: &VariantSet) -> Vec<SyncInterval> {
        let mut intervals = Vec::with_capacity(self.sync_points.len() + 1);
        let mut start = 0;
        for &end in &self.sync_points {
            intervals.push(SyncInterval {
                start,
                end: Some(end),
                base: IntervalSide::default(),
                called: IntervalSide::default(),
            });
            start = end;
        }
        intervals.push(SyncInterval {
            start,
            end: None,
            base: IntervalSide::default(),
            called: IntervalSide::default(),
        });

        let zero_width_first = self.sync_points.first() == Some(&0);
        let locate = |position: usize| -> usize {
            if zero_width_first && position == 0 {
                return 0;
            }
            self.sync_points.partition_point(|&s| s <= position)
        };

        assign(&mut intervals, &self.base, base, &locate, |i| &mut i.base);
        assign(&mut intervals, &self.called, called, &locate, |i| &mut i.called);
        intervals
    }
}

fn assign<F>(
    intervals: &mut [SyncInterval],
    result: &SideResult,
    variants: &VariantSet,
    locate: &dyn Fn(usize) -> usize,
    pick: F,
) where
    F: Fn(&mut SyncInterval) -> &mut IntervalSide,
{
    let slot = |id: usize| variants.get(id).map(|v| locate(v.start()));

    for id in result.included_ids() {
        if let Some(index) = slot(id) {
            pick(&mut intervals[index]).included.push(id);
        }
    }
    for &id in &result.excluded {
        if let Some(index) = slot(id) {
            pick(&mut intervals[index]).excluded.push(id);
        }
    }
    for &id in &result.skipped {
        if let Some(index) = slot(id) {
            pick(&mut intervals[index]).skipped.push(id);
        }
    }
}
