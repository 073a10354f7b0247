use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::matching::path::Path;

/// Included-variant totals of a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathScore {
    /// Base variants included
    pub base_included: usize,
    /// Called variants included
    pub called_included: usize,
    /// Sync points along the lineage
    pub sync_points: usize,
}

impl PathScore {
    #[must_use]
    pub fn of(path: &Path<'_>) -> Self {
        Self {
            base_included: path.base().included_count(),
            called_included: path.called().included_count(),
            sync_points: path.sync_point_count(),
        }
    }

    pub fn total(&self) -> usize {
        self.base_included + self.called_included
    }
}

/// Rank two paths; `Greater` means `a` is preferred.
///
/// More included variants win, then more sync points (finer resolution).
/// Remaining ties go to the lexicographically smaller included orientations,
/// compared on the base side first and then the called side.
#[must_use]
pub fn compare(a: &Path<'_>, b: &Path<'_>) -> Ordering {
    a.included_count()
        .cmp(&b.included_count())
        .then_with(|| a.sync_point_count().cmp(&b.sync_point_count()))
        .then_with(|| {
            b.base()
                .included_lineage()
                .cmp_in_push_order(a.base().included_lineage())
        })
        .then_with(|| {
            b.called()
                .included_lineage()
                .cmp_in_push_order(a.called().included_lineage())
        })
}

/// Whether `candidate` should replace `incumbent`. Full ties keep the incumbent.
#[must_use]
pub fn is_better(candidate: &Path<'_>, incumbent: &Path<'_>) -> bool {
    compare(candidate, incumbent) == Ordering::Greater
}
