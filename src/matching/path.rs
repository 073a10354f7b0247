use std::cmp::Ordering;

use crate::core::oriented::OrientedVariant;
use crate::core::types::VcfSide;
use crate::core::variant::Variant;
use crate::matching::lineage::Lineage;
use crate::matching::semipath::SemiPath;

/// A complete search state: both sides' replay plus the synchronization
/// points reached along this lineage.
///
/// Equality and ordering look at replay state (called side first, then
/// base) and at which sides included variants since the last sync point, so
/// two branch histories that converge compare equal. A path that would be
/// dropped as a no-op at the next sync point never merges with one that
/// would not.
#[derive(Debug, Clone)]
pub struct Path<'a> {
    base: SemiPath<'a>,
    called: SemiPath<'a>,
    sync_points: Lineage<usize>,
    since_sync_base: usize,
    since_sync_called: usize,
}

impl<'a> Path<'a> {
    /// An empty path at the start of the contig
    #[must_use]
    pub fn new(reference: &'a [u8], base: &'a [Variant], called: &'a [Variant]) -> Self {
        Self {
            base: SemiPath::new(VcfSide::Base, reference, base),
            called: SemiPath::new(VcfSide::Called, reference, called),
            sync_points: Lineage::new(),
            since_sync_base: 0,
            since_sync_called: 0,
        }
    }

    pub fn semi_path(&self, side: VcfSide) -> &SemiPath<'a> {
        match side {
            VcfSide::Base => &self.base,
            VcfSide::Called => &self.called,
        }
    }

    fn semi_path_mut(&mut self, side: VcfSide) -> &mut SemiPath<'a> {
        match side {
            VcfSide::Base => &mut self.base,
            VcfSide::Called => &mut self.called,
        }
    }

    pub fn base(&self) -> &SemiPath<'a> {
        &self.base
    }

    pub fn called(&self) -> &SemiPath<'a> {
        &self.called
    }

    pub fn exclude(&mut self, side: VcfSide, variant: &Variant, index: usize) {
        self.semi_path_mut(side).exclude_variant(variant, index);
    }

    pub fn include(&mut self, side: VcfSide, ov: OrientedVariant, index: usize) {
        self.semi_path_mut(side).include_variant(ov, index);
        match side {
            VcfSide::Base => self.since_sync_base += 1,
            VcfSide::Called => self.since_sync_called += 1,
        }
    }

    pub(crate) fn skip(&mut self, side: VcfSide, variant: &Variant, index: usize) {
        self.semi_path_mut(side).skip_variant(variant, index);
    }

    /// Both sides stand at the same reference position on the reference with
    /// no decided variant still spanning it.
    pub fn in_sync(&self) -> bool {
        self.called.compare_haplotype_positions() == Ordering::Equal
            && self.base.compare_haplotype_positions() == Ordering::Equal
            && self.called.position() == self.base.position()
            && self.called.position() >= self.called.variant_end_position()
            && self.base.position() >= self.base.variant_end_position()
            && self.called.is_on_template()
            && self.base.is_on_template()
    }

    /// Exactly one side included variants since the last sync point, so the
    /// included calls replayed to the reference on their own.
    pub fn has_no_operation(&self) -> bool {
        (self.since_sync_base == 0 && self.since_sync_called > 0)
            || (self.since_sync_called == 0 && self.since_sync_base > 0)
    }

    /// Whether (base, called) included anything since the last sync point
    fn operation_sides(&self) -> (bool, bool) {
        (self.since_sync_base > 0, self.since_sync_called > 0)
    }

    /// Branch on the next variant of `side`: an exclude child first, then
    /// one include child per orientation when the variant can be placed.
    ///
    /// When the path is in sync the current position closes a segment: it
    /// is recorded as a sync point and both since-sync counters restart.
    #[must_use]
    pub fn add_variant(
        &self,
        side: VcfSide,
        variant: &Variant,
        index: usize,
        orientations: &[OrientedVariant],
    ) -> Vec<Path<'a>> {
        let mut template = self.clone();
        if self.in_sync() {
            template.push_sync_point(self.called.position());
            template.since_sync_base = 0;
            template.since_sync_called = 0;
        }

        let mut children = Vec::with_capacity(orientations.len() + 1);
        let mut excluded = template.clone();
        excluded.exclude(side, variant, index);
        children.push(excluded);

        if template.semi_path(side).is_new(variant) {
            for &ov in orientations {
                let mut included = template.clone();
                included.include(side, ov, index);
                children.push(included);
            }
        }
        children
    }

    /// Record a sync point if it lies beyond the last one
    pub(crate) fn push_sync_point(&mut self, position: usize) {
        if self.sync_points.last().map_or(true, |&last| position > last) {
            self.sync_points.push(position);
        }
    }

    /// Advance the lagging haplotype on both sides, or every haplotype when
    /// the called side's haplotypes are level
    pub fn step(&mut self) {
        match self.called.compare_haplotype_positions() {
            Ordering::Greater => {
                self.called.step_haplotype_b();
                self.base.step_haplotype_b();
            }
            Ordering::Less => {
                self.called.step_haplotype_a();
                self.base.step_haplotype_a();
            }
            Ordering::Equal => {
                self.called.step_haplotype_a();
                self.called.step_haplotype_b();
                self.base.step_haplotype_a();
                self.base.step_haplotype_b();
            }
        }
    }

    pub fn move_forward(&mut self, position: usize) {
        self.called.move_forward(position);
        self.base.move_forward(position);
    }

    pub fn matches(&self) -> bool {
        self.called.matches(&self.base)
    }

    pub fn has_finished(&self) -> bool {
        self.called.has_finished() && self.base.has_finished()
    }

    /// Included variants across both sides
    pub fn included_count(&self) -> usize {
        self.base.included_count() + self.called.included_count()
    }

    pub fn sync_point_count(&self) -> usize {
        self.sync_points.len()
    }

    pub fn last_sync_point(&self) -> Option<usize> {
        self.sync_points.last().copied()
    }

    /// Sync points in increasing order
    pub fn sync_points(&self) -> Vec<usize> {
        self.sync_points.to_vec()
    }
}

impl PartialEq for Path<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Path<'_> {}

impl PartialOrd for Path<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.called
            .cmp(&other.called)
            .then_with(|| self.base.cmp(&other.base))
            .then_with(|| self.operation_sides().cmp(&other.operation_sides()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oriented::genotype_orientations;
    use crate::core::variant::VariantSet;

    const REFERENCE: &[u8] = b"ACGTACGTAC";

    fn snp(start: usize, genotype: &[usize]) -> Variant {
        Variant::new("chr1", start, &REFERENCE[start..=start], &[b"T"], genotype, false).unwrap()
    }

    #[test]
    fn test_empty_path_is_in_sync() {
        let set = VariantSet::new();
        let path = Path::new(REFERENCE, set.as_slice(), set.as_slice());
        assert!(path.in_sync());
        assert!(!path.has_no_operation());
        assert!(!path.has_finished());
        assert!(path.matches());
    }

    #[test]
    fn test_add_variant_branch_counts() {
        let set: VariantSet = [snp(2, &[0, 1]), snp(5, &[1, 1])].into_iter().collect();
        let path = Path::new(REFERENCE, set.as_slice(), set.as_slice());

        let het = set.get(0).unwrap();
        let children = path.add_variant(VcfSide::Base, het, 0, &genotype_orientations(het));
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].base().excluded_indices(), vec![0]);
        assert_eq!(children[1].base().included_count(), 1);
        assert_ne!(children[1], children[2]);

        let hom = set.get(1).unwrap();
        let children = path.add_variant(VcfSide::Called, hom, 1, &genotype_orientations(hom));
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_sync_point_recorded_when_in_sync() {
        let set: VariantSet = [snp(2, &[1, 1])].into_iter().collect();
        let mut path = Path::new(REFERENCE, set.as_slice(), set.as_slice());
        path.move_forward(2);
        assert!(path.in_sync());

        let v = set.get(0).unwrap();
        let children = path.add_variant(VcfSide::Called, v, 0, &genotype_orientations(v));
        for child in &children {
            assert_eq!(child.sync_points(), vec![2]);
        }

        let included = &children[1];
        assert!(!included.in_sync());
        assert!(included.has_no_operation());

        // The excluded span is still pending, so no new sync point
        let grandchildren = children[0].add_variant(VcfSide::Base, v, 0, &genotype_orientations(v));
        assert!(grandchildren.iter().all(|p| p.sync_point_count() == 1));
    }

    #[test]
    fn test_matched_snp_reaches_sync() {
        let set: VariantSet = [snp(2, &[1, 1])].into_iter().collect();
        let v = set.get(0).unwrap();
        let ov = genotype_orientations(v)[0];

        let mut path = Path::new(REFERENCE, set.as_slice(), set.as_slice());
        path.include(VcfSide::Base, ov, 0);
        path.include(VcfSide::Called, ov, 0);
        assert!(!path.in_sync());

        while !path.in_sync() {
            assert!(path.matches());
            path.step();
        }
        assert_eq!(path.base().position(), 3);
        assert!(!path.has_no_operation());

        path.move_forward(REFERENCE.len());
        assert!(path.has_finished());
    }

    #[test]
    fn test_mismatch_detected() {
        let set: VariantSet = [snp(0, &[1, 1])].into_iter().collect();
        let v = set.get(0).unwrap();
        let mut path = Path::new(REFERENCE, set.as_slice(), set.as_slice());
        path.include(VcfSide::Called, genotype_orientations(v)[0], 0);
        assert!(!path.matches());
    }

    #[test]
    fn test_reference_equivalent_include_stays_apart_from_exclude() {
        // Inserting AC before deleting AC replays the reference
        let set: VariantSet = [
            Variant::new("chr1", 4, b"", &[b"AC"], &[1, 1], false).unwrap(),
            Variant::new("chr1", 4, b"AC", &[b""], &[1, 1], false).unwrap(),
        ]
        .into_iter()
        .collect();
        let empty = VariantSet::new();
        let start = Path::new(REFERENCE, set.as_slice(), empty.as_slice());

        let mut included = start.clone();
        let mut excluded = start.clone();
        for (index, v) in set.iter().enumerate() {
            included.include(VcfSide::Base, genotype_orientations(v)[0], index);
            excluded.exclude(VcfSide::Base, v, index);
        }
        for path in [&mut included, &mut excluded] {
            while !path.in_sync() {
                assert!(path.matches());
                path.step();
            }
        }

        assert_eq!(included.base().position(), 6);
        assert_eq!(included.base(), excluded.base());
        assert_ne!(included, excluded);
        assert!(included.has_no_operation());
        assert!(!excluded.has_no_operation());
    }

    #[test]
    fn test_equal_states_from_different_histories() {
        let set: VariantSet = [snp(2, &[0, 1])].into_iter().collect();
        let v = set.get(0).unwrap();
        let start = Path::new(REFERENCE, set.as_slice(), set.as_slice());

        let mut a = start.clone();
        a.exclude(VcfSide::Base, v, 0);
        let mut b = start.clone();
        b.push_sync_point(0);
        b.push_sync_point(0);
        assert_eq!(b.sync_points(), vec![0]);
        b.exclude(VcfSide::Base, v, 0);

        assert_eq!(a, b);
        assert_ne!(a.sync_point_count(), b.sync_point_count());
    }
}
