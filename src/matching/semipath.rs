use std::cmp::Ordering;

use crate::core::oriented::OrientedVariant;
use crate::core::types::VcfSide;
use crate::core::variant::Variant;
use crate::matching::haplotype::HaplotypeCursor;
use crate::matching::lineage::Lineage;

/// The replay state of one call set: a diploid pair of haplotype cursors
/// plus the include/exclude decisions taken so far.
///
/// Decisions are made in candidate order, so `last_variant_index` is the
/// position in the side's candidate list of the most recent decision.
/// Included, excluded and skipped records hold variant ids.
#[derive(Debug, Clone)]
pub struct SemiPath<'a> {
    side: VcfSide,
    variants: &'a [Variant],
    haplotype_a: HaplotypeCursor<'a>,
    haplotype_b: HaplotypeCursor<'a>,
    included: Lineage<OrientedVariant>,
    excluded: Lineage<usize>,
    skipped: Lineage<usize>,
    last_variant_index: Option<usize>,
    last_variant_end: usize,
    last_included_end: usize,
}

impl<'a> SemiPath<'a> {
    #[must_use]
    pub fn new(side: VcfSide, reference: &'a [u8], variants: &'a [Variant]) -> Self {
        Self {
            side,
            variants,
            haplotype_a: HaplotypeCursor::new(reference, variants),
            haplotype_b: HaplotypeCursor::new(reference, variants),
            included: Lineage::new(),
            excluded: Lineage::new(),
            skipped: Lineage::new(),
            last_variant_index: None,
            last_variant_end: 0,
            last_included_end: 0,
        }
    }

    pub fn side(&self) -> VcfSide {
        self.side
    }

    /// Play `ov` on haplotype A and its complement on haplotype B
    pub fn include_variant(&mut self, ov: OrientedVariant, index: usize) {
        let end = self.variants[ov.variant()].end();
        self.haplotype_a.add_variant(ov);
        self.haplotype_b.add_variant(ov.other());
        self.included.push(ov);
        self.record_decision(index, end);
        self.last_included_end = self.last_included_end.max(end);
    }

    /// Record `variant` as absent. The cursors are untouched.
    pub fn exclude_variant(&mut self, variant: &Variant, index: usize) {
        self.excluded.push(variant.id());
        self.record_decision(index, variant.end());
    }

    /// Record `variant` as abandoned inside an unresolvable region
    pub fn skip_variant(&mut self, variant: &Variant, index: usize) {
        self.skipped.push(variant.id());
        self.record_decision(index, variant.end());
    }

    fn record_decision(&mut self, index: usize, end: usize) {
        self.last_variant_index = Some(index);
        self.last_variant_end = self.last_variant_end.max(end);
    }

    /// Whether `variant` can be included without overlapping an included call
    pub fn is_new(&self, variant: &Variant) -> bool {
        variant.start() >= self.last_included_end
            && self.haplotype_a.can_place(variant.start())
            && self.haplotype_b.can_place(variant.start())
    }

    /// Candidate index of the next undecided variant
    pub fn next_index(&self) -> usize {
        self.last_variant_index.map_or(0, |i| i + 1)
    }

    pub fn last_variant_index(&self) -> Option<usize> {
        self.last_variant_index
    }

    /// End of the furthest decided variant, included or not
    pub fn variant_end_position(&self) -> usize {
        self.last_variant_end
    }

    pub fn last_included_end(&self) -> usize {
        self.last_included_end
    }

    /// `Greater` when haplotype A is ahead of haplotype B
    pub fn compare_haplotype_positions(&self) -> Ordering {
        self.haplotype_a.position().cmp(&self.haplotype_b.position())
    }

    pub fn position(&self) -> usize {
        self.haplotype_a.position().max(self.haplotype_b.position())
    }

    pub fn is_on_template(&self) -> bool {
        self.haplotype_a.is_on_template() && self.haplotype_b.is_on_template()
    }

    pub fn has_finished(&self) -> bool {
        self.haplotype_a.is_finished() && self.haplotype_b.is_finished()
    }

    pub fn wants_future_variant_bases(&self) -> bool {
        self.haplotype_a.wants_future_variant_bases() || self.haplotype_b.wants_future_variant_bases()
    }

    /// Whether a pending variant starting at `start` must be decided before
    /// this side may step again: some haplotype has nothing queued and has
    /// reached the variant.
    pub fn needs_decision_at(&self, start: usize) -> bool {
        [&self.haplotype_a, &self.haplotype_b]
            .iter()
            .any(|h| h.wants_future_variant_bases() && h.position() >= start)
    }

    /// Haplotype A emits the same next base as the other side's haplotype A,
    /// and likewise for B. The unordered pairing of haplotypes is covered by
    /// the search, which branches on both orientations of a heterozygous call.
    pub fn matches(&self, other: &SemiPath<'_>) -> bool {
        self.haplotype_a.next_base() == other.haplotype_a.next_base()
            && self.haplotype_b.next_base() == other.haplotype_b.next_base()
    }

    pub fn step_haplotype_a(&mut self) {
        self.haplotype_a.step();
    }

    pub fn step_haplotype_b(&mut self) {
        self.haplotype_b.step();
    }

    pub fn move_forward(&mut self, position: usize) {
        self.haplotype_a.move_forward(position);
        self.haplotype_b.move_forward(position);
    }

    /// Number of included variants
    pub fn included_count(&self) -> usize {
        self.included.len()
    }

    pub(crate) fn included_lineage(&self) -> &Lineage<OrientedVariant> {
        &self.included
    }

    /// Included orientations sorted by variant id
    pub fn included_variants(&self) -> Vec<OrientedVariant> {
        let mut included = self.included.to_vec();
        included.sort();
        included
    }

    /// Excluded variant ids in decision order
    pub fn excluded_indices(&self) -> Vec<usize> {
        self.excluded.to_vec()
    }

    /// Skipped variant ids in decision order
    pub fn skipped_indices(&self) -> Vec<usize> {
        self.skipped.to_vec()
    }
}

impl PartialEq for SemiPath<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemiPath<'_> {}

impl PartialOrd for SemiPath<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Ends behind the cursors no longer constrain the future, so they compare
// clamped to the current position.
impl Ord for SemiPath<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (pos, other_pos) = (self.position(), other.position());
        self.side
            .cmp(&other.side)
            .then_with(|| self.last_variant_index.cmp(&other.last_variant_index))
            .then_with(|| {
                self.last_variant_end
                    .max(pos)
                    .cmp(&other.last_variant_end.max(other_pos))
            })
            .then_with(|| {
                self.last_included_end
                    .max(pos)
                    .cmp(&other.last_included_end.max(other_pos))
            })
            .then_with(|| self.haplotype_a.cmp(&other.haplotype_a))
            .then_with(|| self.haplotype_b.cmp(&other.haplotype_b))
    }
}
