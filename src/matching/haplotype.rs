use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::core::oriented::OrientedVariant;
use crate::core::variant::Variant;

/// Base-by-base playback of one haplotype: reference bases interleaved with
/// the alleles of the variants placed on it.
///
/// The cursor always points at the next base to emit. While inside a
/// variant, `position()` stays at the variant start; once the allele is
/// exhausted the cursor jumps to the variant end.
#[derive(Debug, Clone)]
pub struct HaplotypeCursor<'a> {
    reference: &'a [u8],
    variants: &'a [Variant],
    template_pos: usize,
    current: Option<OrientedVariant>,
    allele_pos: usize,
    queue: VecDeque<OrientedVariant>,
}

impl<'a> HaplotypeCursor<'a> {
    #[must_use]
    pub fn new(reference: &'a [u8], variants: &'a [Variant]) -> Self {
        Self {
            reference,
            variants,
            template_pos: 0,
            current: None,
            allele_pos: 0,
            queue: VecDeque::new(),
        }
    }

    /// Reference position of the cursor
    pub fn position(&self) -> usize {
        self.template_pos
    }

    /// True while playing reference bases rather than an allele
    pub fn is_on_template(&self) -> bool {
        self.current.is_none()
    }

    /// All placed variants played and the reference consumed
    pub fn is_finished(&self) -> bool {
        self.current.is_none() && self.queue.is_empty() && self.template_pos >= self.reference.len()
    }

    /// True once nothing is left queued: the cursor can only emit reference
    /// bases until the next pending variant has been decided.
    pub fn wants_future_variant_bases(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// The base about to be emitted, or `None` once finished
    pub fn next_base(&self) -> Option<u8> {
        match self.current {
            Some(ov) => self.sequence(ov).get(self.allele_pos).copied(),
            None => self.reference.get(self.template_pos).copied(),
        }
    }

    /// Consume one base. A finished cursor stays where it is.
    pub fn step(&mut self) {
        if self.current.is_some() {
            self.allele_pos += 1;
        } else if self.template_pos < self.reference.len() {
            self.template_pos += 1;
        } else {
            return;
        }
        self.settle();
    }

    /// Whether a variant starting at `start` can still be placed after
    /// everything already playing or queued
    pub fn can_place(&self, start: usize) -> bool {
        let mut limit = self.template_pos;
        if let Some(ov) = self.current {
            limit = limit.max(self.variants[ov.variant()].end());
        }
        if let Some(ov) = self.queue.back() {
            limit = limit.max(self.variants[ov.variant()].end());
        }
        start >= limit
    }

    /// Queue a variant orientation. Callers check `can_place` first.
    pub fn add_variant(&mut self, ov: OrientedVariant) {
        debug_assert!(self.can_place(self.variants[ov.variant()].start()));
        self.queue.push_back(ov);
        self.settle();
    }

    /// Jump along the reference to `position`, never past the next queued
    /// variant. Does nothing inside a variant or when `position` is behind.
    pub fn move_forward(&mut self, position: usize) {
        if self.current.is_some() || position <= self.template_pos {
            return;
        }
        let mut target = position.min(self.reference.len());
        if let Some(ov) = self.queue.front() {
            target = target.min(self.variants[ov.variant()].start());
        }
        self.template_pos = self.template_pos.max(target);
        self.settle();
    }

    fn sequence(&self, ov: OrientedVariant) -> &'a [u8] {
        self.variants[ov.variant()].slot_sequence(ov.allele())
    }

    // Leave exhausted alleles and enter variants starting at the cursor,
    // repeating so that empty alleles never surface as a current variant.
    fn settle(&mut self) {
        loop {
            if let Some(ov) = self.current {
                if self.allele_pos < self.sequence(ov).len() {
                    return;
                }
                self.template_pos = self.variants[ov.variant()].end();
                self.current = None;
                self.allele_pos = 0;
                continue;
            }
            match self.queue.front() {
                Some(ov) if self.variants[ov.variant()].start() <= self.template_pos => {
                    self.current = self.queue.pop_front();
                    self.allele_pos = 0;
                }
                _ => return,
            }
        }
    }
}

impl PartialEq for HaplotypeCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HaplotypeCursor<'_> {}

impl PartialOrd for HaplotypeCursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HaplotypeCursor<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.template_pos
            .cmp(&other.template_pos)
            .then_with(|| self.current.cmp(&other.current))
            .then_with(|| self.allele_pos.cmp(&other.allele_pos))
            .then_with(|| self.queue.iter().cmp(other.queue.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variant::VariantSet;

    const REFERENCE: &[u8] = b"ACGTACGTAC";

    fn play(cursor: &mut HaplotypeCursor<'_>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(base) = cursor.next_base() {
            out.push(base);
            cursor.step();
        }
        out
    }

    fn variants(specs: &[(usize, &[u8], &[u8])]) -> VariantSet {
        specs
            .iter()
            .map(|&(start, r, a)| Variant::new("chr1", start, r, &[a], &[1, 1], false).unwrap())
            .collect()
    }

    #[test]
    fn test_reference_playback() {
        let set = VariantSet::new();
        let mut cursor = HaplotypeCursor::new(REFERENCE, set.as_slice());
        assert!(cursor.wants_future_variant_bases());
        assert_eq!(play(&mut cursor), REFERENCE.to_vec());
        assert!(cursor.is_finished());
        assert_eq!(cursor.next_base(), None);
        cursor.step();
        assert_eq!(cursor.position(), REFERENCE.len());
    }

    #[test]
    fn test_snp_insertion_and_deletion() {
        let set = variants(&[(1, b"C", b"T"), (4, b"", b"GG"), (6, b"GT", b"")]);
        let mut cursor = HaplotypeCursor::new(REFERENCE, set.as_slice());
        for v in set.iter() {
            cursor.add_variant(OrientedVariant::new(v, true));
        }
        assert!(!cursor.wants_future_variant_bases());
        assert_eq!(play(&mut cursor), b"ATGTGGACAC".to_vec());
        assert!(cursor.is_finished());
    }

    #[test]
    fn test_position_inside_variant() {
        let set = variants(&[(2, b"G", b"TTT")]);
        let mut cursor = HaplotypeCursor::new(REFERENCE, set.as_slice());
        cursor.add_variant(OrientedVariant::new(set.get(0).unwrap(), true));

        cursor.step();
        cursor.step();
        assert_eq!(cursor.position(), 2);
        assert!(!cursor.is_on_template());
        cursor.step();
        cursor.step();
        assert_eq!(cursor.position(), 2);
        cursor.step();
        assert_eq!(cursor.position(), 3);
        assert!(cursor.is_on_template());
        assert!(cursor.wants_future_variant_bases());
    }

    #[test]
    fn test_deletion_at_cursor_is_skipped_immediately() {
        let set = variants(&[(0, b"AC", b"")]);
        let mut cursor = HaplotypeCursor::new(REFERENCE, set.as_slice());
        cursor.add_variant(OrientedVariant::new(set.get(0).unwrap(), true));
        assert!(cursor.is_on_template());
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.next_base(), Some(b'G'));
    }

    #[test]
    fn test_can_place_and_move_forward() {
        let set = variants(&[(3, b"TA", b"T"), (4, b"A", b"C")]);
        let mut cursor = HaplotypeCursor::new(REFERENCE, set.as_slice());
        assert!(cursor.can_place(3));
        cursor.add_variant(OrientedVariant::new(set.get(0).unwrap(), true));
        assert!(!cursor.can_place(4));
        assert!(cursor.can_place(5));

        cursor.move_forward(8);
        assert_eq!(cursor.position(), 3);
        assert!(!cursor.is_on_template());

        let mut plain = HaplotypeCursor::new(REFERENCE, set.as_slice());
        plain.move_forward(7);
        assert_eq!(plain.position(), 7);
        plain.move_forward(2);
        assert_eq!(plain.position(), 7);
        assert!(!plain.can_place(6));
        plain.move_forward(100);
        assert!(plain.is_finished());
    }

    #[test]
    fn test_ordering_tracks_progress() {
        let set = variants(&[(2, b"G", b"C")]);
        let a = HaplotypeCursor::new(REFERENCE, set.as_slice());
        let mut b = a.clone();
        assert_eq!(a, b);
        b.step();
        assert!(a < b);

        let mut c = a.clone();
        c.add_variant(OrientedVariant::new(set.get(0).unwrap(), true));
        assert_ne!(a, c);
    }
}
