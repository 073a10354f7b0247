use serde::{Deserialize, Serialize};

use crate::core::variant::Variant;

/// A variant together with the genotype slot played on each haplotype.
///
/// Field order matters: the derived ordering compares the variant id, then
/// the order flag, then the haplotype A slot, then the haplotype B slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrientedVariant {
    variant: usize,
    ordered: bool,
    allele: u8,
    other: u8,
}

impl OrientedVariant {
    /// Genotype-match orientation. Heterozygous calls play slots `(0, 1)` when
    /// `ordered` and `(1, 0)` otherwise; all other calls play slot 0 on both.
    #[must_use]
    pub fn new(variant: &Variant, ordered: bool) -> Self {
        let (allele, other) = match (variant.is_heterozygous(), ordered) {
            (true, true) => (0, 1),
            (true, false) => (1, 0),
            (false, _) => (0, 0),
        };
        Self {
            variant: variant.id(),
            ordered,
            allele,
            other,
        }
    }

    /// Allele-match orientation: both haplotypes play the same genotype slot.
    #[must_use]
    pub fn with_allele(variant: &Variant, slot: u8) -> Self {
        Self {
            variant: variant.id(),
            ordered: true,
            allele: slot,
            other: slot,
        }
    }

    /// The complementary orientation, used for haplotype B
    pub fn other(&self) -> Self {
        Self {
            variant: self.variant,
            ordered: !self.ordered,
            allele: self.other,
            other: self.allele,
        }
    }

    pub fn variant(&self) -> usize {
        self.variant
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Genotype slot played on the haplotype holding this orientation
    pub fn allele(&self) -> usize {
        usize::from(self.allele)
    }

    /// Genotype slot played on the opposite haplotype
    pub fn other_allele(&self) -> usize {
        usize::from(self.other)
    }
}

/// Orientations branched in genotype-match mode: two for heterozygous calls,
/// one otherwise.
#[must_use]
pub fn genotype_orientations(variant: &Variant) -> Vec<OrientedVariant> {
    if variant.is_heterozygous() {
        vec![
            OrientedVariant::new(variant, true),
            OrientedVariant::new(variant, false),
        ]
    } else {
        vec![OrientedVariant::new(variant, true)]
    }
}

/// Orientations branched in allele-match mode: one per distinct non-reference
/// allele of the genotype, played on both haplotypes.
#[must_use]
pub fn allele_orientations(variant: &Variant) -> Vec<OrientedVariant> {
    let mut seen = Vec::with_capacity(2);
    let mut orientations = Vec::with_capacity(2);
    for (slot, &allele) in variant.genotype().iter().enumerate() {
        if allele == 0 || seen.contains(&allele) {
            continue;
        }
        seen.push(allele);
        // Genotypes hold at most two slots
        #[allow(clippy::cast_possible_truncation)]
        orientations.push(OrientedVariant::with_allele(variant, slot as u8));
    }
    orientations
}
