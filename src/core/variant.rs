use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{VariantStatus, Zygosity};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("Genotype has no alleles")]
    EmptyGenotype,

    #[error("Genotype has {0} alleles, only haploid and diploid calls are supported")]
    UnsupportedPloidy(usize),

    #[error("Genotype allele {index} out of range ({allele_count} alleles)")]
    AlleleIndexOutOfRange { index: usize, allele_count: usize },

    #[error("Allele {index} contains invalid base 0x{byte:02x}")]
    InvalidBase { index: usize, byte: u8 },

    #[error("Variant has no REF allele")]
    MissingRef,
}

/// A single pre-trimmed variant call on one contig.
///
/// Coordinates are 0-based and half-open on the reference: the REF allele
/// replaces `start..end`. Allele 0 is always REF; genotype entries index into
/// `alleles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VariantRecord")]
pub struct Variant {
    id: usize,
    contig: String,
    start: usize,
    end: usize,
    alleles: Vec<Vec<u8>>,
    genotype: Vec<usize>,
    zygosity: Zygosity,
    phased: bool,
    #[serde(default)]
    status: VariantStatus,
}

impl Variant {
    /// Build a variant, validating the genotype and normalizing bases to uppercase.
    ///
    /// # Errors
    ///
    /// Returns `VariantError` if the genotype is empty, has more than two
    /// entries, references a missing allele, or an allele holds a non-letter byte.
    pub fn new(
        contig: impl Into<String>,
        start: usize,
        ref_allele: &[u8],
        alt_alleles: &[&[u8]],
        genotype: &[usize],
        phased: bool,
    ) -> Result<Self, VariantError> {
        let mut alleles = Vec::with_capacity(alt_alleles.len() + 1);
        alleles.push(ref_allele.to_ascii_uppercase());
        alleles.extend(alt_alleles.iter().map(|a| a.to_ascii_uppercase()));

        for (index, allele) in alleles.iter().enumerate() {
            if let Some(&byte) = allele.iter().find(|b| !b.is_ascii_alphabetic()) {
                return Err(VariantError::InvalidBase { index, byte });
            }
        }

        let zygosity = match genotype {
            [] => return Err(VariantError::EmptyGenotype),
            [_] => Zygosity::Haploid,
            [a, b] if a == b => Zygosity::Homozygous,
            [_, _] => Zygosity::Heterozygous,
            _ => return Err(VariantError::UnsupportedPloidy(genotype.len())),
        };

        if let Some(&index) = genotype.iter().find(|&&g| g >= alleles.len()) {
            return Err(VariantError::AlleleIndexOutOfRange {
                index,
                allele_count: alleles.len(),
            });
        }

        Ok(Self {
            id: 0,
            contig: contig.into(),
            start,
            end: start + ref_allele.len(),
            alleles,
            genotype: genotype.to_vec(),
            zygosity,
            phased,
            status: VariantStatus::NotAssessed,
        })
    }

    /// Stable index of this variant in its `VariantSet`
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn ref_allele(&self) -> &[u8] {
        &self.alleles[0]
    }

    pub fn alleles(&self) -> &[Vec<u8>] {
        &self.alleles
    }

    pub fn genotype(&self) -> &[usize] {
        &self.genotype
    }

    pub fn zygosity(&self) -> Zygosity {
        self.zygosity
    }

    pub fn is_heterozygous(&self) -> bool {
        self.zygosity == Zygosity::Heterozygous
    }

    /// Every genotype slot carries the REF allele
    pub fn is_hom_ref(&self) -> bool {
        self.genotype.iter().all(|&g| g == 0)
    }

    pub fn is_phased(&self) -> bool {
        self.phased
    }

    pub fn status(&self) -> VariantStatus {
        self.status
    }

    /// Number of genotype slots that can be played (1 for haploid calls)
    pub fn slot_count(&self) -> usize {
        self.genotype.len()
    }

    /// Allele index carried by a genotype slot. Haploid calls answer every
    /// slot with their single allele.
    pub fn slot_allele_index(&self, slot: usize) -> usize {
        self.genotype[slot.min(self.genotype.len() - 1)]
    }

    /// Sequence played by a genotype slot
    pub fn slot_sequence(&self, slot: usize) -> &[u8] {
        &self.alleles[self.slot_allele_index(slot)]
    }

    /// Longest of the REF span and any called allele
    pub fn max_allele_length(&self) -> usize {
        self.genotype
            .iter()
            .map(|&g| self.alleles[g].len())
            .chain(std::iter::once(self.end - self.start))
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    pub(crate) fn set_status(&mut self, status: VariantStatus) {
        self.status = status;
    }
}

/// Serialized form of a [`Variant`]. Derived fields (`id`, `end`,
/// `zygosity`) are recomputed on load.
#[derive(Deserialize)]
struct VariantRecord {
    contig: String,
    start: usize,
    alleles: Vec<Vec<u8>>,
    genotype: Vec<usize>,
    #[serde(default)]
    phased: bool,
    #[serde(default)]
    status: VariantStatus,
}

impl TryFrom<VariantRecord> for Variant {
    type Error = VariantError;

    fn try_from(record: VariantRecord) -> Result<Self, Self::Error> {
        let (ref_allele, alts) = record
            .alleles
            .split_first()
            .ok_or(VariantError::MissingRef)?;
        let alts: Vec<&[u8]> = alts.iter().map(Vec::as_slice).collect();
        let mut variant = Variant::new(
            record.contig,
            record.start,
            ref_allele,
            &alts,
            &record.genotype,
            record.phased,
        )?;
        variant.status = record.status;
        Ok(variant)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alts: Vec<String> = self.alleles[1..]
            .iter()
            .map(|a| String::from_utf8_lossy(a).into_owned())
            .collect();
        let sep = if self.phased { "|" } else { "/" };
        let gt: Vec<String> = self.genotype.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{}:{} {}>{} {}",
            self.contig,
            self.start + 1,
            String::from_utf8_lossy(&self.alleles[0]),
            alts.join(","),
            gt.join(sep)
        )
    }
}

/// Append-only arena of the variants of one side on one contig.
///
/// Search state refers to variants by their id, which is their index here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "VariantSetRecord")]
pub struct VariantSet {
    variants: Vec<Variant>,
}

#[derive(Deserialize)]
struct VariantSetRecord {
    variants: Vec<Variant>,
}

impl From<VariantSetRecord> for VariantSet {
    // Ids follow arena order whatever the input claimed
    fn from(record: VariantSetRecord) -> Self {
        record.variants.into_iter().collect()
    }
}

impl VariantSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant and return its assigned id
    pub fn push(&mut self, mut variant: Variant) -> usize {
        let id = self.variants.len();
        variant.set_id(id);
        self.variants.push(variant);
        id
    }

    pub fn get(&self, id: usize) -> Option<&Variant> {
        self.variants.get(id)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.variants.iter()
    }

    pub fn as_slice(&self) -> &[Variant] {
        &self.variants
    }

    /// Ids of every variant in arena order
    pub fn ids(&self) -> Vec<usize> {
        (0..self.variants.len()).collect()
    }

    /// Update the status of a variant. Unknown ids are ignored.
    pub fn set_status(&mut self, id: usize, status: VariantStatus) {
        if let Some(variant) = self.variants.get_mut(id) {
            variant.set_status(status);
        }
    }

    /// Ids of the variants currently carrying `status`
    pub fn ids_with_status(&self, status: VariantStatus) -> Vec<usize> {
        self.variants
            .iter()
            .filter(|v| v.status == status)
            .map(|v| v.id)
            .collect()
    }
}

impl FromIterator<Variant> for VariantSet {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        let mut set = Self::new();
        for variant in iter {
            set.push(variant);
        }
        set
    }
}
