//! Precondition checks on replay input.
//!
//! The search trusts its input completely: candidates must be sorted, lie on
//! the reference, and carry REF alleles that agree with it. Violations fail
//! the contig's run with an [`InputError`] rather than being repaired.

use thiserror::Error;

use crate::core::reference::ReferenceSequence;
use crate::core::types::VcfSide;
use crate::core::variant::VariantSet;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{side} variant {id} does not exist")]
    UnknownVariant { side: VcfSide, id: usize },

    #[error("{side} variant {id} is on contig '{found}', expected '{expected}'")]
    ContigMismatch {
        side: VcfSide,
        id: usize,
        expected: String,
        found: String,
    },

    #[error("{side} variant {id} ends at {end}, beyond contig length {length}")]
    OutOfBounds {
        side: VcfSide,
        id: usize,
        end: usize,
        length: usize,
    },

    #[error("{side} variant {id} REF allele disagrees with the reference at {position}")]
    RefMismatch {
        side: VcfSide,
        id: usize,
        position: usize,
    },

    #[error("{side} variant {id} at {start} is out of order (previous candidate {previous_id} at {previous_start})")]
    Unsorted {
        side: VcfSide,
        id: usize,
        start: usize,
        previous_id: usize,
        previous_start: usize,
    },
}

/// Check one side's candidate ids against the reference.
///
/// Candidates must name existing variants in strictly increasing id order
/// with non-decreasing start positions.
///
/// # Errors
///
/// Returns the first `InputError` found.
pub fn check_candidates(
    reference: &ReferenceSequence,
    side: VcfSide,
    variants: &VariantSet,
    candidates: &[usize],
) -> Result<(), InputError> {
    let mut previous: Option<(usize, usize)> = None;

    for &id in candidates {
        let variant = variants
            .get(id)
            .ok_or(InputError::UnknownVariant { side, id })?;

        if variant.contig() != reference.name() {
            return Err(InputError::ContigMismatch {
                side,
                id,
                expected: reference.name().to_string(),
                found: variant.contig().to_string(),
            });
        }

        let expected = reference
            .slice(variant.start(), variant.end())
            .ok_or(InputError::OutOfBounds {
                side,
                id,
                end: variant.end(),
                length: reference.len(),
            })?;
        if expected != variant.ref_allele() {
            return Err(InputError::RefMismatch {
                side,
                id,
                position: variant.start(),
            });
        }

        if let Some((previous_id, previous_start)) = previous {
            if id <= previous_id || variant.start() < previous_start {
                return Err(InputError::Unsorted {
                    side,
                    id,
                    start: variant.start(),
                    previous_id,
                    previous_start,
                });
            }
        }
        previous = Some((id, variant.start()));
    }

    Ok(())
}

/// Ids of the variants worth replaying: at least one non-reference allele in
/// the genotype, and no longer than `max_length` on any called allele or
/// their REF span
#[must_use]
pub fn assessable_ids(variants: &VariantSet, max_length: usize) -> Vec<usize> {
    variants
        .iter()
        .filter(|v| !v.is_hom_ref())
        .filter(|v| v.max_allele_length() <= max_length)
        .map(crate::core::variant::Variant::id)
        .collect()
}
