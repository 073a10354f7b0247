//! Two-pass duo comparison of one contig.
//!
//! 1. **Genotype pass**: every assessable variant is replayed with its
//!    genotype orientations. Included variants are genotype matches.
//! 2. **Allele pass**: the variants the first pass excluded are replayed
//!    again with allele orientations. Included variants are allele matches,
//!    the rest are unmatched.
//!
//! Hom-ref calls and variants longer than `max_variant_length` are left
//! `NotAssessed`. Variants abandoned in an unresolvable region are
//! `ComplexSkipped`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::reference::ReferenceSequence;
use crate::core::types::{MatchMode, VariantStatus};
use crate::core::variant::VariantSet;
use crate::matching::engine::{PathReplay, ReplayConfig, ReplayInput, ReplayOutcome, SideResult};
use crate::utils::validation::{assessable_ids, InputError};

/// Per-contig concordance counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContigSummary {
    pub contig: String,
    pub base_genotype_matches: usize,
    pub base_allele_matches: usize,
    pub called_genotype_matches: usize,
    pub called_allele_matches: usize,
    /// Called variants without a base counterpart
    pub false_positives: usize,
    /// Base variants without a called counterpart
    pub false_negatives: usize,
    pub base_skipped: usize,
    pub called_skipped: usize,
    pub base_not_assessed: usize,
    pub called_not_assessed: usize,
    /// Either pass hit a resource ceiling
    pub truncated: bool,
    /// Sync points of the genotype pass
    pub sync_points: usize,
}

/// Both replay outcomes of a contig, kept for downstream consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContigComparison {
    pub summary: ContigSummary,
    pub genotype: ReplayOutcome,
    pub allele: ReplayOutcome,
}

/// Compare one contig and tag every variant of both sets with its status.
///
/// # Errors
///
/// Returns `InputError` if either set is unsorted, lies on another contig,
/// or disagrees with the reference. Statuses are untouched on error.
pub fn compare_contig(
    reference: &ReferenceSequence,
    base: &mut VariantSet,
    called: &mut VariantSet,
    config: &ReplayConfig,
) -> Result<ContigComparison, InputError> {
    let engine = PathReplay::new(reference, config.clone());

    let base_ids = assessable_ids(base, config.max_variant_length);
    let called_ids = assessable_ids(called, config.max_variant_length);

    let genotype = engine.run(
        &ReplayInput::subset(base, base_ids),
        &ReplayInput::subset(called, called_ids),
        MatchMode::Genotype,
    )?;
    let allele = engine.run(
        &ReplayInput::subset(base, genotype.best.base.excluded.clone()),
        &ReplayInput::subset(called, genotype.best.called.excluded.clone()),
        MatchMode::Allele,
    )?;

    for set in [&mut *base, &mut *called] {
        for id in set.ids() {
            set.set_status(id, VariantStatus::NotAssessed);
        }
    }
    apply_statuses(base, &genotype, &allele, |o| &o.best.base);
    apply_statuses(called, &genotype, &allele, |o| &o.best.called);

    let summary = summarize(reference.name(), base, called, &genotype, &allele);
    debug!(
        contig = %summary.contig,
        base_genotype_matches = summary.base_genotype_matches,
        base_allele_matches = summary.base_allele_matches,
        false_positives = summary.false_positives,
        false_negatives = summary.false_negatives,
        truncated = summary.truncated,
        "Contig comparison finished"
    );

    Ok(ContigComparison {
        summary,
        genotype,
        allele,
    })
}

fn apply_statuses<F>(set: &mut VariantSet, genotype: &ReplayOutcome, allele: &ReplayOutcome, side: F)
where
    F: Fn(&ReplayOutcome) -> &SideResult,
{
    let first = side(genotype);
    let second = side(allele);

    for id in first.included_ids() {
        set.set_status(id, VariantStatus::GenotypeMatch);
    }
    for id in second.included_ids() {
        set.set_status(id, VariantStatus::AlleleMatch);
    }
    for &id in &second.excluded {
        set.set_status(id, VariantStatus::NoMatch);
    }
    for &id in first.skipped.iter().chain(&second.skipped) {
        set.set_status(id, VariantStatus::ComplexSkipped);
    }
}

fn summarize(
    contig: &str,
    base: &VariantSet,
    called: &VariantSet,
    genotype: &ReplayOutcome,
    allele: &ReplayOutcome,
) -> ContigSummary {
    let count = |set: &VariantSet, status| set.iter().filter(|v| v.status() == status).count();

    ContigSummary {
        contig: contig.to_string(),
        base_genotype_matches: count(base, VariantStatus::GenotypeMatch),
        base_allele_matches: count(base, VariantStatus::AlleleMatch),
        called_genotype_matches: count(called, VariantStatus::GenotypeMatch),
        called_allele_matches: count(called, VariantStatus::AlleleMatch),
        false_positives: count(called, VariantStatus::NoMatch),
        false_negatives: count(base, VariantStatus::NoMatch),
        base_skipped: count(base, VariantStatus::ComplexSkipped),
        called_skipped: count(called, VariantStatus::ComplexSkipped),
        base_not_assessed: count(base, VariantStatus::NotAssessed),
        called_not_assessed: count(called, VariantStatus::NotAssessed),
        truncated: genotype.truncated || allele.truncated,
        sync_points: genotype.best.sync_points.len(),
    }
}
