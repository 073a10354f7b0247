use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::core::oriented::{allele_orientations, genotype_orientations, OrientedVariant};
use crate::core::reference::ReferenceSequence;
use crate::core::types::{MatchMode, TrimPreference, VcfSide};
use crate::core::variant::{Variant, VariantSet};
use crate::matching::path::Path;
use crate::matching::scoring::{self, PathScore};
use crate::matching::semipath::SemiPath;
use crate::utils::validation::{check_candidates, InputError};

/// Default ceiling on the number of live paths
pub const DEFAULT_MAX_PATHS: usize = 150_000;

/// Default ceiling on iterations spent inside one unsynchronized region
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000_000;

/// Default longest REF span or called allele that is assessed at all
pub const DEFAULT_MAX_VARIANT_LENGTH: usize = 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for one replay run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Frontier width above which the search keeps only its best half
    pub max_paths: usize,
    /// Iterations allowed in a region before it is abandoned
    pub max_iterations: usize,
    /// Variants longer than this are not assessed
    pub max_variant_length: usize,
    /// Indel placement preference of the upstream trimmer
    pub trim_preference: TrimPreference,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_variant_length: DEFAULT_MAX_VARIANT_LENGTH,
            trim_preference: TrimPreference::default(),
        }
    }
}

impl ReplayConfig {
    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is malformed or the values are invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_paths < 2 {
            return Err(ConfigError::Invalid(format!(
                "max_paths must be at least 2, got {}",
                self.max_paths
            )));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.max_variant_length == 0 {
            return Err(ConfigError::Invalid(
                "max_variant_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One side of a replay: the variant arena and the ids to decide, in order
#[derive(Debug, Clone)]
pub struct ReplayInput<'a> {
    variants: &'a VariantSet,
    candidates: Vec<usize>,
}

impl<'a> ReplayInput<'a> {
    /// Every variant of the set
    pub fn all(variants: &'a VariantSet) -> Self {
        Self {
            variants,
            candidates: variants.ids(),
        }
    }

    /// Only the given ids, which must be increasing
    pub fn subset(variants: &'a VariantSet, candidates: Vec<usize>) -> Self {
        Self {
            variants,
            candidates,
        }
    }

    pub fn variants(&self) -> &'a VariantSet {
        self.variants
    }

    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }
}

/// Decisions of the winning path for one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideResult {
    /// Included orientations sorted by variant id
    pub included: Vec<OrientedVariant>,
    /// Excluded variant ids, increasing
    pub excluded: Vec<usize>,
    /// Ids abandoned in regions too complex to resolve, increasing
    pub skipped: Vec<usize>,
}

impl SideResult {
    fn from_semi_path(semi: &SemiPath<'_>) -> Self {
        Self {
            included: semi.included_variants(),
            excluded: semi.excluded_indices(),
            skipped: semi.skipped_indices(),
        }
    }

    pub fn included_ids(&self) -> Vec<usize> {
        self.included.iter().map(OrientedVariant::variant).collect()
    }
}

/// The winning path, detached from the search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPath {
    pub base: SideResult,
    pub called: SideResult,
    /// Increasing reference positions where both sides were synchronized
    pub sync_points: Vec<usize>,
    pub score: PathScore,
}

impl BestPath {
    pub fn side(&self, side: VcfSide) -> &SideResult {
        match side {
            VcfSide::Base => &self.base,
            VcfSide::Called => &self.called,
        }
    }
}

/// Counters describing how a search went
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Paths taken from the frontier
    pub iterations: u64,
    /// Widest frontier seen
    pub peak_frontier: usize,
    /// Insertions that landed on an equal state already in the frontier
    pub merged: u64,
    /// Paths discarded on a base mismatch or as degenerate
    pub dropped: u64,
    /// Times the frontier was cut back to its best half
    pub prunes: usize,
    /// Regions abandoned after the iteration ceiling or a dead frontier
    pub abandoned_regions: usize,
}

/// Result of one replay run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub mode: MatchMode,
    pub best: BestPath,
    /// A resource ceiling was hit and the result is best-effort
    pub truncated: bool,
    pub stats: SearchStats,
}

/// Best-path search over one contig.
///
/// ```
/// use hapreplay::{MatchMode, PathReplay, ReferenceSequence, ReplayConfig, ReplayInput, Variant, VariantSet};
///
/// let reference = ReferenceSequence::new("chr1", b"ACGTACGTAC".to_vec());
/// let mut base = VariantSet::new();
/// base.push(Variant::new("chr1", 3, b"T", &[b"G"], &[0, 1], false).unwrap());
/// let called = base.clone();
///
/// let engine = PathReplay::new(&reference, ReplayConfig::default());
/// let outcome = engine
///     .run(&ReplayInput::all(&base), &ReplayInput::all(&called), MatchMode::Genotype)
///     .unwrap();
/// assert_eq!(outcome.best.score.total(), 2);
/// assert!(!outcome.truncated);
/// ```
#[derive(Debug, Clone)]
pub struct PathReplay<'a> {
    reference: &'a ReferenceSequence,
    config: ReplayConfig,
}

impl<'a> PathReplay<'a> {
    #[must_use]
    pub fn new(reference: &'a ReferenceSequence, config: ReplayConfig) -> Self {
        Self { reference, config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn reference(&self) -> &'a ReferenceSequence {
        self.reference
    }

    /// Find the path including the most variants across both sides.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if either side's candidates are unsorted, leave
    /// the contig, or disagree with the reference.
    pub fn run(
        &self,
        base: &ReplayInput<'_>,
        called: &ReplayInput<'_>,
        mode: MatchMode,
    ) -> Result<ReplayOutcome, InputError> {
        check_candidates(self.reference, VcfSide::Base, base.variants, &base.candidates)?;
        check_candidates(
            self.reference,
            VcfSide::Called,
            called.variants,
            &called.candidates,
        )?;

        debug!(
            contig = %self.reference.name(),
            %mode,
            base = base.candidates.len(),
            called = called.candidates.len(),
            "Starting path replay"
        );

        let outcome = Search::new(self, base, called, mode).run();

        debug!(
            contig = %self.reference.name(),
            %mode,
            included = outcome.best.score.total(),
            sync_points = outcome.best.sync_points.len(),
            iterations = outcome.stats.iterations,
            peak_frontier = outcome.stats.peak_frontier,
            truncated = outcome.truncated,
            "Path replay finished"
        );
        Ok(outcome)
    }
}

struct SideInput<'s> {
    variants: &'s [Variant],
    candidates: &'s [usize],
    orientations: Vec<Vec<OrientedVariant>>,
}

impl<'s> SideInput<'s> {
    fn new(input: &'s ReplayInput<'_>, mode: MatchMode) -> Self {
        let variants = input.variants.as_slice();
        let orientations = input
            .candidates
            .iter()
            .map(|&id| match mode {
                MatchMode::Genotype => genotype_orientations(&variants[id]),
                MatchMode::Allele => allele_orientations(&variants[id]),
            })
            .collect();
        Self {
            variants,
            candidates: &input.candidates,
            orientations,
        }
    }

    /// Candidate index and variant of the next undecided candidate
    fn pending(&self, semi: &SemiPath<'_>) -> Option<(usize, &'s Variant)> {
        let index = semi.next_index();
        let id = *self.candidates.get(index)?;
        Some((index, &self.variants[id]))
    }
}

struct Search<'s> {
    reference: &'s ReferenceSequence,
    config: &'s ReplayConfig,
    mode: MatchMode,
    base: SideInput<'s>,
    called: SideInput<'s>,
    stats: SearchStats,
    truncated: bool,
}

impl<'s> Search<'s> {
    fn new(
        engine: &'s PathReplay<'_>,
        base: &'s ReplayInput<'_>,
        called: &'s ReplayInput<'_>,
        mode: MatchMode,
    ) -> Self {
        Self {
            reference: engine.reference,
            config: &engine.config,
            mode,
            base: SideInput::new(base, mode),
            called: SideInput::new(called, mode),
            stats: SearchStats::default(),
            truncated: false,
        }
    }

    fn side(&self, side: VcfSide) -> &SideInput<'s> {
        match side {
            VcfSide::Base => &self.base,
            VcfSide::Called => &self.called,
        }
    }

    fn run(mut self) -> ReplayOutcome {
        let start = Path::new(
            self.reference.bases(),
            self.base.variants,
            self.called.variants,
        );
        let mut frontier = BTreeSet::new();
        frontier.insert(start.clone());

        let mut last_sync = start;
        let mut region_iterations = 0usize;
        let mut region_end = 0usize;
        let mut best: Option<Path<'s>> = None;

        let winner = loop {
            let Some(mut head) = frontier.pop_first() else {
                if let Some(winner) = best.take() {
                    break winner;
                }
                // Every branch died before the contig end
                warn!(
                    contig = %self.reference.name(),
                    position = last_sync.called().position(),
                    region_end,
                    "No path survived the region"
                );
                self.truncated = true;
                let restart = self.abandon_region(&last_sync, region_end);
                region_end = restart.called().position();
                region_iterations = 0;
                last_sync = restart.clone();
                frontier.insert(restart);
                continue;
            };

            self.stats.iterations += 1;
            self.stats.peak_frontier = self.stats.peak_frontier.max(frontier.len() + 1);
            region_iterations += 1;
            region_end = region_end
                .max(head.base().position().max(head.base().variant_end_position()))
                .max(head.called().position().max(head.called().variant_end_position()));

            if region_iterations > self.config.max_iterations {
                warn!(
                    contig = %self.reference.name(),
                    position = last_sync.called().position(),
                    region_end,
                    frontier = frontier.len() + 1,
                    max_iterations = self.config.max_iterations,
                    "Iteration ceiling reached, abandoning region"
                );
                self.truncated = true;
                frontier.clear();
                head = self.abandon_region(&last_sync, region_end);
                region_end = head.called().position();
                region_iterations = 0;
            }

            let in_sync = head.in_sync();
            if in_sync && head.has_no_operation() {
                self.stats.dropped += 1;
                continue;
            }
            if in_sync && frontier.is_empty() {
                trace!(position = head.called().position(), "Single path synchronized");
                last_sync = head.clone();
                region_iterations = 0;
                region_end = head.called().position();
            }

            if self.is_finished(&head) {
                head.push_sync_point(head.called().position());
                if best.as_ref().map_or(true, |b| scoring::is_better(&head, b)) {
                    best = Some(head);
                }
                continue;
            }

            if in_sync {
                let target = self.next_stop(&head);
                head.move_forward(target);
            }

            let children = self
                .branch(&head, VcfSide::Called)
                .or_else(|| self.branch(&head, VcfSide::Base));
            match children {
                Some(children) => {
                    for child in children {
                        self.add_if_better(&mut frontier, child);
                    }
                }
                None if head.matches() => {
                    head.step();
                    self.add_if_better(&mut frontier, head);
                }
                None => self.stats.dropped += 1,
            }

            if frontier.len() > self.config.max_paths {
                self.prune(&mut frontier);
            }
        };

        ReplayOutcome {
            mode: self.mode,
            best: BestPath {
                base: SideResult::from_semi_path(winner.base()),
                called: SideResult::from_semi_path(winner.called()),
                sync_points: winner.sync_points(),
                score: PathScore::of(&winner),
            },
            truncated: self.truncated,
            stats: self.stats,
        }
    }

    fn is_finished(&self, path: &Path<'_>) -> bool {
        path.has_finished()
            && self.base.pending(path.base()).is_none()
            && self.called.pending(path.called()).is_none()
    }

    /// Where an in-sync path can jump to: the nearest pending variant start
    /// on either side, or the contig end
    fn next_stop(&self, path: &Path<'_>) -> usize {
        [VcfSide::Base, VcfSide::Called]
            .iter()
            .filter_map(|&side| {
                self.side(side)
                    .pending(path.semi_path(side))
                    .map(|(_, v)| v.start())
            })
            .min()
            .unwrap_or(self.reference.len())
            .min(self.reference.len())
    }

    fn branch(&self, path: &Path<'s>, side: VcfSide) -> Option<Vec<Path<'s>>> {
        let input = self.side(side);
        let semi = path.semi_path(side);
        let (index, variant) = input.pending(semi)?;
        if !semi.needs_decision_at(variant.start()) {
            return None;
        }
        Some(path.add_variant(side, variant, index, &input.orientations[index]))
    }

    fn add_if_better(&mut self, frontier: &mut BTreeSet<Path<'s>>, path: Path<'s>) {
        match frontier.get(&path) {
            Some(existing) => {
                self.stats.merged += 1;
                if scoring::is_better(&path, existing) {
                    frontier.replace(path);
                }
            }
            None => {
                frontier.insert(path);
            }
        }
    }

    fn prune(&mut self, frontier: &mut BTreeSet<Path<'s>>) {
        let width = frontier.len();
        let keep = (self.config.max_paths / 2).max(1);
        let mut paths: Vec<Path<'s>> = std::mem::take(frontier).into_iter().collect();
        paths.sort_by(|a, b| scoring::compare(b, a));
        paths.truncate(keep);

        warn!(
            contig = %self.reference.name(),
            position = paths.first().map_or(0, |p| p.called().position()),
            width,
            kept = keep,
            "Frontier ceiling reached, keeping best-scoring paths"
        );
        frontier.extend(paths);
        self.truncated = true;
        self.stats.prunes += 1;
    }

    /// Restart from `from`, skipping every pending variant that starts
    /// before `region_end` (extended by the spans of the skipped variants),
    /// and move past the region.
    fn abandon_region(&mut self, from: &Path<'s>, region_end: usize) -> Path<'s> {
        let mut path = from.clone();
        let mut end = region_end.max(from.called().position() + 1);
        let mut skipped = 0usize;

        loop {
            let mut progressed = false;
            for side in [VcfSide::Base, VcfSide::Called] {
                while let Some((index, variant)) = self.side(side).pending(path.semi_path(side)) {
                    if variant.start() >= end {
                        break;
                    }
                    end = end.max(variant.end());
                    path.skip(side, variant, index);
                    skipped += 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        let target = end.min(self.reference.len());
        warn!(
            contig = %self.reference.name(),
            start = from.called().position(),
            end = target,
            skipped,
            "Skipping unresolvable region"
        );
        path.move_forward(target);
        self.stats.abandoned_regions += 1;
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceSequence {
        ReferenceSequence::new("chr1", b"ACGTACGTACGTACGTACGT".to_vec())
    }

    fn snp(start: usize, alt: &[u8], genotype: &[usize]) -> Variant {
        let bases = reference();
        let r = &bases.bases()[start..=start];
        Variant::new("chr1", start, r, &[alt], genotype, false).unwrap()
    }

    fn run(base: &VariantSet, called: &VariantSet, mode: MatchMode) -> ReplayOutcome {
        let reference = reference();
        PathReplay::new(&reference, ReplayConfig::default())
            .run(&ReplayInput::all(base), &ReplayInput::all(called), mode)
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ReplayConfig::default();
        assert_eq!(config.max_paths, 150_000);
        assert_eq!(config.max_iterations, 10_000_000);
        assert_eq!(config.max_variant_length, 1000);
        assert_eq!(config.trim_preference, TrimPreference::Leftmost);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let config = ReplayConfig::from_json(r#"{"max_paths": 64, "trim_preference": "rightmost"}"#)
            .unwrap();
        assert_eq!(config.max_paths, 64);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.trim_preference, TrimPreference::Rightmost);

        assert!(matches!(
            ReplayConfig::from_json(r#"{"max_paths": 1}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReplayConfig::from_json(r#"{"max_iterations": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ReplayConfig::from_json("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        std::fs::write(temp.path(), r#"{"max_variant_length": 50}"#).unwrap();
        let config = ReplayConfig::load_from_file(temp.path()).unwrap();
        assert_eq!(config.max_variant_length, 50);

        let missing = temp.path().with_extension("missing");
        assert!(matches!(
            ReplayConfig::load_from_file(&missing),
            Err(ConfigError::ReadError(_))
        ));
    }

    #[test]
    fn test_identical_calls_all_included() {
        let base: VariantSet = [snp(2, b"T", &[0, 1]), snp(9, b"G", &[1, 1])]
            .into_iter()
            .collect();
        let outcome = run(&base, &base.clone(), MatchMode::Genotype);

        assert_eq!(outcome.best.base.included_ids(), vec![0, 1]);
        assert_eq!(outcome.best.called.included_ids(), vec![0, 1]);
        assert!(outcome.best.base.excluded.is_empty());
        assert!(outcome.best.called.excluded.is_empty());
        assert!(!outcome.truncated);
        assert_eq!(outcome.best.sync_points.last(), Some(&20));
    }

    #[test]
    fn test_different_alt_excluded() {
        let base: VariantSet = [snp(4, b"T", &[1, 1])].into_iter().collect();
        let called: VariantSet = [snp(4, b"G", &[1, 1])].into_iter().collect();
        let outcome = run(&base, &called, MatchMode::Genotype);

        assert_eq!(outcome.best.score.total(), 0);
        assert_eq!(outcome.best.base.excluded, vec![0]);
        assert_eq!(outcome.best.called.excluded, vec![0]);
    }

    #[test]
    fn test_one_sided_variant_excluded() {
        let base: VariantSet = [snp(4, b"T", &[0, 1])].into_iter().collect();
        let outcome = run(&base, &VariantSet::new(), MatchMode::Genotype);
        assert_eq!(outcome.best.base.excluded, vec![0]);
        assert!(outcome.best.called.included.is_empty());
        assert!(outcome.stats.dropped > 0);
    }

    #[test]
    fn test_one_sided_reference_replay_excluded() {
        // Inserting AC at 4 then deleting the AC at 4..6 spells the reference
        let base: VariantSet = [
            Variant::new("chr1", 4, b"", &[b"AC"], &[1, 1], false).unwrap(),
            Variant::new("chr1", 4, b"AC", &[b""], &[1, 1], false).unwrap(),
        ]
        .into_iter()
        .collect();
        let outcome = run(&base, &VariantSet::new(), MatchMode::Genotype);

        assert_eq!(outcome.best.base.excluded, vec![0, 1]);
        assert!(outcome.best.base.skipped.is_empty());
        assert!(outcome.best.base.included.is_empty());
        assert!(!outcome.truncated);
        assert_eq!(outcome.stats.abandoned_regions, 0);
    }

    #[test]
    fn test_subset_candidates() {
        let base: VariantSet = [snp(2, b"T", &[0, 1]), snp(9, b"G", &[1, 1])]
            .into_iter()
            .collect();
        let called = base.clone();
        let reference = reference();
        let engine = PathReplay::new(&reference, ReplayConfig::default());
        let outcome = engine
            .run(
                &ReplayInput::subset(&base, vec![1]),
                &ReplayInput::subset(&called, vec![1]),
                MatchMode::Allele,
            )
            .unwrap();
        assert_eq!(outcome.mode, MatchMode::Allele);
        assert_eq!(outcome.best.base.included_ids(), vec![1]);
        assert_eq!(outcome.best.called.included_ids(), vec![1]);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let reference = reference();
        let engine = PathReplay::new(&reference, ReplayConfig::default());
        let base: VariantSet = [snp(9, b"G", &[1, 1]), snp(2, b"T", &[0, 1])]
            .into_iter()
            .collect();
        let result = engine.run(
            &ReplayInput::all(&base),
            &ReplayInput::all(&VariantSet::new()),
            MatchMode::Genotype,
        );
        assert!(matches!(
            result,
            Err(InputError::Unsorted {
                side: VcfSide::Base,
                ..
            })
        ));
    }
}
