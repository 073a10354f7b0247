//! # hapreplay
//!
//! A library for comparing a truth and a query set of variant calls under
//! diploid genotype semantics.
//!
//! Two call sets can describe the same sequence in different ways: a
//! heterozygous call may be phased either way, and an indel may be
//! represented as several smaller events. `hapreplay` replays both sets on
//! both haplotypes against the reference and searches for the assignment
//! that makes the most calls agree.
//!
//! ## Features
//!
//! - **Path replay**: branch-and-merge search over include/exclude decisions
//! - **Genotype and allele matching**: a strict pass followed by a relaxed pass
//! - **Sync points**: the winning path is split into independently resolved intervals
//! - **Bounded search**: frontier and iteration ceilings degrade to a flagged,
//!   best-effort result instead of running away
//!
//! ## Example
//!
//! ```rust
//! use hapreplay::{compare_contig, ReferenceSequence, ReplayConfig, Variant, VariantSet, VariantStatus};
//!
//! let reference = ReferenceSequence::new("chr1", b"ACGTACGTAC".to_vec());
//!
//! let mut base = VariantSet::new();
//! base.push(Variant::new("chr1", 2, b"G", &[b"T"], &[0, 1], false).unwrap());
//!
//! let mut called = VariantSet::new();
//! called.push(Variant::new("chr1", 2, b"G", &[b"T"], &[1, 0], false).unwrap());
//!
//! let result = compare_contig(&reference, &mut base, &mut called, &ReplayConfig::default()).unwrap();
//! assert_eq!(base.get(0).unwrap().status(), VariantStatus::GenotypeMatch);
//! assert_eq!(result.summary.false_positives, 0);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Variants, orientations, and the reference sequence
//! - [`matching`]: Path replay engine and duo comparison
//! - [`utils`]: Input validation

pub mod core;
pub mod matching;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::oriented::OrientedVariant;
pub use core::reference::ReferenceSequence;
pub use core::types::*;
pub use core::variant::{Variant, VariantError, VariantSet};
pub use matching::comparison::{compare_contig, ContigComparison, ContigSummary};
pub use matching::engine::{
    BestPath, ConfigError, PathReplay, ReplayConfig, ReplayInput, ReplayOutcome, SearchStats,
    SideResult,
};
pub use matching::results::{ResultsError, ResultsTable};
pub use matching::sync::SyncInterval;
pub use utils::validation::InputError;
