//! Haplotype path replay and the duo comparison built on it.
//!
//! - [`PathReplay`]: best-path search over one contig
//! - [`Path`], [`SemiPath`], [`HaplotypeCursor`]: search state, from whole
//!   path down to a single haplotype
//! - [`compare_contig`]: the genotype pass followed by the allele pass
//! - [`SyncInterval`]: a best path split at its sync points
//! - [`ResultsTable`]: per-contig results shared by concurrent workers
//!
//! ## Algorithm
//!
//! Both call sets are replayed against the reference, base by base, on two
//! haplotypes each. Whenever a haplotype reaches a pending variant the path
//! branches: one child excludes the variant, one child per orientation
//! includes it. Paths whose emitted bases disagree are dropped. Paths that
//! reach the same replay state are merged, keeping the better one, which
//! keeps the otherwise exponential branching tractable.
//!
//! A path is *in sync* when both sides stand on the reference at the same
//! position with nothing pending. The sync points along the winning lineage
//! split the contig into intervals that were resolved independently.
//!
//! [`PathReplay`]: engine::PathReplay
//! [`Path`]: path::Path
//! [`SemiPath`]: semipath::SemiPath
//! [`HaplotypeCursor`]: haplotype::HaplotypeCursor
//! [`compare_contig`]: comparison::compare_contig
//! [`SyncInterval`]: sync::SyncInterval
//! [`ResultsTable`]: results::ResultsTable

pub mod comparison;
pub mod engine;
pub mod haplotype;
pub mod lineage;
pub mod path;
pub mod results;
pub mod scoring;
pub mod semipath;
pub mod sync;

pub use comparison::{compare_contig, ContigComparison, ContigSummary};
pub use engine::{BestPath, PathReplay, ReplayConfig, ReplayInput, ReplayOutcome, SideResult};
