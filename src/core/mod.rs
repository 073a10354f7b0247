//! Core data types for variant comparison.
//!
//! - [`Variant`] and [`VariantSet`]: a pre-trimmed call and the per-contig arena that owns it
//! - [`OrientedVariant`]: a call plus the genotype slot played on each haplotype
//! - [`ReferenceSequence`]: the bases of one contig
//! - [`VcfSide`], [`MatchMode`], [`Zygosity`], [`VariantStatus`]: classification types
//!
//! ## Coordinates
//!
//! All positions are 0-based and half-open. An insertion has `start == end`;
//! a deletion of `n` bases spans `start..start + n` with an empty ALT allele.
//!
//! [`Variant`]: variant::Variant
//! [`VariantSet`]: variant::VariantSet
//! [`OrientedVariant`]: oriented::OrientedVariant
//! [`ReferenceSequence`]: reference::ReferenceSequence
//! [`VcfSide`]: types::VcfSide
//! [`MatchMode`]: types::MatchMode
//! [`Zygosity`]: types::Zygosity
//! [`VariantStatus`]: types::VariantStatus

pub mod oriented;
pub mod reference;
pub mod types;
pub mod variant;
