use serde::{Deserialize, Serialize};

/// Which of the two compared call sets a variant or semi-path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VcfSide {
    /// The truth set being validated against
    Base,
    /// The call set under evaluation
    Called,
}

impl std::fmt::Display for VcfSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Called => write!(f, "called"),
        }
    }
}

/// Concordance criterion used for one replay pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Alleles must agree including their assignment to haplotypes
    Genotype,
    /// Only allele identity matters; every allele is replayed on both haplotypes
    Allele,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Genotype => write!(f, "genotype"),
            Self::Allele => write!(f, "allele"),
        }
    }
}

/// Zygosity derived from a genotype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zygosity {
    /// Two different alleles (0/1, 1/2, ...)
    Heterozygous,
    /// The same allele twice (1/1, 2/2, ...)
    Homozygous,
    /// A single allele (chrY, chrM, male chrX)
    Haploid,
}

/// Outcome assigned to a variant by the duo comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    /// Not compared, either not yet processed or filtered before replay
    #[default]
    NotAssessed,
    /// Matched with haplotype assignment
    GenotypeMatch,
    /// Matched on allele identity only
    AlleleMatch,
    /// No counterpart found on the other side
    NoMatch,
    /// Lies in a region abandoned because the search hit a resource ceiling
    ComplexSkipped,
}

impl VariantStatus {
    /// True for both kinds of match
    pub fn is_match(&self) -> bool {
        matches!(self, Self::GenotypeMatch | Self::AlleleMatch)
    }
}

/// Which end of an ambiguous indel the upstream trimmer prefers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPreference {
    /// Trim shared bases from the beginning first
    #[default]
    Leftmost,
    /// Trim shared bases from the end first
    Rightmost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_ordering() {
        assert!(VcfSide::Base < VcfSide::Called);
        assert_eq!(VcfSide::Called.to_string(), "called");
    }

    #[test]
    fn test_status_is_match() {
        assert!(VariantStatus::GenotypeMatch.is_match());
        assert!(VariantStatus::AlleleMatch.is_match());
        assert!(!VariantStatus::NoMatch.is_match());
        assert!(!VariantStatus::ComplexSkipped.is_match());
        assert_eq!(VariantStatus::default(), VariantStatus::NotAssessed);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&VariantStatus::ComplexSkipped).unwrap();
        assert_eq!(json, "\"complex_skipped\"");
        let mode: MatchMode = serde_json::from_str("\"allele\"").unwrap();
        assert_eq!(mode, MatchMode::Allele);
    }
}
