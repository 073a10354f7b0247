use serde::{Deserialize, Serialize};

/// The reference sequence of one contig, held in memory as uppercase bases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSequence {
    name: String,
    bases: Vec<u8>,
}

impl ReferenceSequence {
    #[must_use]
    pub fn new(name: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        let mut bases = bases.into();
        bases.make_ascii_uppercase();
        Self {
            name: name.into(),
            bases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Bases in `start..end`, or `None` if the range leaves the contig
    pub fn slice(&self, start: usize, end: usize) -> Option<&[u8]> {
        self.bases.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_normalizes_case() {
        let reference = ReferenceSequence::new("chr1", b"acgtN".to_vec());
        assert_eq!(reference.bases(), b"ACGTN");
        assert_eq!(reference.len(), 5);
        assert_eq!(reference.slice(1, 3), Some(&b"CG"[..]));
        assert_eq!(reference.slice(4, 6), None);
        assert!(ReferenceSequence::new("chrM", Vec::new()).is_empty());
    }
}
