use std::sync::Arc;

use crate::error::{AnalysisError, Result};
use crate::reference::{SECTORS_NACE_1, SECTORS_NACE_62};

// ---------------------------------------------------------------------------
// SectorMap – fixed fine → coarse sector classification
// ---------------------------------------------------------------------------

/// Many-to-one table from fine sector indices to coarse sector indices.
///
/// Construction validates that every fine sector has exactly one coarse
/// sector; after that the table is immutable and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorMap {
    fine_codes: Arc<[String]>,
    coarse_labels: Arc<[String]>,
    /// `buckets[fine] == coarse`
    buckets: Box<[usize]>,
    /// Number of fine sectors per coarse sector.
    bucket_sizes: Box<[usize]>,
}

impl SectorMap {
    /// Build a map from an explicit assignment, one entry per fine code.
    pub fn from_assignments<S: AsRef<str>>(
        fine_codes: &[S],
        coarse_labels: &[S],
        assignment: &[Option<usize>],
    ) -> Result<Self> {
        if assignment.len() != fine_codes.len() {
            return Err(AnalysisError::shape(format!(
                "{} sector assignments for {} fine sectors",
                assignment.len(),
                fine_codes.len()
            )));
        }

        let mut buckets = Vec::with_capacity(assignment.len());
        let mut bucket_sizes = vec![0usize; coarse_labels.len()];
        for (index, entry) in assignment.iter().enumerate() {
            match entry {
                Some(coarse) if *coarse < coarse_labels.len() => {
                    buckets.push(*coarse);
                    bucket_sizes[*coarse] += 1;
                }
                _ => {
                    return Err(AnalysisError::UnmappedSector {
                        index,
                        code: fine_codes[index].as_ref().to_string(),
                    })
                }
            }
        }

        Ok(SectorMap {
            fine_codes: fine_codes.iter().map(|c| c.as_ref().to_string()).collect(),
            coarse_labels: coarse_labels.iter().map(|c| c.as_ref().to_string()).collect(),
            buckets: buckets.into_boxed_slice(),
            bucket_sizes: bucket_sizes.into_boxed_slice(),
        })
    }

    /// Assign each fine code to the coarse label it starts with.
    ///
    /// NACE codes nest this way: `C10-C12` and `C33` both belong to section `C`.
    pub fn from_prefixes<S: AsRef<str>>(fine_codes: &[S], coarse_labels: &[S]) -> Result<Self> {
        let labels: Vec<&str> = coarse_labels.iter().map(AsRef::as_ref).collect();
        let mut assignment = Vec::with_capacity(fine_codes.len());
        for (index, code) in fine_codes.iter().enumerate() {
            let code: &str = code.as_ref();
            let matches: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|&(_, label)| code.starts_with(*label))
                .map(|(i, _)| i)
                .collect();
            if matches.len() > 1 {
                return Err(AnalysisError::AmbiguousSector {
                    index,
                    code: code.to_string(),
                    candidates: matches.iter().map(|&i| labels[i].to_string()).collect(),
                });
            }
            assignment.push(matches.first().copied());
        }
        Self::from_assignments(fine_codes, coarse_labels, &assignment)
    }

    /// The model's 62 NACE industries grouped into the 19 NACE sections.
    pub fn nace62_to_nace1() -> Result<Self> {
        Self::from_prefixes(&SECTORS_NACE_62, &SECTORS_NACE_1)
    }

    pub fn fine_len(&self) -> usize {
        self.buckets.len()
    }

    pub fn coarse_len(&self) -> usize {
        self.coarse_labels.len()
    }

    pub fn fine_codes(&self) -> &[String] {
        &self.fine_codes
    }

    pub fn coarse_labels(&self) -> &[String] {
        &self.coarse_labels
    }

    /// Shared handle on the coarse labels, for attaching to aggregated output.
    pub fn coarse_labels_arc(&self) -> Arc<[String]> {
        Arc::clone(&self.coarse_labels)
    }

    /// Coarse index of each fine sector.
    pub fn buckets(&self) -> &[usize] {
        &self.buckets
    }

    pub fn bucket_sizes(&self) -> &[usize] {
        &self.bucket_sizes
    }

    pub fn bucket_of(&self, fine: usize) -> Option<usize> {
        self.buckets.get(fine).copied()
    }

    /// Fine sector indices belonging to a coarse sector, in fine order.
    pub fn members(&self, coarse: usize) -> impl Iterator<Item = usize> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(move |&(_, &b)| b == coarse)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nace_map_covers_all_sections() {
        let map = SectorMap::nace62_to_nace1().unwrap();
        assert_eq!(map.fine_len(), 62);
        assert_eq!(map.coarse_len(), 19);
        assert!(map.bucket_sizes().iter().all(|&n| n > 0));
        assert_eq!(map.bucket_sizes().iter().sum::<usize>(), 62);

        let c = map.coarse_labels().iter().position(|l| l == "C").unwrap();
        assert_eq!(map.bucket_sizes()[c], 19);
        let members: Vec<usize> = map.members(c).collect();
        assert_eq!(members.first(), Some(&4));
        assert_eq!(members.last(), Some(&22));
    }

    #[test]
    fn unmapped_code_is_rejected() {
        let err = SectorMap::from_prefixes(&["A01", "Z99"], &["A", "B"]).unwrap_err();
        match err {
            AnalysisError::UnmappedSector { index, code } => {
                assert_eq!(index, 1);
                assert_eq!(code, "Z99");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_assignment_is_unmapped() {
        let err = SectorMap::from_assignments(&["x", "y"], &["A"], &[Some(0), Some(3)]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnmappedSector { index: 1, .. }));
    }

    #[test]
    fn overlapping_prefixes_are_ambiguous() {
        let err = SectorMap::from_prefixes(&["K64"], &["K", "K6"]).unwrap_err();
        assert!(matches!(err, AnalysisError::AmbiguousSector { index: 0, .. }));
    }

    #[test]
    fn assignment_length_must_match() {
        let err = SectorMap::from_assignments(&["x", "y"], &["A"], &[Some(0)]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidShape(_)));
    }

    #[test]
    fn empty_buckets_are_allowed() {
        let map = SectorMap::from_assignments(&["x", "y"], &["A", "B", "C"], &[Some(0), Some(0)]).unwrap();
        assert_eq!(map.bucket_sizes(), &[2, 0, 0]);
        assert_eq!(map.members(1).count(), 0);
    }
}
