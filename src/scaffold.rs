//! A variant scaffold orders and orients a set of alleles, with the gaps
//! between consecutive alleles, e.g. when phasing tells which alleles of
//! a sample sit on one haplotype and in which order.
//!
//! # Example
//!
//! ```rust
//! use bio_vargraph::scaffold::VariantScaffold;
//!
//! let scaffold = VariantScaffold::assemble(
//!     "hap1",
//!     vec!["a1".into(), "a2".into()],
//!     vec![true, false],
//!     vec![120],
//! ).unwrap();
//! assert_eq!(scaffold.len(), 2);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{AlleleId, ScaffoldId};

/// Ordered, oriented alleles with the gap sizes between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariantScaffold {
    id: ScaffoldId,
    alleles: Vec<AlleleId>,
    is_forwards: Vec<bool>,
    gap_sizes: Vec<i64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldError {
    #[error(
        "{alleles} alleles need {alleles} orientations and {expected_gaps} gaps, \
         got {is_forwards} and {gap_sizes}"
    )]
    LengthMismatch {
        alleles: usize,
        is_forwards: usize,
        gap_sizes: usize,
        expected_gaps: usize,
    },
}

/// One allele of a scaffold as placed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub allele: &'a AlleleId,
    pub is_forward: bool,
    /// Gap to the previous allele; `None` for the first.
    pub gap_before: Option<i64>,
}

impl VariantScaffold {
    /// Create a new scaffold.
    ///
    /// `is_forwards` must have one entry per allele and `gap_sizes` one
    /// entry per pair of consecutive alleles. Alleles are expected to
    /// have been built already; no graph checks are done here.
    pub fn assemble<I: Into<ScaffoldId>>(
        id: I,
        alleles: Vec<AlleleId>,
        is_forwards: Vec<bool>,
        gap_sizes: Vec<i64>,
    ) -> Result<Self, ScaffoldError> {
        let expected_gaps = alleles.len().saturating_sub(1);
        if is_forwards.len() != alleles.len() || gap_sizes.len() != expected_gaps {
            Err(ScaffoldError::LengthMismatch {
                alleles: alleles.len(),
                is_forwards: is_forwards.len(),
                gap_sizes: gap_sizes.len(),
                expected_gaps,
            })
        } else {
            Ok(VariantScaffold {
                id: id.into(),
                alleles,
                is_forwards,
                gap_sizes,
            })
        }
    }

    pub fn id(&self) -> &ScaffoldId {
        &self.id
    }

    /// The number of alleles.
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    pub fn alleles(&self) -> &[AlleleId] {
        &self.alleles
    }

    pub fn is_forwards(&self) -> &[bool] {
        &self.is_forwards
    }

    pub fn gap_sizes(&self) -> &[i64] {
        &self.gap_sizes
    }

    /// Alleles in order, with orientation and preceding gap.
    pub fn placements(&self) -> impl Iterator<Item = Placement<'_>> {
        let gaps = std::iter::once(None).chain(self.gap_sizes.iter().copied().map(Some));
        self.alleles
            .iter()
            .zip(self.is_forwards.iter().copied())
            .zip(gaps)
            .map(|((allele, is_forward), gap_before)| Placement {
                allele,
                is_forward,
                gap_before,
            })
    }
}
