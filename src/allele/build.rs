//! Construction and validation of alleles.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::allele::segment::Segment;
use crate::allele::AlleleError;
use crate::graph::context::{ContextRule, LeftRight, Resolver};
use crate::graph::store::VariantStore;
use crate::graph::variant::Variant;
use crate::ids::AlleleId;
use crate::sequence::{revcomp, Sequence};

/// A maximal, abutting chain of segments: one path through the graph.
///
/// Alleles are obtained from an `AlleleBuilder`, which checks the
/// structural rules; a deserialized allele can be checked again with
/// `AlleleBuilder::check`.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Allele {
    id: AlleleId,
    segments: Vec<Segment>,
}

impl Allele {
    pub fn id(&self) -> &AlleleId {
        &self.id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of bases along the path.
    pub fn len(&self, store: &VariantStore) -> Result<usize, AlleleError> {
        self.segments.iter().try_fold(0, |acc, seg| {
            let variant = seg.check(store)?;
            Ok(acc + seg.len(variant))
        })
    }

    /// Bases along the path; minus segments are reverse complemented.
    pub fn sequence(&self, store: &VariantStore) -> Result<Sequence, AlleleError> {
        let mut seq = Vec::new();
        for seg in &self.segments {
            let variant = seg.check(store)?;
            let bases = &variant.sequence()[seg.range(variant)];
            if seg.side().is_plus() {
                seq.extend_from_slice(bases);
            } else {
                seq.extend(revcomp(bases));
            }
        }
        Ok(seq)
    }
}

/// Builds alleles against one store snapshot.
pub struct AlleleBuilder<'r, 'a, R = LeftRight> {
    resolver: &'r Resolver<'a, R>,
}

impl<'r, 'a, R: ContextRule> AlleleBuilder<'r, 'a, R> {
    pub fn new(resolver: &'r Resolver<'a, R>) -> Self {
        AlleleBuilder { resolver }
    }

    /// Build an allele from segments in the order of travel.
    ///
    /// Every segment is checked against the store. Then, for each pair
    /// of neighbours: `NotMaximal` if they continue one another on the
    /// same variant and side, otherwise `NonAbutting` unless the end
    /// context of the first equals the start context of the second and
    /// a single join leads from the one to the other.
    pub fn build<I: Into<AlleleId>>(
        &self,
        id: I,
        segments: Vec<Segment>,
    ) -> Result<Allele, AlleleError> {
        let allele = Allele {
            id: id.into(),
            segments,
        };
        self.check(&allele)?;
        Ok(allele)
    }

    /// Re-run the structural checks on an existing allele.
    pub fn check(&self, allele: &Allele) -> Result<(), AlleleError> {
        let store = self.resolver.store();
        if allele.segments.is_empty() {
            return Err(AlleleError::Empty);
        }
        for seg in &allele.segments {
            seg.check(store)?;
        }

        for (index, pair) in allele.segments.windows(2).enumerate() {
            let (first, second) = (&pair[0], &pair[1]);
            let first_variant = store.get(first.variant_id())?;
            let second_variant = store.get(second.variant_id())?;
            if continues(first, first_variant, second, second_variant) {
                return Err(AlleleError::NotMaximal { index });
            }

            let end_context = first.end_context(self.resolver)?;
            let start_context = second.start_context(self.resolver)?;
            trace!(index, %end_context, %start_context, "checking abutment");

            let joined = end_context == start_context
                && self.crosses_one_join(first, first_variant, second, second_variant)?;
            if !joined {
                return Err(AlleleError::NonAbutting {
                    index,
                    end_context: end_context.to_string(),
                    start_context: start_context.to_string(),
                });
            }
        }
        Ok(())
    }

    // Between the last base of `first` and the first base of `second`
    // lies exactly one join. A segment of an empty variant is itself
    // that join, so it must meet a base directly on either hand.
    fn crosses_one_join(
        &self,
        first: &Segment,
        first_variant: &Variant,
        second: &Segment,
        second_variant: &Variant,
    ) -> Result<bool, AlleleError> {
        let joined = match (first.exit(first_variant), second.entry(second_variant)) {
            (Some(exit), Some(entry)) => self.resolver.is_joined(&exit, &entry)?,
            (Some(exit), None) => &exit == second.join_in(second_variant),
            (None, Some(entry)) => first.join_out(first_variant) == &entry,
            (None, None) => false,
        };
        Ok(joined)
    }
}

// The second segment picks up on the same variant and side where the
// first stops, in the order of travel. Two whole segments of one
// variant count as continuing.
fn continues(
    first: &Segment,
    first_variant: &Variant,
    second: &Segment,
    second_variant: &Variant,
) -> bool {
    if first.variant_id() != second.variant_id() || first.side() != second.side() {
        return false;
    }
    if first.is_whole() && second.is_whole() {
        return true;
    }
    first.travel_bounds(first_variant).1 == second.travel_bounds(second_variant).0
}
