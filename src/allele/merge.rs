//! Allele identity.
//!
//! Two alleles are merged only when they are the *same* allele: either
//! they carry the same id from a shared naming space, or they spell out
//! the same path through the graph once every segment is reduced to
//! canonical contexts. Overlapping but different alleles are never
//! merged, so there is no site-level union of alleles.

use std::collections::{BTreeSet, HashSet};

use crate::allele::build::Allele;
use crate::allele::segment::Segment;
use crate::allele::AlleleError;
use crate::graph::address::CanonicalId;
use crate::graph::context::{ContextRule, Resolver};
use crate::graph::store::VariantStore;
use crate::ids::{AlleleId, VariantId};
use crate::side::Side;

/// Source of allele ids that mean the same thing to every caller.
pub trait NameSpace {
    /// Whether `allele` carries an id issued by this naming space.
    fn issued(&self, allele: &Allele) -> bool;
}

/// No shared names: ids are local to whoever built the allele, so only
/// the paths are compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalNames;

impl NameSpace for LocalNames {
    fn issued(&self, _allele: &Allele) -> bool {
        false
    }
}

/// Ids the caller vouches for as globally unique.
impl NameSpace for HashSet<AlleleId> {
    fn issued(&self, allele: &Allele) -> bool {
        self.contains(allele.id())
    }
}

impl NameSpace for BTreeSet<AlleleId> {
    fn issued(&self, allele: &Allele) -> bool {
        self.contains(allele.id())
    }
}

/// Segment reduced to what identifies it in the graph.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalSegment {
    pub variant_id: VariantId,
    pub start: CanonicalId,
    pub end: CanonicalId,
    pub side: Side,
    pub length: usize,
}

impl CanonicalSegment {
    pub fn from_segment<R: ContextRule>(
        segment: &Segment,
        resolver: &Resolver<'_, R>,
    ) -> Result<Self, AlleleError> {
        let variant = segment.check(resolver.store())?;
        Ok(CanonicalSegment {
            variant_id: segment.variant_id().clone(),
            start: segment.start_context(resolver)?,
            end: segment.end_context(resolver)?,
            side: segment.side(),
            length: segment.len(variant),
        })
    }
}

/// Canonical form of an allele's path.
pub fn canonicalize<R: ContextRule>(
    allele: &Allele,
    resolver: &Resolver<'_, R>,
) -> Result<Vec<CanonicalSegment>, AlleleError> {
    allele
        .segments()
        .iter()
        .map(|seg| CanonicalSegment::from_segment(seg, resolver))
        .collect()
}

/// Whether `a` and `b` are the same allele.
///
/// Equal ids decide when `names` issued both alleles; otherwise the
/// canonical paths must be identical, segment by segment.
pub fn same_allele<R, N>(
    a: &Allele,
    b: &Allele,
    resolver: &Resolver<'_, R>,
    names: &N,
) -> Result<bool, AlleleError>
where
    R: ContextRule,
    N: NameSpace + ?Sized,
{
    if a.id() == b.id() && names.issued(a) && names.issued(b) {
        return Ok(true);
    }
    if a.segments().len() != b.segments().len() {
        return Ok(false);
    }
    Ok(canonicalize(a, resolver)? == canonicalize(b, resolver)?)
}

/// Keep the first allele of every identity class, in input order.
pub fn dedup<R, N>(
    alleles: Vec<Allele>,
    resolver: &Resolver<'_, R>,
    names: &N,
) -> Result<Vec<Allele>, AlleleError>
where
    R: ContextRule,
    N: NameSpace + ?Sized,
{
    let mut kept: Vec<Allele> = Vec::with_capacity(alleles.len());
    'outer: for allele in alleles {
        for k in &kept {
            if same_allele(k, &allele, resolver, names)? {
                continue 'outer;
            }
        }
        kept.push(allele);
    }
    Ok(kept)
}

/// Whether two alleles can coexist on one haplotype. Deciding this is
/// left to callers; the core only offers the hook.
pub trait AlleleCompatibility {
    fn compatible(&self, a: &Allele, b: &Allele, store: &VariantStore)
        -> Result<bool, AlleleError>;
}

/// Alleles fit on one haplotype unless they use the same base of the
/// same variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisjointBases;

impl AlleleCompatibility for DisjointBases {
    fn compatible(
        &self,
        a: &Allele,
        b: &Allele,
        store: &VariantStore,
    ) -> Result<bool, AlleleError> {
        for sa in a.segments() {
            let va = sa.check(store)?;
            let ra = sa.range(va);
            for sb in b.segments() {
                if sa.variant_id() != sb.variant_id() {
                    continue;
                }
                let rb = sb.range(sb.check(store)?);
                if ra.start < rb.end && rb.start < ra.end {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
