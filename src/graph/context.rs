//! Resolution of base addresses to canonical contexts.
//!
//! The side of a base that a join is attached to is, as far as the
//! graph is concerned, the same place as the join's target: the first
//! base of an insertion is entered from wherever its `start_join`
//! points. Resolving an address walks such joins until it reaches an
//! *anchored* address, one that is not itself sitting on a join: any
//! address on a root, or any side of a variant base that is not one of
//! the variant's two join boundaries. That anchored address is the
//! canonical identity of the context.
//!
//! Join boundaries of a non-root variant `v` of length `n` are `v:0(-)`,
//! which lies at `start_join`, and `v:(n-1)(+)`, which lies at
//! `end_join`. An empty variant (a deletion) has the single address
//! `v:0`, lying at both joins at once; resolving it reaches two anchors
//! at the same distance, which the `ContextRule` orders.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::trace;

use crate::graph::address::{Address, CanonicalId, JoinLocation};
use crate::graph::store::VariantStore;
use crate::graph::variant::Variant;
use crate::graph::GraphError;
use crate::ids::VariantId;
use crate::side::Side;

/// Ordering used to pick one canonical context among several that are
/// equally close to the resolved address. The smallest address wins.
pub trait ContextRule {
    fn compare(&self, a: &Address, b: &Address) -> Ordering;
}

/// Left-right mapping convention: prefer the plus side, then the
/// lexicographically smallest variant id, then the smallest position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeftRight;

impl ContextRule for LeftRight {
    fn compare(&self, a: &Address, b: &Address) -> Ordering {
        a.side
            .cmp(&b.side)
            .then_with(|| a.variant_id.cmp(&b.variant_id))
            .then_with(|| a.position.cmp(&b.position))
    }
}

impl<F> ContextRule for F
where
    F: Fn(&Address, &Address) -> Ordering,
{
    fn compare(&self, a: &Address, b: &Address) -> Ordering {
        self(a, b)
    }
}

/// Outcome of a resolution: the canonical context and the addresses
/// visited on the way, starting with the queried address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    canonical: CanonicalId,
    path: Vec<Address>,
}

impl Resolution {
    pub fn canonical(&self) -> &CanonicalId {
        &self.canonical
    }

    pub fn into_canonical(self) -> CanonicalId {
        self.canonical
    }

    pub fn path(&self) -> &[Address] {
        &self.path
    }

    /// Number of joins followed.
    pub fn hops(&self) -> usize {
        self.path.len() - 1
    }
}

/// Resolver over a borrowed store snapshot.
pub struct Resolver<'a, R = LeftRight> {
    store: &'a VariantStore,
    rule: R,
}

impl<'a> Resolver<'a, LeftRight> {
    pub fn new(store: &'a VariantStore) -> Self {
        Resolver {
            store,
            rule: LeftRight,
        }
    }
}

impl<'a, R: ContextRule> Resolver<'a, R> {
    pub fn with_rule(store: &'a VariantStore, rule: R) -> Self {
        Resolver { store, rule }
    }

    pub fn store(&self) -> &'a VariantStore {
        self.store
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Canonical context of `variant_id:position(side)`.
    pub fn resolve(
        &self,
        variant_id: &VariantId,
        position: usize,
        side: Side,
    ) -> Result<CanonicalId, GraphError> {
        self.resolve_address(&Address::new(variant_id.clone(), position, side))
    }

    pub fn resolve_address(&self, address: &Address) -> Result<CanonicalId, GraphError> {
        self.resolve_path(address).map(Resolution::into_canonical)
    }

    /// Resolve breadth first, keeping the path to the chosen context.
    ///
    /// Fails with `NotFound` or `OutOfBounds` when a visited address
    /// does not exist, and with `AmbiguousContext` when every branch
    /// runs into an address it has already visited.
    pub fn resolve_path(&self, address: &Address) -> Result<Resolution, GraphError> {
        self.check(address)?;

        let mut visited = HashSet::new();
        visited.insert(address.clone());
        let mut frontier = vec![vec![address.clone()]];

        loop {
            let mut anchored = Vec::new();
            let mut next = Vec::new();
            let mut revisited = None;

            for path in frontier {
                let last = path.last().cloned().unwrap_or_else(|| address.clone());
                let joins = self.joins_at(&last)?;
                if joins.is_empty() {
                    anchored.push(path);
                    continue;
                }
                for join in joins {
                    self.check(join)?;
                    trace!(from = %last, to = %join, "following join");
                    if !visited.insert(join.clone()) {
                        revisited.get_or_insert_with(|| join.clone());
                        continue;
                    }
                    let mut extended = path.clone();
                    extended.push(join.clone());
                    next.push(extended);
                }
            }

            if !anchored.is_empty() {
                return Ok(self.choose(address, anchored));
            }
            if next.is_empty() {
                return Err(GraphError::AmbiguousContext {
                    address: address.to_string(),
                    revisited: revisited.map(|a| a.to_string()).unwrap_or_default(),
                });
            }
            frontier = next;
        }
    }

    /// Whether the address is its own canonical context.
    pub fn is_anchored(&self, address: &Address) -> Result<bool, GraphError> {
        self.check(address)?;
        Ok(self.joins_at(address)?.is_empty())
    }

    /// Whether a single join connects `a` and `b`, in either direction.
    ///
    /// Two sides that merely resolve to the same context, e.g. the ends
    /// of two insertions at one site, are not joined to each other.
    pub fn is_joined(&self, a: &Address, b: &Address) -> Result<bool, GraphError> {
        self.check(a)?;
        self.check(b)?;
        let leads_to = |from: &Address, to: &Address| -> Result<bool, GraphError> {
            Ok(self.joins_at(from)?.iter().any(|join| *join == to))
        };
        Ok(leads_to(a, b)? || leads_to(b, a)?)
    }

    /// The variant holding `address`, after checking the position lies
    /// within it. The single address of an empty variant is position 0.
    pub fn check(&self, address: &Address) -> Result<&'a Variant, GraphError> {
        let variant = self.store.get(&address.variant_id)?;
        if address.position >= variant.len().max(1) {
            return Err(GraphError::OutOfBounds {
                variant: address.variant_id.clone(),
                position: address.position,
                length: variant.len(),
            });
        }
        Ok(variant)
    }

    // Joins the address sits on; empty when anchored.
    fn joins_at(&self, address: &Address) -> Result<Vec<&'a JoinLocation>, GraphError> {
        let variant = self.store.get(&address.variant_id)?;
        if variant.is_root() {
            return Ok(Vec::new());
        }
        if variant.is_empty() {
            return Ok(vec![variant.start_join(), variant.end_join()]);
        }
        let mut joins = Vec::with_capacity(1);
        if address.position == 0 && address.side == Side::Minus {
            joins.push(variant.start_join());
        }
        if address.position + 1 == variant.len() && address.side == Side::Plus {
            joins.push(variant.end_join());
        }
        Ok(joins)
    }

    fn choose(&self, queried: &Address, mut candidates: Vec<Vec<Address>>) -> Resolution {
        candidates.sort_by(|a, b| match (a.last(), b.last()) {
            (Some(x), Some(y)) => self.rule.compare(x, y).then_with(|| x.cmp(y)),
            _ => a.len().cmp(&b.len()),
        });
        if candidates.len() > 1 {
            trace!(
                address = %queried,
                candidates = candidates.len(),
                "tie between equally close contexts"
            );
        }
        let path = candidates.swap_remove(0);
        let canonical = path.last().cloned().unwrap_or_else(|| queried.clone());
        Resolution {
            canonical: CanonicalId::new(canonical),
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    //          0123456789
    // chr1     ACGTACGTAC
    // ins1         ^GG^      chr1:4(+) .. chr1:5(-)
    // ins2             ^T^   ins1:1(+) .. chr1:8(-)  (hangs off the end of ins1)
    // del1      ^-----^      chr1:1(+) .. chr1:7(-)
    #[fixture]
    fn store() -> VariantStore {
        let mut store = VariantStore::new();
        store.insert(Variant::root("chr1", b"ACGTACGTAC".to_vec())).unwrap();
        store
            .insert(Variant::new("ins1", addr("chr1:4(+)"), addr("chr1:5(-)"), b"GG".to_vec()))
            .unwrap();
        store
            .insert(Variant::new("ins2", addr("ins1:1(+)"), addr("chr1:8(-)"), b"T".to_vec()))
            .unwrap();
        store
            .insert(Variant::new("del1", addr("chr1:1(+)"), addr("chr1:7(-)"), Vec::new()))
            .unwrap();
        store
    }

    #[rstest]
    #[case("chr1:0(-)", "chr1:0(-)")]
    #[case("chr1:9(+)", "chr1:9(+)")]
    #[case("ins1:0(+)", "ins1:0(+)")]
    #[case("ins1:0(-)", "chr1:4(+)")]
    #[case("ins1:1(-)", "ins1:1(-)")]
    #[case("ins1:1(+)", "chr1:5(-)")]
    #[case("ins2:0(-)", "chr1:5(-)")]
    #[case("ins2:0(+)", "chr1:8(-)")]
    #[case("del1:0(+)", "chr1:1(+)")]
    #[case("del1:0(-)", "chr1:1(+)")]
    fn resolves(store: VariantStore, #[case] query: &str, #[case] expected: &str) {
        let resolver = Resolver::new(&store);
        let ctx = resolver.resolve_address(&addr(query)).unwrap();
        assert_eq!(ctx.to_string(), expected);
    }

    #[rstest]
    fn path_is_recorded(store: VariantStore) {
        let resolver = Resolver::new(&store);
        let res = resolver.resolve_path(&addr("ins2:0(-)")).unwrap();
        assert_eq!(
            res.path(),
            &[addr("ins2:0(-)"), addr("ins1:1(+)"), addr("chr1:5(-)")][..]
        );
        assert_eq!(res.hops(), 2);
    }

    #[rstest]
    fn resolution_is_deterministic(store: VariantStore) {
        let resolver = Resolver::new(&store);
        let first = resolver.resolve(&"del1".into(), 0, Side::Minus).unwrap();
        for _ in 0..10 {
            assert_eq!(resolver.resolve(&"del1".into(), 0, Side::Minus).unwrap(), first);
        }
    }

    #[rstest]
    fn rule_is_pluggable(store: VariantStore) {
        let minus_first = |a: &Address, b: &Address| b.side.cmp(&a.side);
        let resolver = Resolver::with_rule(&store, minus_first);
        let ctx = resolver.resolve(&"del1".into(), 0, Side::Plus).unwrap();
        assert_eq!(ctx.to_string(), "chr1:7(-)");
    }

    #[rstest]
    fn bounds_and_missing(store: VariantStore) {
        let resolver = Resolver::new(&store);
        assert!(matches!(
            resolver.resolve(&"ins1".into(), 2, Side::Plus),
            Err(GraphError::OutOfBounds { position: 2, length: 2, .. })
        ));
        assert!(matches!(
            resolver.resolve(&"nope".into(), 0, Side::Plus),
            Err(GraphError::NotFound { .. })
        ));
        assert!(resolver.is_anchored(&addr("ins1:0(+)")).unwrap());
        assert!(!resolver.is_anchored(&addr("ins1:0(-)")).unwrap());
    }

    #[test]
    fn cycle_without_anchor_is_ambiguous() {
        let mut store = VariantStore::new();
        store
            .insert(Variant::new("a", addr("b:0(-)"), addr("b:0(-)"), b"A".to_vec()))
            .unwrap();
        store
            .insert(Variant::new("b", addr("a:0(-)"), addr("a:0(-)"), b"C".to_vec()))
            .unwrap();
        let resolver = Resolver::new(&store);
        assert!(matches!(
            resolver.resolve(&"a".into(), 0, Side::Minus),
            Err(GraphError::AmbiguousContext { .. })
        ));
        // the plus side runs into the same loop
        assert!(matches!(
            resolver.resolve(&"a".into(), 0, Side::Plus),
            Err(GraphError::AmbiguousContext { .. })
        ));
    }

    #[test]
    fn dangling_join_is_reported() {
        let mut store = VariantStore::new();
        store
            .insert(Variant::new("a", addr("ghost:0(+)"), addr("ghost:1(-)"), b"A".to_vec()))
            .unwrap();
        let resolver = Resolver::new(&store);
        assert!(matches!(
            resolver.resolve(&"a".into(), 0, Side::Minus),
            Err(GraphError::NotFound { .. })
        ));
    }

    // Three alleles at one site: GG, TT and nothing between chr1:4 and
    // chr1:5.
    fn site(order: &[&str]) -> VariantStore {
        let mut store = VariantStore::new();
        store.insert(Variant::root("chr1", b"ACGTACGTAC".to_vec())).unwrap();
        for id in order {
            let seq = match *id {
                "ins1" => b"GG".to_vec(),
                "insB" => b"TT".to_vec(),
                _ => Vec::new(),
            };
            store
                .insert(Variant::new(*id, addr("chr1:4(+)"), addr("chr1:5(-)"), seq))
                .unwrap();
        }
        store
    }

    #[rstest]
    #[case("ins1:0(-)", "chr1:4(+)")]
    #[case("insB:0(-)", "chr1:4(+)")]
    #[case("ins1:1(+)", "chr1:5(-)")]
    #[case("insB:1(+)", "chr1:5(-)")]
    #[case("delA:0(-)", "chr1:4(+)")]
    #[case("delA:0(+)", "chr1:4(+)")]
    fn siblings_share_the_site(#[case] query: &str, #[case] expected: &str) {
        for order in &[["ins1", "insB", "delA"], ["delA", "insB", "ins1"]] {
            let store = site(order);
            let resolver = Resolver::new(&store);
            let ctx = resolver.resolve_address(&addr(query)).unwrap();
            assert_eq!(ctx.to_string(), expected);
        }
    }

    #[test]
    fn sibling_tie_follows_rule() {
        let store = site(&["ins1", "insB", "delA"]);
        let minus_first = |a: &Address, b: &Address| b.side.cmp(&a.side);
        let resolver = Resolver::with_rule(&store, minus_first);
        assert_eq!(
            resolver.resolve(&"delA".into(), 0, Side::Plus).unwrap().to_string(),
            "chr1:5(-)"
        );
        // boundaries of insertions are not ties
        assert_eq!(
            resolver.resolve(&"insB".into(), 0, Side::Minus).unwrap().to_string(),
            "chr1:4(+)"
        );
    }

    #[test]
    fn siblings_are_not_joined() {
        let store = site(&["ins1", "insB"]);
        let resolver = Resolver::new(&store);
        assert!(resolver.is_joined(&addr("ins1:1(+)"), &addr("chr1:5(-)")).unwrap());
        assert!(resolver.is_joined(&addr("chr1:4(+)"), &addr("insB:0(-)")).unwrap());
        assert!(!resolver.is_joined(&addr("ins1:1(+)"), &addr("insB:1(+)")).unwrap());
        assert!(!resolver.is_joined(&addr("ins1:0(-)"), &addr("insB:0(-)")).unwrap());
        assert!(!resolver.is_joined(&addr("chr1:4(+)"), &addr("chr1:5(-)")).unwrap());
    }
}
