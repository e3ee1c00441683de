//! Whole-graph consistency checks.
//!
//! Unlike the store, which rejects a bad insertion on the spot, the
//! validator never stops at the first problem: it walks the whole store
//! and reports every violation it finds, so that a large graph can be
//! repaired in one pass.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};
use strum_macros::{AsRefStr, Display};
use tracing::{info, warn};

use crate::graph::address::JoinLocation;
use crate::graph::store::VariantStore;
use crate::graph::variant::Variant;
use crate::ids::VariantId;

/// Which of a variant's two joins a violation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display)]
pub enum JoinEnd {
    Start,
    End,
}

/// Reason a variant is inconsistent with the rest of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViolationKind {
    /// A join names a variant the store does not hold.
    NotFound { join: JoinEnd, target: VariantId },
    /// A join position lies outside the variant it names.
    OutOfBounds {
        join: JoinEnd,
        position: usize,
        length: usize,
    },
    /// The variant's join chain never reaches a root.
    UnanchoredCycle,
}

/// A single problem found by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Violation {
    pub variant_id: VariantId,
    pub kind: ViolationKind,
}

/// Result of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    violations: BTreeSet<Violation>,
    complete: bool,
}

impl Validation {
    /// No violations were found and every check ran.
    pub fn is_valid(&self) -> bool {
        self.complete && self.violations.is_empty()
    }

    /// False when the run was cancelled; the violations are then those
    /// collected before cancellation.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn violations(&self) -> &BTreeSet<Violation> {
        &self.violations
    }

    pub fn into_violations(self) -> BTreeSet<Violation> {
        self.violations
    }

    /// Violations recorded against one variant.
    pub fn for_variant<'a>(&'a self, id: &'a VariantId) -> impl Iterator<Item = &'a ViolationKind> {
        self.violations
            .iter()
            .filter(move |v| &v.variant_id == id)
            .map(|v| &v.kind)
    }

    fn push(&mut self, variant_id: &VariantId, kind: ViolationKind) {
        self.violations.insert(Violation {
            variant_id: variant_id.clone(),
            kind,
        });
    }
}

/// Check every variant of the store. Read-only and idempotent.
pub fn validate(store: &VariantStore) -> Validation {
    validate_with(store, &AtomicBool::new(false))
}

/// Like `validate`, but stops between per-variant checks once `cancel`
/// is set, returning what was collected so far.
pub fn validate_with(store: &VariantStore, cancel: &AtomicBool) -> Validation {
    validate_until(store, || cancel.load(Ordering::Relaxed))
}

/// Like `validate_with`, polling `cancelled` before each variant.
pub fn validate_until<F>(store: &VariantStore, mut cancelled: F) -> Validation
where
    F: FnMut() -> bool,
{
    let mut validation = Validation::default();

    for variant in store {
        if cancelled() {
            warn!(
                violations = validation.violations.len(),
                "validation cancelled"
            );
            return validation;
        }
        check_join(store, variant, JoinEnd::Start, variant.start_join(), &mut validation);
        check_join(store, variant, JoinEnd::End, variant.end_join(), &mut validation);
    }

    for id in unanchored(store) {
        validation.push(&id, ViolationKind::UnanchoredCycle);
    }

    validation.complete = true;
    info!(
        variants = store.len(),
        violations = validation.violations.len(),
        "validated graph"
    );
    validation
}

fn check_join(
    store: &VariantStore,
    variant: &Variant,
    end: JoinEnd,
    join: &JoinLocation,
    validation: &mut Validation,
) {
    match store.get(&join.variant_id) {
        Err(_) => validation.push(
            variant.id(),
            ViolationKind::NotFound {
                join: end,
                target: join.variant_id.clone(),
            },
        ),
        Ok(target) if join.position >= target.len() => validation.push(
            variant.id(),
            ViolationKind::OutOfBounds {
                join: end,
                position: join.position,
                length: target.len(),
            },
        ),
        Ok(_) => (),
    }
}

// Variants whose join chains are caught in a cycle without ever reaching
// a root. Without any root, every variant is unanchored.
fn unanchored(store: &VariantStore) -> Vec<VariantId> {
    let mut graph: DiGraph<&VariantId, ()> = DiGraph::new();
    let nodes: HashMap<&VariantId, NodeIndex> = store
        .iter()
        .map(|v| (v.id(), graph.add_node(v.id())))
        .collect();

    for variant in store {
        let from = nodes[variant.id()];
        for join in variant.joins() {
            if let Some(&to) = nodes.get(&join.variant_id) {
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, ());
                }
            }
        }
    }

    let roots: Vec<NodeIndex> = store.roots().map(|v| nodes[v.id()]).collect();
    if roots.is_empty() {
        return store.iter().map(|v| v.id().clone()).collect();
    }

    let cyclic: Vec<NodeIndex> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .flatten()
        .collect();

    let anchored = reaching(&graph, &roots);
    let trapped = reaching(&graph, &cyclic);

    store
        .iter()
        .filter(|v| {
            let n = nodes[v.id()];
            trapped.contains(&n) && !anchored.contains(&n)
        })
        .map(|v| v.id().clone())
        .collect()
}

// Nodes with a path to any of `targets`.
fn reaching(graph: &DiGraph<&VariantId, ()>, targets: &[NodeIndex]) -> HashSet<NodeIndex> {
    let mut seen = HashSet::new();
    for &target in targets {
        if seen.contains(&target) {
            continue;
        }
        let mut bfs = Bfs::new(Reversed(graph), target);
        while let Some(n) = bfs.next(Reversed(graph)) {
            seen.insert(n);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::address::Address;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn reference() -> VariantStore {
        let mut store = VariantStore::new();
        store.insert(Variant::root("chr1", b"ACGTACGTAC".to_vec())).unwrap();
        store
            .insert(Variant::new("ins1", addr("chr1:4(+)"), addr("chr1:5(-)"), b"GG".to_vec()))
            .unwrap();
        store
    }

    #[test]
    fn consistent_graph() {
        let store = reference();
        let validation = validate(&store);
        assert!(validation.is_valid());
        assert!(validation.is_complete());
        // idempotent
        assert_eq!(validate(&store), validation);
    }

    #[test]
    fn empty_store_is_valid() {
        assert!(validate(&VariantStore::new()).is_valid());
    }

    #[test]
    fn collects_all_join_problems() {
        let mut store = reference();
        store
            .insert(Variant::new("bad1", addr("ghost:0(+)"), addr("chr1:10(-)"), b"A".to_vec()))
            .unwrap();
        store
            .insert(Variant::new("bad2", addr("ins1:2(+)"), addr("chr1:9(-)"), b"C".to_vec()))
            .unwrap();

        let validation = validate(&store);
        let got: Vec<Violation> = validation.violations().iter().cloned().collect();
        assert_eq!(
            got,
            vec![
                Violation {
                    variant_id: "bad1".into(),
                    kind: ViolationKind::NotFound {
                        join: JoinEnd::Start,
                        target: "ghost".into()
                    }
                },
                Violation {
                    variant_id: "bad1".into(),
                    kind: ViolationKind::OutOfBounds {
                        join: JoinEnd::End,
                        position: 10,
                        length: 10
                    }
                },
                Violation {
                    variant_id: "bad2".into(),
                    kind: ViolationKind::OutOfBounds {
                        join: JoinEnd::Start,
                        position: 2,
                        length: 2
                    }
                },
            ]
        );
    }

    #[test]
    fn unanchored_cycle() {
        let mut store = reference();
        store
            .insert(Variant::new("a", addr("b:0(+)"), addr("b:0(-)"), b"A".to_vec()))
            .unwrap();
        store
            .insert(Variant::new("b", addr("a:0(+)"), addr("a:0(-)"), b"C".to_vec()))
            .unwrap();
        // hangs off the loop
        store
            .insert(Variant::new("c", addr("a:0(+)"), addr("a:0(-)"), b"T".to_vec()))
            .unwrap();

        let validation = validate(&store);
        let unanchored: Vec<&VariantId> = validation
            .violations()
            .iter()
            .filter(|v| v.kind == ViolationKind::UnanchoredCycle)
            .map(|v| &v.variant_id)
            .collect();
        assert_eq!(unanchored, vec![&VariantId::from("a"), &"b".into(), &"c".into()]);
        assert_eq!(validation.for_variant(&"ins1".into()).count(), 0);
    }

    #[test]
    fn cycle_through_root_is_fine() {
        let mut store = reference();
        // a and b point at each other, but b also reaches chr1
        store
            .insert(Variant::new("a", addr("b:0(+)"), addr("b:0(-)"), b"A".to_vec()))
            .unwrap();
        store
            .insert(Variant::new("b", addr("a:0(+)"), addr("chr1:3(-)"), b"C".to_vec()))
            .unwrap();
        assert!(validate(&store).is_valid());
    }

    #[test]
    fn no_root() {
        let mut store = VariantStore::new();
        store
            .insert(Variant::new("a", addr("a:0(+)"), addr("a:1(-)"), b"AC".to_vec()))
            .unwrap();
        let validation = validate(&store);
        assert_eq!(
            validation.for_variant(&"a".into()).collect::<Vec<_>>(),
            vec![&ViolationKind::UnanchoredCycle]
        );
    }

    #[test]
    fn empty_root_is_out_of_bounds() {
        let mut store = VariantStore::new();
        store.insert(Variant::root("chr0", Vec::new())).unwrap();
        let validation = validate(&store);
        assert_eq!(validation.violations().len(), 2);
    }

    #[test]
    fn cancellation_before_start() {
        let mut store = reference();
        store
            .insert(Variant::new("bad", addr("ghost:0(+)"), addr("chr1:1(-)"), b"A".to_vec()))
            .unwrap();
        let cancel = AtomicBool::new(true);
        let validation = validate_with(&store, &cancel);
        assert!(!validation.is_complete());
        assert!(!validation.is_valid());
        assert!(validation.violations().is_empty());
    }

    #[test]
    fn cancellation_keeps_partial_results() {
        // checked in id order: bad1, bad2, chr1, ins1, zbad
        let mut store = reference();
        for id in &["bad1", "bad2", "zbad"] {
            store
                .insert(Variant::new(*id, addr("ghost:0(+)"), addr("chr1:1(-)"), b"A".to_vec()))
                .unwrap();
        }
        let mut polls = 0;
        let validation = validate_until(&store, || {
            polls += 1;
            polls > 2
        });
        assert!(!validation.is_complete());
        let checked: Vec<&str> = validation
            .violations()
            .iter()
            .map(|v| v.variant_id.as_str())
            .collect();
        assert_eq!(checked, vec!["bad1", "bad2"]);
        assert_eq!(validation.for_variant(&"zbad".into()).count(), 0);

        let full = validate(&store);
        assert!(full.is_complete());
        assert_eq!(full.violations().len(), 3);
    }
}
