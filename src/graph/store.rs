//! Append-only storage of variants.
//!
//! `VariantStore` is the plain, single-threaded store. `SharedStore`
//! wraps it for a single writer and many readers: readers take a
//! snapshot and work against it without holding any lock, and an
//! insertion becomes visible to later snapshots all at once.

use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::graph::variant::Variant;
use crate::graph::{GraphError, RecordKind};
use crate::ids::VariantId;

/// Owner of all variants of a graph, keyed by id.
///
/// There is no removal: a variant, once inserted, keeps its id and its
/// bases for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct VariantStore {
    variants: BTreeMap<VariantId, Variant>,
}

impl VariantStore {
    pub fn new() -> Self {
        VariantStore {
            variants: BTreeMap::new(),
        }
    }

    /// Add a variant. Fails with `DuplicateId` if the id is taken, in
    /// which case the store is unchanged.
    pub fn insert(&mut self, variant: Variant) -> Result<(), GraphError> {
        match self.variants.entry(variant.id().clone()) {
            btree_map::Entry::Occupied(e) => Err(GraphError::DuplicateId {
                kind: RecordKind::Variant,
                id: e.key().to_string(),
            }),
            btree_map::Entry::Vacant(e) => {
                debug!(
                    id = %variant.id(),
                    len = variant.len(),
                    start_join = %variant.start_join(),
                    end_join = %variant.end_join(),
                    "inserted variant"
                );
                e.insert(variant);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &VariantId) -> Result<&Variant, GraphError> {
        self.variants
            .get(id)
            .ok_or_else(|| GraphError::variant_not_found(id))
    }

    pub fn contains(&self, id: &VariantId) -> bool {
        self.variants.contains_key(id)
    }

    /// Whether both joins of the variant point at its own `(id, 0, +)`.
    pub fn is_root(&self, id: &VariantId) -> Result<bool, GraphError> {
        self.get(id).map(Variant::is_root)
    }

    /// Root variants, in id order.
    pub fn roots(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values().filter(|v| v.is_root())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Variants in id order.
    pub fn iter(&self) -> btree_map::Values<'_, VariantId, Variant> {
        self.variants.values()
    }
}

impl<'a> IntoIterator for &'a VariantStore {
    type Item = &'a Variant;
    type IntoIter = btree_map::Values<'a, VariantId, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.values()
    }
}

/// Thread-safe handle to a growing `VariantStore`.
///
/// Writers are serialized by a lock; each insertion publishes a new
/// version of the store, so a snapshot never sees a partially inserted
/// variant and is never changed by later insertions.
///
/// ```
/// use bio_vargraph::graph::store::SharedStore;
/// use bio_vargraph::graph::variant::Variant;
///
/// let shared = SharedStore::new();
/// let before = shared.snapshot();
/// shared.insert(Variant::root("chr1", b"ACGT".to_vec())).unwrap();
/// assert!(before.is_empty());
/// assert_eq!(shared.snapshot().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<Arc<VariantStore>>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::from_store(VariantStore::new())
    }

    pub fn from_store(store: VariantStore) -> Self {
        SharedStore {
            inner: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    /// Insert under the write lock. The store is copied only while an
    /// older snapshot is still alive.
    pub fn insert(&self, variant: Variant) -> Result<(), GraphError> {
        let mut guard = self.inner.write();
        if guard.contains(variant.id()) {
            return Err(GraphError::DuplicateId {
                kind: RecordKind::Variant,
                id: variant.id().to_string(),
            });
        }
        Arc::make_mut(&mut *guard).insert(variant)
    }

    /// Consistent, immutable view of the store as of now.
    pub fn snapshot(&self) -> Arc<VariantStore> {
        Arc::clone(&*self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::graph::address::Address;
    use crate::side::Side;

    fn ins(id: &str, pos: usize) -> Variant {
        Variant::new(
            id,
            Address::new("chr1", pos, Side::Plus),
            Address::new("chr1", pos + 1, Side::Minus),
            b"G".to_vec(),
        )
    }

    #[test]
    fn insert_and_get() {
        let mut store = VariantStore::new();
        store.insert(Variant::root("chr1", b"ACGT".to_vec())).unwrap();
        store.insert(ins("ins1", 1)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"ins1".into()).unwrap().sequence(), b"G");
        assert!(store.is_root(&"chr1".into()).unwrap());
        assert!(!store.is_root(&"ins1".into()).unwrap());
        assert_eq!(store.roots().count(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = VariantStore::new();
        store.insert(ins("ins1", 1)).unwrap();
        let err = store.insert(ins("ins1", 2)).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateId {
                kind: RecordKind::Variant,
                id: "ins1".to_owned()
            }
        );
        // the first insertion is untouched
        assert_eq!(store.get(&"ins1".into()).unwrap().start_join().position, 1);
    }

    #[test]
    fn missing_id() {
        let store = VariantStore::new();
        assert!(matches!(
            store.get(&"nope".into()),
            Err(GraphError::NotFound {
                kind: RecordKind::Variant,
                ..
            })
        ));
        assert!(store.is_root(&"nope".into()).is_err());
    }

    #[test]
    fn snapshots_are_stable() {
        let shared = SharedStore::new();
        shared.insert(Variant::root("chr1", b"ACGT".to_vec())).unwrap();
        let snap = shared.snapshot();
        shared.insert(ins("ins1", 0)).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(shared.snapshot().len(), 2);
        assert!(shared.insert(ins("ins1", 2)).is_err());
    }

    #[test]
    fn concurrent_readers_see_whole_variants() {
        let shared = SharedStore::new();
        shared.insert(Variant::root("chr1", b"ACGTACGTAC".to_vec())).unwrap();
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..9 {
                    shared.insert(ins(&format!("ins{}", i), i)).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let snap = shared.snapshot();
                        for v in snap.iter().filter(|v| !v.is_root()) {
                            assert_eq!(v.len(), 1);
                            assert!(snap.contains(&v.start_join().variant_id));
                        }
                    }
                })
            })
            .collect();
        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(shared.snapshot().len(), 10);
    }
}
