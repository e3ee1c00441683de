//! Ingestion and query entry point over one growing graph.
//!
//! A `Registry` owns the shared variant store together with the alleles,
//! call sets and calls that refer into it. Allele ids registered here
//! form the shared naming space used by `same_allele`.
//!
//! ```
//! # use bio_vargraph::registry::RegistryError;
//! # fn try_main() -> Result<(), RegistryError> {
//! use bio_vargraph::allele::segment::Segment;
//! use bio_vargraph::call::{Call, CallSet, CallSetType};
//! use bio_vargraph::graph::variant::Variant;
//! use bio_vargraph::registry::Registry;
//! use bio_vargraph::side::Side;
//!
//! let registry = Registry::new();
//! registry.insert_variant(Variant::root("chr1", b"ACGTACGTAC".to_vec()))?;
//! registry.insert_allele("ref", vec![Segment::new("chr1", 0, 10, Side::Plus)?])?;
//! registry.insert_call_set(CallSet::new("cs1".into(), "NA12878".into(), CallSetType::Genotype))?;
//! registry.insert_call(Call::new("cs1".into(), "ref".into()).with_copy_number(2))?;
//! assert_eq!(registry.calls_for(&"cs1".into()).len(), 1);
//! # Ok(())
//! # }
//! # fn main() { try_main().unwrap(); }
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::allele::build::{Allele, AlleleBuilder};
use crate::allele::merge::{self, NameSpace};
use crate::allele::segment::Segment;
use crate::allele::AlleleError;
use crate::call::{Call, CallSet};
use crate::graph::address::CanonicalId;
use crate::graph::context::Resolver;
use crate::graph::store::{SharedStore, VariantStore};
use crate::graph::validate::{self, Validation};
use crate::graph::variant::Variant;
use crate::graph::{GraphError, RecordKind};
use crate::ids::{AlleleId, CallSetId, ScaffoldId, VariantId};
use crate::scaffold::{ScaffoldError, VariantScaffold};
use crate::side::Side;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Allele(#[from] AlleleError),
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
}

#[derive(Debug, Default)]
struct Records {
    alleles: BTreeMap<AlleleId, Allele>,
    call_sets: BTreeMap<CallSetId, CallSet>,
    calls: Vec<Call>,
}

/// Single-writer, many-reader home of a graph and the records attached
/// to it.
#[derive(Debug, Default)]
pub struct Registry {
    store: SharedStore,
    records: RwLock<Records>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn from_store(store: VariantStore) -> Self {
        Registry {
            store: SharedStore::from_store(store),
            records: RwLock::new(Records::default()),
        }
    }

    /// Immutable view of the variants as of now.
    pub fn snapshot(&self) -> Arc<VariantStore> {
        self.store.snapshot()
    }

    pub fn insert_variant(&self, variant: Variant) -> Result<(), RegistryError> {
        Ok(self.store.insert(variant)?)
    }

    /// Build an allele against the current snapshot and register its id
    /// in the shared naming space.
    pub fn insert_allele<I: Into<AlleleId>>(
        &self,
        id: I,
        segments: Vec<Segment>,
    ) -> Result<Allele, RegistryError> {
        let id = id.into();
        let mut records = self.records.write();
        if records.alleles.contains_key(&id) {
            return Err(GraphError::DuplicateId {
                kind: RecordKind::Allele,
                id: id.to_string(),
            }
            .into());
        }
        let allele = self.build(id.clone(), segments)?;
        debug!(id = %id, segments = allele.segments().len(), "registered allele");
        records.alleles.insert(id, allele.clone());
        Ok(allele)
    }

    pub fn insert_call_set(&self, call_set: CallSet) -> Result<(), RegistryError> {
        let mut records = self.records.write();
        match records.call_sets.entry(call_set.id.clone()) {
            btree_map::Entry::Occupied(e) => Err(GraphError::DuplicateId {
                kind: RecordKind::CallSet,
                id: e.key().to_string(),
            }
            .into()),
            btree_map::Entry::Vacant(e) => {
                debug!(id = %call_set.id, sample = %call_set.sample_id, "registered call set");
                e.insert(call_set);
                Ok(())
            }
        }
    }

    /// Record a call. Its call set and allele must be registered.
    pub fn insert_call(&self, call: Call) -> Result<(), RegistryError> {
        let mut records = self.records.write();
        if !records.call_sets.contains_key(&call.call_set_id) {
            return Err(GraphError::NotFound {
                kind: RecordKind::CallSet,
                id: call.call_set_id.to_string(),
            }
            .into());
        }
        if !records.alleles.contains_key(&call.allele_id) {
            return Err(GraphError::NotFound {
                kind: RecordKind::Allele,
                id: call.allele_id.to_string(),
            }
            .into());
        }
        if !call.has_statistics() {
            warn!(
                call_set = %call.call_set_id,
                allele = %call.allele_id,
                "call carries no copy number, dosage or read count"
            );
        }
        records.calls.push(call);
        Ok(())
    }

    pub fn allele(&self, id: &AlleleId) -> Result<Allele, RegistryError> {
        self.records
            .read()
            .alleles
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Allele, id.as_str()))
    }

    pub fn call_set(&self, id: &CallSetId) -> Result<CallSet, RegistryError> {
        self.records
            .read()
            .call_sets
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::CallSet, id.as_str()))
    }

    /// Calls recorded for a call set, in insertion order.
    pub fn calls_for(&self, call_set_id: &CallSetId) -> Vec<Call> {
        self.records
            .read()
            .calls
            .iter()
            .filter(|c| &c.call_set_id == call_set_id)
            .cloned()
            .collect()
    }

    pub fn validate(&self) -> Validation {
        validate::validate(&self.snapshot())
    }

    pub fn validate_with(&self, cancel: &AtomicBool) -> Validation {
        validate::validate_with(&self.snapshot(), cancel)
    }

    pub fn resolve(
        &self,
        variant_id: &VariantId,
        position: usize,
        side: Side,
    ) -> Result<CanonicalId, RegistryError> {
        let snapshot = self.snapshot();
        Ok(Resolver::new(&snapshot).resolve(variant_id, position, side)?)
    }

    /// Build an allele against the current snapshot without registering
    /// it.
    pub fn build<I: Into<AlleleId>>(
        &self,
        id: I,
        segments: Vec<Segment>,
    ) -> Result<Allele, RegistryError> {
        let snapshot = self.snapshot();
        let resolver = Resolver::new(&snapshot);
        Ok(AlleleBuilder::new(&resolver).build(id, segments)?)
    }

    /// Whether two alleles are the same. Registered alleles with equal
    /// ids are the same; any other pair is compared by path.
    pub fn same_allele(&self, a: &Allele, b: &Allele) -> Result<bool, RegistryError> {
        let snapshot = self.snapshot();
        let resolver = Resolver::new(&snapshot);
        let records = self.records.read();
        Ok(merge::same_allele(a, b, &resolver, &*records)?)
    }

    /// Assemble a scaffold from registered alleles.
    pub fn assemble<I: Into<ScaffoldId>>(
        &self,
        id: I,
        alleles: Vec<AlleleId>,
        is_forwards: Vec<bool>,
        gap_sizes: Vec<i64>,
    ) -> Result<VariantScaffold, RegistryError> {
        {
            let records = self.records.read();
            if let Some(missing) = alleles.iter().find(|a| !records.alleles.contains_key(*a)) {
                return Err(not_found(RecordKind::Allele, missing.as_str()));
            }
        }
        Ok(VariantScaffold::assemble(id, alleles, is_forwards, gap_sizes)?)
    }

    /// Registered allele ids.
    pub fn allele_ids(&self) -> BTreeSet<AlleleId> {
        self.records.read().alleles.keys().cloned().collect()
    }
}

// Only the registered record itself carries its id; a local allele
// reusing the id is compared by path.
impl NameSpace for Records {
    fn issued(&self, allele: &Allele) -> bool {
        self.alleles.get(allele.id()) == Some(allele)
    }
}

fn not_found(kind: RecordKind, id: &str) -> RegistryError {
    GraphError::NotFound {
        kind,
        id: id.to_owned(),
    }
    .into()
}
