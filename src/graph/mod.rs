//! The variation graph: variants joined onto a primary reference, the
//! store that owns them, and the operations that check and navigate it.
//!
//! A graph starts with one or more root variants (primary sequences,
//! whose joins point at themselves) and only ever grows. Each further
//! variant is spliced in by two join locations: the side of existing
//! content its first base attaches to and the side its last base
//! attaches to. Because nothing is ever removed or rewritten, an
//! address `(variant, position, side)` names the same base for the
//! whole lifetime of the graph.
//!
//! ```
//! # use bio_vargraph::graph::GraphError;
//! # fn try_main() -> Result<(), GraphError> {
//! use bio_vargraph::graph::address::Address;
//! use bio_vargraph::graph::context::Resolver;
//! use bio_vargraph::graph::store::VariantStore;
//! use bio_vargraph::graph::variant::Variant;
//! use bio_vargraph::side::Side;
//!
//! let mut store = VariantStore::new();
//! store.insert(Variant::root("chr1", b"ACGTACGTAC".to_vec()))?;
//! // GG inserted between chr1:4 and chr1:5
//! store.insert(Variant::new(
//!     "ins1",
//!     Address::new("chr1", 4, Side::Plus),
//!     Address::new("chr1", 5, Side::Minus),
//!     b"GG".to_vec(),
//! ))?;
//!
//! let resolver = Resolver::new(&store);
//! let ctx = resolver.resolve(&"ins1".into(), 0, Side::Minus)?;
//! assert_eq!(ctx.to_string(), "chr1:4(+)");
//! # Ok(())
//! # }
//! # fn main() { try_main().unwrap(); }
//! ```

use std::num::ParseIntError;

use strum_macros::{AsRefStr, Display};
use thiserror::Error;

use crate::ids::VariantId;
use crate::side::SideError;

pub mod address;
pub mod context;
pub mod store;
pub mod validate;
pub mod variant;

/// Kind of record an id refers to, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display)]
pub enum RecordKind {
    Variant,
    Allele,
    CallSet,
}

/// Errors raised by single-object graph operations. These fail fast;
/// whole-graph diagnostics are collected by the validator instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{kind} {id:?} already exists")]
    DuplicateId { kind: RecordKind, id: String },
    #[error("{kind} {id:?} not found")]
    NotFound { kind: RecordKind, id: String },
    #[error("position {position} is outside variant {variant} of length {length}")]
    OutOfBounds {
        variant: VariantId,
        position: usize,
        length: usize,
    },
    #[error("context of {address} can not be resolved: join chain revisits {revisited}")]
    AmbiguousContext { address: String, revisited: String },
}

impl GraphError {
    pub(crate) fn variant_not_found(id: &VariantId) -> Self {
        GraphError::NotFound {
            kind: RecordKind::Variant,
            id: id.to_string(),
        }
    }
}

/// Errors that arise in parsing address display strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("missing ':'")]
    NoColon,
    #[error("missing variant id")]
    NoVariant,
    #[error("missing side")]
    NoSide,
    #[error("bad address {0:?}")]
    BadAddress(String),
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] ParseIntError),
    #[error("side parsing error: {0}")]
    ParseSide(#[from] SideError),
}
