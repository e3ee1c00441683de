//! Variant records: pieces of sequence joined into the graph.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::graph::address::{Address, JoinLocation};
use crate::ids::VariantId;
use crate::sequence::Sequence;
use crate::side::Side;

/// Broad shape of a variant, derived from its joins and sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Primary sequence; both joins point at its own first base.
    Root,
    /// Sequence spliced between two join locations.
    Insertion,
    /// Empty sequence gluing its two join locations together.
    Deletion,
}

/// A piece of sequence joined into the graph at two locations.
///
/// Variants are immutable once built: the graph grows only by adding
/// variants, so base addresses stay valid forever.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variant {
    id: VariantId,
    start_join: JoinLocation,
    end_join: JoinLocation,
    sequence: Sequence,
    #[cfg_attr(feature = "serde", serde(default))]
    info: Attributes,
}

impl Variant {
    /// A variant whose first base follows `start_join` and whose last
    /// base precedes `end_join`.
    pub fn new<I: Into<VariantId>>(
        id: I,
        start_join: JoinLocation,
        end_join: JoinLocation,
        sequence: Sequence,
    ) -> Self {
        Variant {
            id: id.into(),
            start_join,
            end_join,
            sequence,
            info: Attributes::new(),
        }
    }

    /// A primary sequence, joined to its own position 0 on both ends.
    pub fn root<I: Into<VariantId>>(id: I, sequence: Sequence) -> Self {
        let id = id.into();
        let anchor = Address::new(id.clone(), 0, Side::Plus);
        Variant {
            id,
            start_join: anchor.clone(),
            end_join: anchor,
            sequence,
            info: Attributes::new(),
        }
    }

    pub fn with_info(mut self, info: Attributes) -> Self {
        self.info = info;
        self
    }

    pub fn id(&self) -> &VariantId {
        &self.id
    }

    pub fn start_join(&self) -> &JoinLocation {
        &self.start_join
    }

    pub fn end_join(&self) -> &JoinLocation {
        &self.end_join
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn info(&self) -> &Attributes {
        &self.info
    }

    /// Number of bases.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Both joins resolve to `(id, 0, +)`.
    pub fn is_root(&self) -> bool {
        let anchor = self.self_anchor();
        self.start_join == anchor && self.end_join == anchor
    }

    pub fn kind(&self) -> Kind {
        if self.is_root() {
            Kind::Root
        } else if self.is_empty() {
            Kind::Deletion
        } else {
            Kind::Insertion
        }
    }

    /// Joins leaving this variant, i.e. those of a non-root variant.
    pub fn joins(&self) -> impl Iterator<Item = &JoinLocation> {
        let joins = if self.is_root() {
            None
        } else {
            Some(vec![&self.start_join, &self.end_join])
        };
        joins.into_iter().flatten()
    }

    fn self_anchor(&self) -> Address {
        Address::new(self.id.clone(), 0, Side::Plus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let root = Variant::root("chr1", b"ACGT".to_vec());
        assert!(root.is_root());
        assert_eq!(root.kind(), Kind::Root);
        assert_eq!(root.joins().count(), 0);

        let ins = Variant::new(
            "ins",
            Address::new("chr1", 1, Side::Plus),
            Address::new("chr1", 2, Side::Minus),
            b"TT".to_vec(),
        );
        assert!(!ins.is_root());
        assert_eq!(ins.kind(), Kind::Insertion);
        assert_eq!(ins.len(), 2);
        assert_eq!(ins.joins().count(), 2);

        let del = Variant::new(
            "del",
            Address::new("chr1", 0, Side::Plus),
            Address::new("chr1", 3, Side::Minus),
            Vec::new(),
        );
        assert_eq!(del.kind(), Kind::Deletion);
    }

    #[test]
    fn self_joined_but_offset_is_not_root() {
        let v = Variant::new(
            "loop",
            Address::new("loop", 1, Side::Plus),
            Address::new("loop", 0, Side::Plus),
            b"AC".to_vec(),
        );
        assert!(!v.is_root());
    }
}
