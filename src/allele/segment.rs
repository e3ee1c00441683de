// Copyright 2017 Nicholas Ingolia
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Contiguous stretch of one variant, e.g. bases 3 through 7 of
//! `ins1` read on the minus side.

use std::fmt::{self, Display, Formatter};
use std::ops::Range;
use std::str::FromStr;

use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::allele::AlleleError;
use crate::graph::address::{Address, CanonicalId, JoinLocation};
use crate::graph::context::{ContextRule, Resolver};
use crate::graph::store::VariantStore;
use crate::graph::variant::Variant;
use crate::graph::{GraphError, ParseAddressError};
use crate::ids::VariantId;
use crate::side::Side;

/// Contiguous stretch of a single variant, read on one side.
///
/// Coordinates are given in the order of travel. A plus segment has
/// `start < end` and covers `start..end`. A minus segment has
/// `start > end` and covers `end..start` (exclusive of `start`), read
/// from `start - 1` down to `end`. `start == end == 0` denotes the whole
/// variant on either side.
///
/// The display format for a `Segment` is _variant:start-end(+/-)_.
///
/// ```
/// # use bio_vargraph::allele::AlleleError;
/// # fn try_main() -> Result<(), AlleleError> {
/// use bio_vargraph::allele::segment::Segment;
/// use bio_vargraph::side::Side;
/// let seg = Segment::new("ins1", 8, 3, Side::Minus)?;
/// assert_eq!(seg.to_string(), "ins1:8-3(-)");
/// assert_eq!(seg.length(), Some(5));
/// assert_eq!(seg, "ins1:8-3(-)".parse().unwrap());
/// # Ok(())
/// # }
/// # fn main() { try_main().unwrap(); }
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    variant_id: VariantId,
    start: usize,
    end: usize,
    side: Side,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    length: Option<usize>,
}

impl Segment {
    /// Construct a segment from its coordinates. The length is derived
    /// from them.
    pub fn new<I: Into<VariantId>>(
        variant_id: I,
        start: usize,
        end: usize,
        side: Side,
    ) -> Result<Self, AlleleError> {
        let mut seg = Segment {
            variant_id: variant_id.into(),
            start,
            end,
            side,
            length: None,
        };
        seg.validate()?;
        if !seg.is_whole() {
            seg.length = Some(seg.span());
        }
        Ok(seg)
    }

    /// Construct a segment that also states its length. A length that
    /// disagrees with the coordinates is an error, not a correction.
    ///
    /// ```
    /// use bio_vargraph::allele::AlleleError;
    /// use bio_vargraph::allele::segment::Segment;
    /// use bio_vargraph::side::Side;
    /// assert!(Segment::with_length("v", 0, 4, Side::Plus, 4).is_ok());
    /// assert!(matches!(
    ///     Segment::with_length("v", 0, 4, Side::Plus, 5),
    ///     Err(AlleleError::LengthMismatch { length: 5, expected: 4, .. })
    /// ));
    /// ```
    pub fn with_length<I: Into<VariantId>>(
        variant_id: I,
        start: usize,
        end: usize,
        side: Side,
        length: usize,
    ) -> Result<Self, AlleleError> {
        let seg = Segment {
            variant_id: variant_id.into(),
            start,
            end,
            side,
            length: Some(length),
        };
        seg.validate()?;
        Ok(seg)
    }

    /// The whole of a variant.
    pub fn whole<I: Into<VariantId>>(variant_id: I, side: Side) -> Self {
        Segment {
            variant_id: variant_id.into(),
            start: 0,
            end: 0,
            side,
            length: None,
        }
    }

    pub fn variant_id(&self) -> &VariantId {
        &self.variant_id
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Stated length, if any. Ranged segments built through the
    /// constructors always carry one.
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    pub fn is_whole(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// Check the segment's own shape: non-empty, coordinates in the
    /// direction of its side, and a stated length matching them.
    pub fn validate(&self) -> Result<(), AlleleError> {
        if self.is_whole() {
            return Ok(());
        }
        if self.start == self.end {
            return Err(AlleleError::Degenerate {
                segment: self.to_string(),
            });
        }
        let forwards = self.start < self.end;
        if forwards != self.side.is_plus() {
            return Err(AlleleError::Orientation {
                segment: self.to_string(),
            });
        }
        match self.length {
            Some(length) if length != self.span() => Err(AlleleError::LengthMismatch {
                segment: self.to_string(),
                length,
                expected: self.span(),
            }),
            _ => Ok(()),
        }
    }

    /// Check the segment against the variant it names, returning that
    /// variant.
    pub fn check<'a>(&self, store: &'a VariantStore) -> Result<&'a Variant, AlleleError> {
        self.validate()?;
        let variant = store.get(&self.variant_id)?;
        if self.is_whole() {
            match self.length {
                Some(length) if length != variant.len() => Err(AlleleError::LengthMismatch {
                    segment: self.to_string(),
                    length,
                    expected: variant.len(),
                }),
                _ => Ok(variant),
            }
        } else if self.start.max(self.end) > variant.len() {
            Err(GraphError::OutOfBounds {
                variant: self.variant_id.clone(),
                position: self.start.max(self.end),
                length: variant.len(),
            }
            .into())
        } else {
            Ok(variant)
        }
    }

    /// Positions covered, lowest first.
    pub fn range(&self, variant: &Variant) -> Range<usize> {
        if self.is_whole() {
            0..variant.len()
        } else {
            self.start.min(self.end)..self.start.max(self.end)
        }
    }

    /// Number of bases covered.
    pub fn len(&self, variant: &Variant) -> usize {
        self.range(variant).len()
    }

    /// First base in the order of travel; `None` for an empty variant.
    pub fn first_pos(&self, variant: &Variant) -> Option<usize> {
        let range = self.range(variant);
        if range.is_empty() {
            None
        } else if self.side.is_plus() {
            Some(range.start)
        } else {
            Some(range.end - 1)
        }
    }

    /// Last base in the order of travel; `None` for an empty variant.
    pub fn last_pos(&self, variant: &Variant) -> Option<usize> {
        let range = self.range(variant);
        if range.is_empty() {
            None
        } else if self.side.is_plus() {
            Some(range.end - 1)
        } else {
            Some(range.start)
        }
    }

    /// Side through which the first base is entered.
    pub fn entry(&self, variant: &Variant) -> Option<Address> {
        self.first_pos(variant)
            .map(|pos| Address::new(self.variant_id.clone(), pos, self.side.reverse()))
    }

    /// Side through which the last base is left.
    pub fn exit(&self, variant: &Variant) -> Option<Address> {
        self.last_pos(variant)
            .map(|pos| Address::new(self.variant_id.clone(), pos, self.side))
    }

    /// Start and end in the order of travel, with a whole segment
    /// spelled out over the full variant.
    pub fn travel_bounds(&self, variant: &Variant) -> (usize, usize) {
        match (self.is_whole(), self.side) {
            (true, Side::Plus) => (0, variant.len()),
            (true, Side::Minus) => (variant.len(), 0),
            (false, _) => (self.start, self.end),
        }
    }

    /// Join crossed on the way into a segment of an empty variant:
    /// `start_join` on the plus side, `end_join` on the minus side.
    pub fn join_in<'v>(&self, variant: &'v Variant) -> &'v JoinLocation {
        if self.side.is_plus() {
            variant.start_join()
        } else {
            variant.end_join()
        }
    }

    /// Join crossed on the way out of a segment of an empty variant.
    pub fn join_out<'v>(&self, variant: &'v Variant) -> &'v JoinLocation {
        if self.side.is_plus() {
            variant.end_join()
        } else {
            variant.start_join()
        }
    }

    /// Canonical context the segment is entered from.
    ///
    /// For a segment of an empty variant this is the join it is read
    /// from.
    pub fn start_context<R: ContextRule>(
        &self,
        resolver: &Resolver<'_, R>,
    ) -> Result<CanonicalId, AlleleError> {
        let variant = self.check(resolver.store())?;
        let address = self
            .entry(variant)
            .unwrap_or_else(|| self.join_in(variant).clone());
        Ok(resolver.resolve_address(&address)?)
    }

    /// Canonical context the segment is left through.
    pub fn end_context<R: ContextRule>(
        &self,
        resolver: &Resolver<'_, R>,
    ) -> Result<CanonicalId, AlleleError> {
        let variant = self.check(resolver.store())?;
        let address = self
            .exit(variant)
            .unwrap_or_else(|| self.join_out(variant).clone());
        Ok(resolver.resolve_address(&address)?)
    }

    fn span(&self) -> usize {
        if self.start > self.end {
            self.start - self.end
        } else {
            self.end - self.start
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}{}",
            self.variant_id, self.start, self.end, self.side
        )
    }
}

impl FromStr for Segment {
    type Err = ParseAddressError;

    /// Parses the display form. The length is derived, so the shape is
    /// validated later, by `validate` or when building an allele.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref SEGMENT_RE: Regex =
                Regex::new(r"^(.*):(\d+)-(\d+)(\([+-]\))?$").unwrap();
        }

        if !s.contains(':') {
            return Err(ParseAddressError::NoColon);
        }
        let cap = SEGMENT_RE
            .captures(s)
            .ok_or_else(|| ParseAddressError::BadAddress(s.to_owned()))?;
        if cap[1].is_empty() {
            return Err(ParseAddressError::NoVariant);
        }
        let side = cap
            .get(4)
            .ok_or(ParseAddressError::NoSide)?
            .as_str()
            .parse::<Side>()?;
        let mut seg = Segment {
            variant_id: cap[1].into(),
            start: cap[2].parse()?,
            end: cap[3].parse()?,
            side,
            length: None,
        };
        if !seg.is_whole() {
            seg.length = Some(seg.span());
        }
        Ok(seg)
    }
}
