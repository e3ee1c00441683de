// Copyright 2017 Nicholas Ingolia
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Graph-relative addresses of bases, e.g. the plus side of base 17 of
//! variant `ins3`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::ParseAddressError;
use crate::ids::VariantId;
use crate::side::Side;

/// One side of one base of a variant.
///
/// The display format for an `Address` is _variant:pos(+/-)_, with a
/// 0-based position.
///
/// ```
/// # use bio_vargraph::graph::ParseAddressError;
/// # fn try_main() -> Result<(), ParseAddressError> {
/// use bio_vargraph::graph::address::Address;
/// use bio_vargraph::side::Side;
/// let join = Address::new("chrIV", 683946, Side::Minus);
/// let join_str = join.to_string();
/// assert_eq!(join_str, "chrIV:683946(-)");
/// assert_eq!(join, join_str.parse()?);
/// # Ok(())
/// # }
/// # fn main() { try_main().unwrap(); }
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Address {
    pub variant_id: VariantId,
    pub position: usize,
    pub side: Side,
}

/// The endpoint of a join, i.e. the address a variant end is spliced
/// onto.
pub type JoinLocation = Address;

impl Address {
    pub fn new<I: Into<VariantId>>(variant_id: I, position: usize, side: Side) -> Self {
        Address {
            variant_id: variant_id.into(),
            position,
            side,
        }
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}{}", self.variant_id, self.position, self.side)
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref ADDRESS_RE: Regex = Regex::new(r"^(.*):(\d+)(\([+-]\))?$").unwrap();
        }

        if !s.contains(':') {
            return Err(ParseAddressError::NoColon);
        }
        let cap = ADDRESS_RE
            .captures(s)
            .ok_or_else(|| ParseAddressError::BadAddress(s.to_owned()))?;
        if cap[1].is_empty() {
            return Err(ParseAddressError::NoVariant);
        }
        let side = cap
            .get(3)
            .ok_or(ParseAddressError::NoSide)?
            .as_str()
            .parse::<Side>()?;

        Ok(Address::new(
            cap[1].to_owned(),
            cap[2].parse::<usize>()?,
            side,
        ))
    }
}

/// Canonical, path-independent identity of a context, as produced by
/// the resolver.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CanonicalId(Address);

impl CanonicalId {
    pub(crate) fn new(address: Address) -> Self {
        CanonicalId(address)
    }

    pub fn address(&self) -> &Address {
        &self.0
    }

    pub fn into_address(self) -> Address {
        self.0
    }
}

impl Display for CanonicalId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_representation() {
        let a = Address::new("ins:1", 12, Side::Plus);
        assert_eq!(a.to_string(), "ins:1:12(+)");
        assert_eq!("ins:1:12(+)".parse::<Address>().unwrap(), a);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("chr1".parse::<Address>(), Err(ParseAddressError::NoColon));
        assert_eq!("chr1:5".parse::<Address>(), Err(ParseAddressError::NoSide));
        assert_eq!(":5(+)".parse::<Address>(), Err(ParseAddressError::NoVariant));
        assert!(matches!(
            "chr1:x(+)".parse::<Address>(),
            Err(ParseAddressError::BadAddress(_))
        ));
    }

    #[test]
    fn ordering_follows_fields() {
        let mut v = vec![
            Address::new("b", 0, Side::Plus),
            Address::new("a", 3, Side::Minus),
            Address::new("a", 3, Side::Plus),
        ];
        v.sort();
        assert_eq!(v[0], Address::new("a", 3, Side::Plus));
        assert_eq!(v[2], Address::new("b", 0, Side::Plus));
    }
}
