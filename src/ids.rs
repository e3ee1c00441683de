//! Identifiers for records of the graph.
//!
//! Records never point at each other directly; they hold one of these
//! ids and resolve it against the store that owns the referenced
//! record. A dangling id therefore surfaces as a `NotFound` error at the
//! lookup site instead of going unnoticed.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(id: S) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

record_id!(
    /// Key of a `Variant` in the variant store.
    VariantId
);
record_id!(
    /// Key of an `Allele`. Ids registered with a `Registry` share one
    /// global naming space.
    AlleleId
);
record_id!(
    /// Key of a `CallSet`.
    CallSetId
);
record_id!(
    /// Key of a `VariantScaffold`.
    ScaffoldId
);
