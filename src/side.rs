// Copyright 2014-2016 Johannes Köster.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Orientation of a base within a variant.
//!
//! Every base of the graph has two sides. The `Plus` side faces
//! increasing positions (the 3' end on the forward strand) and the
//! `Minus` side faces decreasing positions. A traversal that reads a
//! variant in increasing order enters each base through its `Minus`
//! side and leaves through its `Plus` side; a reverse-complement
//! traversal does the opposite.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side of a base, which is also the direction of travel along a
/// variant.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Side {
    Plus,
    Minus,
}

/// Name used by the graph model for the same concept.
pub type VariantSide = Side;

impl Side {
    /// Returns a `Side` for the given char.
    ///
    /// The mapping is as follows:
    ///     * '+', 'f', or 'F' becomes `Side::Plus`
    ///     * '-', 'r', or 'R' becomes `Side::Minus`
    ///     * Any other inputs will return an `Err(SideError::InvalidChar)`
    pub fn from_char(side_char: &char) -> Result<Side, SideError> {
        match *side_char {
            '+' | 'f' | 'F' => Ok(Side::Plus),
            '-' | 'r' | 'R' => Ok(Side::Minus),
            invalid => Err(SideError::InvalidChar(invalid)),
        }
    }

    /// The opposite side.
    pub fn reverse(&self) -> Self {
        match *self {
            Side::Plus => Side::Minus,
            Side::Minus => Side::Plus,
        }
    }

    pub fn is_plus(&self) -> bool {
        *self == Side::Plus
    }

    /// Symbol denoting the side, `+` or `-`.
    pub fn symbol(&self) -> &'static str {
        match *self {
            Side::Plus => "+",
            Side::Minus => "-",
        }
    }
}

impl Default for Side {
    fn default() -> Self {
        Side::Plus
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({})", self.symbol())
    }
}

impl FromStr for Side {
    type Err = SideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start_matches('(').trim_end_matches(')');
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Side::from_char(&c),
            _ => Err(SideError::InvalidStr(s.to_owned())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SideError {
    #[error("character {0:?} can not be converted to a Side")]
    InvalidChar(char),
    #[error("string {0:?} can not be converted to a Side")]
    InvalidStr(String),
}
