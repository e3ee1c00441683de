// Copyright 2021 Johannes Köster.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Call sets and calls: evidence that alleles are present in a sample.
//!
//! These records are carried alongside the graph untouched. The only
//! rules applied to them are that the ids they hold resolve; the
//! statistical fields are never interpreted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::attributes::Attributes;
use crate::ids::{AlleleId, CallSetId};

/// Whether a call set describes a genotype or a single haplotype.
///
/// ```rust
/// use bio_vargraph::call::CallSetType;
///
/// assert_eq!(CallSetType::Haplotype.to_string(), "HAPLOTYPE");
/// assert_eq!(CallSetType::Genotype.as_ref(), "GENOTYPE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CallSetType {
    Genotype,
    Haplotype,
}

/// Container of calls for one sample.
#[derive(new, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallSet {
    pub id: CallSetId,
    pub sample_id: String,
    pub callset_type: CallSetType,
    #[new(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub info: Attributes,
}

/// Evidence that an allele is present in a call set.
///
/// `copy_number`, `dosage` and `read_count` are each present or absent
/// on their own; an absent value is not zero.
#[derive(new, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    pub call_set_id: CallSetId,
    pub allele_id: AlleleId,
    #[new(default)]
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub copy_number: Option<u32>,
    #[new(default)]
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub dosage: Option<f64>,
    #[new(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub probability: Vec<f64>,
    #[new(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub likelihood: Vec<f64>,
    #[new(default)]
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub read_count: Option<u64>,
    #[new(default)]
    #[cfg_attr(feature = "serde", serde(default))]
    pub evidence: Attributes,
}

impl Call {
    pub fn with_copy_number(mut self, copy_number: u32) -> Self {
        self.copy_number = Some(copy_number);
        self
    }

    pub fn with_dosage(mut self, dosage: f64) -> Self {
        self.dosage = Some(dosage);
        self
    }

    pub fn with_read_count(mut self, read_count: u64) -> Self {
        self.read_count = Some(read_count);
        self
    }

    /// Whether any of the optional statistics is given. Calls without
    /// any are accepted but carry no quantitative evidence.
    pub fn has_statistics(&self) -> bool {
        self.copy_number.is_some() || self.dosage.is_some() || self.read_count.is_some()
    }
}
