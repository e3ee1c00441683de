//! Types for sequence variation reference graphs.
//!
//! Variants are stretches of sequence joined onto the sides of bases of
//! other variants. Root variants (e.g. chromosomes) anchor the graph.
//! Alleles are paths through the graph written as segments of variants,
//! and calls attach evidence for alleles to samples.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate derive_new;

extern crate regex;

pub mod allele;
pub mod attributes;
pub mod call;
pub mod graph;
pub mod ids;
pub mod registry;
pub mod scaffold;
pub mod sequence;
pub mod side;
