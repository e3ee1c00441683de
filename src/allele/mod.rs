//! Alleles: paths through the graph made of segments of variants.
//!
//! An allele is written as an ordered list of segments, each a
//! contiguous stretch of one variant read on one side. Consecutive
//! segments must *abut* (the second continues exactly where the graph
//! leaves the first) and the list must be *maximal* (no two neighbours
//! could have been written as one segment). Both rules are checked when
//! the allele is built; nothing is repaired silently.
//!
//! ```
//! # use bio_vargraph::allele::AlleleError;
//! # fn try_main() -> Result<(), AlleleError> {
//! use bio_vargraph::allele::build::AlleleBuilder;
//! use bio_vargraph::allele::segment::Segment;
//! use bio_vargraph::graph::context::Resolver;
//! use bio_vargraph::graph::store::VariantStore;
//! use bio_vargraph::graph::variant::Variant;
//! use bio_vargraph::side::Side;
//!
//! let mut store = VariantStore::new();
//! store.insert(Variant::root("chr1", b"ACGTACGTAC".to_vec()))?;
//! store.insert(Variant::new(
//!     "ins1",
//!     "chr1:4(+)".parse().unwrap(),
//!     "chr1:5(-)".parse().unwrap(),
//!     b"GG".to_vec(),
//! ))?;
//! let resolver = Resolver::new(&store);
//! let builder = AlleleBuilder::new(&resolver);
//! let allele = builder.build(
//!     "with-ins1",
//!     vec![
//!         Segment::new("chr1", 0, 5, Side::Plus)?,
//!         Segment::whole("ins1", Side::Plus),
//!         Segment::new("chr1", 5, 10, Side::Plus)?,
//!     ],
//! )?;
//! assert_eq!(allele.sequence(&store)?, b"ACGTAGGCGTAC".to_vec());
//! # Ok(())
//! # }
//! # fn main() { try_main().unwrap(); }
//! ```

use thiserror::Error;

use crate::graph::GraphError;

pub mod build;
pub mod merge;
pub mod segment;

/// Errors that arise in building segments and alleles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlleleError {
    #[error("allele has no segments")]
    Empty,
    #[error("segment {segment} is empty: start equals end")]
    Degenerate { segment: String },
    #[error("segment {segment} runs against its side")]
    Orientation { segment: String },
    #[error("segment {segment} has length {length} but spans {expected} bases")]
    LengthMismatch {
        segment: String,
        length: usize,
        expected: usize,
    },
    #[error("segments {index} and {next} could be written as one segment", next = .index + 1)]
    NotMaximal { index: usize },
    #[error(
        "segments {index} and {next} do not abut: {end_context} is followed by {start_context}",
        next = .index + 1
    )]
    NonAbutting {
        index: usize,
        end_context: String,
        start_context: String,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}
