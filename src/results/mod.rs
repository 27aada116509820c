//! Result assembly
//!
//! Converts raw ranked hits, stored/doc-value fields and facet counts into
//! typed result records, merging highlights and cumulative timings.

pub mod assembler;
pub mod facets;
pub mod timing;

pub use assembler::ResultAssembler;
pub use timing::{TimeTracker, TimingEntry};
