//! Test support
//!
//! A reference in-memory implementation of the index-engine boundary, used by
//! unit and integration tests. Not intended for production use.

pub mod memory_index;

pub use memory_index::{MemoryIndex, SimpleHighlighter, StaticLookup};
