//! Text analysis
//!
//! Analyzers wrap a tokenizer pipeline under a well-known name. The analyzer
//! context resolves, per field, the pipeline used at index time and at query
//! time, memoizing resolved names for the life of the process.

pub mod analyzer;
pub mod context;
pub mod tokenizer;

pub use analyzer::{Analyzer, AnalyzerFactory, AnalyzerFactoryMap, Token};
pub use context::{AnalyzerCache, AnalyzerContext};
pub use tokenizer::Tokenizer;
