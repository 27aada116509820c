pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod fields;
pub mod models;
pub mod query;
pub mod results;
pub mod schema;
pub mod testing;

pub use config::{AnalyzerPolicy, IndexingPolicy, TokenizerConfig};
pub use error::{FathomError, Result};
pub use models::{ResultRecord, SearchRequest, SearchResults};
pub use schema::{FieldDeclaration, FieldDefinition, FieldRegistry, ValueKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
