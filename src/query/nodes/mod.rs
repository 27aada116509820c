//! Query node variants
//!
//! One module per variant of the closed query set.

mod all_docs;
mod bool_query;
mod geo_query;
mod join_query;
mod numeric_exact;
mod numeric_range;
mod phrase_query;
mod term_query;

pub use all_docs::AllDocsQuery;
pub use bool_query::BoolQuery;
pub use geo_query::GeoBoundingBoxQuery;
pub use join_query::JoinQuery;
pub use numeric_exact::NumericExactQuery;
pub use numeric_range::NumericRangeQuery;
pub use phrase_query::PhraseQuery;
pub use term_query::TermQuery;
