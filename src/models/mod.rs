//! Request and result descriptors

pub mod request;
pub mod response;

pub use request::{FacetRequest, SearchRequest, SortDirection, SortKey};
pub use response::{FacetCount, FacetDimensionResult, ResultRecord, SearchResults};
