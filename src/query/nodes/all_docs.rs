//! Match-all query - matches every document

use crate::engine::EngineQuery;
use crate::query::ast::QueryNode;
use crate::query::context::ResolveContext;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Query that matches all documents
///
/// An absent top-level query resolves to this variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllDocsQuery {}

impl AllDocsQuery {
    /// Create a match-all query
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryNode for AllDocsQuery {
    fn resolve(&self, _ctx: &ResolveContext) -> Result<EngineQuery> {
        Ok(EngineQuery::MatchAll)
    }

    fn query_type(&self) -> &'static str {
        "match_all"
    }
}
