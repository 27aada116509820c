//! Query AST
//!
//! The `Query` enum is the closed set of query variants. Every node is
//! immutable, JSON-serializable and structurally comparable/hashable, so a
//! whole tree can key a query-result cache.

use crate::engine::EngineQuery;
use crate::error::FathomError;
use crate::query::context::ResolveContext;
use crate::query::nodes::{
    AllDocsQuery, BoolQuery, GeoBoundingBoxQuery, JoinQuery, NumericExactQuery,
    NumericRangeQuery, PhraseQuery, TermQuery,
};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Behavior shared by every query variant
pub trait QueryNode {
    /// Resolve logical field references against the context and lower into
    /// an engine-native query
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery>;

    /// The variant's tag name, for logging and debugging
    fn query_type(&self) -> &'static str;
}

/// One node of the query tree
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    MatchAll(AllDocsQuery),
    Term(TermQuery),
    NumericExact(NumericExactQuery),
    NumericRange(NumericRangeQuery),
    Phrase(PhraseQuery),
    GeoBoundingBox(GeoBoundingBoxQuery),
    Bool(BoolQuery),
    Join(JoinQuery),
}

impl QueryNode for Query {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        match self {
            Query::MatchAll(q) => q.resolve(ctx),
            Query::Term(q) => q.resolve(ctx),
            Query::NumericExact(q) => q.resolve(ctx),
            Query::NumericRange(q) => q.resolve(ctx),
            Query::Phrase(q) => q.resolve(ctx),
            Query::GeoBoundingBox(q) => q.resolve(ctx),
            Query::Bool(q) => q.resolve(ctx),
            Query::Join(q) => q.resolve(ctx),
        }
    }

    fn query_type(&self) -> &'static str {
        match self {
            Query::MatchAll(q) => q.query_type(),
            Query::Term(q) => q.query_type(),
            Query::NumericExact(q) => q.query_type(),
            Query::NumericRange(q) => q.query_type(),
            Query::Phrase(q) => q.query_type(),
            Query::GeoBoundingBox(q) => q.query_type(),
            Query::Bool(q) => q.query_type(),
            Query::Join(q) => q.query_type(),
        }
    }
}

impl Query {
    /// Resolve an optional top-level query; absent means match-all
    pub fn resolve_optional(query: Option<&Query>, ctx: &ResolveContext) -> Result<EngineQuery> {
        match query {
            Some(query) => query.resolve(ctx),
            None => Ok(EngineQuery::MatchAll),
        }
    }

    /// Parse a query tree from its JSON descriptor
    pub fn from_json(value: &serde_json::Value) -> Result<Query> {
        serde_json::from_value(value.clone())
            .map_err(|e| FathomError::QueryResolution(format!("Invalid query descriptor: {e}")))
    }
}
