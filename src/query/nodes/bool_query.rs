//! Boolean query - combines child nodes with AND, OR, NOT semantics
//!
//! The four clause kinds follow the usual search-engine semantics:
//! `must` and `filter` are conjunctive (filter without scoring), `should` is
//! disjunctive under `minimum_should_match`, `must_not` excludes.

use crate::engine::EngineQuery;
use crate::query::ast::{Query, QueryNode};
use crate::query::context::ResolveContext;
use crate::query::types::MinimumShouldMatch;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Boolean composition of child query nodes
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoolQuery {
    /// Clauses that must all match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Query>,
    /// Clauses of which at least `minimum_should_match` must match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Query>,
    /// Clauses that must not match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Query>,
    /// Non-scoring conjunctive clauses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Query>,
    /// Minimum number of should clauses that must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<MinimumShouldMatch>,
}

impl BoolQuery {
    /// Create an empty boolean query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a must clause
    pub fn must(mut self, query: Query) -> Self {
        self.must.push(query);
        self
    }

    /// Add a should clause
    pub fn should(mut self, query: Query) -> Self {
        self.should.push(query);
        self
    }

    /// Add a must_not clause
    pub fn must_not(mut self, query: Query) -> Self {
        self.must_not.push(query);
        self
    }

    /// Add a filter clause
    pub fn filter(mut self, query: Query) -> Self {
        self.filter.push(query);
        self
    }

    /// Set minimum should match
    pub fn with_minimum_should_match(mut self, msm: MinimumShouldMatch) -> Self {
        self.minimum_should_match = Some(msm);
        self
    }

    /// Check if this query has no clauses
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
    }

    /// Total number of clauses
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len() + self.filter.len()
    }
}

impl QueryNode for BoolQuery {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        // An empty composition matches everything
        if self.is_empty() {
            return Ok(EngineQuery::MatchAll);
        }

        let resolve_all = |clauses: &[Query]| -> Result<Vec<EngineQuery>> {
            clauses.iter().map(|clause| clause.resolve(ctx)).collect()
        };

        let should = resolve_all(&self.should)?;
        let minimum_should_match = if should.is_empty() {
            0
        } else {
            self.minimum_should_match
                .clone()
                .unwrap_or_default()
                .calculate(should.len())
        };

        Ok(EngineQuery::Bool {
            must: resolve_all(&self.must)?,
            should,
            must_not: resolve_all(&self.must_not)?,
            filter: resolve_all(&self.filter)?,
            minimum_should_match,
        })
    }

    fn query_type(&self) -> &'static str {
        "bool"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzerCache, AnalyzerContext};
    use crate::config::AnalyzerPolicy;
    use crate::query::nodes::{NumericRangeQuery, TermQuery};
    use crate::schema::{FieldDeclaration, FieldDefinition, FieldRegistry};
    use std::sync::Arc;

    fn test_context() -> ResolveContext {
        let declarations = vec![
            FieldDeclaration::new("title", FieldDefinition::text()),
            FieldDeclaration::new("year", FieldDefinition::long()),
        ];
        let registry =
            Arc::new(FieldRegistry::build(Some("id"), &declarations, None, None).unwrap());
        let cache = AnalyzerCache::new();
        let analyzers = Arc::new(
            AnalyzerContext::build(&declarations, &[], &cache, AnalyzerPolicy::FailFast, None)
                .unwrap(),
        );
        ResolveContext::new(registry, analyzers)
    }

    #[test]
    fn test_empty_bool_resolves_to_match_all() {
        let ctx = test_context();
        let resolved = BoolQuery::new().resolve(&ctx).unwrap();
        assert_eq!(resolved, EngineQuery::MatchAll);
    }

    #[test]
    fn test_bool_composition() {
        let ctx = test_context();
        let query = BoolQuery::new()
            .must(Query::Term(TermQuery::new("title", "rust")))
            .filter(Query::NumericRange(
                NumericRangeQuery::new("year").with_lower(2020i64),
            ))
            .must_not(Query::Term(TermQuery::new("title", "java")));
        assert_eq!(query.clause_count(), 3);

        match query.resolve(&ctx).unwrap() {
            EngineQuery::Bool {
                must,
                filter,
                must_not,
                should,
                minimum_should_match,
            } => {
                assert_eq!(must.len(), 1);
                assert_eq!(filter.len(), 1);
                assert_eq!(must_not.len(), 1);
                assert!(should.is_empty());
                assert_eq!(minimum_should_match, 0);
            }
            other => panic!("unexpected query: {other:?}"),
        }
    }

    #[test]
    fn test_minimum_should_match_resolution() {
        let ctx = test_context();
        let query = BoolQuery::new()
            .should(Query::Term(TermQuery::new("title", "a")))
            .should(Query::Term(TermQuery::new("title", "b")))
            .should(Query::Term(TermQuery::new("title", "c")))
            .with_minimum_should_match(MinimumShouldMatch::Count(2));
        match query.resolve(&ctx).unwrap() {
            EngineQuery::Bool {
                minimum_should_match,
                ..
            } => assert_eq!(minimum_should_match, 2),
            other => panic!("unexpected query: {other:?}"),
        }
    }

    #[test]
    fn test_child_resolution_error_propagates() {
        let ctx = test_context();
        let query = BoolQuery::new().must(Query::Term(TermQuery::new("missing", "x")));
        assert!(query.resolve(&ctx).is_err());
    }
}
