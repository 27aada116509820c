//! Cross-index join query
//!
//! Resolves a foreign index through the context's index lookup, evaluates a
//! sub-query there, and correlates the foreign `from_field` values against
//! the local `to_field` as a terms set.

use crate::engine::{EngineQuery, ScoreMode};
use crate::query::ast::{Query, QueryNode};
use crate::query::context::ResolveContext;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Query correlating documents of a foreign index with the local index
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinQuery {
    /// Name of the foreign index
    pub from_index: String,
    /// Field of the foreign index providing correlation values
    pub from_field: String,
    /// Local field the values correlate against
    pub to_field: String,
    /// Whether every foreign value of a document correlates, or only the
    /// first (coalescing duplicates per document)
    #[serde(default = "default_true")]
    pub multiple_values_per_document: bool,
    /// Score combination mode
    #[serde(default)]
    pub score_mode: ScoreMode,
    /// Sub-query evaluated in the foreign index; absent means match-all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_query: Option<Box<Query>>,
}

fn default_true() -> bool {
    true
}

impl JoinQuery {
    /// Create a join between a foreign and a local field
    pub fn new(
        from_index: impl Into<String>,
        from_field: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            from_index: from_index.into(),
            from_field: from_field.into(),
            to_field: to_field.into(),
            multiple_values_per_document: true,
            score_mode: ScoreMode::None,
            from_query: None,
        }
    }

    /// Set the foreign sub-query
    pub fn with_from_query(mut self, query: Query) -> Self {
        self.from_query = Some(Box::new(query));
        self
    }

    /// Coalesce multiple foreign values per document to the first one
    pub fn single_value_per_document(mut self) -> Self {
        self.multiple_values_per_document = false;
        self
    }

    /// Set the score combination mode
    pub fn with_score_mode(mut self, score_mode: ScoreMode) -> Self {
        self.score_mode = score_mode;
        self
    }
}

impl QueryNode for JoinQuery {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        let (foreign_ctx, foreign_reader) = ctx.for_index(&self.from_index)?;
        foreign_ctx
            .registry()
            .resolve_query_field(None, &self.from_field)?;
        ctx.registry().resolve_query_field(None, &self.to_field)?;

        let foreign_query =
            Query::resolve_optional(self.from_query.as_deref(), &foreign_ctx)?;
        let grouped = foreign_reader.collect_field_values(&foreign_query, &self.from_field)?;

        // Distinct correlation values, in first-seen order
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for document_values in grouped {
            let take = if self.multiple_values_per_document {
                document_values.len()
            } else {
                1
            };
            for value in document_values.into_iter().take(take) {
                if seen.insert(value.term_string()) {
                    terms.push(value);
                }
            }
        }

        Ok(EngineQuery::TermsSet {
            field: self.to_field.clone(),
            terms,
            score_mode: self.score_mode,
        })
    }

    fn query_type(&self) -> &'static str {
        "join"
    }
}
