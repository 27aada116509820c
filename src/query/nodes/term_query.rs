//! Term query - matches documents containing an exact term
//!
//! The field resolves through the registry; for text fields the value is
//! normalized through the field's query-time analyzer before lowering.

use crate::engine::EngineQuery;
use crate::query::ast::QueryNode;
use crate::query::context::ResolveContext;
use crate::schema::ValueKind;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Query matching a single term of a field
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermQuery {
    /// Generic (declared) field name, used when addressing a wildcard
    /// declaration directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_field: Option<String>,
    /// Concrete field to search in
    pub field: String,
    /// Term value
    pub value: String,
}

impl TermQuery {
    /// Create a new term query
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            generic_field: None,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Address the field through its generic (wildcard) declaration
    pub fn with_generic_field(mut self, generic_field: impl Into<String>) -> Self {
        self.generic_field = Some(generic_field.into());
        self
    }
}

impl QueryNode for TermQuery {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        let instance = ctx
            .registry()
            .resolve_query_field(self.generic_field.as_deref(), &self.field)?;

        // Text terms normalize through the query-time analyzer so the query
        // matches what the index analyzer produced at index time.
        let term = if instance.definition().value_type == ValueKind::Text {
            ctx.analyzers()
                .query_analyzer(instance.name())
                .terms(&self.value)
                .into_iter()
                .next()
                .unwrap_or_else(|| self.value.clone())
        } else {
            self.value.clone()
        };

        Ok(EngineQuery::Term {
            field: self.field.clone(),
            term,
        })
    }

    fn query_type(&self) -> &'static str {
        "term"
    }
}
