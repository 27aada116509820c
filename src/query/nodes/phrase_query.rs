//! Phrase query - matches an ordered sequence of terms
//!
//! Terms must appear in order within the slop tolerance. The field is
//! mandatory; a phrase without a field cannot resolve.

use crate::engine::EngineQuery;
use crate::error::FathomError;
use crate::query::ast::QueryNode;
use crate::query::context::ResolveContext;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Query matching an ordered term sequence with slop
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhraseQuery {
    /// Field to search in; required
    pub field: String,
    /// Ordered terms of the phrase
    pub terms: Vec<String>,
    /// Edit-distance tolerance between term positions
    #[serde(default)]
    pub slop: u32,
}

impl PhraseQuery {
    /// Create a phrase query from ordered terms
    pub fn new<T: Into<String>>(field: impl Into<String>, terms: impl IntoIterator<Item = T>) -> Self {
        Self {
            field: field.into(),
            terms: terms.into_iter().map(Into::into).collect(),
            slop: 0,
        }
    }

    /// Set the slop tolerance
    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = slop;
        self
    }
}

impl QueryNode for PhraseQuery {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        if self.field.trim().is_empty() {
            return Err(FathomError::QueryResolution(
                "The phrase query requires a field".to_string(),
            ));
        }
        ctx.registry().resolve_query_field(None, &self.field)?;
        Ok(EngineQuery::Phrase {
            field: self.field.clone(),
            terms: self.terms.clone(),
            slop: self.slop,
        })
    }

    fn query_type(&self) -> &'static str {
        "phrase"
    }
}
