//! Exact numeric query - matches one numeric value
//!
//! The counterpart of the range query for point lookups, over point storage
//! or the doc-value representation.

use crate::engine::EngineQuery;
use crate::error::FathomError;
use crate::query::ast::QueryNode;
use crate::query::context::ResolveContext;
use crate::query::types::RangeValue;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Query matching an exact numeric value of a field
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericExactQuery {
    /// Generic (declared) field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_field: Option<String>,
    /// Concrete field to search in
    pub field: String,
    /// Value to match
    pub value: RangeValue,
    /// Evaluate over doc values instead of point storage
    #[serde(default)]
    pub doc_values: bool,
}

impl NumericExactQuery {
    /// Create an exact numeric query
    pub fn new(field: impl Into<String>, value: impl Into<RangeValue>) -> Self {
        Self {
            generic_field: None,
            field: field.into(),
            value: value.into(),
            doc_values: false,
        }
    }

    /// Evaluate over doc values
    pub fn over_doc_values(mut self) -> Self {
        self.doc_values = true;
        self
    }
}

impl QueryNode for NumericExactQuery {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        let instance = ctx
            .registry()
            .resolve_query_field(self.generic_field.as_deref(), &self.field)?;
        let kind = instance.definition().value_type;
        let value = self.value.to_scalar(kind).ok_or_else(|| {
            FathomError::QueryResolution(format!(
                "Value does not fit the {} field '{}'",
                kind.storage_type(),
                self.field
            ))
        })?;
        Ok(EngineQuery::NumericExact {
            field: self.field.clone(),
            value,
            doc_values: self.doc_values,
        })
    }

    fn query_type(&self) -> &'static str {
        "numeric_exact"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzerCache, AnalyzerContext};
    use crate::config::AnalyzerPolicy;
    use crate::schema::{FieldDeclaration, FieldDefinition, FieldRegistry, FieldScalar};
    use std::sync::Arc;

    fn test_context() -> ResolveContext {
        let declarations = vec![
            FieldDeclaration::new("price", FieldDefinition::double().with_doc_values(true)),
            FieldDeclaration::new("title", FieldDefinition::text()),
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
    fn test_exact_value_coerces_to_field_kind() {
        let ctx = test_context();
        let query = NumericExactQuery::new("price", 10i64).over_doc_values();
        let resolved = query.resolve(&ctx).unwrap();
        assert_eq!(
            resolved,
            EngineQuery::NumericExact {
                field: "price".to_string(),
                value: FieldScalar::Double(10.0),
                doc_values: true,
            }
        );
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let ctx = test_context();
        let err = NumericExactQuery::new("title", 1i64).resolve(&ctx).unwrap_err();
        assert!(matches!(err, FathomError::QueryResolution(_)));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let query = NumericExactQuery::new("price", 4.5);
        let json = serde_json::to_string(&query).unwrap();
        let back: NumericExactQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, query);
    }
}
