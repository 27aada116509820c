//! Numeric range query - matches field values within a closed range
//!
//! Bounds are inclusive. An absent lower bound substitutes the resolved
//! value type's minimum, an absent upper bound its maximum, so half-open
//! ranges behave identically to explicitly saturated ones.

use crate::engine::EngineQuery;
use crate::error::FathomError;
use crate::query::ast::QueryNode;
use crate::query::context::ResolveContext;
use crate::query::types::RangeValue;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Query matching numeric values within `[lower, upper]`
///
/// Works over point storage by default; set `doc_values` to run against the
/// columnar doc-value representation instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericRangeQuery {
    /// Generic (declared) field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_field: Option<String>,
    /// Concrete field to search in
    pub field: String,
    /// Inclusive lower bound; absent means the type's minimum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<RangeValue>,
    /// Inclusive upper bound; absent means the type's maximum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<RangeValue>,
    /// Evaluate over doc values instead of point storage
    #[serde(default)]
    pub doc_values: bool,
}

impl NumericRangeQuery {
    /// Create an unbounded range query on a field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            generic_field: None,
            field: field.into(),
            lower: None,
            upper: None,
            doc_values: false,
        }
    }

    /// Set the inclusive lower bound
    pub fn with_lower(mut self, lower: impl Into<RangeValue>) -> Self {
        self.lower = Some(lower.into());
        self
    }

    /// Set the inclusive upper bound
    pub fn with_upper(mut self, upper: impl Into<RangeValue>) -> Self {
        self.upper = Some(upper.into());
        self
    }

    /// Evaluate over doc values
    pub fn over_doc_values(mut self) -> Self {
        self.doc_values = true;
        self
    }
}

impl QueryNode for NumericRangeQuery {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        let instance = ctx
            .registry()
            .resolve_query_field(self.generic_field.as_deref(), &self.field)?;
        let kind = instance.definition().value_type;
        let (type_min, type_max) = match (kind.min_scalar(), kind.max_scalar()) {
            (Some(min), Some(max)) => (min, max),
            _ => {
                return Err(FathomError::QueryResolution(format!(
                    "Field '{}' of type {} does not support range queries",
                    self.field,
                    kind.storage_type()
                )))
            }
        };

        let coerce = |bound: &RangeValue| {
            bound.to_scalar(kind).ok_or_else(|| {
                FathomError::QueryResolution(format!(
                    "Range bound does not fit the {} field '{}'",
                    kind.storage_type(),
                    self.field
                ))
            })
        };
        let lower = match &self.lower {
            Some(bound) => coerce(bound)?,
            None => type_min,
        };
        let upper = match &self.upper {
            Some(bound) => coerce(bound)?,
            None => type_max,
        };

        Ok(EngineQuery::NumericRange {
            field: self.field.clone(),
            lower,
            upper,
            doc_values: self.doc_values,
        })
    }

    fn query_type(&self) -> &'static str {
        "numeric_range"
    }
}
