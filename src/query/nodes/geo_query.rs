//! Geographic bounding-box query

use crate::engine::EngineQuery;
use crate::error::FathomError;
use crate::query::ast::QueryNode;
use crate::query::context::ResolveContext;
use crate::schema::ValueKind;
use crate::Result;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Query matching geo points within a latitude/longitude box
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoBoundingBoxQuery {
    /// Geo-point field to search in
    pub field: String,
    pub min_latitude: OrderedFloat<f64>,
    pub max_latitude: OrderedFloat<f64>,
    pub min_longitude: OrderedFloat<f64>,
    pub max_longitude: OrderedFloat<f64>,
}

impl GeoBoundingBoxQuery {
    /// Create a bounding-box query
    pub fn new(
        field: impl Into<String>,
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            field: field.into(),
            min_latitude: OrderedFloat(min_latitude),
            max_latitude: OrderedFloat(max_latitude),
            min_longitude: OrderedFloat(min_longitude),
            max_longitude: OrderedFloat(max_longitude),
        }
    }
}

impl QueryNode for GeoBoundingBoxQuery {
    fn resolve(&self, ctx: &ResolveContext) -> Result<EngineQuery> {
        let instance = ctx.registry().resolve_query_field(None, &self.field)?;
        if instance.definition().value_type != ValueKind::GeoPoint {
            return Err(FathomError::QueryResolution(format!(
                "Field '{}' is not a geo_point field",
                self.field
            )));
        }
        Ok(EngineQuery::GeoBoundingBox {
            field: self.field.clone(),
            min_latitude: self.min_latitude.0,
            max_latitude: self.max_latitude.0,
            min_longitude: self.min_longitude.0,
            max_longitude: self.max_longitude.0,
        })
    }

    fn query_type(&self) -> &'static str {
        "geo_bounding_box"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzerCache, AnalyzerContext};
    use crate::config::AnalyzerPolicy;
    use crate::schema::{FieldDeclaration, FieldDefinition, FieldRegistry};
    use std::sync::Arc;

    fn test_context() -> ResolveContext {
        let declarations = vec![
            FieldDeclaration::new("location", FieldDefinition::geo_point()),
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
    fn test_geo_box_resolution() {
        let ctx = test_context();
        let query = GeoBoundingBoxQuery::new("location", 40.0, 50.0, -5.0, 10.0);
        let resolved = query.resolve(&ctx).unwrap();
        assert_eq!(
            resolved,
            EngineQuery::GeoBoundingBox {
                field: "location".to_string(),
                min_latitude: 40.0,
                max_latitude: 50.0,
                min_longitude: -5.0,
                max_longitude: 10.0,
            }
        );
    }

    #[test]
    fn test_non_geo_field_rejected() {
        let ctx = test_context();
        let err = GeoBoundingBoxQuery::new("title", 0.0, 1.0, 0.0, 1.0)
            .resolve(&ctx)
            .unwrap_err();
        assert!(err.to_string().contains("not a geo_point"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let query = GeoBoundingBoxQuery::new("location", 40.0, 50.0, -5.0, 10.0);
        let json = serde_json::to_string(&query).unwrap();
        let back: GeoBoundingBoxQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, query);
    }
}
