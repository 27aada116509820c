//! Search request descriptor

use crate::query::Query;
use crate::schema::SCORE_FIELD;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sort direction of one sort key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One requested sort key: a field name or the reserved `score`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Sort ascending on a field
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort descending on a field
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Sort on relevance score (descending)
    pub fn score() -> Self {
        Self::descending(SCORE_FIELD)
    }

    /// Whether this key addresses the relevance score
    pub fn is_score(&self) -> bool {
        self.field == SCORE_FIELD
    }
}

/// One requested facet dimension
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// Dimension (concrete field) name
    pub dimension: String,
    /// Optional path restricting a hierarchical dimension
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    /// Number of top values to return
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    10
}

impl FacetRequest {
    pub fn new(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            path: Vec::new(),
            top: default_top(),
        }
    }

    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }
}

/// Search request: query tree plus window, sort, facet, field and
/// highlighting specs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query tree; absent resolves to match-all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,

    /// First hit of the returned window
    #[serde(default)]
    pub start: usize,

    /// Number of hits to return
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Requested sort keys, in priority order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortKey>,

    /// Requested facet dimensions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<FacetRequest>,

    /// Fields to materialize on each record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returned_fields: Vec<String>,

    /// Highlighting spec: field name to maximum snippet length
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub highlights: HashMap<String, usize>,

    /// Whether to include the resolved engine query string
    #[serde(default)]
    pub query_debug: bool,
}

fn default_rows() -> usize {
    10
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            start: 0,
            rows: default_rows(),
            sort: Vec::new(),
            facets: Vec::new(),
            returned_fields: Vec::new(),
            highlights: HashMap::new(),
            query_debug: false,
        }
    }
}

impl SearchRequest {
    /// Create a request for a query tree
    pub fn new(query: Query) -> Self {
        Self {
            query: Some(query),
            ..Default::default()
        }
    }

    /// Set the result window
    pub fn with_window(mut self, start: usize, rows: usize) -> Self {
        self.start = start;
        self.rows = rows;
        self
    }

    /// Add a sort key
    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    /// Add a facet dimension
    pub fn facet(mut self, request: FacetRequest) -> Self {
        self.facets.push(request);
        self
    }

    /// Add a returned field
    pub fn returning(mut self, field: impl Into<String>) -> Self {
        self.returned_fields.push(field.into());
        self
    }

    /// Request highlighting of a field
    pub fn highlight(mut self, field: impl Into<String>, max_length: usize) -> Self {
        self.highlights.insert(field.into(), max_length);
        self
    }

    /// Request the debug query string
    pub fn with_query_debug(mut self) -> Self {
        self.query_debug = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = SearchRequest::default();
        assert_eq!(request.start, 0);
        assert_eq!(request.rows, 10);
        assert!(request.query.is_none());
        assert!(request.sort.is_empty());
    }

    #[test]
    fn test_sort_key_score() {
        let key = SortKey::score();
        assert!(key.is_score());
        assert_eq!(key.direction, SortDirection::Descending);
        assert!(!SortKey::ascending("price").is_score());
    }

    #[test]
    fn test_request_deserialization() {
        let request: SearchRequest = serde_json::from_str(
            r#"{
                "start": 5,
                "rows": 20,
                "sort": [{"field": "price", "direction": "descending"}],
                "facets": [{"dimension": "category"}],
                "returned_fields": ["title"]
            }"#,
        )
        .unwrap();
        assert_eq!(request.start, 5);
        assert_eq!(request.rows, 20);
        assert_eq!(request.sort[0].field, "price");
        assert_eq!(request.facets[0].top, 10);
        assert!(request.query.is_none());
    }
}
