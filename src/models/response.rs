//! Search result descriptor

use crate::engine::DocHandle;
use crate::results::timing::TimingEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One output row per ranked hit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Ordinal position within the full hit list
    pub rank: usize,

    /// Opaque document handle issued by the engine
    pub doc: DocHandle,

    /// Relevance score; absent when sorting substituted it away
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// Materialized field values: single value or collection per field
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,

    /// Highlighted snippet per requested field
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub highlights: HashMap<String, String>,
}

/// One facet label with its count
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub label: String,
    pub count: u64,
}

impl FacetCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// All counts of one facet dimension
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDimensionResult {
    pub dimension: String,
    pub counts: Vec<FacetCount>,
}

/// Assembled search results
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total number of matching documents
    pub total_hits: u64,

    /// Materialized window records, in engine hit order
    pub documents: Vec<ResultRecord>,

    /// Facet tables, ordered by dimension
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<FacetDimensionResult>,

    /// Cumulative elapsed-time checkpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timings: Vec<TimingEntry>,

    /// Resolved engine query rendering, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_record_serialization_skips_empty() {
        let record = ResultRecord {
            rank: 0,
            doc: 7,
            score: None,
            fields: Map::new(),
            highlights: HashMap::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("score"));
        assert!(!json.contains("highlights"));
    }

    #[test]
    fn test_results_roundtrip() {
        let results = SearchResults {
            total_hits: 2,
            documents: vec![],
            facets: vec![FacetDimensionResult {
                dimension: "category".to_string(),
                counts: vec![FacetCount::new("books", 2)],
            }],
            timings: vec![],
            debug_query: Some("*:*".to_string()),
        };
        let json = serde_json::to_string(&results).unwrap();
        let back: SearchResults = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_hits, 2);
        assert_eq!(back.facets[0].counts[0].label, "books");
        assert_eq!(back.debug_query.as_deref(), Some("*:*"));
    }
}
