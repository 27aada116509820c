//! Index engine boundary
//!
//! The engine that stores postings, scores and merges segments is an external
//! collaborator. This module fixes its boundary: field emissions flow toward
//! it through `EmissionConsumer`, executable queries reach it as
//! `EngineQuery`, and raw ranked hits plus stored/doc-value accessors come
//! back for result assembly.

pub mod query;

pub use query::{EngineQuery, ScoreMode};

use crate::analysis::AnalyzerContext;
use crate::models::request::{FacetRequest, SortKey};
use crate::models::response::FacetCount;
use crate::schema::{FieldRegistry, FieldScalar};
use crate::Result;
use std::sync::Arc;

/// Opaque per-document handle issued by the engine
pub type DocHandle = u64;

/// One component of a hit's sort tuple
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    Long(i64),
    Double(f64),
    Text(String),
}

impl SortValue {
    /// Numeric view, widening to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SortValue::Long(l) => Some(*l as f64),
            SortValue::Double(d) => Some(*d),
            SortValue::Text(_) => None,
        }
    }
}

/// One ranked hit as delivered by the engine
///
/// When the engine sorted by substituted fields instead of relevance, the
/// sort tuple is present and the score may be absent.
#[derive(Clone, Debug)]
pub struct RankedHit {
    pub doc: DocHandle,
    pub score: Option<f32>,
    pub sort_values: Option<Vec<SortValue>>,
}

/// Ordered hits plus the total match count
#[derive(Clone, Debug, Default)]
pub struct RankedHits {
    pub total_hits: u64,
    pub hits: Vec<RankedHit>,
}

/// Requested result window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultWindow {
    pub start: usize,
    pub rows: usize,
}

impl ResultWindow {
    pub fn new(start: usize, rows: usize) -> Self {
        Self { start, rows }
    }

    /// Number of top hits the engine must collect to fill the window
    pub fn limit(&self) -> usize {
        self.start + self.rows
    }
}

/// Read access to one index
pub trait IndexReader: Send + Sync {
    /// Execute a query, collecting the top `window.limit()` hits in the
    /// given sort order (relevance when `sort` is empty)
    fn search(&self, query: &EngineQuery, sort: &[SortKey], window: &ResultWindow)
        -> Result<RankedHits>;

    /// Stored values of one field of one document
    fn stored_field(&self, doc: DocHandle, field: &str) -> Vec<FieldScalar>;

    /// Doc values of one field of one document
    fn doc_values(&self, doc: DocHandle, field: &str) -> Vec<FieldScalar>;

    /// Facet counts of one dimension over the query's matches
    fn facet_counts(&self, query: &EngineQuery, request: &FacetRequest)
        -> Result<Vec<FacetCount>>;

    /// Field values of every matching document, grouped per document
    ///
    /// Join resolution correlates these values against the local index.
    fn collect_field_values(
        &self,
        query: &EngineQuery,
        field: &str,
    ) -> Result<Vec<Vec<FieldScalar>>>;
}

/// Named-index resolution used by cross-index joins
pub trait IndexLookup: Send + Sync {
    fn registry(&self, index: &str) -> Option<Arc<FieldRegistry>>;
    fn analyzers(&self, index: &str) -> Option<Arc<AnalyzerContext>>;
    fn reader(&self, index: &str) -> Option<Arc<dyn IndexReader>>;
}

/// Snippet extraction collaborator
pub trait Highlighter: Send + Sync {
    /// Highlight one field of one materialized document, bounded by
    /// `max_length` bytes of snippet
    fn highlight(
        &self,
        query: &EngineQuery,
        doc: DocHandle,
        field: &str,
        max_length: usize,
    ) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_window_limit() {
        let window = ResultWindow::new(20, 10);
        assert_eq!(window.limit(), 30);
    }

    #[test]
    fn test_sort_value_as_f64() {
        assert_eq!(SortValue::Long(3).as_f64(), Some(3.0));
        assert_eq!(SortValue::Double(1.5).as_f64(), Some(1.5));
        assert_eq!(SortValue::Text("a".to_string()).as_f64(), None);
    }
}
