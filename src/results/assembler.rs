//! Result assembler
//!
//! Turns raw ranked hits into typed result records: materializes the
//! requested window, recovers relevance scores from sort tuples, merges
//! highlights and facet counts, and records cumulative timings.

use super::facets::merge_facets;
use super::timing::TimeTracker;
use crate::engine::{
    DocHandle, EngineQuery, Highlighter, IndexReader, RankedHit, RankedHits, ResultWindow,
};
use crate::models::request::{SearchRequest, SortKey};
use crate::models::response::{ResultRecord, SearchResults};
use crate::query::{Query, ResolveContext};
use crate::schema::{FieldRegistry, FieldScalar};
use crate::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Assembles engine hits into search results
pub struct ResultAssembler<'a> {
    reader: &'a dyn IndexReader,
    highlighter: Option<&'a dyn Highlighter>,
}

impl<'a> ResultAssembler<'a> {
    /// Create an assembler over an index reader
    pub fn new(reader: &'a dyn IndexReader) -> Self {
        Self {
            reader,
            highlighter: None,
        }
    }

    /// Attach a highlighting collaborator
    pub fn with_highlighter(mut self, highlighter: &'a dyn Highlighter) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Run the full query pipeline: resolve, execute, assemble
    pub fn search(&self, ctx: &ResolveContext, request: &SearchRequest) -> Result<SearchResults> {
        let mut tracker = TimeTracker::new();
        let query = Query::resolve_optional(request.query.as_ref(), ctx)?;
        let window = ResultWindow::new(request.start, request.rows);
        let hits = self.reader.search(&query, &request.sort, &window)?;
        tracker.next("search_query");
        self.assemble(ctx.registry(), request, &query, &hits, &mut tracker)
    }

    /// Assemble results from already-executed hits
    ///
    /// Hit order is preserved exactly as delivered; only the requested window
    /// is materialized and highlighted.
    pub fn assemble(
        &self,
        registry: &FieldRegistry,
        request: &SearchRequest,
        query: &EngineQuery,
        hits: &RankedHits,
        tracker: &mut TimeTracker,
    ) -> Result<SearchResults> {
        let mut documents = Vec::new();
        for (rank, hit) in hits.hits.iter().enumerate().skip(request.start) {
            documents.push(ResultRecord {
                rank,
                doc: hit.doc,
                score: recover_score(hit, &request.sort),
                fields: self.materialize_fields(registry, hit.doc, &request.returned_fields),
                highlights: HashMap::new(),
            });
        }
        tracker.next("documents");

        if let (Some(highlighter), false) = (self.highlighter, request.highlights.is_empty()) {
            for record in &mut documents {
                for (field, max_length) in &request.highlights {
                    if let Some(snippet) =
                        highlighter.highlight(query, record.doc, field, *max_length)
                    {
                        record.highlights.insert(field.clone(), snippet);
                    }
                }
            }
            tracker.next("highlighting");
        }

        let facets = if request.facets.is_empty() {
            Vec::new()
        } else {
            let mut facet_results = Vec::new();
            for facet in &request.facets {
                facet_results.push((
                    facet.dimension.clone(),
                    self.reader.facet_counts(query, facet)?,
                ));
            }
            let merged = merge_facets(facet_results);
            tracker.next("facets");
            merged
        };

        Ok(SearchResults {
            total_hits: hits.total_hits,
            documents,
            facets,
            timings: tracker.entries(),
            debug_query: request.query_debug.then(|| query.to_string()),
        })
    }

    fn materialize_fields(
        &self,
        registry: &FieldRegistry,
        doc: DocHandle,
        returned_fields: &[String],
    ) -> Map<String, Value> {
        let mut fields = Map::new();
        for field in returned_fields {
            let instance = match registry.resolve(None, Some(field), None) {
                Ok(instance) => instance,
                Err(err) => {
                    tracing::warn!(field = %field, error = %err, "skipping unknown returned field");
                    continue;
                }
            };
            let definition = instance.definition();
            let values = if definition.stored {
                self.reader.stored_field(doc, field)
            } else if definition.doc_values {
                self.reader.doc_values(doc, field)
            } else {
                Vec::new()
            };
            if values.is_empty() {
                continue;
            }
            let value = if definition.multivalued {
                Value::Array(values.iter().map(FieldScalar::to_json).collect())
            } else {
                values[0].to_json()
            };
            fields.insert(field.clone(), value);
        }
        fields
    }
}

/// Recover the relevance score of one hit
///
/// When the engine sorted by substituted fields, the true score survives only
/// inside the sort tuple, and only if `score` was itself one of the requested
/// sort keys; otherwise the score is undefined, never zero.
fn recover_score(hit: &RankedHit, sort: &[SortKey]) -> Option<f32> {
    match &hit.sort_values {
        None => hit.score,
        Some(values) => {
            let position = sort.iter().position(SortKey::is_score)?;
            values.get(position)?.as_f64().map(|score| score as f32)
        }
    }
}
