//! In-memory index engine for tests
//!
//! Consumes field emissions through the regular mapping pipeline and
//! evaluates engine queries over the collected postings, points and doc
//! values. Scoring is a plain term-frequency count; ties break on document
//! order.

use crate::analysis::AnalyzerContext;
use crate::config::IndexingPolicy;
use crate::engine::{
    DocHandle, EngineQuery, Highlighter, IndexLookup, IndexReader, RankedHit, RankedHits,
    ResultWindow, SortValue,
};
use crate::error::FathomError;
use crate::fields::{DocumentBuilder, EmissionKind, RecordMapper};
use crate::models::request::{FacetRequest, SortDirection, SortKey};
use crate::models::response::FacetCount;
use crate::schema::{FieldRegistry, FieldScalar};
use crate::Result;
use parking_lot::RwLock;
use roaring::RoaringBitmap;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryDoc {
    stored: HashMap<String, Vec<FieldScalar>>,
    doc_values: HashMap<String, Vec<FieldScalar>>,
    points: HashMap<String, Vec<FieldScalar>>,
    facets: HashMap<String, Vec<String>>,
    // field -> term -> positions
    terms: HashMap<String, HashMap<String, Vec<u32>>>,
}

impl MemoryDoc {
    fn field_scalars(&self, field: &str) -> &[FieldScalar] {
        for source in [&self.doc_values, &self.points, &self.stored] {
            if let Some(values) = source.get(field) {
                return values;
            }
        }
        &[]
    }
}

/// In-memory implementation of the engine read boundary
pub struct MemoryIndex {
    registry: Arc<FieldRegistry>,
    analyzers: Arc<AnalyzerContext>,
    policy: IndexingPolicy,
    docs: RwLock<Vec<MemoryDoc>>,
}

impl MemoryIndex {
    /// Create an empty index over a schema generation
    pub fn new(registry: Arc<FieldRegistry>, analyzers: Arc<AnalyzerContext>) -> Self {
        Self {
            registry,
            analyzers,
            policy: IndexingPolicy::FailOnError,
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Switch to lenient per-field error handling
    pub fn with_policy(mut self, policy: IndexingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The registry this index was built over
    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    /// The analyzer context this index was built over
    pub fn analyzers(&self) -> &Arc<AnalyzerContext> {
        &self.analyzers
    }

    /// Map and index one JSON document, returning its handle
    pub fn add(&self, record: &Value) -> Result<DocHandle> {
        let record = record
            .as_object()
            .ok_or_else(|| FathomError::Engine("document must be a JSON object".to_string()))?;
        let mapper = RecordMapper::new(&self.registry, self.policy);
        let mut builder = DocumentBuilder::new();
        mapper.map(record, &mut builder)?;

        let mut doc = MemoryDoc::default();
        let mut next_position: HashMap<String, u32> = HashMap::new();
        for emission in builder.into_emissions() {
            let field = emission.field_name.clone();
            match emission.kind {
                EmissionKind::Stored => {
                    doc.stored.entry(field).or_default().push(emission.value)
                }
                EmissionKind::DocValue => {
                    doc.doc_values.entry(field).or_default().push(emission.value)
                }
                EmissionKind::Point => {
                    doc.points.entry(field).or_default().push(emission.value)
                }
                EmissionKind::Facet => doc
                    .facets
                    .entry(field)
                    .or_default()
                    .push(emission.value.term_string()),
                EmissionKind::Term => {
                    let position = next_position.entry(field.clone()).or_insert(0);
                    doc.terms
                        .entry(field)
                        .or_default()
                        .entry(emission.value.term_string())
                        .or_default()
                        .push(*position);
                    *position += 1;
                }
                EmissionKind::TokenizedText => {
                    let text = emission.value.term_string();
                    let base = *next_position.entry(field.clone()).or_insert(0);
                    let tokens = self.analyzers.index_analyzer(&field).analyze(&text);
                    let mut last = base;
                    for token in tokens {
                        let position = base + token.position;
                        doc.terms
                            .entry(field.clone())
                            .or_default()
                            .entry(token.term)
                            .or_default()
                            .push(position);
                        last = position + 1;
                    }
                    // Leave a gap between consecutive values of the field
                    next_position.insert(field, last + 1);
                }
            }
        }

        let mut docs = self.docs.write();
        docs.push(doc);
        Ok((docs.len() - 1) as DocHandle)
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Whether the index holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    fn evaluate(&self, query: &EngineQuery, docs: &[MemoryDoc]) -> RoaringBitmap {
        match query {
            EngineQuery::MatchAll => (0..docs.len() as u32).collect(),
            EngineQuery::Term { field, term } => docs
                .iter()
                .enumerate()
                .filter(|(_, doc)| {
                    doc.terms
                        .get(field)
                        .map(|terms| terms.contains_key(term))
                        .unwrap_or(false)
                })
                .map(|(docno, _)| docno as u32)
                .collect(),
            EngineQuery::TermsSet { field, terms, .. } => docs
                .iter()
                .enumerate()
                .filter(|(_, doc)| {
                    let values = doc.field_scalars(field);
                    terms.iter().any(|term| {
                        values
                            .iter()
                            .any(|value| value.term_string() == term.term_string())
                            || doc
                                .terms
                                .get(field)
                                .map(|indexed| indexed.contains_key(&term.term_string()))
                                .unwrap_or(false)
                    })
                })
                .map(|(docno, _)| docno as u32)
                .collect(),
            EngineQuery::NumericExact {
                field,
                value,
                doc_values,
            } => self.numeric_matches(docs, field, *doc_values, |v| {
                v.as_f64() == value.as_f64()
            }),
            EngineQuery::NumericRange {
                field,
                lower,
                upper,
                doc_values,
            } => {
                let lower = lower.as_f64().unwrap_or(f64::MIN);
                let upper = upper.as_f64().unwrap_or(f64::MAX);
                self.numeric_matches(docs, field, *doc_values, |v| {
                    v.as_f64().map(|v| v >= lower && v <= upper).unwrap_or(false)
                })
            }
            EngineQuery::Phrase { field, terms, slop } => docs
                .iter()
                .enumerate()
                .filter(|(_, doc)| phrase_matches(doc, field, terms, *slop))
                .map(|(docno, _)| docno as u32)
                .collect(),
            EngineQuery::GeoBoundingBox {
                field,
                min_latitude,
                max_latitude,
                min_longitude,
                max_longitude,
            } => docs
                .iter()
                .enumerate()
                .filter(|(_, doc)| {
                    doc.field_scalars(field).iter().any(|value| match value {
                        FieldScalar::Geo {
                            latitude,
                            longitude,
                        } => {
                            latitude >= min_latitude
                                && latitude <= max_latitude
                                && longitude >= min_longitude
                                && longitude <= max_longitude
                        }
                        _ => false,
                    })
                })
                .map(|(docno, _)| docno as u32)
                .collect(),
            EngineQuery::Bool {
                must,
                should,
                must_not,
                filter,
                minimum_should_match,
            } => {
                let mut result: Option<RoaringBitmap> = None;
                for clause in must.iter().chain(filter) {
                    let matches = self.evaluate(clause, docs);
                    result = Some(match result {
                        Some(current) => current & matches,
                        None => matches,
                    });
                }
                if !should.is_empty() {
                    let mut counts: HashMap<u32, usize> = HashMap::new();
                    for clause in should {
                        for docno in self.evaluate(clause, docs) {
                            *counts.entry(docno).or_insert(0) += 1;
                        }
                    }
                    let minimum = (*minimum_should_match).max(1);
                    let should_matches: RoaringBitmap = counts
                        .into_iter()
                        .filter(|(_, count)| *count >= minimum)
                        .map(|(docno, _)| docno)
                        .collect();
                    result = Some(match result {
                        // With must/filter present, should only boosts scores
                        Some(current) => current,
                        None => should_matches,
                    });
                }
                let mut matches = result.unwrap_or_default();
                for clause in must_not {
                    matches -= self.evaluate(clause, docs);
                }
                matches
            }
        }
    }

    fn numeric_matches(
        &self,
        docs: &[MemoryDoc],
        field: &str,
        doc_values: bool,
        predicate: impl Fn(&FieldScalar) -> bool,
    ) -> RoaringBitmap {
        docs.iter()
            .enumerate()
            .filter(|(_, doc)| {
                let source = if doc_values {
                    doc.doc_values.get(field)
                } else {
                    doc.points.get(field)
                };
                source
                    .map(|values| values.iter().any(&predicate))
                    .unwrap_or(false)
            })
            .map(|(docno, _)| docno as u32)
            .collect()
    }

    fn score(&self, query: &EngineQuery, doc: &MemoryDoc) -> f32 {
        match query {
            EngineQuery::Term { field, term } => doc
                .terms
                .get(field)
                .and_then(|terms| terms.get(term))
                .map(|positions| positions.len() as f32)
                .unwrap_or(0.0),
            EngineQuery::Bool { must, should, .. } => must
                .iter()
                .chain(should)
                .map(|clause| self.score(clause, doc))
                .sum(),
            EngineQuery::Phrase { field, terms, .. } => {
                if terms.iter().all(|term| {
                    doc.terms
                        .get(field)
                        .map(|indexed| indexed.contains_key(term))
                        .unwrap_or(false)
                }) {
                    terms.len() as f32
                } else {
                    0.0
                }
            }
            _ => 1.0,
        }
    }

    fn sort_tuple(
        &self,
        doc: &MemoryDoc,
        score: f32,
        sort: &[SortKey],
    ) -> Vec<SortValue> {
        sort.iter()
            .map(|key| {
                if key.is_score() {
                    return SortValue::Double(score as f64);
                }
                match doc.field_scalars(&key.field).first() {
                    Some(FieldScalar::Integer(i)) => SortValue::Long(*i as i64),
                    Some(FieldScalar::Long(l)) => SortValue::Long(*l),
                    Some(FieldScalar::Float(f)) => SortValue::Double(*f as f64),
                    Some(FieldScalar::Double(d)) => SortValue::Double(*d),
                    Some(FieldScalar::Boolean(b)) => SortValue::Long(i64::from(*b)),
                    Some(FieldScalar::Text(s)) => SortValue::Text(s.clone()),
                    _ => SortValue::Text(String::new()),
                }
            })
            .collect()
    }
}

fn compare_sort_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
        _ => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
    }
}

fn phrase_matches(doc: &MemoryDoc, field: &str, terms: &[String], slop: u32) -> bool {
    let Some(indexed) = doc.terms.get(field) else {
        return false;
    };
    if terms.is_empty() {
        return false;
    }
    let Some(first_positions) = indexed.get(&terms[0]) else {
        return false;
    };
    'starts: for &start in first_positions {
        let mut previous = start;
        for term in &terms[1..] {
            let Some(positions) = indexed.get(term) else {
                return false;
            };
            // The next term must follow within the slop tolerance
            let next = positions
                .iter()
                .find(|&&p| p > previous && p <= previous + 1 + slop);
            match next {
                Some(&p) => previous = p,
                None => continue 'starts,
            }
        }
        return true;
    }
    false
}

impl IndexReader for MemoryIndex {
    fn search(
        &self,
        query: &EngineQuery,
        sort: &[SortKey],
        window: &ResultWindow,
    ) -> Result<RankedHits> {
        let docs = self.docs.read();
        let matches = self.evaluate(query, &docs);
        let total_hits = matches.len();

        let mut scored: Vec<(u32, f32, Vec<SortValue>)> = matches
            .iter()
            .map(|docno| {
                let score = self.score(query, &docs[docno as usize]);
                let tuple = self.sort_tuple(&docs[docno as usize], score, sort);
                (docno, score, tuple)
            })
            .collect();

        if sort.is_empty() {
            scored.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            });
        } else {
            scored.sort_by(|a, b| {
                for (index, key) in sort.iter().enumerate() {
                    let ordering = compare_sort_values(&a.2[index], &b.2[index]);
                    let ordering = match key.direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                a.0.cmp(&b.0)
            });
        }

        let hits = scored
            .into_iter()
            .take(window.limit())
            .map(|(docno, score, tuple)| RankedHit {
                doc: docno as DocHandle,
                // Sorting by fields substitutes the score away
                score: sort.is_empty().then_some(score),
                sort_values: (!sort.is_empty()).then_some(tuple),
            })
            .collect();

        Ok(RankedHits { total_hits, hits })
    }

    fn stored_field(&self, doc: DocHandle, field: &str) -> Vec<FieldScalar> {
        self.docs
            .read()
            .get(doc as usize)
            .and_then(|d| d.stored.get(field).cloned())
            .unwrap_or_default()
    }

    fn doc_values(&self, doc: DocHandle, field: &str) -> Vec<FieldScalar> {
        self.docs
            .read()
            .get(doc as usize)
            .and_then(|d| d.doc_values.get(field).cloned())
            .unwrap_or_default()
    }

    fn facet_counts(
        &self,
        query: &EngineQuery,
        request: &FacetRequest,
    ) -> Result<Vec<FacetCount>> {
        let docs = self.docs.read();
        let matches = self.evaluate(query, &docs);
        let prefix = request.path.join("/");
        let mut counts: HashMap<String, u64> = HashMap::new();
        for docno in matches {
            if let Some(labels) = docs[docno as usize].facets.get(&request.dimension) {
                for label in labels {
                    if prefix.is_empty() || label.starts_with(&prefix) {
                        *counts.entry(label.clone()).or_insert(0) += 1;
                    }
                }
            }
        }
        let mut counts: Vec<FacetCount> = counts
            .into_iter()
            .map(|(label, count)| FacetCount { label, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        counts.truncate(request.top);
        Ok(counts)
    }

    fn collect_field_values(
        &self,
        query: &EngineQuery,
        field: &str,
    ) -> Result<Vec<Vec<FieldScalar>>> {
        let docs = self.docs.read();
        let matches = self.evaluate(query, &docs);
        Ok(matches
            .iter()
            .map(|docno| docs[docno as usize].field_scalars(field).to_vec())
            .collect())
    }
}

/// Static index lookup over named in-memory indexes
#[derive(Default)]
pub struct StaticLookup {
    indexes: HashMap<String, Arc<MemoryIndex>>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index under a name
    pub fn with_index(mut self, name: impl Into<String>, index: Arc<MemoryIndex>) -> Self {
        self.indexes.insert(name.into(), index);
        self
    }
}

impl IndexLookup for StaticLookup {
    fn registry(&self, index: &str) -> Option<Arc<FieldRegistry>> {
        self.indexes.get(index).map(|i| Arc::clone(i.registry()))
    }

    fn analyzers(&self, index: &str) -> Option<Arc<AnalyzerContext>> {
        self.indexes.get(index).map(|i| Arc::clone(i.analyzers()))
    }

    fn reader(&self, index: &str) -> Option<Arc<dyn IndexReader>> {
        self.indexes
            .get(index)
            .map(|i| Arc::clone(i) as Arc<dyn IndexReader>)
    }
}

/// Stored-text highlighter wrapping the first query term of a field
pub struct SimpleHighlighter {
    index: Arc<MemoryIndex>,
}

impl SimpleHighlighter {
    pub fn new(index: Arc<MemoryIndex>) -> Self {
        Self { index }
    }

    fn query_terms(query: &EngineQuery, field: &str, terms: &mut Vec<String>) {
        match query {
            EngineQuery::Term { field: f, term } if f == field => terms.push(term.clone()),
            EngineQuery::Phrase { field: f, terms: t, .. } if f == field => {
                terms.extend(t.iter().cloned())
            }
            EngineQuery::TermsSet { field: f, terms: t, .. } if f == field => {
                terms.extend(t.iter().map(FieldScalar::term_string))
            }
            EngineQuery::Bool {
                must,
                should,
                must_not: _,
                filter,
                ..
            } => {
                for clause in must.iter().chain(should).chain(filter) {
                    Self::query_terms(clause, field, terms);
                }
            }
            _ => {}
        }
    }
}

impl Highlighter for SimpleHighlighter {
    fn highlight(
        &self,
        query: &EngineQuery,
        doc: DocHandle,
        field: &str,
        max_length: usize,
    ) -> Option<String> {
        let mut terms = Vec::new();
        Self::query_terms(query, field, &mut terms);
        let stored = self.index.stored_field(doc, field);
        let text = stored.first()?.as_text()?.to_string();
        let lowered = text.to_lowercase();
        for term in terms {
            if let Some(start) = lowered.find(&term.to_lowercase()) {
                let end = start + term.len();
                let snippet = format!("{}<b>{}</b>{}", &text[..start], &text[start..end], &text[end..]);
                let mut truncated = snippet;
                if truncated.len() > max_length {
                    let mut cut = max_length;
                    while cut > 0 && !truncated.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    truncated.truncate(cut);
                }
                return Some(truncated);
            }
        }
        None
    }
}
