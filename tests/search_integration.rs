//! Integration tests for the full search pipeline
//!
//! Request descriptor in, assembled results out: windows, sorting, score
//! recovery, highlighting, facets and timings.

use fathom::analysis::{AnalyzerCache, AnalyzerContext};
use fathom::config::AnalyzerPolicy;
use fathom::models::request::{FacetRequest, SearchRequest, SortKey};
use fathom::query::nodes::TermQuery;
use fathom::query::{Query, ResolveContext};
use fathom::results::ResultAssembler;
use fathom::schema::{FacetTemplate, FieldDeclaration, FieldDefinition, FieldRegistry};
use fathom::testing::{MemoryIndex, SimpleHighlighter};
use serde_json::json;
use std::sync::Arc;

fn library_index() -> Arc<MemoryIndex> {
    let declarations = vec![
        FieldDeclaration::new("title", FieldDefinition::text().with_stored(true)),
        FieldDeclaration::new(
            "year",
            FieldDefinition::long().with_doc_values(true).with_stored(true),
        ),
        FieldDeclaration::new(
            "category",
            FieldDefinition::text()
                .with_indexed(false)
                .with_doc_values(true)
                .with_facet_template(FacetTemplate::SortedSetDocValues)
                .with_multivalued(true),
        ),
    ];
    let registry = Arc::new(FieldRegistry::build(Some("id"), &declarations, None, None).unwrap());
    let cache = AnalyzerCache::new();
    let analyzers = Arc::new(
        AnalyzerContext::build(&declarations, &[], &cache, AnalyzerPolicy::FailFast, None)
            .unwrap(),
    );
    let index = Arc::new(MemoryIndex::new(registry, analyzers));
    for doc in [
        json!({"id": "1", "title": "rust systems programming", "year": 2021,
               "category": ["programming", "systems"]}),
        json!({"id": "2", "title": "cooking for programmers", "year": 2019,
               "category": ["cooking"]}),
        json!({"id": "3", "title": "rust rust rust", "year": 2024,
               "category": ["programming"]}),
        json!({"id": "4", "title": "gardening basics", "year": 2024,
               "category": ["gardening"]}),
    ] {
        index.add(&doc).unwrap();
    }
    index
}

fn context(index: &Arc<MemoryIndex>) -> ResolveContext {
    ResolveContext::new(Arc::clone(index.registry()), Arc::clone(index.analyzers()))
}

#[test]
fn test_relevance_search_returns_scores() {
    let index = library_index();
    let request = SearchRequest::new(Query::Term(TermQuery::new("title", "rust")))
        .returning("title")
        .returning("year");

    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &request)
        .unwrap();

    assert_eq!(results.total_hits, 2);
    // Doc 2 repeats the term and must rank first
    assert_eq!(results.documents[0].doc, 2);
    assert!(results.documents[0].score.unwrap() > results.documents[1].score.unwrap());
    assert_eq!(
        results.documents[0].fields.get("title").unwrap(),
        &json!("rust rust rust")
    );
    assert_eq!(results.documents[0].fields.get("year").unwrap(), &json!(2024));
}

#[test]
fn test_score_recovered_only_when_requested_as_sort_key() {
    let index = library_index();
    let query = Query::Term(TermQuery::new("title", "rust"));

    // Sorting by year with score among the sort keys: the true score comes
    // back out of the sort tuple
    let with_score = SearchRequest::new(query.clone())
        .sort_by(SortKey::descending("year"))
        .sort_by(SortKey::score());
    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &with_score)
        .unwrap();
    assert_eq!(results.documents[0].doc, 2);
    assert_eq!(results.documents[0].score, Some(3.0));

    // Sorting by year alone: the score is undefined, not zero
    let without_score =
        SearchRequest::new(query).sort_by(SortKey::descending("year"));
    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &without_score)
        .unwrap();
    assert_eq!(results.documents[0].score, None);
}

#[test]
fn test_window_materialization() {
    let index = library_index();
    let request = SearchRequest::default()
        .with_window(1, 2)
        .sort_by(SortKey::ascending("year"));

    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &request)
        .unwrap();

    assert_eq!(results.total_hits, 4);
    assert_eq!(results.documents.len(), 2);
    // Positions are absolute within the full hit list
    assert_eq!(results.documents[0].rank, 1);
    assert_eq!(results.documents[1].rank, 2);
}

#[test]
fn test_facet_aggregation() {
    let index = library_index();
    let request = SearchRequest::default().facet(FacetRequest::new("category"));

    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &request)
        .unwrap();

    assert_eq!(results.facets.len(), 1);
    let counts = &results.facets[0].counts;
    assert_eq!(counts[0].label, "programming");
    assert_eq!(counts[0].count, 2);
    let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["programming", "cooking", "gardening", "systems"]);
}

#[test]
fn test_highlighting_over_window_only() {
    let index = library_index();
    let highlighter = SimpleHighlighter::new(Arc::clone(&index));
    let request = SearchRequest::new(Query::Term(TermQuery::new("title", "rust")))
        .with_window(0, 1)
        .highlight("title", 80);

    let results = ResultAssembler::new(index.as_ref())
        .with_highlighter(&highlighter)
        .search(&context(&index), &request)
        .unwrap();

    assert_eq!(results.documents.len(), 1);
    let snippet = results.documents[0].highlights.get("title").unwrap();
    assert!(snippet.contains("<b>rust</b>"));
}

#[test]
fn test_timing_checkpoints_in_order() {
    let index = library_index();
    let request = SearchRequest::new(Query::Term(TermQuery::new("title", "rust")))
        .facet(FacetRequest::new("category"));

    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &request)
        .unwrap();

    let steps: Vec<&str> = results.timings.iter().map(|t| t.step.as_str()).collect();
    assert_eq!(steps, vec!["search_query", "documents", "facets"]);
}

#[test]
fn test_debug_query_rendering() {
    let index = library_index();
    let request =
        SearchRequest::new(Query::Term(TermQuery::new("title", "rust"))).with_query_debug();

    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &request)
        .unwrap();
    assert_eq!(results.debug_query.as_deref(), Some("title:rust"));

    let silent = SearchRequest::new(Query::Term(TermQuery::new("title", "rust")));
    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &silent)
        .unwrap();
    assert!(results.debug_query.is_none());
}

#[test]
fn test_results_serialize_to_descriptor_shape() {
    let index = library_index();
    let request = SearchRequest::new(Query::Term(TermQuery::new("title", "rust")))
        .returning("title")
        .facet(FacetRequest::new("category"));

    let results = ResultAssembler::new(index.as_ref())
        .search(&context(&index), &request)
        .unwrap();

    let json = serde_json::to_value(&results).unwrap();
    assert!(json.get("total_hits").is_some());
    assert!(json.get("documents").unwrap().is_array());
    assert!(json.get("facets").unwrap().is_array());
    assert!(json.get("timings").unwrap().is_array());
}
