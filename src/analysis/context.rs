//! Per-field analyzer resolution
//!
//! Given the schema, the context produces two immutable mappings: field name
//! to index-time analyzer and field name to query-time analyzer. Resolution
//! goes through a process-lifetime memo, then the supplied factory sources in
//! order, then built-in construction by name.

use super::analyzer::{Analyzer, AnalyzerFactoryMap, Token};
use crate::config::AnalyzerPolicy;
use crate::error::FathomError;
use crate::schema::FieldDeclaration;
use crate::Result;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Process-lifetime memo of resolved analyzer names
///
/// Owned by the caller and shared across schema generations, so a name is
/// resolved once per process rather than once per generation.
#[derive(Default)]
pub struct AnalyzerCache {
    inner: DashMap<String, Arc<Analyzer>>,
}

impl AnalyzerCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, name: &str) -> Option<Arc<Analyzer>> {
        self.inner.get(name).map(|entry| entry.clone())
    }

    fn insert(&self, name: &str, analyzer: Arc<Analyzer>) {
        self.inner.insert(name.to_string(), analyzer);
    }
}

/// Immutable per-field analyzer mappings
pub struct AnalyzerContext {
    index_analyzers: HashMap<String, Arc<Analyzer>>,
    query_analyzers: HashMap<String, Arc<Analyzer>>,
    default_analyzer: Arc<Analyzer>,
}

impl AnalyzerContext {
    /// Build the context from the schema declarations
    ///
    /// Each declared analyzer name resolves through the cache, then each
    /// factory map in order, then the built-in table. A resolution failure is
    /// policy-gated: fail-fast aborts construction, best-effort omits the
    /// field (logged) and lookups fall back to `default_analyzer`. An empty
    /// schema short-circuits to empty mappings.
    pub fn build(
        fields: &[FieldDeclaration],
        factory_maps: &[AnalyzerFactoryMap],
        cache: &AnalyzerCache,
        policy: AnalyzerPolicy,
        default_analyzer: Option<Arc<Analyzer>>,
    ) -> Result<Self> {
        let default_analyzer =
            default_analyzer.unwrap_or_else(|| Arc::new(Analyzer::standard()));

        if fields.is_empty() {
            return Ok(Self {
                index_analyzers: HashMap::new(),
                query_analyzers: HashMap::new(),
                default_analyzer,
            });
        }

        let mut index_analyzers = HashMap::new();
        let mut query_analyzers = HashMap::new();

        for declaration in fields {
            let definition = &declaration.definition;
            let resolved: Result<()> = (|| {
                let index_analyzer = match non_empty(definition.analyzer.as_deref()) {
                    Some(name) => Some(resolve(name, factory_maps, cache).ok_or_else(|| {
                        FathomError::AnalyzerResolution {
                            field: declaration.name.clone(),
                            analyzer: name.to_string(),
                        }
                    })?),
                    None => None,
                };
                if let Some(analyzer) = &index_analyzer {
                    index_analyzers.insert(declaration.name.clone(), analyzer.clone());
                }

                let query_analyzer = match non_empty(definition.query_analyzer.as_deref()) {
                    Some(name) => Some(resolve(name, factory_maps, cache).ok_or_else(|| {
                        FathomError::AnalyzerResolution {
                            field: declaration.name.clone(),
                            analyzer: name.to_string(),
                        }
                    })?),
                    None => index_analyzer,
                };
                if let Some(analyzer) = query_analyzer {
                    query_analyzers.insert(declaration.name.clone(), analyzer);
                }
                Ok(())
            })();

            if let Err(err) = resolved {
                match policy {
                    AnalyzerPolicy::FailFast => return Err(err),
                    AnalyzerPolicy::BestEffort => {
                        tracing::warn!(field = %declaration.name, error = %err,
                            "analyzer resolution failed, falling back to default");
                    }
                }
            }
        }

        Ok(Self {
            index_analyzers,
            query_analyzers,
            default_analyzer,
        })
    }

    /// The index-time analyzer of a field
    pub fn index_analyzer(&self, field: &str) -> &Arc<Analyzer> {
        self.index_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// The query-time analyzer of a field
    pub fn query_analyzer(&self, field: &str) -> &Arc<Analyzer> {
        self.query_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// The fallback analyzer
    pub fn default_analyzer(&self) -> &Arc<Analyzer> {
        &self.default_analyzer
    }

    /// Whether no field has a dedicated analyzer
    pub fn is_empty(&self) -> bool {
        self.index_analyzers.is_empty() && self.query_analyzers.is_empty()
    }

    /// Run a field's index-time pipeline over text
    pub fn analyze(&self, field: &str, text: &str) -> Vec<Token> {
        self.index_analyzer(field).analyze(text)
    }

    /// Run a field's query-time pipeline over text
    pub fn analyze_query(&self, field: &str, text: &str) -> Vec<Token> {
        self.query_analyzer(field).analyze(text)
    }
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.trim().is_empty())
}

fn resolve(
    name: &str,
    factory_maps: &[AnalyzerFactoryMap],
    cache: &AnalyzerCache,
) -> Option<Arc<Analyzer>> {
    if let Some(analyzer) = cache.get(name) {
        return Some(analyzer);
    }
    for factories in factory_maps {
        if let Some(factory) = factories.get(name) {
            match factory.create_analyzer() {
                Ok(analyzer) => {
                    let analyzer = Arc::new(analyzer);
                    cache.insert(name, analyzer.clone());
                    return Some(analyzer);
                }
                Err(err) => {
                    tracing::warn!(analyzer = name, error = %err, "analyzer factory failed");
                    return None;
                }
            }
        }
    }
    let analyzer = Arc::new(Analyzer::builtin(name)?);
    cache.insert(name, analyzer.clone());
    Some(analyzer)
}
