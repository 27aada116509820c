//! Query resolution context
//!
//! Bundles the field registry, the analyzer context and the cross-index
//! lookup a query tree resolves against.

use crate::analysis::AnalyzerContext;
use crate::engine::{IndexLookup, IndexReader};
use crate::error::FathomError;
use crate::schema::FieldRegistry;
use crate::Result;
use std::sync::Arc;

/// Context a query node resolves against
#[derive(Clone)]
pub struct ResolveContext {
    registry: Arc<FieldRegistry>,
    analyzers: Arc<AnalyzerContext>,
    lookup: Option<Arc<dyn IndexLookup>>,
}

impl ResolveContext {
    /// Create a context over one index's registry and analyzers
    pub fn new(registry: Arc<FieldRegistry>, analyzers: Arc<AnalyzerContext>) -> Self {
        Self {
            registry,
            analyzers,
            lookup: None,
        }
    }

    /// Attach a cross-index lookup, enabling join resolution
    pub fn with_lookup(mut self, lookup: Arc<dyn IndexLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// The local field registry
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// The local analyzer context
    pub fn analyzers(&self) -> &AnalyzerContext {
        &self.analyzers
    }

    /// Resolve a foreign index into its own context plus a reader
    ///
    /// Fails with a query-resolution error when no lookup was attached or
    /// the index is unknown.
    pub fn for_index(&self, index: &str) -> Result<(ResolveContext, Arc<dyn IndexReader>)> {
        let lookup = self.lookup.as_ref().ok_or_else(|| {
            FathomError::QueryResolution(format!(
                "Unreachable joined index (no index lookup configured): {index}"
            ))
        })?;
        let unreachable =
            || FathomError::QueryResolution(format!("Unreachable joined index: {index}"));
        let registry = lookup.registry(index).ok_or_else(unreachable)?;
        let analyzers = lookup.analyzers(index).ok_or_else(unreachable)?;
        let reader = lookup.reader(index).ok_or_else(unreachable)?;
        Ok((
            ResolveContext {
                registry,
                analyzers,
                lookup: Some(Arc::clone(lookup)),
            },
            reader,
        ))
    }
}
