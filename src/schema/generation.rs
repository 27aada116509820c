//! Schema generation publication
//!
//! A registry and its analyzer context are built once per schema version and
//! shared read-only across concurrent operations. `SchemaHolder` publishes a
//! new generation atomically; in-flight operations keep the generation they
//! loaded.

use crate::analysis::AnalyzerContext;
use crate::schema::FieldRegistry;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// One immutable schema generation
pub struct SchemaGeneration {
    pub registry: Arc<FieldRegistry>,
    pub analyzers: Arc<AnalyzerContext>,
}

impl SchemaGeneration {
    pub fn new(registry: FieldRegistry, analyzers: AnalyzerContext) -> Self {
        Self {
            registry: Arc::new(registry),
            analyzers: Arc::new(analyzers),
        }
    }
}

/// Atomic holder of the current schema generation
pub struct SchemaHolder {
    current: ArcSwap<SchemaGeneration>,
}

impl SchemaHolder {
    /// Create a holder with an initial generation
    pub fn new(generation: SchemaGeneration) -> Self {
        Self {
            current: ArcSwap::from_pointee(generation),
        }
    }

    /// Load the current generation
    pub fn load(&self) -> Arc<SchemaGeneration> {
        self.current.load_full()
    }

    /// Publish a new generation; readers pick it up on their next load
    pub fn publish(&self, generation: SchemaGeneration) {
        self.current.store(Arc::new(generation));
    }
}
