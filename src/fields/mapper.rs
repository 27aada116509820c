//! Record mapping
//!
//! Walks one input document, resolves each entry against the registry and
//! drives field dispatch. Per-field failures are gated by the indexing
//! policy; schema violations always abort.

use crate::config::IndexingPolicy;
use crate::fields::emission::EmissionConsumer;
use crate::schema::FieldRegistry;
use crate::Result;
use serde_json::{Map, Value};

/// Maps input documents into field emissions
pub struct RecordMapper<'a> {
    registry: &'a FieldRegistry,
    policy: IndexingPolicy,
}

impl<'a> RecordMapper<'a> {
    /// Create a mapper over a registry
    pub fn new(registry: &'a FieldRegistry, policy: IndexingPolicy) -> Self {
        Self { registry, policy }
    }

    /// Dispatch every entry of a document into the consumer
    ///
    /// Under `FailOnError` the first failing field aborts the document; under
    /// `Lenient` a field-level failure skips only that field with a warning.
    pub fn map(
        &self,
        record: &Map<String, Value>,
        consumer: &mut dyn EmissionConsumer,
    ) -> Result<()> {
        for (name, value) in record {
            if value.is_null() {
                continue;
            }
            match self.map_field(name, value, consumer) {
                Ok(()) => {}
                Err(err) if self.policy == IndexingPolicy::Lenient && err.is_field_level() => {
                    tracing::warn!(field = %name, error = %err, "skipping unmappable field");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn map_field(
        &self,
        name: &str,
        value: &Value,
        consumer: &mut dyn EmissionConsumer,
    ) -> Result<()> {
        match self.registry.resolve(None, Some(name), Some(value)) {
            Ok(instance) => instance.dispatch(self.registry, name, value, consumer),
            Err(err) => {
                // A mapping value can address a wildcard group by its stem:
                // {"tags": {...}} routes through the "tags.*" pattern.
                if value.is_object() {
                    if let Some(wildcard) = self.registry.wildcard_for_stem(name) {
                        return wildcard.dispatch(
                            self.registry,
                            wildcard.name(),
                            value,
                            consumer,
                        );
                    }
                }
                Err(err)
            }
        }
    }
}
