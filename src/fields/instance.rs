//! Runtime field instances and the value dispatch algorithm
//!
//! A `FieldInstance` binds one schema declaration (or one wildcard pattern,
//! or a reserved/synthesized role) to its dispatch behavior: decomposing an
//! input value into typed emissions and fanning the original value out to
//! copy destinations.

use crate::error::FathomError;
use crate::fields::codec;
use crate::fields::emission::{EmissionConsumer, EmissionKind, FieldEmission};
use crate::schema::registry::{FieldHandle, FieldRegistry, FieldRole};
use crate::schema::{FieldDefinition, FieldScalar, ValueKind, WildcardPattern};
use crate::Result;
use serde_json::Value;

/// One field type bound to a declaration, pattern or reserved role
#[derive(Clone, Debug)]
pub struct FieldInstance {
    handle: FieldHandle,
    name: String,
    definition: FieldDefinition,
    pattern: Option<WildcardPattern>,
    role: FieldRole,
}

impl FieldInstance {
    pub(crate) fn declared(
        handle: FieldHandle,
        name: String,
        definition: FieldDefinition,
        pattern: Option<WildcardPattern>,
    ) -> Self {
        Self {
            handle,
            name,
            definition,
            pattern,
            role: FieldRole::Declared,
        }
    }

    pub(crate) fn reserved(handle: FieldHandle, name: String, role: FieldRole) -> Self {
        let definition = match role {
            // The primary key indexes a single pass-through term
            FieldRole::PrimaryKey => FieldDefinition::text()
                .with_stored(true)
                .with_doc_values(true),
            _ => FieldDefinition::text().with_indexed(false),
        };
        Self {
            handle,
            name,
            definition,
            pattern: None,
            role,
        }
    }

    pub(crate) fn smart(handle: FieldHandle, kind: ValueKind) -> Self {
        let definition = match kind {
            ValueKind::Text => FieldDefinition::text().with_stored(true),
            kind => FieldDefinition::new(kind)
                .with_stored(true)
                .with_doc_values(true),
        };
        Self {
            handle,
            name: format!("$smart_{}$", definition.value_type.storage_type()),
            definition,
            pattern: None,
            role: FieldRole::Smart,
        }
    }

    /// Stable handle of this instance within its registry
    pub fn handle(&self) -> FieldHandle {
        self.handle
    }

    /// Declared (generic) name of the field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's definition
    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    /// The role this instance plays in the registry
    pub fn role(&self) -> FieldRole {
        self.role
    }

    /// Wildcard pattern, for pattern-bound instances
    pub fn pattern(&self) -> Option<&WildcardPattern> {
        self.pattern.as_ref()
    }

    /// Whether this instance is bound to a wildcard pattern
    pub fn is_wildcard(&self) -> bool {
        self.pattern.is_some()
    }

    /// Dispatch one input value into emissions
    ///
    /// Decomposes the value recursively, then fans the original value out to
    /// every copy destination under the destination's own name. A value shape
    /// with no dispatch rule fails the whole call; nothing is skipped
    /// silently.
    pub fn dispatch(
        &self,
        registry: &FieldRegistry,
        field_name: &str,
        value: &Value,
        consumer: &mut dyn EmissionConsumer,
    ) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        match self.role {
            // The record field is handled by the engine as an opaque payload
            FieldRole::RecordSink => return Ok(()),
            // Synthesized copy sources have no indexing identity of their own
            FieldRole::CopySink => return self.fan_out(registry, value, consumer),
            _ => {}
        }
        if let Some(pattern) = &self.pattern {
            self.fill_wildcard(registry, pattern, field_name, value, consumer)
        } else {
            self.fill(field_name, value, consumer)?;
            self.fan_out(registry, value, consumer)
        }
    }

    /// Decode previously indexed term bytes back into a logical value
    ///
    /// Best effort: returns `None` for unconvertible input.
    pub fn decode_term(&self, raw: &[u8]) -> Option<FieldScalar> {
        if raw.is_empty() && self.definition.value_type != ValueKind::Text {
            return None;
        }
        codec::decode_term(self.definition.value_type, raw)
    }

    /// Build the sortable index-term bytes for one scalar input
    ///
    /// Used for primary-key addressing and for sort keys over encoded terms.
    pub fn term_bytes(&self, field_name: &str, value: &Value) -> Result<Vec<u8>> {
        let scalar = self.definition.value_type.convert(field_name, value)?;
        Ok(codec::encode_term(&scalar))
    }

    fn fan_out(
        &self,
        registry: &FieldRegistry,
        value: &Value,
        consumer: &mut dyn EmissionConsumer,
    ) -> Result<()> {
        for (destination, destination_name) in registry.copy_destinations(self.handle) {
            registry
                .instance(*destination)
                .dispatch(registry, destination_name, value, consumer)?;
        }
        Ok(())
    }

    fn fill_wildcard(
        &self,
        registry: &FieldRegistry,
        pattern: &WildcardPattern,
        wildcard_name: &str,
        value: &Value,
        consumer: &mut dyn EmissionConsumer,
    ) -> Result<()> {
        match value {
            Value::Object(entries) => {
                for (key, entry) in entries {
                    if !pattern.matches(key) {
                        return Err(FathomError::Schema(format!(
                            "The field name does not match the field pattern: '{}' does not satisfy '{}'",
                            key,
                            pattern.pattern()
                        )));
                    }
                    self.fill(key, entry, consumer)?;
                    self.fan_out(registry, entry, consumer)?;
                }
                Ok(())
            }
            _ => {
                self.fill(wildcard_name, value, consumer)?;
                self.fan_out(registry, value, consumer)
            }
        }
    }

    fn fill(
        &self,
        field_name: &str,
        value: &Value,
        consumer: &mut dyn EmissionConsumer,
    ) -> Result<()> {
        match value {
            Value::Null => Ok(()),
            Value::Array(elements) => {
                if self.definition.value_type == ValueKind::GeoPoint && is_geo_pair(elements) {
                    return self.fill_value(field_name, value, consumer);
                }
                for element in elements {
                    if !element.is_null() {
                        self.fill(field_name, element, consumer)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => Err(FathomError::UnsupportedValueType {
                field: field_name.to_string(),
                reason: "mapping values are only legal under a wildcard field".to_string(),
            }),
            scalar => self.fill_value(field_name, scalar, consumer),
        }
    }

    fn fill_value(
        &self,
        field_name: &str,
        value: &Value,
        consumer: &mut dyn EmissionConsumer,
    ) -> Result<()> {
        if self.role == FieldRole::PrimaryKey {
            let scalar = ValueKind::Text.convert(field_name, value)?;
            consumer.accept(FieldEmission::new(field_name, EmissionKind::Term, scalar.clone()));
            consumer.accept(FieldEmission::new(field_name, EmissionKind::Stored, scalar.clone()));
            consumer.accept(FieldEmission::new(field_name, EmissionKind::DocValue, scalar));
            return Ok(());
        }

        let scalar = self.definition.value_type.convert(field_name, value)?;
        if self.definition.indexed {
            let kind = match self.definition.value_type {
                ValueKind::Text => EmissionKind::TokenizedText,
                ValueKind::Boolean => EmissionKind::Term,
                _ => EmissionKind::Point,
            };
            consumer.accept(FieldEmission::new(field_name, kind, scalar.clone()));
        }
        if self.definition.stored {
            consumer.accept(FieldEmission::new(
                field_name,
                EmissionKind::Stored,
                scalar.clone(),
            ));
        }
        if self.definition.doc_values {
            consumer.accept(FieldEmission::new(
                field_name,
                EmissionKind::DocValue,
                scalar.clone(),
            ));
        }
        if self.definition.facet_template.is_some() {
            consumer.accept(FieldEmission::new(field_name, EmissionKind::Facet, scalar));
        }
        Ok(())
    }
}

fn is_geo_pair(elements: &[Value]) -> bool {
    elements.len() == 2 && elements.iter().all(Value::is_number)
}
