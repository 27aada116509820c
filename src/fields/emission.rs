//! Field emissions handed to the index engine
//!
//! An emission is one (field name, storage family, typed value) tuple. A
//! single dispatched input value produces zero or more emissions according to
//! the field definition's storage flags.

use crate::schema::FieldScalar;

/// Storage family of one emission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmissionKind {
    /// Original value stored for retrieval
    Stored,
    /// Analyzed full-text content
    TokenizedText,
    /// Single un-analyzed index term
    Term,
    /// Numeric or geo point value
    Point,
    /// Columnar per-document value for sorting and faceting
    DocValue,
    /// Facet dimension value
    Facet,
}

/// One typed value emitted toward the index engine
#[derive(Clone, Debug, PartialEq)]
pub struct FieldEmission {
    /// Concrete field name the value lands under
    pub field_name: String,
    /// Storage family
    pub kind: EmissionKind,
    /// Converted, typed value
    pub value: FieldScalar,
}

impl FieldEmission {
    pub fn new(field_name: impl Into<String>, kind: EmissionKind, value: FieldScalar) -> Self {
        Self {
            field_name: field_name.into(),
            kind,
            value,
        }
    }
}

/// Target of field dispatch
///
/// Implementations receive emissions in dispatch order; array and collection
/// elements arrive in the value's natural iteration order.
pub trait EmissionConsumer {
    fn accept(&mut self, emission: FieldEmission);
}

/// Emission consumer collecting one document's emissions in order
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    emissions: Vec<FieldEmission>,
}

impl DocumentBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// All emissions collected so far, in dispatch order
    pub fn emissions(&self) -> &[FieldEmission] {
        &self.emissions
    }

    /// Consume the builder, returning the collected emissions
    pub fn into_emissions(self) -> Vec<FieldEmission> {
        self.emissions
    }

    /// Emissions for one concrete field name
    pub fn field(&self, field_name: &str) -> Vec<&FieldEmission> {
        self.emissions
            .iter()
            .filter(|e| e.field_name == field_name)
            .collect()
    }

    /// Whether nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }
}

impl EmissionConsumer for DocumentBuilder {
    fn accept(&mut self, emission: FieldEmission) {
        self.emissions.push(emission);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder_collects_in_order() {
        let mut builder = DocumentBuilder::new();
        builder.accept(FieldEmission::new(
            "title",
            EmissionKind::TokenizedText,
            FieldScalar::Text("hello".to_string()),
        ));
        builder.accept(FieldEmission::new(
            "count",
            EmissionKind::Point,
            FieldScalar::Long(3),
        ));

        assert_eq!(builder.emissions().len(), 2);
        assert_eq!(builder.emissions()[0].field_name, "title");
        assert_eq!(builder.field("count").len(), 1);
        assert!(builder.field("missing").is_empty());
    }
}
