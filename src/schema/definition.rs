//! Declared field definitions
//!
//! A `FieldDeclaration` is one entry of the schema descriptor: a logical name
//! (possibly a wildcard pattern) plus the definition describing the value
//! kind, storage flags, copy sources and analyzers.

use super::field_type::ValueKind;
use serde::{Deserialize, Serialize};

/// Facet template selecting the facet storage family of a field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetTemplate {
    /// Sorted-set doc values facet, routed to the shared facet index field
    SortedSetDocValues,
    /// Taxonomy facet
    Taxonomy,
    /// Taxonomy facet carrying an integer association value
    IntAssociation,
    /// Taxonomy facet carrying a float association value
    FloatAssociation,
}

/// Storage and analysis behavior of one declared field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Value kind of the field
    #[serde(default)]
    pub value_type: ValueKind,

    /// Whether the original value is stored for retrieval
    #[serde(default)]
    pub stored: bool,

    /// Whether the field is indexed for search (default: true)
    #[serde(default = "default_true")]
    pub indexed: bool,

    /// Whether a columnar doc-value entry is written for sorting/faceting
    #[serde(default)]
    pub doc_values: bool,

    /// Whether the field holds multiple values per document
    #[serde(default)]
    pub multivalued: bool,

    /// Facet template, when the field participates in faceting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_template: Option<FacetTemplate>,

    /// Source fields whose dispatched values fan out to this field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub copy_from: Vec<String>,

    /// Index-time analyzer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,

    /// Query-time analyzer name, defaulting to the index-time analyzer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_analyzer: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for FieldDefinition {
    fn default() -> Self {
        Self {
            value_type: ValueKind::Text,
            stored: false,
            indexed: true,
            doc_values: false,
            multivalued: false,
            facet_template: None,
            copy_from: Vec::new(),
            analyzer: None,
            query_analyzer: None,
        }
    }
}

impl FieldDefinition {
    /// Create a definition with the given value kind
    pub fn new(value_type: ValueKind) -> Self {
        Self {
            value_type,
            ..Default::default()
        }
    }

    /// Create a text field definition
    pub fn text() -> Self {
        Self::new(ValueKind::Text)
    }

    /// Create an integer field definition
    pub fn integer() -> Self {
        Self::new(ValueKind::Integer)
    }

    /// Create a long field definition
    pub fn long() -> Self {
        Self::new(ValueKind::Long)
    }

    /// Create a float field definition
    pub fn float() -> Self {
        Self::new(ValueKind::Float)
    }

    /// Create a double field definition
    pub fn double() -> Self {
        Self::new(ValueKind::Double)
    }

    /// Create a boolean field definition
    pub fn boolean() -> Self {
        Self::new(ValueKind::Boolean)
    }

    /// Create a geo-point field definition
    pub fn geo_point() -> Self {
        Self::new(ValueKind::GeoPoint)
    }

    /// Set whether the original value is stored
    pub fn with_stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }

    /// Set whether the field is indexed
    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Set whether doc values are written
    pub fn with_doc_values(mut self, doc_values: bool) -> Self {
        self.doc_values = doc_values;
        self
    }

    /// Set whether the field is multivalued
    pub fn with_multivalued(mut self, multivalued: bool) -> Self {
        self.multivalued = multivalued;
        self
    }

    /// Set the facet template
    pub fn with_facet_template(mut self, template: FacetTemplate) -> Self {
        self.facet_template = Some(template);
        self
    }

    /// Add a copy source
    pub fn copy_from(mut self, source: impl Into<String>) -> Self {
        self.copy_from.push(source.into());
        self
    }

    /// Set the index-time analyzer name
    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Set a distinct query-time analyzer name
    pub fn with_query_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.query_analyzer = Some(analyzer.into());
        self
    }
}

/// One named entry of the schema descriptor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Logical field name; may contain `*`/`?` wildcard characters
    pub name: String,

    /// Definition of the field
    #[serde(flatten)]
    pub definition: FieldDefinition,
}

impl FieldDeclaration {
    /// Create a declaration
    pub fn new(name: impl Into<String>, definition: FieldDefinition) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_builder() {
        let def = FieldDefinition::text()
            .with_stored(true)
            .with_analyzer("english")
            .copy_from("tags.*");

        assert_eq!(def.value_type, ValueKind::Text);
        assert!(def.stored);
        assert!(def.indexed);
        assert_eq!(def.analyzer.as_deref(), Some("english"));
        assert_eq!(def.copy_from, vec!["tags.*"]);
    }

    #[test]
    fn test_declaration_serialization() {
        let decl = FieldDeclaration::new(
            "price",
            FieldDefinition::double().with_doc_values(true),
        );
        let json = serde_json::to_string(&decl).unwrap();
        assert!(json.contains("\"name\":\"price\""));
        assert!(json.contains("\"value_type\":\"double\""));

        let back: FieldDeclaration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decl);
    }

    #[test]
    fn test_deserialization_defaults() {
        let decl: FieldDeclaration =
            serde_json::from_str(r#"{"name": "title", "value_type": "text"}"#).unwrap();
        assert!(decl.definition.indexed);
        assert!(!decl.definition.stored);
        assert!(decl.definition.copy_from.is_empty());
    }
}
