//! Field registry
//!
//! The registry owns the schema: one `FieldInstance` per declared field or
//! wildcard pattern, the reserved primary-key and record fields, the smart
//! fallback types, and the copy-to fan-out graph. It is built once per schema
//! generation and shared read-only across concurrent operations; the only
//! interior mutability is the facet configuration memo, which tolerates
//! racing first writers.

use super::definition::{FacetTemplate, FieldDeclaration};
use super::field_type::ValueKind;
use super::smart::SmartHandles;
use super::wildcard::WildcardPattern;
use super::{
    DEFAULT_SORTEDSET_FACET_FIELD, ID_FIELD, TAXONOMY_FACET_FIELD,
    TAXONOMY_FLOAT_ASSOC_FACET_FIELD, TAXONOMY_INT_ASSOC_FACET_FIELD,
};
use crate::error::FathomError;
use crate::fields::FieldInstance;
use crate::Result;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;

/// Stable handle of one field instance within its registry
pub type FieldHandle = usize;

/// Role a field instance plays in the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
    /// Declared schema entry (exact name or wildcard pattern)
    Declared,
    /// Reserved primary-key field: identity pass-through term type
    PrimaryKey,
    /// Reserved record field: opaque payload, emits nothing
    RecordSink,
    /// Synthesized copy source holding only fan-out destinations
    CopySink,
    /// Value-driven fallback type produced by smart inference
    Smart,
}

/// Facet configuration of one dimension, built lazily and memoized
#[derive(Clone, Debug, PartialEq)]
pub struct FacetDimensionConfig {
    /// Concrete dimension name
    pub dimension: String,
    /// Index field the facet terms are routed to
    pub index_field_name: String,
    /// Whether the dimension holds multiple values per document
    pub multivalued: bool,
}

/// The schema registry
pub struct FieldRegistry {
    primary_key: String,
    record_field: Option<String>,
    sorted_set_facet_field: String,
    instances: Vec<FieldInstance>,
    by_name: HashMap<String, FieldHandle>,
    // Wildcard handles in declaration order; first match wins
    wildcards: Vec<FieldHandle>,
    copy_edges: Vec<Vec<(FieldHandle, String)>>,
    facet_configs: DashMap<String, FacetDimensionConfig>,
    smart: SmartHandles,
}

impl FieldRegistry {
    /// Build a registry from the schema descriptor
    ///
    /// Pure and deterministic in its inputs. Fails with a schema error when
    /// two declarations collide on the same exact name or when the copy-from
    /// declarations form a cycle.
    pub fn build(
        primary_key: Option<&str>,
        declarations: &[FieldDeclaration],
        sorted_set_facet_field: Option<&str>,
        record_field: Option<&str>,
    ) -> Result<Self> {
        let primary_key = match primary_key {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => ID_FIELD.to_string(),
        };
        let sorted_set_facet_field = sorted_set_facet_field
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_SORTEDSET_FACET_FIELD)
            .to_string();

        let mut instances: Vec<FieldInstance> = Vec::new();
        let mut by_name: HashMap<String, FieldHandle> = HashMap::new();
        let mut wildcards: Vec<FieldHandle> = Vec::new();

        for declaration in declarations {
            if by_name.contains_key(&declaration.name) {
                return Err(FathomError::Schema(format!(
                    "Duplicate field declaration: {}",
                    declaration.name
                )));
            }
            let handle = instances.len();
            let pattern = if WildcardPattern::is_wildcard(&declaration.name) {
                wildcards.push(handle);
                Some(WildcardPattern::new(&declaration.name)?)
            } else {
                None
            };
            instances.push(FieldInstance::declared(
                handle,
                declaration.name.clone(),
                declaration.definition.clone(),
                pattern,
            ));
            by_name.insert(declaration.name.clone(), handle);
        }

        // Copy-to wiring: every field declaring copy_from sources becomes a
        // destination on each source; unknown sources get a synthesized sink.
        let mut copy_edges: Vec<Vec<(FieldHandle, String)>> = vec![Vec::new(); instances.len()];
        let declared_count = instances.len();
        for handle in 0..declared_count {
            let (name, copy_from) = {
                let instance = &instances[handle];
                (
                    instance.name().to_string(),
                    instance.definition().copy_from.clone(),
                )
            };
            for source in &copy_from {
                let source_handle = match by_name.get(source) {
                    Some(&existing) => existing,
                    None => {
                        let sink_handle = instances.len();
                        instances.push(FieldInstance::reserved(
                            sink_handle,
                            source.clone(),
                            FieldRole::CopySink,
                        ));
                        by_name.insert(source.clone(), sink_handle);
                        copy_edges.push(Vec::new());
                        sink_handle
                    }
                };
                copy_edges[source_handle].push((handle, name.clone()));
            }
        }

        detect_copy_cycles(&instances, &copy_edges)?;

        let smart = SmartHandles::install(
            &mut instances,
            &mut copy_edges,
            &primary_key,
            record_field,
        );

        tracing::debug!(
            fields = declarations.len(),
            wildcards = wildcards.len(),
            primary_key = %primary_key,
            "field registry built"
        );

        Ok(Self {
            primary_key,
            record_field: record_field.map(str::to_string),
            sorted_set_facet_field,
            instances,
            by_name,
            wildcards,
            copy_edges,
            facet_configs: DashMap::new(),
            smart,
        })
    }

    /// The primary-key field name
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// The record (opaque payload) field name, when declared
    pub fn record_field(&self) -> Option<&str> {
        self.record_field.as_deref()
    }

    /// The index field receiving sorted-set facet terms
    pub fn sorted_set_facet_field(&self) -> &str {
        &self.sorted_set_facet_field
    }

    /// Whether the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Visit every named field instance
    pub fn for_each(&self, mut consumer: impl FnMut(&str, &FieldInstance)) {
        for (name, &handle) in &self.by_name {
            consumer(name, &self.instances[handle]);
        }
    }

    /// The set of statically declared field names
    pub fn static_field_names(&self) -> Vec<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    /// Instance lookup by handle
    pub fn instance(&self, handle: FieldHandle) -> &FieldInstance {
        &self.instances[handle]
    }

    /// Ordered copy destinations of one instance
    pub fn copy_destinations(&self, handle: FieldHandle) -> &[(FieldHandle, String)] {
        &self.copy_edges[handle]
    }

    /// Resolve a field without value-driven inference
    ///
    /// Resolution order: exact generic name, exact concrete name, reserved
    /// record field, reserved primary-key field, first matching wildcard
    /// pattern in declaration order.
    fn find(&self, generic: Option<&str>, concrete: Option<&str>) -> Option<FieldHandle> {
        if let Some(name) = generic {
            if let Some(&handle) = self.by_name.get(name) {
                return Some(handle);
            }
        }
        if let Some(name) = concrete {
            if let Some(&handle) = self.by_name.get(name) {
                return Some(handle);
            }
        }
        if let (Some(record), Some(name)) = (self.record_field.as_deref(), concrete) {
            if record == name {
                return Some(self.smart.record_sink);
            }
        }
        if concrete == Some(self.primary_key.as_str()) {
            return Some(self.smart.primary_key);
        }
        let search = concrete.or(generic)?;
        for &handle in &self.wildcards {
            if let Some(pattern) = self.instances[handle].pattern() {
                if pattern.matches(search) {
                    return Some(handle);
                }
            }
        }
        None
    }

    /// Resolve a field, optionally falling back to value-driven inference
    ///
    /// At least one of `generic`/`concrete` must be given. With a value
    /// supplied, resolution is total except for unsupported value shapes;
    /// without one, an unmatched name is a `FieldNotFound` error.
    pub fn resolve(
        &self,
        generic: Option<&str>,
        concrete: Option<&str>,
        value: Option<&Value>,
    ) -> Result<&FieldInstance> {
        if generic.is_none() && concrete.is_none() {
            return Err(FathomError::Schema("The field name is missing".to_string()));
        }
        if let Some(handle) = self.find(generic, concrete) {
            return Ok(&self.instances[handle]);
        }
        let display_name = generic.or(concrete).unwrap_or_default();
        if let Some(value) = value {
            let handle = match ValueKind::infer(value) {
                Some(ValueKind::Text) => self.smart.text,
                Some(ValueKind::Long) => self.smart.long,
                Some(ValueKind::Double) => self.smart.double,
                _ => {
                    return Err(FathomError::UnsupportedValueType {
                        field: display_name.to_string(),
                        reason: "no smart type for this value shape".to_string(),
                    })
                }
            };
            return Ok(&self.instances[handle]);
        }
        Err(FathomError::FieldNotFound(display_name.to_string()))
    }

    /// Resolve a field referenced by a query
    ///
    /// Query references never use smart inference; an unknown field is a
    /// request error.
    pub fn resolve_query_field(
        &self,
        generic: Option<&str>,
        field: &str,
    ) -> Result<&FieldInstance> {
        self.find(generic, Some(field))
            .map(|handle| &self.instances[handle])
            .ok_or_else(|| {
                FathomError::QueryResolution(format!("Unknown query field: {field}"))
            })
    }

    /// Wildcard instance addressed by its literal group stem, if any
    ///
    /// `tags` addresses the `tags.*` pattern. Used by nested-mapping
    /// ingestion to route a group of concrete keys through their pattern.
    pub fn wildcard_for_stem(&self, stem: &str) -> Option<&FieldInstance> {
        for &handle in &self.wildcards {
            let instance = &self.instances[handle];
            if instance.pattern().and_then(WildcardPattern::stem) == Some(stem) {
                return Some(instance);
            }
        }
        None
    }

    /// Facet configuration of one dimension, built on first request
    ///
    /// Memoized per concrete name; concurrent first requests race to insert
    /// the same value, which is harmless.
    pub fn facet_config(
        &self,
        generic: Option<&str>,
        concrete: &str,
    ) -> Option<FacetDimensionConfig> {
        if let Some(existing) = self.facet_configs.get(concrete) {
            return Some(existing.clone());
        }
        let handle = self.find(generic, Some(concrete))?;
        let instance = &self.instances[handle];
        let template = instance.definition().facet_template?;
        let index_field_name = match template {
            FacetTemplate::SortedSetDocValues => self.sorted_set_facet_field.clone(),
            FacetTemplate::Taxonomy => TAXONOMY_FACET_FIELD.to_string(),
            FacetTemplate::IntAssociation => TAXONOMY_INT_ASSOC_FACET_FIELD.to_string(),
            FacetTemplate::FloatAssociation => TAXONOMY_FLOAT_ASSOC_FACET_FIELD.to_string(),
        };
        let config = FacetDimensionConfig {
            dimension: concrete.to_string(),
            index_field_name,
            multivalued: instance.definition().multivalued,
        };
        self.facet_configs
            .insert(concrete.to_string(), config.clone());
        Some(config)
    }

    /// Facet configurations for a set of (concrete, generic) name pairs
    pub fn facet_configs<'a>(
        &self,
        field_names: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
    ) -> Vec<FacetDimensionConfig> {
        field_names
            .into_iter()
            .filter_map(|(concrete, generic)| self.facet_config(generic, concrete))
            .collect()
    }

    /// Apply a resolver to each field name of a slice
    pub fn resolve_field_names(
        fields: &[String],
        resolver: impl Fn(&str) -> String,
    ) -> Vec<String> {
        fields.iter().map(|field| resolver(field)).collect()
    }

    /// Apply a resolver to each key of a map, filling `resolved`
    pub fn resolve_field_name_map<T: Clone>(
        fields: &HashMap<String, T>,
        resolved: &mut HashMap<String, T>,
        resolver: impl Fn(&str) -> String,
    ) {
        for (field, value) in fields {
            resolved.insert(resolver(field), value.clone());
        }
    }
}

// Copy edges form a DAG; a cyclic declaration would otherwise recurse without
// bound at dispatch time.
fn detect_copy_cycles(
    instances: &[FieldInstance],
    copy_edges: &[Vec<(FieldHandle, String)>],
) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Grey,
        Black,
    }

    fn visit(
        node: FieldHandle,
        copy_edges: &[Vec<(FieldHandle, String)>],
        marks: &mut [Mark],
    ) -> Option<FieldHandle> {
        marks[node] = Mark::Grey;
        for (next, _) in &copy_edges[node] {
            match marks[*next] {
                Mark::Grey => return Some(*next),
                Mark::White => {
                    if let Some(cycle) = visit(*next, copy_edges, marks) {
                        return Some(cycle);
                    }
                }
                Mark::Black => {}
            }
        }
        marks[node] = Mark::Black;
        None
    }

    let mut marks = vec![Mark::White; copy_edges.len()];
    for node in 0..copy_edges.len() {
        if marks[node] == Mark::White {
            if let Some(cycle) = visit(node, copy_edges, &mut marks) {
                return Err(FathomError::Schema(format!(
                    "Cyclic copy_from declaration involving field: {}",
                    instances[cycle].name()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDefinition;
    use serde_json::json;

    fn registry(declarations: Vec<FieldDeclaration>) -> FieldRegistry {
        FieldRegistry::build(Some("id"), &declarations, None, Some("$record$")).unwrap()
    }

    #[test]
    fn test_build_rejects_duplicate_names() {
        let declarations = vec![
            FieldDeclaration::new("title", FieldDefinition::text()),
            FieldDeclaration::new("title", FieldDefinition::long()),
        ];
        let err = FieldRegistry::build(None, &declarations, None, None).err().unwrap();
        assert!(matches!(err, FathomError::Schema(_)));
    }

    #[test]
    fn test_exact_resolution_precedes_wildcard() {
        let reg = registry(vec![
            FieldDeclaration::new("tags.*", FieldDefinition::text().with_multivalued(true)),
            FieldDeclaration::new("tags.color", FieldDefinition::long()),
        ]);
        // "tags.color" matches both its exact declaration and the pattern
        let instance = reg.resolve(None, Some("tags.color"), None).unwrap();
        assert_eq!(instance.definition().value_type, ValueKind::Long);
        assert!(!instance.is_wildcard());
    }

    #[test]
    fn test_wildcard_first_match_wins() {
        let reg = registry(vec![
            FieldDeclaration::new("attr.*", FieldDefinition::text()),
            FieldDeclaration::new("attr.n*", FieldDefinition::long()),
        ]);
        let instance = reg.resolve(None, Some("attr.name"), None).unwrap();
        // Declaration order decides: the broader pattern was declared first
        assert_eq!(instance.definition().value_type, ValueKind::Text);
    }

    #[test]
    fn test_reserved_fields() {
        let reg = registry(vec![FieldDeclaration::new("title", FieldDefinition::text())]);
        let pk = reg.resolve(None, Some("id"), None).unwrap();
        assert_eq!(pk.role(), FieldRole::PrimaryKey);
        let record = reg.resolve(None, Some("$record$"), None).unwrap();
        assert_eq!(record.role(), FieldRole::RecordSink);
    }

    #[test]
    fn test_missing_name_is_schema_error() {
        let reg = registry(vec![]);
        let err = reg.resolve(None, None, None).unwrap_err();
        assert!(matches!(err, FathomError::Schema(_)));
    }

    #[test]
    fn test_smart_inference() {
        let reg = registry(vec![]);
        let text = reg.resolve(None, Some("x"), Some(&json!("hello"))).unwrap();
        assert_eq!(text.definition().value_type, ValueKind::Text);
        let long = reg.resolve(None, Some("x"), Some(&json!(42))).unwrap();
        assert_eq!(long.definition().value_type, ValueKind::Long);
        let double = reg.resolve(None, Some("x"), Some(&json!(4.2))).unwrap();
        assert_eq!(double.definition().value_type, ValueKind::Double);
        assert!(reg.resolve(None, Some("x"), Some(&json!(true))).is_err());
    }

    #[test]
    fn test_unresolved_without_value_is_field_not_found() {
        let reg = registry(vec![FieldDeclaration::new("title", FieldDefinition::text())]);
        let err = reg.resolve(None, Some("missing"), None).unwrap_err();
        assert!(matches!(err, FathomError::FieldNotFound(_)));
    }

    #[test]
    fn test_copy_wiring_to_unknown_source_synthesizes_sink() {
        let reg = registry(vec![FieldDeclaration::new(
            "title",
            FieldDefinition::text().copy_from("headline"),
        )]);
        let sink = reg.resolve(None, Some("headline"), None).unwrap();
        assert_eq!(sink.role(), FieldRole::CopySink);
        let destinations = reg.copy_destinations(sink.handle());
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].1, "title");
    }

    #[test]
    fn test_copy_cycle_rejected_at_build() {
        let declarations = vec![
            FieldDeclaration::new("a", FieldDefinition::text().copy_from("b")),
            FieldDeclaration::new("b", FieldDefinition::text().copy_from("a")),
        ];
        let err = FieldRegistry::build(None, &declarations, None, None).err().unwrap();
        assert!(matches!(err, FathomError::Schema(_)));
        assert!(err.to_string().contains("Cyclic"));
    }

    #[test]
    fn test_self_copy_cycle_rejected() {
        let declarations = vec![FieldDeclaration::new(
            "a",
            FieldDefinition::text().copy_from("a"),
        )];
        assert!(FieldRegistry::build(None, &declarations, None, None).is_err());
    }

    #[test]
    fn test_copy_chain_is_legal() {
        // a -> b -> c is a DAG, not a cycle
        let declarations = vec![
            FieldDeclaration::new("b", FieldDefinition::text().copy_from("a")),
            FieldDeclaration::new("c", FieldDefinition::text().copy_from("b")),
        ];
        assert!(FieldRegistry::build(None, &declarations, None, None).is_ok());
    }

    #[test]
    fn test_facet_config_memoization() {
        let reg = registry(vec![FieldDeclaration::new(
            "category",
            FieldDefinition::text()
                .with_facet_template(FacetTemplate::SortedSetDocValues)
                .with_multivalued(true),
        )]);
        let first = reg.facet_config(None, "category").unwrap();
        assert_eq!(first.index_field_name, DEFAULT_SORTEDSET_FACET_FIELD);
        assert!(first.multivalued);
        let second = reg.facet_config(None, "category").unwrap();
        assert_eq!(first, second);
        assert!(reg.facet_config(None, "title").is_none());
    }

    #[test]
    fn test_facet_template_routing() {
        let reg = registry(vec![
            FieldDeclaration::new(
                "brand",
                FieldDefinition::text().with_facet_template(FacetTemplate::Taxonomy),
            ),
            FieldDeclaration::new(
                "popularity",
                FieldDefinition::text().with_facet_template(FacetTemplate::FloatAssociation),
            ),
        ]);
        assert_eq!(
            reg.facet_config(None, "brand").unwrap().index_field_name,
            TAXONOMY_FACET_FIELD
        );
        assert_eq!(
            reg.facet_config(None, "popularity").unwrap().index_field_name,
            TAXONOMY_FLOAT_ASSOC_FACET_FIELD
        );
    }

    #[test]
    fn test_facet_configs_for_name_pairs() {
        let reg = registry(vec![
            FieldDeclaration::new(
                "category",
                FieldDefinition::text().with_facet_template(FacetTemplate::SortedSetDocValues),
            ),
            FieldDeclaration::new("title", FieldDefinition::text()),
        ]);
        let configs = reg.facet_configs([("category", None), ("title", None), ("missing", None)]);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].dimension, "category");
    }

    #[test]
    fn test_concurrent_facet_config_first_use() {
        use std::sync::Arc;
        let reg = Arc::new(registry(vec![FieldDeclaration::new(
            "category",
            FieldDefinition::text().with_facet_template(FacetTemplate::SortedSetDocValues),
        )]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || reg.facet_config(None, "category").unwrap())
            })
            .collect();
        let configs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for config in &configs {
            assert_eq!(config, &configs[0]);
        }
    }

    #[test]
    fn test_default_reserved_names() {
        let reg = FieldRegistry::build(None, &[], None, None).unwrap();
        assert_eq!(reg.primary_key(), ID_FIELD);
        assert_eq!(reg.sorted_set_facet_field(), DEFAULT_SORTEDSET_FACET_FIELD);
        assert!(reg.record_field().is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_resolve_field_names_helpers() {
        let fields = vec!["a".to_string(), "b".to_string()];
        let resolved = FieldRegistry::resolve_field_names(&fields, |f| format!("{f}!"));
        assert_eq!(resolved, vec!["a!", "b!"]);

        let mut map = HashMap::new();
        map.insert("a".to_string(), 1);
        let mut resolved = HashMap::new();
        FieldRegistry::resolve_field_name_map(&map, &mut resolved, |f| format!("{f}!"));
        assert_eq!(resolved.get("a!"), Some(&1));
    }

    #[test]
    fn test_wildcard_for_stem() {
        let reg = registry(vec![FieldDeclaration::new(
            "tags.*",
            FieldDefinition::text().with_multivalued(true),
        )]);
        assert!(reg.wildcard_for_stem("tags").is_some());
        assert!(reg.wildcard_for_stem("other").is_none());
    }
}
