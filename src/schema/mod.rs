//! Schema definition and field resolution
//!
//! The schema maps declared field names (exact or wildcard patterns) to field
//! types, wires copy-to fan-out between fields, and resolves arbitrary field
//! names against the declarations at indexing and query time.

pub mod definition;
pub mod field_type;
pub mod generation;
pub mod registry;
pub mod smart;
pub mod wildcard;

pub use definition::{FacetTemplate, FieldDeclaration, FieldDefinition};
pub use field_type::{FieldScalar, ValueKind};
pub use generation::{SchemaGeneration, SchemaHolder};
pub use registry::{FacetDimensionConfig, FieldHandle, FieldRegistry, FieldRole};
pub use wildcard::WildcardPattern;

/// Default primary-key field name when none is declared
pub const ID_FIELD: &str = "$id$";

/// Default index field receiving sorted-set facet terms
pub const DEFAULT_SORTEDSET_FACET_FIELD: &str = "$facets$";

/// Index field receiving taxonomy facet terms
pub const TAXONOMY_FACET_FIELD: &str = "$taxonomy$";

/// Index field receiving int-association facet terms
pub const TAXONOMY_INT_ASSOC_FACET_FIELD: &str = "$taxonomy_int$";

/// Index field receiving float-association facet terms
pub const TAXONOMY_FLOAT_ASSOC_FACET_FIELD: &str = "$taxonomy_float$";

/// Reserved sort-key name addressing the relevance score
pub const SCORE_FIELD: &str = "score";
