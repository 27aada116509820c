use thiserror::Error;

/// Main error type for schema, dispatch, analysis and query resolution
#[derive(Error, Debug)]
pub enum FathomError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("The field has not been found: {0}")]
    FieldNotFound(String),

    #[error("Unsupported value type for field '{field}': {reason}")]
    UnsupportedValueType { field: String, reason: String },

    #[error("Analyzer '{analyzer}' could not be resolved for field '{field}'")]
    AnalyzerResolution { field: String, analyzer: String },

    #[error("Query resolution error: {0}")]
    QueryResolution(String),

    #[error("Engine error: {0}")]
    Engine(String),
}

/// Result type alias for fathom operations
pub type Result<T> = std::result::Result<T, FathomError>;

impl FathomError {
    /// Check if this error is scoped to a single field of a document
    ///
    /// Field-level errors can be skipped under the lenient indexing policy;
    /// every other error aborts the whole operation.
    pub fn is_field_level(&self) -> bool {
        matches!(
            self,
            FathomError::FieldNotFound(_) | FathomError::UnsupportedValueType { .. }
        )
    }
}
