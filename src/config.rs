use serde::{Deserialize, Serialize};

/// Tokenization mode of the analyzer pipeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizeMode {
    /// Split on Unicode word boundaries
    #[default]
    Words,
    /// Split on whitespace only
    Whitespace,
    /// Emit the whole input as a single token
    Keyword,
}

/// Tokenizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub mode: TokenizeMode,
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
    pub language: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            mode: TokenizeMode::Words,
            lowercase: true,
            remove_stopwords: false,
            stem: false,
            min_token_length: 1,
            max_token_length: 255,
            language: "english".to_string(),
        }
    }
}

/// Policy applied when a field of a document cannot be mapped
///
/// Governs `FieldNotFound` and `UnsupportedValueType` errors during record
/// mapping. Schema errors are never policy-gated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexingPolicy {
    /// Abort the whole document on the first failing field
    #[default]
    FailOnError,
    /// Skip the failing field, log a warning, keep the rest of the document
    Lenient,
}

/// Policy applied when a named analyzer cannot be resolved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerPolicy {
    /// Abort analyzer context construction on the first unresolved name
    #[default]
    FailFast,
    /// Omit the offending field, log a warning, fall back to the default
    BestEffort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_config_default() {
        let config = TokenizerConfig::default();
        assert_eq!(config.mode, TokenizeMode::Words);
        assert!(config.lowercase);
        assert!(!config.stem);
        assert_eq!(config.max_token_length, 255);
    }

    #[test]
    fn test_policy_defaults() {
        assert_eq!(IndexingPolicy::default(), IndexingPolicy::FailOnError);
        assert_eq!(AnalyzerPolicy::default(), AnalyzerPolicy::FailFast);
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&IndexingPolicy::Lenient).unwrap();
        assert_eq!(json, "\"lenient\"");
        let policy: AnalyzerPolicy = serde_json::from_str("\"best_effort\"").unwrap();
        assert_eq!(policy, AnalyzerPolicy::BestEffort);
    }
}
