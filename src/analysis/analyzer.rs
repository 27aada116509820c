//! Named analyzers and analyzer factories
//!
//! An analyzer is a named tokenizer pipeline. Names resolve through caller
//! factories first, then through the built-in table under a fixed set of
//! namespace prefixes.

use super::tokenizer::Tokenizer;
use crate::config::{TokenizeMode, TokenizerConfig};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Namespace prefixes tried, in order, when resolving a built-in analyzer
pub const ANALYZER_NAME_PREFIXES: [&str; 2] = ["", "builtin."];

/// One analyzed term with its position and byte offsets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub position: u32,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// A named text-analysis pipeline
pub struct Analyzer {
    name: String,
    tokenizer: Tokenizer,
}

impl Analyzer {
    /// Create an analyzer from a tokenizer configuration
    pub fn new(name: impl Into<String>, config: &TokenizerConfig) -> Self {
        Self {
            name: name.into(),
            tokenizer: Tokenizer::new(config),
        }
    }

    /// The default analyzer used when nothing else is declared
    pub fn standard() -> Self {
        Self::new("standard", &TokenizerConfig::default())
    }

    /// Construct a built-in analyzer by name
    ///
    /// The name is matched after stripping each of the fixed namespace
    /// prefixes in order.
    pub fn builtin(name: &str) -> Option<Self> {
        for prefix in ANALYZER_NAME_PREFIXES {
            let stripped = name.strip_prefix(prefix).unwrap_or(name);
            if let Some(config) = builtin_config(stripped) {
                return Some(Self::new(stripped, &config));
            }
        }
        None
    }

    /// The analyzer's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Analyze text into terms with positions and offsets
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        self.tokenizer.tokens(text)
    }

    /// Analyze text into bare terms
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").field("name", &self.name).finish()
    }
}

fn builtin_config(name: &str) -> Option<TokenizerConfig> {
    let base = TokenizerConfig::default();
    match name {
        "standard" | "simple" => Some(base),
        "whitespace" => Some(TokenizerConfig {
            mode: TokenizeMode::Whitespace,
            lowercase: false,
            ..base
        }),
        "keyword" => Some(TokenizerConfig {
            mode: TokenizeMode::Keyword,
            lowercase: false,
            ..base
        }),
        "lowercase" => Some(TokenizerConfig {
            mode: TokenizeMode::Keyword,
            ..base
        }),
        "english" => Some(TokenizerConfig {
            remove_stopwords: true,
            stem: true,
            min_token_length: 2,
            ..base
        }),
        _ => None,
    }
}

/// Factory constructing an analyzer for one registered name
pub trait AnalyzerFactory: Send + Sync {
    fn create_analyzer(&self) -> Result<Analyzer>;
}

impl<F> AnalyzerFactory for F
where
    F: Fn() -> Result<Analyzer> + Send + Sync,
{
    fn create_analyzer(&self) -> Result<Analyzer> {
        self()
    }
}

/// A source of named analyzer factories
pub type AnalyzerFactoryMap = HashMap<String, Arc<dyn AnalyzerFactory>>;
