//! Text tokenizer with stemming and stopword removal

use crate::config::{TokenizeMode, TokenizerConfig};
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use super::analyzer::Token;

/// Text tokenizer driving an analyzer pipeline
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let stemmer = if config.stem {
            Some(Stemmer::create(Algorithm::English))
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            get(LANGUAGE::English)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    /// Tokenize text into a vector of terms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokens(text).into_iter().map(|t| t.term).collect()
    }

    /// Tokenize text into terms with positions and byte offsets
    ///
    /// Positions count all candidate tokens: a token dropped by the stopword
    /// or length filters still increments the position, which keeps phrase
    /// offsets stable.
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        match self.config.mode {
            TokenizeMode::Keyword => self.keyword_token(text),
            TokenizeMode::Whitespace => {
                self.filter_tokens(text.split_whitespace().map(|word| {
                    let start = word.as_ptr() as usize - text.as_ptr() as usize;
                    (start, word)
                }))
            }
            TokenizeMode::Words => self.filter_tokens(text.unicode_word_indices()),
        }
    }

    fn keyword_token(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }
        let term = if self.config.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        vec![Token {
            term,
            position: 0,
            start_offset: 0,
            end_offset: text.len(),
        }]
    }

    fn filter_tokens<'a>(&self, words: impl Iterator<Item = (usize, &'a str)>) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for (start, word) in words {
            let mut term = word.to_string();
            if self.config.lowercase {
                term = term.to_lowercase();
            }

            let keep = term.len() >= self.config.min_token_length
                && term.len() <= self.config.max_token_length
                && !self.stopwords.contains(&term);

            if keep {
                if let Some(stemmer) = &self.stemmer {
                    term = stemmer.stem(&term).to_string();
                }
                tokens.push(Token {
                    term,
                    position,
                    start_offset: start,
                    end_offset: start + word.len(),
                });
            }
            position += 1;
        }

        tokens
    }

    /// Compute term frequencies for a tokenized text
    pub fn term_frequencies(&self, text: &str) -> std::collections::HashMap<String, u32> {
        let mut freq = std::collections::HashMap::new();
        for term in self.tokenize(text) {
            *freq.entry(term).or_insert(0) += 1;
        }
        freq
    }

    /// Get unique terms from text
    pub fn unique_terms(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}
